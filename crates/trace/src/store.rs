//! Append-only trace log and content-addressed artifact writer.
//!
//! Layout under a caller-supplied base directory:
//! `runs/<runId>/trace.jsonl` (one JSON event per line) and
//! `runs/<runId>/artifacts/<name>.json` (pretty-printed). Per-run trace
//! writes are serialized by holding one `tokio::sync::Mutex`-guarded file
//! handle per run id in a `DashMap` — different run ids touch independent
//! map entries and need no shared lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{TraceError, TraceResult};
use crate::event::{TraceEvent, TraceEventBuilder};

/// A content-addressed reference to a written artifact.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ArtifactRef {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub name: String,
    pub path: String,
    pub sha256: String,
    pub bytes: u64,
}

pub struct TraceStore {
    base_dir: PathBuf,
    files: DashMap<String, Arc<Mutex<File>>>,
    last_ts: AtomicI64,
}

impl TraceStore {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: base_dir.into(), files: DashMap::new(), last_ts: AtomicI64::new(0) }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.base_dir.join("runs").join(run_id)
    }

    fn trace_path(&self, run_id: &str) -> PathBuf {
        self.run_dir(run_id).join("trace.jsonl")
    }

    /// A timestamp strictly greater than the previous one returned by this
    /// store, even across calls in the same millisecond.
    fn next_ts(&self) -> i64 {
        let wall = chrono::Utc::now().timestamp_millis();
        loop {
            let prev = self.last_ts.load(Ordering::SeqCst);
            let next = wall.max(prev + 1);
            if self
                .last_ts
                .compare_exchange(prev, next, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                return next;
            }
        }
    }

    async fn file_for(&self, run_id: &str) -> TraceResult<Arc<Mutex<File>>> {
        if let Some(existing) = self.files.get(run_id) {
            return Ok(Arc::clone(&existing));
        }
        let dir = self.run_dir(run_id);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| io_err(&dir, e))?;
        let path = self.trace_path(run_id);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|e| io_err(&path, e))?;
        let handle = Arc::new(Mutex::new(file));
        self.files.insert(run_id.to_string(), Arc::clone(&handle));
        Ok(handle)
    }

    /// Append one event to `runs/<runId>/trace.jsonl`, assigning a fresh
    /// `id` and `ts`. The line (including its trailing newline) is written
    /// in a single `write_all` + `flush` under the per-run lock so a
    /// partial line never remains on disk for any single event.
    pub async fn emit(
        &self,
        run_id: &str,
        event_type: crate::event::EventType,
        built: TraceEventBuilder,
    ) -> TraceResult<TraceEvent> {
        let event = TraceEvent {
            id: uuid::Uuid::new_v4().to_string(),
            ts: self.next_ts(),
            event_type,
            run_id: run_id.to_string(),
            step_id: built.step_id,
            chain: built.chain,
            tool: built.tool,
            wallet_id: built.wallet_id,
            data: built.data,
        };

        let mut line = serde_json::to_string(&event)
            .map_err(|e| TraceError::MalformedEvent(e.to_string()))?;
        line.push('\n');

        let handle = self.file_for(run_id).await?;
        let mut file = handle.lock().await;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| io_err(&self.trace_path(run_id), e))?;
        file.flush().await.map_err(|e| io_err(&self.trace_path(run_id), e))?;

        Ok(event)
    }

    /// Write (or overwrite) a named artifact within a run, returning its
    /// content address.
    pub async fn write_artifact(
        &self,
        run_id: &str,
        name: &str,
        value: &serde_json::Value,
    ) -> TraceResult<ArtifactRef> {
        let dir = self.run_dir(run_id).join("artifacts");
        fs::create_dir_all(&dir).await.map_err(|e| io_err(&dir, e))?;
        let path = dir.join(format!("{name}.json"));

        let pretty = serde_json::to_vec_pretty(value)
            .map_err(|e| TraceError::MalformedEvent(e.to_string()))?;
        fs::write(&path, &pretty).await.map_err(|e| io_err(&path, e))?;

        let mut hasher = Sha256::new();
        hasher.update(&pretty);
        let sha256 = hex::encode(hasher.finalize());

        Ok(ArtifactRef {
            run_id: run_id.to_string(),
            name: name.to_string(),
            path: path.display().to_string(),
            sha256,
            bytes: pretty.len() as u64,
        })
    }
}

fn io_err(path: &Path, source: std::io::Error) -> TraceError {
    TraceError::Io { path: path.display().to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn emit_appends_a_single_newline_terminated_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.emit("run-1", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        store.emit("run-1", EventType::RunFinished, TraceEventBuilder::new()).await.unwrap();

        let content = tokio::fs::read_to_string(store.run_dir("run-1").join("trace.jsonl"))
            .await
            .unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(content.ends_with('\n'));
    }

    #[tokio::test]
    async fn emitted_events_preserve_call_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        for _ in 0..5 {
            store.emit("run-1", EventType::StepStarted, TraceEventBuilder::new()).await.unwrap();
        }
        let content = tokio::fs::read_to_string(store.run_dir("run-1").join("trace.jsonl"))
            .await
            .unwrap();
        let events: Vec<TraceEvent> =
            content.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        for pair in events.windows(2) {
            assert!(pair[0].ts <= pair[1].ts);
        }
    }

    #[tokio::test]
    async fn different_run_ids_get_independent_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.emit("run-a", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        store.emit("run-b", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        assert!(store.run_dir("run-a").join("trace.jsonl").exists());
        assert!(store.run_dir("run-b").join("trace.jsonl").exists());
    }

    #[tokio::test]
    async fn write_artifact_returns_matching_sha256() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        let value = serde_json::json!({"a": 1});
        let reference = store.write_artifact("run-1", "plan", &value).await.unwrap();

        let bytes = tokio::fs::read(&reference.path).await.unwrap();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        assert_eq!(reference.sha256, hex::encode(hasher.finalize()));
        assert_eq!(reference.bytes, bytes.len() as u64);
    }

    #[tokio::test]
    async fn rewriting_an_artifact_overwrites_it() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.write_artifact("run-1", "plan", &serde_json::json!({"v": 1})).await.unwrap();
        let second = store.write_artifact("run-1", "plan", &serde_json::json!({"v": 2})).await.unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_slice(&tokio::fs::read(&second.path).await.unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!({"v": 2}));
    }
}
