//! Read-only views over the on-disk trace layout.
//!
//! These never mutate a run directory, so they read synchronously with
//! `std::fs` rather than pull in the async store's machinery — the CLI
//! and any future audit tooling are the only callers and neither runs
//! inside the engine's async execution loop.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::{TraceError, TraceResult};
use crate::event::{EventType, TraceEvent};

/// List run ids under `base_dir/runs`, newest first.
///
/// Reverse-lexicographic order is reverse-chronological only because
/// `w3rt_core::RunId` generates a monotonic timestamp-prefixed id for
/// every run — this function trusts that convention
/// rather than parsing timestamps out of arbitrary strings.
pub fn list_runs(base_dir: &Path) -> TraceResult<Vec<String>> {
    let runs_dir = base_dir.join("runs");
    if !runs_dir.exists() {
        return Ok(Vec::new());
    }
    let mut ids: Vec<String> = fs::read_dir(&runs_dir)
        .map_err(|e| io_err(&runs_dir, e))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    ids.sort_unstable_by(|a, b| b.cmp(a));
    Ok(ids)
}

/// Stream and parse `runs/<runId>/trace.jsonl` in full.
pub fn load_run_events(base_dir: &Path, run_id: &str) -> TraceResult<Vec<TraceEvent>> {
    let path = base_dir.join("runs").join(run_id).join("trace.jsonl");
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).map_err(|e| TraceError::MalformedEvent(e.to_string())))
        .collect()
}

/// Filter applied across one or more runs by [`query_events`].
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub run_id: Option<String>,
    pub types: Option<BTreeSet<EventType>>,
    pub chain: Option<String>,
    pub tool: Option<String>,
    pub since_ts: Option<i64>,
    pub until_ts: Option<i64>,
    pub limit: Option<usize>,
}

impl EventFilter {
    fn matches(&self, event: &TraceEvent) -> bool {
        if let Some(types) = &self.types {
            if !types.contains(&event.event_type) {
                return false;
            }
        }
        if let Some(chain) = &self.chain {
            if event.chain.as_deref() != Some(chain.as_str()) {
                return false;
            }
        }
        if let Some(tool) = &self.tool {
            if event.tool.as_deref() != Some(tool.as_str()) {
                return false;
            }
        }
        if let Some(since) = self.since_ts {
            if event.ts < since {
                return false;
            }
        }
        if let Some(until) = self.until_ts {
            if event.ts > until {
                return false;
            }
        }
        true
    }
}

/// Filter trace events across runs, short-circuiting once `filter.limit`
/// matches have been collected.
pub fn query_events(base_dir: &Path, filter: &EventFilter) -> TraceResult<Vec<TraceEvent>> {
    let run_ids = match &filter.run_id {
        Some(id) => vec![id.clone()],
        None => list_runs(base_dir)?,
    };

    let mut matched = Vec::new();
    for run_id in run_ids {
        for event in load_run_events(base_dir, &run_id)? {
            if !filter.matches(&event) {
                continue;
            }
            matched.push(event);
            if filter.limit.is_some_and(|limit| matched.len() >= limit) {
                return Ok(matched);
            }
        }
    }
    Ok(matched)
}

/// Per-run transaction lifecycle summary correlating `tx.submitted` with
/// `tx.confirmed` by signature/hash.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TxSummary {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub chain: Option<String>,
    pub signature: String,
    #[serde(rename = "submittedAt")]
    pub submitted_at: i64,
    #[serde(rename = "confirmedAt")]
    pub confirmed_at: Option<i64>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct AuditReport {
    pub from: Option<i64>,
    pub to: Option<i64>,
    #[serde(rename = "totalRuns")]
    pub total_runs: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub chains: BTreeSet<String>,
    pub transactions: Vec<TxSummary>,
}

fn signature_of(event: &TraceEvent) -> Option<String> {
    let data = event.data.as_ref()?;
    data.get("signature")
        .or_else(|| data.get("hash"))
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}

/// Aggregate totals, chains, and transaction lifecycles across every run
/// whose `run.started` event falls within `[from, to]` (either bound
/// optional and inclusive).
pub fn generate_audit_report(
    base_dir: &Path,
    from: Option<i64>,
    to: Option<i64>,
) -> TraceResult<AuditReport> {
    let mut report = AuditReport {
        from,
        to,
        total_runs: 0,
        succeeded: 0,
        failed: 0,
        chains: BTreeSet::new(),
        transactions: Vec::new(),
    };

    for run_id in list_runs(base_dir)? {
        let events = load_run_events(base_dir, &run_id)?;
        let Some(started) = events.iter().find(|e| e.event_type == EventType::RunStarted) else {
            continue;
        };
        if from.is_some_and(|f| started.ts < f) || to.is_some_and(|t| started.ts > t) {
            continue;
        }

        report.total_runs += 1;
        if let Some(finished) = events.iter().find(|e| e.event_type == EventType::RunFinished) {
            let ok = finished
                .data
                .as_ref()
                .and_then(|d| d.get("ok"))
                .and_then(serde_json::Value::as_bool)
                .unwrap_or(false);
            if ok {
                report.succeeded += 1;
            } else {
                report.failed += 1;
            }
        }

        for event in &events {
            if let Some(chain) = &event.chain {
                report.chains.insert(chain.clone());
            }
        }

        for submitted in events.iter().filter(|e| e.event_type == EventType::TxSubmitted) {
            let Some(signature) = signature_of(submitted) else { continue };
            let confirmed_at = events
                .iter()
                .filter(|e| e.event_type == EventType::TxConfirmed)
                .find(|e| signature_of(e).as_deref() == Some(signature.as_str()))
                .map(|e| e.ts);
            report.transactions.push(TxSummary {
                run_id: run_id.clone(),
                chain: submitted.chain.clone(),
                signature,
                submitted_at: submitted.ts,
                confirmed_at,
            });
        }
    }

    Ok(report)
}

fn io_err(path: &Path, source: std::io::Error) -> TraceError {
    TraceError::Io { path: path.display().to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TraceEventBuilder;
    use crate::store::TraceStore;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn list_runs_sorts_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.emit("20260101T000000000-aaaaaaaa", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        store.emit("20260201T000000000-bbbbbbbb", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();

        let ids = list_runs(dir.path()).unwrap();
        assert_eq!(ids, vec!["20260201T000000000-bbbbbbbb", "20260101T000000000-aaaaaaaa"]);
    }

    #[tokio::test]
    async fn list_runs_on_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(list_runs(dir.path()).unwrap(), Vec::<String>::new());
    }

    #[tokio::test]
    async fn load_run_events_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.emit("r1", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        store.emit("r1", EventType::RunFinished, TraceEventBuilder::new()).await.unwrap();

        let events = load_run_events(dir.path(), "r1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, EventType::RunStarted);
        assert_eq!(events[1].event_type, EventType::RunFinished);
    }

    #[tokio::test]
    async fn query_events_filters_by_type_and_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        for _ in 0..3 {
            store.emit("r1", EventType::StepStarted, TraceEventBuilder::new()).await.unwrap();
        }
        store.emit("r1", EventType::RunFinished, TraceEventBuilder::new()).await.unwrap();

        let filter = EventFilter {
            types: Some(BTreeSet::from([EventType::StepStarted])),
            limit: Some(2),
            ..Default::default()
        };
        let matched = query_events(dir.path(), &filter).unwrap();
        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|e| e.event_type == EventType::StepStarted));
    }

    #[tokio::test]
    async fn audit_report_correlates_submitted_and_confirmed() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.emit("r1", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        store
            .emit(
                "r1",
                EventType::TxSubmitted,
                TraceEventBuilder::new().chain("solana").data(serde_json::json!({"signature": "sig1"})),
            )
            .await
            .unwrap();
        store
            .emit(
                "r1",
                EventType::TxConfirmed,
                TraceEventBuilder::new().data(serde_json::json!({"signature": "sig1"})),
            )
            .await
            .unwrap();
        store
            .emit("r1", EventType::RunFinished, TraceEventBuilder::new().data(serde_json::json!({"ok": true})))
            .await
            .unwrap();

        let report = generate_audit_report(dir.path(), None, None).unwrap();
        assert_eq!(report.total_runs, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 0);
        assert!(report.chains.contains("solana"));
        assert_eq!(report.transactions.len(), 1);
        assert!(report.transactions[0].confirmed_at.is_some());
    }

    #[tokio::test]
    async fn unconfirmed_submission_reports_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TraceStore::new(dir.path());
        store.emit("r1", EventType::RunStarted, TraceEventBuilder::new()).await.unwrap();
        store
            .emit(
                "r1",
                EventType::TxSubmitted,
                TraceEventBuilder::new().data(serde_json::json!({"signature": "sig1"})),
            )
            .await
            .unwrap();
        store.emit("r1", EventType::RunFinished, TraceEventBuilder::new().data(serde_json::json!({"ok": false}))).await.unwrap();

        let report = generate_audit_report(dir.path(), None, None).unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.transactions[0].confirmed_at, None);
    }
}
