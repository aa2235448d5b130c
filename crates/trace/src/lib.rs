//! Append-only per-run event log and content-addressed artifact store.
//!
//! `store` owns writes (fresh `id`/`ts` assignment, append-only
//! `trace.jsonl`, artifact files); `query` owns read-only views over the
//! same on-disk layout (run listing, event filtering, audit reports).

pub mod error;
pub mod event;
pub mod query;
pub mod store;

pub use error::{TraceError, TraceResult};
pub use event::{EventType, TraceEvent, TraceEventBuilder};
pub use query::{generate_audit_report, list_runs, load_run_events, query_events, AuditReport, EventFilter, TxSummary};
pub use store::{ArtifactRef, TraceStore};
