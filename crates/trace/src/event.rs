//! Trace event shape.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[serde(rename = "run.started")]
    RunStarted,
    #[serde(rename = "run.finished")]
    RunFinished,
    #[serde(rename = "step.started")]
    StepStarted,
    #[serde(rename = "step.finished")]
    StepFinished,
    #[serde(rename = "tool.called")]
    ToolCalled,
    #[serde(rename = "tool.result")]
    ToolResult,
    #[serde(rename = "tool.error")]
    ToolError,
    #[serde(rename = "policy.decision")]
    PolicyDecision,
    #[serde(rename = "tx.built")]
    TxBuilt,
    #[serde(rename = "tx.simulated")]
    TxSimulated,
    #[serde(rename = "tx.submitted")]
    TxSubmitted,
    #[serde(rename = "tx.confirmed")]
    TxConfirmed,
}

impl EventType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::RunStarted => "run.started",
            EventType::RunFinished => "run.finished",
            EventType::StepStarted => "step.started",
            EventType::StepFinished => "step.finished",
            EventType::ToolCalled => "tool.called",
            EventType::ToolResult => "tool.result",
            EventType::ToolError => "tool.error",
            EventType::PolicyDecision => "policy.decision",
            EventType::TxBuilt => "tx.built",
            EventType::TxSimulated => "tx.simulated",
            EventType::TxSubmitted => "tx.submitted",
            EventType::TxConfirmed => "tx.confirmed",
        }
    }
}

/// One line of `runs/<runId>/trace.jsonl`.
///
/// `id` and `ts` are assigned by [`crate::store::TraceStore::emit`] itself
/// — callers build an event without them and get a fully-populated one
/// back, the same "the store owns identity and ordering" split `w3rt-core`
/// uses for `RunId` generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub id: String,
    pub ts: i64,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(rename = "stepId", skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(rename = "walletId", skip_serializing_if = "Option::is_none")]
    pub wallet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Builder for a not-yet-stamped event; [`TraceStore::emit`] fills in
/// `id`/`ts` and `run_id` is supplied separately so a single store can
/// serve many runs.
#[derive(Debug, Clone, Default)]
pub struct TraceEventBuilder {
    pub step_id: Option<String>,
    pub chain: Option<String>,
    pub tool: Option<String>,
    pub wallet_id: Option<String>,
    pub data: Option<serde_json::Value>,
}

impl TraceEventBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn step_id(mut self, id: impl Into<String>) -> Self {
        self.step_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn tool(mut self, tool: impl Into<String>) -> Self {
        self.tool = Some(tool.into());
        self
    }

    #[must_use]
    pub fn chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = Some(chain.into());
        self
    }

    #[must_use]
    pub fn wallet_id(mut self, wallet_id: impl Into<String>) -> Self {
        self.wallet_id = Some(wallet_id.into());
        self
    }

    #[must_use]
    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
