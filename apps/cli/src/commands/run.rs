//! Local dry-run harness. Executes a staged workflow against an
//! in-process stub tool registry; never talks to a real chain driver or
//! signer.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use w3rt_core::Value;
use w3rt_dag::Workflow;
use w3rt_engine::{ApprovalHandler, EngineConfig, EngineError, Tool, ToolMeta, ToolRegistry, WorkflowEngine};
use w3rt_policy::SideEffect;
use w3rt_trace::TraceStore;

use crate::cli::RunArgs;
use crate::doc::load_json;

struct EchoTool {
    name: String,
    meta: ToolMeta,
}

impl EchoTool {
    fn new(name: String) -> Self {
        let meta = ToolMeta { action: name.clone(), side_effect: SideEffect::None, chain: None, risk: None };
        Self { name, meta }
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn meta(&self) -> &ToolMeta {
        &self.meta
    }

    async fn execute(&self, params: Value, _ctx: &Value) -> Result<Value, EngineError> {
        let mut map = std::collections::BTreeMap::new();
        map.insert("echo".to_string(), params);
        Ok(Value::Map(map))
    }
}

struct AlwaysApprove;

#[async_trait]
impl ApprovalHandler for AlwaysApprove {
    async fn approve(&self, _stage: &str, _ctx: &Value) -> bool {
        true
    }
}

pub async fn run(args: &RunArgs) -> Result<()> {
    if let Some(policy) = &args.policy {
        tracing::debug!(path = %policy.display(), "policy document supplied but not enforced by the local dry-run harness");
    }

    let doc = load_json(&args.workflow)?;
    let workflow = Workflow::parse_json(&doc)?;

    let tool_names: BTreeSet<String> = workflow
        .stages
        .iter()
        .flat_map(|stage| stage.actions.iter().map(|action| action.tool.clone()))
        .collect();

    let mut tools = ToolRegistry::new();
    for name in tool_names {
        tools.register(Arc::new(EchoTool::new(name)));
    }

    let trace = Arc::new(TraceStore::new(args.dir.clone()));
    let config = EngineConfig {
        tools,
        approval: Some(Arc::new(AlwaysApprove)),
        trace: Some(trace),
        ..Default::default()
    };

    let engine = WorkflowEngine::new(config);
    let result = engine.run(&workflow, Value::map()).await;

    let rendered = serde_json::json!({
        "ok": result.ok,
        "runId": result.run_id.as_str(),
        "error": result.error,
        "context": result.context.to_json(),
    });
    println!("{}", serde_json::to_string_pretty(&rendered)?);

    if !result.ok {
        std::process::exit(1);
    }
    Ok(())
}
