//! Workflow execution engine.
//!
//! Single-threaded and strictly sequential: stages run in source order,
//! actions within a stage run in declared order, there is no parallel
//! fan-out. Each tool invocation is an atomic suspension
//! point; cancellation is only observed between actions.

use std::sync::Arc;

use w3rt_core::{RunId, Value};
use w3rt_dag::{Stage, StageType, Workflow};
use w3rt_expr::{eval_str, render};
use w3rt_policy::SideEffect;
use w3rt_trace::{EventType, TraceEventBuilder, TraceStore};

use crate::callbacks::{ApprovalHandler, EngineHooks, PolicyCheck};
use crate::cancel::CancelToken;
use crate::context::RunContext;
use crate::error::EngineError;
use crate::registry::ToolRegistry;
use crate::result::RunResult;

/// Everything a [`WorkflowEngine`] needs besides the workflow and initial
/// context it is given per-run. Tools and policy config are process-scoped
/// and immutable for the duration of a run.
#[derive(Clone, Default)]
pub struct EngineConfig {
    pub tools: ToolRegistry,
    pub approval: Option<Arc<dyn ApprovalHandler>>,
    pub policy_check: Option<Arc<dyn PolicyCheck>>,
    pub hooks: Option<Arc<dyn EngineHooks>>,
    pub trace: Option<Arc<TraceStore>>,
    pub cancel: Option<CancelToken>,
}

pub struct WorkflowEngine {
    config: EngineConfig,
}

impl WorkflowEngine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Execute `workflow` end to end against `initial_ctx`, returning the
    /// final context and outcome regardless of success or failure — the
    /// engine itself never propagates a `Result`, it always finalizes a
    /// [`RunResult`].
    pub async fn run(&self, workflow: &Workflow, initial_ctx: Value) -> RunResult {
        let run_id = RunId::new();
        let mut ctx = RunContext::new(initial_ctx, run_id.as_str(), &workflow.name);

        self.emit(run_id.as_str(), EventType::RunStarted, TraceEventBuilder::new()).await;

        let outcome = self.run_stages(&run_id, workflow, &mut ctx).await;

        let (ok, error) = match &outcome {
            Ok(()) => (true, None),
            Err(err) => (false, Some(err.to_string())),
        };
        self.emit(
            run_id.as_str(),
            EventType::RunFinished,
            TraceEventBuilder::new().data(serde_json::json!({"ok": ok, "error": error})),
        )
        .await;

        RunResult { ok, run_id, context: ctx.into_value(), error }
    }

    async fn run_stages(
        &self,
        run_id: &RunId,
        workflow: &Workflow,
        ctx: &mut RunContext,
    ) -> Result<(), EngineError> {
        for stage in &workflow.stages {
            if let Some(when) = &stage.when {
                if !eval_str(when, ctx.as_value()) {
                    continue;
                }
            }

            if let Some(hooks) = &self.config.hooks {
                hooks.on_stage_start(&stage.name);
            }

            let result = self.run_stage(run_id, stage, ctx).await;

            if let Some(hooks) = &self.config.hooks {
                hooks.on_stage_end(&stage.name, result.as_ref().err().map(ToString::to_string).as_deref());
            }

            result?;
        }
        Ok(())
    }

    async fn run_stage(
        &self,
        run_id: &RunId,
        stage: &Stage,
        ctx: &mut RunContext,
    ) -> Result<(), EngineError> {
        if stage.stage_type == StageType::Approval {
            return self.run_approval(stage, ctx).await;
        }

        for action in &stage.actions {
            if self.config.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(EngineError::Cancelled);
            }

            let tool = self
                .config
                .tools
                .get(&action.tool)
                .ok_or_else(|| EngineError::UnknownTool(action.tool.clone()))?
                .clone();

            let rendered = render(&Value::from_json(&action.params), ctx.as_value());

            if let Some(hooks) = &self.config.hooks {
                hooks.on_action_start(&stage.name, &action.tool);
            }
            self.emit(
                run_id.as_str(),
                EventType::ToolCalled,
                TraceEventBuilder::new().step_id(&stage.name).tool(&action.tool),
            )
            .await;

            if tool.meta().side_effect == SideEffect::Broadcast {
                if let Some(checker) = &self.config.policy_check {
                    let check = checker.check(&action.tool, &rendered, ctx.as_value()).await;
                    self.emit(
                        run_id.as_str(),
                        EventType::PolicyDecision,
                        TraceEventBuilder::new().step_id(&stage.name).tool(&action.tool).data(
                            serde_json::json!({"allowed": check.allowed, "reason": check.reason}),
                        ),
                    )
                    .await;
                    if !check.allowed {
                        let reason = check.reason.unwrap_or_else(|| "denied".to_string());
                        let err = EngineError::PolicyBlocked(reason);
                        if let Some(hooks) = &self.config.hooks {
                            hooks.on_action_end(&stage.name, &action.tool, Some(&err.to_string()));
                        }
                        return Err(err);
                    }
                }
            }

            let outcome = tool.execute(rendered, ctx.as_value()).await;

            match outcome {
                Ok(value) => {
                    self.emit(
                        run_id.as_str(),
                        EventType::ToolResult,
                        TraceEventBuilder::new().step_id(&stage.name).tool(&action.tool).data(value.to_json()),
                    )
                    .await;
                    ctx.store_action_result(&stage.name, &action.tool, &value);
                    if let Some(hooks) = &self.config.hooks {
                        hooks.on_action_end(&stage.name, &action.tool, None);
                    }
                }
                Err(err) => {
                    self.emit(
                        run_id.as_str(),
                        EventType::ToolError,
                        TraceEventBuilder::new()
                            .step_id(&stage.name)
                            .tool(&action.tool)
                            .data(serde_json::json!({"error": err.to_string()})),
                    )
                    .await;
                    if let Some(hooks) = &self.config.hooks {
                        hooks.on_action_end(&stage.name, &action.tool, Some(&err.to_string()));
                    }
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    async fn run_approval(&self, stage: &Stage, ctx: &RunContext) -> Result<(), EngineError> {
        let Some(approval) = &stage.approval else {
            return Ok(());
        };
        if !approval.required {
            return Ok(());
        }

        let conditions_ok = approval.conditions.iter().all(|cond| eval_str(cond, ctx.as_value()));
        if !conditions_ok {
            return Err(EngineError::ApprovalConditionsFailed);
        }

        match &self.config.approval {
            Some(handler) => {
                if handler.approve(&stage.name, ctx.as_value()).await {
                    Ok(())
                } else {
                    Err(EngineError::ApprovalRejected)
                }
            }
            None => Err(EngineError::NoApprovalHandler),
        }
    }

    async fn emit(&self, run_id: &str, event_type: EventType, builder: TraceEventBuilder) {
        let Some(trace) = &self.config.trace else { return };
        if let Err(err) = trace.emit(run_id, event_type, builder).await {
            tracing::warn!(error = %err, "failed to write trace event");
        }
    }
}
