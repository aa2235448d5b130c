//! External collaborators the engine consults but does not implement:
//! an approval gate, a policy-check gate, and progress hooks.

use async_trait::async_trait;
use w3rt_core::Value;

/// `(stage, ctx) → bool`. Consulted once
/// an approval stage's auto-pre-check conditions have all passed.
#[async_trait]
pub trait ApprovalHandler: Send + Sync {
    async fn approve(&self, stage: &str, ctx: &Value) -> bool;
}

/// Outcome of a policy-check callback invocation.
#[derive(Debug, Clone)]
pub struct PolicyCheckResult {
    pub allowed: bool,
    pub reason: Option<String>,
}

/// `(tool, params, ctx) → { allowed, reason? }`. Invoked before any tool whose
/// `meta.sideEffect == "broadcast"` executes.
#[async_trait]
pub trait PolicyCheck: Send + Sync {
    async fn check(&self, tool: &str, params: &Value, ctx: &Value) -> PolicyCheckResult;
}

/// Progress notifications fired around stage/action execution. All
/// methods are no-ops by default so callers only implement what they
/// need — an event-bus-with-default-handlers shape.
pub trait EngineHooks: Send + Sync {
    fn on_stage_start(&self, _stage: &str) {}
    fn on_stage_end(&self, _stage: &str, _error: Option<&str>) {}
    fn on_action_start(&self, _stage: &str, _tool: &str) {}
    fn on_action_end(&self, _stage: &str, _tool: &str, _error: Option<&str>) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl EngineHooks for Noop {}

    #[test]
    fn default_hooks_are_inert() {
        let hooks = Noop;
        hooks.on_stage_start("quote");
        hooks.on_stage_end("quote", None);
        hooks.on_action_start("quote", "w3rt_swap_quote");
        hooks.on_action_end("quote", "w3rt_swap_quote", Some("boom"));
    }
}
