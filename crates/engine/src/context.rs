//! The run context: a dotted-path-addressable [`Value`] map that grows as
//! each action completes. Written to by [`crate::engine::WorkflowEngine`],
//! read by `when` expressions, template rendering, and approval
//! conditions.

use w3rt_core::Value;

const RUN_ID_KEY: &str = "__runId";
const WORKFLOW_KEY: &str = "__workflow";

/// Tool-name substrings mapped to the conventional alias they bind a
/// result under, checked in order, first match wins. Deliberately
/// fragile: a stage literally named `"quote"` can have its binding
/// shadowed by a later, unrelated action whose tool name also contains
/// `"quote"`. Preserved verbatim for behavioral parity rather than
/// redesigned.
const CONVENTIONAL_ALIASES: &[(&str, &str)] =
    &[("quote", "quote"), ("build", "built"), ("simulate", "simulation"), ("send", "submitted"), ("confirm", "confirmed")];

/// Result keys that, when present on a tool's result map, additionally
/// bind the whole result under a second, domain-specific name.
const DOMAIN_ALIASES: &[(&str, &str)] = &[("profit", "opportunity"), ("prices", "prices")];

/// The run context being accumulated by [`WorkflowEngine::run`].
#[derive(Debug, Clone)]
pub struct RunContext {
    value: Value,
}

impl RunContext {
    /// Seed a fresh context from the caller's initial map plus the
    /// conventional `__runId`/`__workflow` bindings.
    #[must_use]
    pub fn new(initial: Value, run_id: &str, workflow_name: &str) -> Self {
        let mut value = if matches!(initial, Value::Map(_)) { initial } else { Value::map() };
        value.set_path(RUN_ID_KEY, Value::str(run_id));
        value.set_path(WORKFLOW_KEY, Value::str(workflow_name));
        Self { value }
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }

    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        self.value.get_path(path)
    }

    pub fn set_path(&mut self, path: &str, value: Value) {
        self.value.set_path(path, value);
    }

    /// Store a completed action's result under every alias it is known
    /// by: the stage name, a short tool alias (the tool name with any
    /// `w3rt_` prefix stripped), conventional substring aliases, and
    /// domain aliases keyed off recognized result fields.
    pub fn store_action_result(&mut self, stage_name: &str, tool_name: &str, result: &Value) {
        self.set_path(stage_name, result.clone());

        let short_alias = tool_name.strip_prefix("w3rt_").unwrap_or(tool_name);
        self.set_path(short_alias, result.clone());

        let lower = tool_name.to_ascii_lowercase();
        for (needle, alias) in CONVENTIONAL_ALIASES {
            if lower.contains(needle) {
                self.set_path(alias, result.clone());
            }
        }

        if let Value::Map(map) = result {
            for (key, alias) in DOMAIN_ALIASES {
                if map.contains_key(*key) {
                    self.set_path(alias, result.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seeds_run_id_and_workflow_name() {
        let ctx = RunContext::new(Value::map(), "run-1", "swap-flow");
        assert_eq!(ctx.get_path("__runId"), Some(&Value::str("run-1")));
        assert_eq!(ctx.get_path("__workflow"), Some(&Value::str("swap-flow")));
    }

    #[test]
    fn non_map_initial_value_is_replaced_with_an_empty_map() {
        let ctx = RunContext::new(Value::Int(1), "run-1", "wf");
        assert_eq!(ctx.get_path("__runId"), Some(&Value::str("run-1")));
    }

    #[test]
    fn stores_under_stage_name_and_short_tool_alias() {
        let mut ctx = RunContext::new(Value::map(), "run-1", "wf");
        let result = Value::from_json(&serde_json::json!({"price": 100}));
        ctx.store_action_result("quote_stage", "w3rt_swap_quote", &result);
        assert_eq!(ctx.get_path("quote_stage.price"), Some(&Value::Int(100)));
        assert_eq!(ctx.get_path("swap_quote.price"), Some(&Value::Int(100)));
        // "quote" is a substring of "swap_quote" -> conventional alias too.
        assert_eq!(ctx.get_path("quote.price"), Some(&Value::Int(100)));
    }

    #[test]
    fn conventional_alias_maps_send_to_submitted() {
        let mut ctx = RunContext::new(Value::map(), "run-1", "wf");
        let result = Value::from_json(&serde_json::json!({"signature": "abc"}));
        ctx.store_action_result("broadcast", "w3rt_tx_send", &result);
        assert_eq!(ctx.get_path("submitted.signature"), Some(&Value::str("abc")));
    }

    #[test]
    fn domain_alias_binds_profit_to_opportunity() {
        let mut ctx = RunContext::new(Value::map(), "run-1", "wf");
        let result = Value::from_json(&serde_json::json!({"profit": 12.5}));
        ctx.store_action_result("calc", "w3rt_calc", &result);
        assert_eq!(ctx.get_path("opportunity.profit"), Some(&Value::Float(12.5)));
    }

    #[test]
    fn later_action_can_shadow_a_stage_named_like_an_alias() {
        let mut ctx = RunContext::new(Value::map(), "run-1", "wf");
        ctx.store_action_result("quote", "w3rt_swap_quote", &Value::from_json(&serde_json::json!({"price": 1})));
        // A later, unrelated action whose tool name also contains "quote"
        // overwrites the "quote" binding the stage name itself set up.
        ctx.store_action_result("unrelated", "w3rt_price_quote_cache", &Value::from_json(&serde_json::json!({"price": 2})));
        assert_eq!(ctx.get_path("quote.price"), Some(&Value::Int(2)));
    }
}
