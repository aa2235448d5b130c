//! Plan compiler: validates a DAG-form workflow, injects safety steps,
//! and produces a content-addressed [`Plan`] artifact.

use std::collections::HashMap;

use crate::error::DagResult;
use crate::schema::{DagAction, DagWorkflow, Plan, PlanMeta, PlanStep, PLAN_SCHEMA};
use crate::topo;
use crate::validate::validate_dag;

const SWAP_EXEC: &str = "w3rt_swap_exec";
const SWAP_QUOTE: &str = "w3rt_swap_quote";
const TX_SIMULATE: &str = "w3rt_tx_simulate";

/// Options steering compilation that don't change validation semantics.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub policy: Option<serde_json::Value>,
    pub policy_hash: Option<String>,
}

/// Validate `workflow`, inject any missing safety steps, topologically
/// order the result, and attach content hashes.
pub fn compile(workflow: &DagWorkflow, opts: &CompileOptions) -> DagResult<Plan> {
    validate_dag(workflow)?;

    let actions = inject_safety_steps(&workflow.actions);

    let ids: Vec<String> = actions.iter().map(|a| a.id.clone()).collect();
    let deps: HashMap<String, Vec<String>> = actions
        .iter()
        .map(|a| (a.id.clone(), a.depends_on.clone()))
        .collect();
    // Safety-step injection only adds edges between an action and a step
    // derived from it, so this cannot introduce a cycle that
    // `validate_dag` would not already have caught on the original graph.
    let order = topo::topo_order(&ids, &deps).expect("safety injection preserves acyclicity");

    let by_id: HashMap<&str, &DagAction> = actions.iter().map(|a| (a.id.as_str(), a)).collect();
    let steps = order
        .into_iter()
        .map(|id| {
            let a = by_id[id.as_str()];
            PlanStep {
                id: a.id.clone(),
                tool: a.tool.clone(),
                params: a.params.clone(),
                depends_on: a.depends_on.clone(),
            }
        })
        .collect();

    let mut plan = Plan {
        schema: PLAN_SCHEMA.to_string(),
        workflow: workflow.name.clone(),
        steps,
        meta: None,
    };

    let plan_hash = plan.compute_plan_hash();
    plan.meta = Some(PlanMeta {
        plan_hash: Some(plan_hash),
        policy_hash: opts.policy_hash.clone(),
        policy: opts.policy.clone(),
    });

    Ok(plan)
}

/// Inject a `w3rt_tx_simulate` step ahead of any `w3rt_swap_exec` action
/// that does not already depend on a simulate step, wiring the exec
/// action to depend on the injected step in addition to its declared
/// dependencies. Synthesized ids are namespaced so they cannot collide
/// with user-declared ids.
fn inject_safety_steps(actions: &[DagAction]) -> Vec<DagAction> {
    let tool_by_id: HashMap<&str, &str> =
        actions.iter().map(|a| (a.id.as_str(), a.tool.as_str())).collect();

    let mut result = Vec::with_capacity(actions.len());
    let mut injected = Vec::new();

    for action in actions {
        if action.tool != SWAP_EXEC {
            result.push(action.clone());
            continue;
        }
        let has_simulate = action
            .depends_on
            .iter()
            .any(|dep| tool_by_id.get(dep.as_str()) == Some(&TX_SIMULATE));
        if has_simulate {
            result.push(action.clone());
            continue;
        }

        let safety_id = format!("__safety_simulate_{}", action.id);
        let quote_dep = action
            .depends_on
            .iter()
            .find(|dep| tool_by_id.get(dep.as_str()) == Some(&SWAP_QUOTE))
            .cloned();

        injected.push(DagAction {
            id: safety_id.clone(),
            tool: TX_SIMULATE.to_string(),
            params: action.params.clone(),
            depends_on: quote_dep.into_iter().collect(),
        });

        let mut depends_on = action.depends_on.clone();
        depends_on.push(safety_id);
        result.push(DagAction {
            id: action.id.clone(),
            tool: action.tool.clone(),
            params: action.params.clone(),
            depends_on,
        });
    }

    result.extend(injected);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(id: &str, tool: &str, params: serde_json::Value, depends_on: &[&str]) -> DagAction {
        DagAction {
            id: id.to_string(),
            tool: tool.to_string(),
            params,
            depends_on: depends_on.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn compiles_simple_workflow_with_plan_hash() {
        let w = DagWorkflow {
            name: "noop".into(),
            actions: vec![action("a", "w3rt_log", json!({}), &[])],
        };
        let plan = compile(&w, &CompileOptions::default()).unwrap();
        assert_eq!(plan.schema, PLAN_SCHEMA);
        assert_eq!(plan.steps.len(), 1);
        assert!(plan.meta.unwrap().plan_hash.unwrap().starts_with("sha256:"));
    }

    #[test]
    fn injects_simulate_step_before_swap_exec() {
        let w = DagWorkflow {
            name: "swap".into(),
            actions: vec![
                action("q", SWAP_QUOTE, json!({}), &[]),
                action("x", SWAP_EXEC, json!({"confirm": "I_CONFIRM"}), &["q"]),
            ],
        };
        let plan = compile(&w, &CompileOptions::default()).unwrap();
        assert_eq!(plan.steps.len(), 3);

        let exec = plan.steps.iter().find(|s| s.id == "x").unwrap();
        let safety_id = "__safety_simulate_x".to_string();
        assert!(exec.depends_on.contains(&safety_id));

        let safety = plan.steps.iter().find(|s| s.id == safety_id).unwrap();
        assert_eq!(safety.tool, TX_SIMULATE);
        assert!(safety.depends_on.contains(&"q".to_string()));

        let safety_pos = plan.steps.iter().position(|s| s.id == safety_id).unwrap();
        let exec_pos = plan.steps.iter().position(|s| s.id == "x").unwrap();
        assert!(safety_pos < exec_pos);
    }

    #[test]
    fn does_not_double_inject_when_simulate_already_present() {
        let w = DagWorkflow {
            name: "swap".into(),
            actions: vec![
                action("q", SWAP_QUOTE, json!({}), &[]),
                action("sim", TX_SIMULATE, json!({}), &["q"]),
                action("x", SWAP_EXEC, json!({"confirm": "I_CONFIRM"}), &["q", "sim"]),
            ],
        };
        let plan = compile(&w, &CompileOptions::default()).unwrap();
        assert_eq!(plan.steps.len(), 3);
        assert!(!plan.steps.iter().any(|s| s.id.starts_with("__safety_simulate_")));
    }

    #[test]
    fn same_input_produces_same_hash() {
        let w = DagWorkflow {
            name: "noop".into(),
            actions: vec![action("a", "w3rt_log", json!({"x": 1}), &[])],
        };
        let p1 = compile(&w, &CompileOptions::default()).unwrap();
        let p2 = compile(&w, &CompileOptions::default()).unwrap();
        assert_eq!(p1.meta.unwrap().plan_hash, p2.meta.unwrap().plan_hash);
    }

    #[test]
    fn invalid_workflow_fails_compilation() {
        let w = DagWorkflow {
            name: "bad".into(),
            actions: vec![action("x", SWAP_EXEC, json!({"confirm": "I_CONFIRM"}), &[])],
        };
        assert!(compile(&w, &CompileOptions::default()).is_err());
    }

    /// Snapshot the canonical JSON form a compiled plan's hash is actually
    /// computed over (`Plan::hash_basis`) — the one place where key
    /// ordering and number formatting matter byte-for-byte.
    #[test]
    fn compiled_plan_hash_basis_canonical_json_snapshot() {
        let w = DagWorkflow {
            name: "noop".into(),
            actions: vec![action("a", "w3rt_log", json!({"x": 1}), &[])],
        };
        let plan = compile(&w, &CompileOptions::default()).unwrap();
        let canonical = w3rt_core::canonical::to_canonical_bytes(&plan.hash_basis());
        insta::assert_snapshot!(String::from_utf8(canonical).unwrap(), @r#"{"schema":"w3rt.plan.v1","steps":[{"dependsOn":[],"id":"a","params":{"x":1},"tool":"w3rt_log"}],"workflow":"noop"}"#);
    }

    #[test]
    fn reordered_input_object_keys_do_not_change_plan_hash() {
        let a = DagWorkflow {
            name: "noop".into(),
            actions: vec![action("a", "w3rt_log", json!({"x": 1, "y": 2}), &[])],
        };
        let b = DagWorkflow {
            name: "noop".into(),
            actions: vec![action("a", "w3rt_log", json!({"y": 2, "x": 1}), &[])],
        };
        let plan_a = compile(&a, &CompileOptions::default()).unwrap();
        let plan_b = compile(&b, &CompileOptions::default()).unwrap();
        assert_eq!(plan_a.meta.unwrap().plan_hash, plan_b.meta.unwrap().plan_hash);
    }

    mod hash_stability_property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The plan hash only depends on the canonical content of
            /// `schema`/`workflow`/`steps`: shuffling the key order inside
            /// every action's `params` object must never change it.
            #[test]
            fn plan_hash_is_stable_under_params_key_reordering(a in 0i64..100, b in 0i64..100) {
                let forward = DagWorkflow {
                    name: "noop".into(),
                    actions: vec![action("a", "w3rt_log", json!({"a": a, "b": b}), &[])],
                };
                let reversed = DagWorkflow {
                    name: "noop".into(),
                    actions: vec![action("a", "w3rt_log", json!({"b": b, "a": a}), &[])],
                };
                let forward_hash = compile(&forward, &CompileOptions::default()).unwrap().meta.unwrap().plan_hash;
                let reversed_hash = compile(&reversed, &CompileOptions::default()).unwrap().meta.unwrap().plan_hash;
                prop_assert_eq!(forward_hash, reversed_hash);
            }
        }
    }
}
