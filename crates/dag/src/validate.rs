//! DAG validator.
//!
//! Checks run in a fixed order and stop at the first violation: unique
//! ids, dependency existence, cycle detection, then the `w3rt_swap_exec`
//! domain rule. The validator never mutates the workflow.

use std::collections::{HashMap, HashSet};

use crate::error::{DagError, DagResult};
use crate::schema::{DagAction, DagWorkflow};
use crate::topo;

const SWAP_EXEC: &str = "w3rt_swap_exec";
const SWAP_QUOTE: &str = "w3rt_swap_quote";
const CONFIRM_LITERAL: &str = "I_CONFIRM";

/// Validate a DAG-form workflow, returning the first rule violated.
pub fn validate_dag(workflow: &DagWorkflow) -> DagResult<()> {
    check_unique_ids(&workflow.actions)?;
    check_dependencies_exist(&workflow.actions)?;
    check_acyclic(&workflow.actions)?;
    check_swap_exec_preconditions(&workflow.actions)?;
    Ok(())
}

fn check_unique_ids(actions: &[DagAction]) -> DagResult<()> {
    let mut seen = HashSet::new();
    for action in actions {
        if !seen.insert(action.id.as_str()) {
            return Err(DagError::DuplicateId(action.id.clone()));
        }
    }
    Ok(())
}

fn check_dependencies_exist(actions: &[DagAction]) -> DagResult<()> {
    let ids: HashSet<&str> = actions.iter().map(|a| a.id.as_str()).collect();
    for action in actions {
        for dep in &action.depends_on {
            if !ids.contains(dep.as_str()) {
                return Err(DagError::MissingDependency {
                    id: action.id.clone(),
                    dep: dep.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_acyclic(actions: &[DagAction]) -> DagResult<()> {
    let ids: Vec<String> = actions.iter().map(|a| a.id.clone()).collect();
    let deps: HashMap<String, Vec<String>> = actions
        .iter()
        .map(|a| (a.id.clone(), a.depends_on.clone()))
        .collect();
    if topo::topo_order(&ids, &deps).is_none() {
        return Err(DagError::Cycle);
    }
    Ok(())
}

fn check_swap_exec_preconditions(actions: &[DagAction]) -> DagResult<()> {
    let tool_by_id: HashMap<&str, &str> =
        actions.iter().map(|a| (a.id.as_str(), a.tool.as_str())).collect();

    for action in actions {
        if action.tool != SWAP_EXEC {
            continue;
        }
        let depends_on_quote = action
            .depends_on
            .iter()
            .any(|dep| tool_by_id.get(dep.as_str()) == Some(&SWAP_QUOTE));
        if !depends_on_quote {
            return Err(DagError::SwapExecNoQuote(action.id.clone()));
        }

        let confirm = crate::schema::params_field(&action.params, "confirm");
        match confirm.and_then(serde_json::Value::as_str) {
            None => return Err(DagError::SwapExecMissingConfirm(action.id.clone())),
            Some(v) if v != CONFIRM_LITERAL => {
                return Err(DagError::SwapExecBadConfirm(action.id.clone()));
            }
            Some(_) => {}
        }
    }
    Ok(())
}
