use anyhow::Result;
use w3rt_dag::{compile, CompileOptions, DagWorkflow};

use crate::cli::ExplainArgs;
use crate::doc::load_json;

const SAFETY_PREFIX: &str = "__safety_simulate_";

pub fn run(args: &ExplainArgs) -> Result<()> {
    let doc = load_json(&args.workflow)?;
    let workflow = DagWorkflow::parse_json(&doc)?;

    println!("workflow: {}", workflow.name);
    println!("source actions:");
    for action in &workflow.actions {
        let deps = if action.depends_on.is_empty() {
            String::new()
        } else {
            format!(" depends on [{}]", action.depends_on.join(", "))
        };
        println!("  {} -> {}{}", action.id, action.tool, deps);
    }

    let plan = compile(&workflow, &CompileOptions::default())?;
    println!("compiled plan steps:");
    for step in &plan.steps {
        let tag = if step.id.starts_with(SAFETY_PREFIX) { " (injected)" } else { "" };
        let deps = if step.depends_on.is_empty() {
            String::new()
        } else {
            format!(" depends on [{}]", step.depends_on.join(", "))
        };
        println!("  {} -> {}{}{}", step.id, step.tool, deps, tag);
    }

    Ok(())
}
