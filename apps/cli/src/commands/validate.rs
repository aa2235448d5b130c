use anyhow::Result;
use w3rt_dag::{validate_dag, DagWorkflow};

use crate::cli::ValidateArgs;
use crate::doc::load_json;

pub fn run(args: &ValidateArgs) -> Result<()> {
    let doc = load_json(&args.workflow)?;
    let workflow = DagWorkflow::parse_json(&doc)?;
    validate_dag(&workflow)?;
    println!("OK: {} ({} actions)", workflow.name, workflow.actions.len());
    Ok(())
}
