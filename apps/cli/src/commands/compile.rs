use anyhow::Result;
use w3rt_dag::{compile, CompileOptions, DagWorkflow};

use crate::cli::CompileArgs;
use crate::config::load_policy;
use crate::doc::load_json;

pub fn run(args: &CompileArgs) -> Result<()> {
    let doc = load_json(&args.workflow)?;
    let workflow = DagWorkflow::parse_json(&doc)?;

    let opts = match &args.policy {
        Some(path) => {
            // The effective policy, with `W3RT_POLICY__...` overrides already
            // applied, is what gets hashed and embedded — the plan's
            // `meta.policyHash` should attest to the policy that was
            // actually in force, not just the on-disk file.
            let effective = load_policy(Some(path))?;
            let policy = serde_json::to_value(&effective)?;
            let policy_hash = w3rt_core::canonical::digest(&policy);
            CompileOptions { policy: Some(policy), policy_hash: Some(policy_hash) }
        }
        None => CompileOptions::default(),
    };

    let plan = compile(&workflow, &opts)?;
    let rendered = serde_json::to_string_pretty(&plan)?;

    match &args.out {
        Some(path) => std::fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }
    Ok(())
}
