use anyhow::{bail, Result};
use w3rt_dag::{DagError, Plan};

use crate::cli::VerifyArgs;
use crate::doc::load_json;

pub fn run(args: &VerifyArgs) -> Result<()> {
    let plan: Plan = serde_json::from_value(load_json(&args.plan)?)?;
    let artifact = load_json(&args.artifact)?;

    let computed = plan.compute_plan_hash();

    let plan_hash = plan
        .meta
        .as_ref()
        .and_then(|m| m.plan_hash.clone())
        .ok_or_else(|| DagError::MissingField("meta.planHash".into()))?;
    if plan_hash != computed {
        bail!(DagError::HashMismatch { expected: computed, found: plan_hash });
    }

    let artifact_plan_hash = artifact
        .get("planHash")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| DagError::MissingField("planHash".into()))?;
    if artifact_plan_hash != computed {
        bail!(DagError::HashMismatch { expected: computed, found: artifact_plan_hash.to_string() });
    }

    let plan_policy_hash = plan.meta.as_ref().and_then(|m| m.policy_hash.clone());
    let artifact_policy_hash =
        artifact.get("policyHash").and_then(serde_json::Value::as_str).map(ToString::to_string);
    if plan_policy_hash.is_some() || artifact_policy_hash.is_some() {
        if plan_policy_hash != artifact_policy_hash {
            bail!(DagError::HashMismatch {
                expected: plan_policy_hash.unwrap_or_default(),
                found: artifact_policy_hash.unwrap_or_default(),
            });
        }
    }

    println!("OK: plan hash {computed} verified");
    Ok(())
}
