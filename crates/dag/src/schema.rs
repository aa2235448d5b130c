//! Workflow document schema.
//!
//! Two input shapes are supported, matching two different consumers:
//! the staged [`Workflow`] (stages of typed actions, run by
//! `w3rt-engine`) and the flat [`DagWorkflow`] (actions with `dependsOn`,
//! compiled by `w3rt-dag::compile` into a [`Plan`]). Both are parsed
//! through a permissive serde `*Doc` shape first, then validated into the
//! strongly-typed form so a fixed set of mandated error codes can be
//! produced — relying on serde's own error messages would not match them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DagError, DagResult};

// ---------------------------------------------------------------------
// Permissive wire shapes
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkflowDoc {
    pub name: Option<String>,
    pub version: Option<String>,
    pub trigger: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub stages: Vec<StageDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StageDoc {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub stage_type: Option<String>,
    pub when: Option<String>,
    pub actions: Option<Vec<ActionDoc>>,
    pub approval: Option<ApprovalDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ActionDoc {
    pub tool: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApprovalDoc {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DagWorkflowDoc {
    pub name: Option<String>,
    #[serde(default)]
    pub actions: Vec<DagActionDoc>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DagActionDoc {
    pub id: Option<String>,
    pub tool: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default, rename = "dependsOn")]
    pub depends_on: Vec<String>,
}

// ---------------------------------------------------------------------
// Strongly typed staged workflow
// ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Manual,
    Cron,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageType {
    Analysis,
    Simulation,
    Approval,
    Execution,
    Monitor,
}

impl StageType {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "analysis" => StageType::Analysis,
            "simulation" => StageType::Simulation,
            "approval" => StageType::Approval,
            "execution" => StageType::Execution,
            "monitor" => StageType::Monitor,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub tool: String,
    pub params: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct Approval {
    pub required: bool,
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub stage_type: StageType,
    pub when: Option<String>,
    pub actions: Vec<Action>,
    pub approval: Option<Approval>,
}

#[derive(Debug, Clone)]
pub struct Workflow {
    pub name: String,
    pub version: String,
    pub trigger: Trigger,
    pub description: Option<String>,
    pub stages: Vec<Stage>,
}

impl Workflow {
    pub fn from_doc(doc: WorkflowDoc) -> DagResult<Self> {
        let name = doc.name.ok_or_else(|| DagError::MissingField("name".into()))?;
        let version = doc
            .version
            .ok_or_else(|| DagError::MissingField("version".into()))?;
        let trigger_str = doc
            .trigger
            .ok_or_else(|| DagError::MissingField("trigger".into()))?;
        let trigger = match trigger_str.as_str() {
            "manual" => Trigger::Manual,
            "cron" => Trigger::Cron,
            _ => return Err(DagError::InvalidTrigger(trigger_str)),
        };
        if doc.stages.is_empty() {
            return Err(DagError::EmptyStages);
        }
        let stages = doc
            .stages
            .into_iter()
            .map(Self::parse_stage)
            .collect::<DagResult<Vec<_>>>()?;
        Ok(Workflow {
            name,
            version,
            trigger,
            description: doc.description,
            stages,
        })
    }

    pub fn parse_json(v: &serde_json::Value) -> DagResult<Self> {
        let doc: WorkflowDoc = serde_json::from_value(v.clone())
            .map_err(|e| DagError::InvalidType { field: "workflow".into(), expected: e.to_string() })?;
        Self::from_doc(doc)
    }

    fn parse_stage(s: StageDoc) -> DagResult<Stage> {
        let name = s
            .name
            .ok_or_else(|| DagError::MissingField("stages[].name".into()))?;
        let type_str = s
            .stage_type
            .ok_or_else(|| DagError::MissingField("stages[].type".into()))?;
        let stage_type =
            StageType::parse(&type_str).ok_or_else(|| DagError::InvalidStageType(type_str))?;

        let approval = match s.approval {
            Some(a) => Some(Approval {
                required: a.required,
                conditions: a.conditions,
            }),
            None => None,
        };
        if stage_type == StageType::Approval && approval.is_none() {
            return Err(DagError::MissingField("stages[].approval".into()));
        }

        let actions = if stage_type == StageType::Approval {
            s.actions.map(Self::parse_actions).transpose()?.unwrap_or_default()
        } else {
            let raw = s
                .actions
                .ok_or_else(|| DagError::MissingField("stages[].actions".into()))?;
            if raw.is_empty() {
                return Err(DagError::EmptyActions);
            }
            Self::parse_actions(raw)?
        };

        Ok(Stage {
            name,
            stage_type,
            when: s.when,
            actions,
            approval,
        })
    }

    fn parse_actions(raw: Vec<ActionDoc>) -> DagResult<Vec<Action>> {
        raw.into_iter()
            .map(|a| {
                let tool = a
                    .tool
                    .ok_or_else(|| DagError::MissingField("stages[].actions[].tool".into()))?;
                Ok(Action { tool, params: a.params })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------
// Strongly typed DAG-form workflow (plan compiler input)
// ---------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DagAction {
    pub id: String,
    pub tool: String,
    pub params: serde_json::Value,
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DagWorkflow {
    pub name: String,
    pub actions: Vec<DagAction>,
}

impl DagWorkflow {
    pub fn from_doc(doc: DagWorkflowDoc) -> DagResult<Self> {
        let name = doc.name.ok_or_else(|| DagError::MissingField("name".into()))?;
        if doc.actions.is_empty() {
            return Err(DagError::EmptyActions);
        }
        let actions = doc
            .actions
            .into_iter()
            .map(|a| {
                let id = a.id.ok_or_else(|| DagError::MissingField("actions[].id".into()))?;
                let tool = a
                    .tool
                    .ok_or_else(|| DagError::MissingField("actions[].tool".into()))?;
                Ok(DagAction {
                    id,
                    tool,
                    params: a.params,
                    depends_on: a.depends_on,
                })
            })
            .collect::<DagResult<Vec<_>>>()?;
        Ok(DagWorkflow { name, actions })
    }

    pub fn parse_json(v: &serde_json::Value) -> DagResult<Self> {
        let doc: DagWorkflowDoc = serde_json::from_value(v.clone())
            .map_err(|e| DagError::InvalidType { field: "workflow".into(), expected: e.to_string() })?;
        Self::from_doc(doc)
    }
}

// ---------------------------------------------------------------------
// Plan artifact
// ---------------------------------------------------------------------

pub const PLAN_SCHEMA: &str = "w3rt.plan.v1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: String,
    pub tool: String,
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default, rename = "dependsOn")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanMeta {
    #[serde(rename = "planHash", skip_serializing_if = "Option::is_none")]
    pub plan_hash: Option<String>,
    #[serde(rename = "policyHash", skip_serializing_if = "Option::is_none")]
    pub policy_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub schema: String,
    pub workflow: String,
    pub steps: Vec<PlanStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PlanMeta>,
}

impl Plan {
    /// The `{ schema, workflow, steps }` view the plan hash is computed
    /// over — `meta` is excluded.
    #[must_use]
    pub fn hash_basis(&self) -> serde_json::Value {
        serde_json::json!({
            "schema": self.schema,
            "workflow": self.workflow,
            "steps": self.steps,
        })
    }

    #[must_use]
    pub fn compute_plan_hash(&self) -> String {
        w3rt_core::canonical::digest(&self.hash_basis())
    }
}

/// Group action fields shared by both schema forms when walking
/// `params.confirm` style lookups.
#[must_use]
pub fn params_field<'a>(params: &'a serde_json::Value, field: &str) -> Option<&'a serde_json::Value> {
    params.as_object().and_then(|m| m.get(field))
}

/// Convenience: build a `BTreeMap` of id -> index for O(1) existence checks.
#[must_use]
pub fn index_by_id<'a>(actions: &'a [DagAction]) -> BTreeMap<&'a str, usize> {
    actions
        .iter()
        .enumerate()
        .map(|(i, a)| (a.id.as_str(), i))
        .collect()
}
