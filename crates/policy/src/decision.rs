//! Policy decisions and the call context they're computed from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use w3rt_core::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SideEffect {
    None,
    Broadcast,
}

/// Everything the policy engine reads about a single prospective action.
/// Every field besides `chain`/`network`/`action` is optional because the
/// engine must work for actions that never touch, say, slippage or
/// program ids.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DecisionContext {
    pub chain: String,
    pub network: String,
    pub action: String,
    #[serde(default)]
    pub side_effect: Option<SideEffect>,
    #[serde(default)]
    pub simulation_ok: Option<bool>,
    #[serde(default)]
    pub amount_usd: Option<f64>,
    #[serde(default)]
    pub amount_sol: Option<f64>,
    #[serde(default)]
    pub amount_lamports: Option<f64>,
    #[serde(default)]
    pub slippage_bps: Option<f64>,
    #[serde(default)]
    pub simulated_slippage_bps: Option<f64>,
    #[serde(default)]
    pub program_ids: Vec<String>,
    #[serde(default)]
    pub program_ids_known: Option<bool>,
    #[serde(default)]
    pub token_mints: Vec<String>,
    #[serde(default)]
    pub seconds_since_last_broadcast: Option<f64>,
    #[serde(default)]
    pub broadcasts_last_minute: Option<u32>,
    #[serde(default)]
    pub metrics: BTreeMap<String, f64>,
}

impl DecisionContext {
    /// Project the context to the `Value` tree the rule DSL evaluates
    /// paths against. Field names are camelCase to match the condition
    /// syntax rule authors write (`ctx.amountUsd > 100`, etc).
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("chain".into(), Value::str(self.chain.as_str()));
        map.insert("network".into(), Value::str(self.network.as_str()));
        map.insert("action".into(), Value::str(self.action.as_str()));
        map.insert(
            "sideEffect".into(),
            match self.side_effect {
                Some(SideEffect::Broadcast) => Value::str("broadcast"),
                Some(SideEffect::None) => Value::str("none"),
                None => Value::Null,
            },
        );
        insert_opt_bool(&mut map, "simulationOk", self.simulation_ok);
        insert_opt_f64(&mut map, "amountUsd", self.amount_usd);
        insert_opt_f64(&mut map, "amountSol", self.amount_sol);
        insert_opt_f64(&mut map, "amountLamports", self.amount_lamports);
        insert_opt_f64(&mut map, "slippageBps", self.slippage_bps);
        insert_opt_f64(&mut map, "simulatedSlippageBps", self.simulated_slippage_bps);
        map.insert(
            "programIds".into(),
            Value::List(self.program_ids.iter().map(|s| Value::str(s.as_str())).collect()),
        );
        insert_opt_bool(&mut map, "programIdsKnown", self.program_ids_known);
        map.insert(
            "tokenMints".into(),
            Value::List(self.token_mints.iter().map(|s| Value::str(s.as_str())).collect()),
        );
        insert_opt_f64(&mut map, "secondsSinceLastBroadcast", self.seconds_since_last_broadcast);
        insert_opt_f64(
            &mut map,
            "broadcastsLastMinute",
            self.broadcasts_last_minute.map(f64::from),
        );
        let metrics = self
            .metrics
            .iter()
            .map(|(k, v)| (k.clone(), Value::Float(*v)))
            .collect();
        map.insert("metrics".into(), Value::Map(metrics));
        Value::Map(map)
    }
}

fn insert_opt_f64(map: &mut BTreeMap<String, Value>, key: &str, v: Option<f64>) {
    map.insert(key.to_string(), v.map_or(Value::Null, Value::Float));
}

fn insert_opt_bool(map: &mut BTreeMap<String, Value>, key: &str, v: Option<bool>) {
    map.insert(key.to_string(), v.map_or(Value::Null, Value::Bool));
}

/// The four policy outcomes. Every variant carries `reasons`: the
/// configuration keys and context fields that triggered it, for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Decision {
    Allow {
        #[serde(default)]
        reasons: Vec<String>,
    },
    Warn {
        code: String,
        message: String,
        #[serde(default)]
        reasons: Vec<String>,
    },
    Confirm {
        code: String,
        message: String,
        #[serde(rename = "confirmationKey")]
        confirmation_key: String,
        #[serde(default)]
        reasons: Vec<String>,
    },
    Block {
        code: String,
        message: String,
        #[serde(default)]
        reasons: Vec<String>,
    },
}

impl Decision {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow { .. })
    }

    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Decision::Allow { .. } => None,
            Decision::Warn { code, .. }
            | Decision::Confirm { code, .. }
            | Decision::Block { code, .. } => Some(code),
        }
    }
}
