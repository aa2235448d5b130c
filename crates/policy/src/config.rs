//! Policy configuration shape — networks, transaction limits, allowlists,
//! and custom rules.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, rename = "requireSimulation")]
    pub require_simulation: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionsConfig {
    #[serde(default, rename = "maxSingleSol")]
    pub max_single_sol: Option<f64>,
    #[serde(default, rename = "maxSingleAmountUsd")]
    pub max_single_amount_usd: Option<f64>,
    #[serde(default, rename = "maxSlippageBps")]
    pub max_slippage_bps: Option<f64>,
    #[serde(default, rename = "cooldownSeconds")]
    pub cooldown_seconds: Option<f64>,
    #[serde(default, rename = "maxTxPerMinute")]
    pub max_tx_per_minute: Option<u32>,
    #[serde(default, rename = "requireSimulatedSlippageOnMainnet")]
    pub require_simulated_slippage_on_mainnet: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistConfig {
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default, rename = "solanaPrograms")]
    pub solana_programs: Vec<String>,
    #[serde(default)]
    pub tokens: Vec<String>,
}

/// A `decision action` a custom rule may emit. `Allow` rules are parsed
/// but always skipped during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Warn,
    Confirm,
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub condition: String,
    pub action: RuleAction,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub networks: BTreeMap<String, NetworkConfig>,
    #[serde(default)]
    pub transactions: TransactionsConfig,
    #[serde(default)]
    pub allowlist: AllowlistConfig,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl PolicyConfig {
    #[must_use]
    pub fn network(&self, name: &str) -> NetworkConfig {
        self.networks.get(name).cloned().unwrap_or_default()
    }

    pub fn parse_json(v: &serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(v.clone())
    }
}
