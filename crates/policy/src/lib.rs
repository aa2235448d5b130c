//! Pure policy configuration and decision engine for gating blockchain
//! side effects.

pub mod config;
pub mod decision;
pub mod engine;
pub mod error;

pub use config::{AllowlistConfig, NetworkConfig, PolicyConfig, Rule, RuleAction, TransactionsConfig};
pub use decision::{Decision, DecisionContext, SideEffect};
pub use engine::{decide, evaluate_rules};
pub use error::{PolicyError, PolicyResult};
