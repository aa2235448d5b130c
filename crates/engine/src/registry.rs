//! Tool capability table.
//!
//! A `Tool` is an external collaborator — price quote, swap build, balance
//! query, broadcast — the engine only knows its name, metadata, and an
//! `execute` entry point. No global mutable
//! registry: the engine receives a [`ToolRegistry`] explicitly, built by
//! the host integration that wires up real chain drivers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use w3rt_core::Value;
use w3rt_policy::SideEffect;

use crate::error::EngineError;

/// Metadata the policy-check callback and trace store read off a tool
/// without needing to know its concrete type.
#[derive(Debug, Clone)]
pub struct ToolMeta {
    pub action: String,
    pub side_effect: SideEffect,
    pub chain: Option<String>,
    pub risk: Option<String>,
}

/// A single invocable capability: price quote, swap build, balance query,
/// broadcast, confirm. Implementations live outside this crate — it
/// consumes the trait, it does not define chain-specific tools.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn meta(&self) -> &ToolMeta;
    async fn execute(&self, params: Value, ctx: &Value) -> Result<Value, EngineError>;
}

/// A process-scoped, immutable-during-a-run mapping from tool name to
/// capability. Cloning is cheap — tools are held behind `Arc`.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self { tools: HashMap::new() }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn meta(&self) -> &ToolMeta {
            static META: std::sync::OnceLock<ToolMeta> = std::sync::OnceLock::new();
            META.get_or_init(|| ToolMeta {
                action: "echo".into(),
                side_effect: SideEffect::None,
                chain: None,
                risk: None,
            })
        }

        async fn execute(&self, params: Value, _ctx: &Value) -> Result<Value, EngineError> {
            Ok(params)
        }
    }

    #[tokio::test]
    async fn register_and_lookup_round_trips() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(Echo));
        assert_eq!(registry.len(), 1);
        let tool = registry.get("echo").expect("registered");
        let out = tool.execute(Value::Int(1), &Value::map()).await.unwrap();
        assert_eq!(out, Value::Int(1));
    }

    #[test]
    fn unknown_tool_is_none() {
        let registry = ToolRegistry::new();
        assert!(registry.get("nope").is_none());
    }
}
