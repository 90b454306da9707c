//! Tool registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::PricingEngine;

use super::cost_estimate::CostEstimateTool;
use super::customer_discount::CustomerDiscountTool;
use super::discover_skus::DiscoverSkusTool;
use super::price_compare::PriceCompareTool;
use super::price_search::PriceSearchTool;
use super::service_discovery::ServiceDiscoveryTool;
use super::{Tool, ToolDefinition, ToolResult};

/// Registry of available pricing tools.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Create a registry exposing all six pricing tools over one engine.
    pub fn with_defaults(engine: Arc<PricingEngine>) -> Self {
        let mut registry = Self::new();

        let all_tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(PriceSearchTool::new(engine.clone())),
            Arc::new(PriceCompareTool::new(engine.clone())),
            Arc::new(CostEstimateTool::new(engine.clone())),
            Arc::new(DiscoverSkusTool::new(engine.clone())),
            Arc::new(ServiceDiscoveryTool::new(engine.clone())),
            Arc::new(CustomerDiscountTool::new(engine)),
        ];

        for tool in all_tools {
            registry.register(tool);
        }

        registry
    }

    /// Register a tool
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, input: serde_json::Value) -> ToolResult {
        match self.tools.get(name) {
            Some(tool) => tool.execute(input).await,
            None => ToolResult::error(format!("Unknown tool: {}", name)),
        }
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Check if a tool exists
    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ToolRegistry {
        let engine = Arc::new(PricingEngine::builder().build().unwrap());
        ToolRegistry::with_defaults(engine)
    }

    #[test]
    fn test_default_registry_has_all_tools() {
        let registry = registry();
        for name in [
            "price_search",
            "price_compare",
            "cost_estimate",
            "discover_skus",
            "sku_discovery",
            "get_customer_discount",
        ] {
            assert!(registry.contains(name), "missing tool {name}");
        }
        assert_eq!(registry.definitions().len(), 6);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_an_error() {
        let result = registry()
            .execute("no_such_tool", serde_json::json!({}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Unknown tool"));
    }

    #[test]
    fn test_schemas_are_objects() {
        for definition in registry().definitions() {
            assert!(definition.input_schema.is_object(), "{}", definition.name);
            assert!(!definition.description.is_empty());
        }
    }
}
