//! Service name discovery tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::engine::PricingEngine;

use super::traits::json_result;
use super::{SchemaTool, ToolResult};

fn default_limit() -> usize {
    5
}

/// Input for the sku_discovery tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ServiceDiscoveryInput {
    /// Free-text hint for a service, e.g. "vm", "kubernetes", "postgres"
    pub service_hint: String,
    /// Maximum number of suggestions when no single match is confident
    #[serde(default = "default_limit")]
    pub limit: usize,
}

pub struct ServiceDiscoveryTool {
    engine: Arc<PricingEngine>,
}

impl ServiceDiscoveryTool {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SchemaTool for ServiceDiscoveryTool {
    type Input = ServiceDiscoveryInput;

    const NAME: &'static str = "sku_discovery";
    const DESCRIPTION: &'static str = "Resolve a free-text service hint to a canonical Azure \
        service name. Returns the resolved name when one match is confident, otherwise a ranked \
        list of suggestions. Resolution is local and deterministic.";

    async fn handle(&self, input: ServiceDiscoveryInput) -> ToolResult {
        let result = self
            .engine
            .discover_services(&input.service_hint, input.limit);
        json_result(&result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;

    fn tool() -> ServiceDiscoveryTool {
        ServiceDiscoveryTool::new(Arc::new(PricingEngine::builder().build().unwrap()))
    }

    #[tokio::test]
    async fn test_resolves_vm_hint() {
        let result = tool()
            .execute(serde_json::json!({"service_hint": "vm"}))
            .await;
        assert!(!result.is_error());
        assert!(result.content().contains("Virtual Machines"));
    }

    #[tokio::test]
    async fn test_rejects_unknown_fields() {
        let result = tool()
            .execute(serde_json::json!({"service_hint": "vm", "region": "eastus"}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Invalid input"));
    }

    #[tokio::test]
    async fn test_unknown_hint_yields_suggestions() {
        let result = tool()
            .execute(serde_json::json!({"service_hint": "zzz-not-a-service", "limit": 3}))
            .await;
        assert!(!result.is_error());
        let parsed: serde_json::Value = serde_json::from_str(result.content()).unwrap();
        assert!(parsed.get("service_found").is_none());
        assert!(parsed["suggestions"].as_array().unwrap().len() <= 3);
    }
}
