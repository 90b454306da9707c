//! SKU listing tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::engine::PricingEngine;

use super::traits::json_result;
use super::{SchemaTool, ToolResult};

fn default_limit() -> usize {
    20
}

/// Input for the discover_skus tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct DiscoverSkusInput {
    /// Azure service name or a free-text hint for it
    pub service_name: String,
    /// ARM region name. Omit to list SKUs across all regions.
    #[serde(default)]
    pub region: Option<String>,
    /// Maximum number of SKU names to return
    #[serde(default = "default_limit")]
    pub limit: usize,
}

pub struct DiscoverSkusTool {
    engine: Arc<PricingEngine>,
}

impl DiscoverSkusTool {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SchemaTool for DiscoverSkusTool {
    type Input = DiscoverSkusInput;

    const NAME: &'static str = "discover_skus";
    const DESCRIPTION: &'static str = "List the distinct SKU names the Azure catalog offers for \
        a service, optionally narrowed to one region, in first-seen catalog order. Reports the \
        total distinct count alongside the (possibly truncated) list.";

    async fn handle(&self, input: DiscoverSkusInput) -> ToolResult {
        let result = self
            .engine
            .discover_skus(&input.service_name, input.region.as_deref(), input.limit)
            .await;

        match result {
            Ok(discovery) => json_result(&discovery),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricingConfig;
    use crate::tools::Tool;

    fn tool() -> DiscoverSkusTool {
        let config = PricingConfig::default().with_endpoint("http://127.0.0.1:1/never");
        let engine = PricingEngine::builder().config(config).build().unwrap();
        DiscoverSkusTool::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_rejects_zero_limit() {
        let result = tool()
            .execute(serde_json::json!({"service_name": "vm", "limit": 0}))
            .await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_rejects_unknown_fields() {
        let result = tool()
            .execute(serde_json::json!({"service_name": "vm", "regions": ["eastus"]}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Invalid input"));
    }
}
