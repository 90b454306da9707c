//! Cross-region and cross-SKU price comparison tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::engine::PricingEngine;

use super::traits::json_result;
use super::{SchemaTool, ToolResult};

/// Input for the price_compare tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PriceCompareInput {
    /// Azure service name or a free-text hint for it
    pub service_name: String,
    /// SKU to hold fixed when comparing across regions
    #[serde(default)]
    pub sku_name: Option<String>,
    /// Region to hold fixed when comparing across SKUs
    #[serde(default)]
    pub region: Option<String>,
    /// Regions to compare, in the order results should appear. Mutually
    /// exclusive with `skus`.
    #[serde(default)]
    pub regions: Option<Vec<String>>,
    /// SKUs to compare, in the order results should appear. Mutually
    /// exclusive with `regions`.
    #[serde(default)]
    pub skus: Option<Vec<String>>,
    /// ISO currency code. Defaults to USD.
    #[serde(default)]
    pub currency_code: Option<String>,
}

pub struct PriceCompareTool {
    engine: Arc<PricingEngine>,
}

impl PriceCompareTool {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SchemaTool for PriceCompareTool {
    type Input = PriceCompareInput;

    const NAME: &'static str = "price_compare";
    const DESCRIPTION: &'static str = "Compare Azure prices for one service across a list of \
        regions or a list of SKUs. Each compared dimension gets a lowest/highest/average price \
        summary in the caller-supplied order; a dimension whose lookup fails carries an error \
        note instead of aborting the whole comparison.";

    async fn handle(&self, input: PriceCompareInput) -> ToolResult {
        let result = self
            .engine
            .compare_prices(
                &input.service_name,
                input.sku_name.as_deref(),
                input.region.as_deref(),
                input.regions.as_deref(),
                input.skus.as_deref(),
                input.currency_code.as_deref(),
            )
            .await;

        match result {
            Ok(comparison) => json_result(&comparison),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricingConfig;
    use crate::tools::Tool;

    fn tool() -> PriceCompareTool {
        let config = PricingConfig::default().with_endpoint("http://127.0.0.1:1/never");
        let engine = PricingEngine::builder().config(config).build().unwrap();
        PriceCompareTool::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_requires_a_dimension() {
        let result = tool()
            .execute(serde_json::json!({"service_name": "vm"}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("regions or skus"));
    }

    #[tokio::test]
    async fn test_rejects_both_dimensions() {
        let result = tool()
            .execute(serde_json::json!({
                "service_name": "vm",
                "regions": ["eastus"],
                "skus": ["D4s v3"]
            }))
            .await;
        assert!(result.is_error());
    }

    #[tokio::test]
    async fn test_rejects_unknown_fields() {
        let result = tool()
            .execute(serde_json::json!({"service_name": "vm", "zones": ["eastus"]}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Invalid input"));
    }
}
