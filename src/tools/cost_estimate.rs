//! Monthly cost projection tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::config::DEFAULT_HOURS_PER_MONTH;
use crate::engine::PricingEngine;

use super::traits::json_result;
use super::{SchemaTool, ToolResult};

fn default_hours() -> f64 {
    DEFAULT_HOURS_PER_MONTH
}

/// Input for the cost_estimate tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CostEstimateInput {
    /// Azure service name or a free-text hint for it
    pub service_name: String,
    /// Exact SKU name to estimate, e.g. "D4s v3"
    pub sku_name: String,
    /// ARM region name, e.g. "eastus"
    pub region: String,
    /// Expected usage hours per month. Defaults to 730 (full month).
    #[serde(default = "default_hours")]
    pub hours_per_month: f64,
    /// ISO currency code. Defaults to USD.
    #[serde(default)]
    pub currency_code: Option<String>,
}

pub struct CostEstimateTool {
    engine: Arc<PricingEngine>,
}

impl CostEstimateTool {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SchemaTool for CostEstimateTool {
    type Input = CostEstimateInput;

    const NAME: &'static str = "cost_estimate";
    const DESCRIPTION: &'static str = "Project the monthly cost of one Azure SKU in one region \
        from its on-demand hourly rate, alongside any reservation or savings-plan options the \
        catalog offers with their percentage savings versus on-demand.";

    async fn handle(&self, input: CostEstimateInput) -> ToolResult {
        let result = self
            .engine
            .estimate_costs(
                &input.service_name,
                &input.sku_name,
                &input.region,
                input.hours_per_month,
                input.currency_code.as_deref(),
            )
            .await;

        match result {
            Ok(estimate) => json_result(&estimate),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PricingConfig;
    use crate::tools::Tool;

    fn tool() -> CostEstimateTool {
        let config = PricingConfig::default().with_endpoint("http://127.0.0.1:1/never");
        let engine = PricingEngine::builder().config(config).build().unwrap();
        CostEstimateTool::new(Arc::new(engine))
    }

    #[tokio::test]
    async fn test_rejects_missing_required_fields() {
        let result = tool()
            .execute(serde_json::json!({"service_name": "vm"}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Invalid input"));
    }

    #[tokio::test]
    async fn test_rejects_unknown_fields() {
        let result = tool()
            .execute(serde_json::json!({
                "service_name": "vm",
                "sku_name": "D4s v3",
                "region": "eastus",
                "hours": 100
            }))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Invalid input"));
    }
}
