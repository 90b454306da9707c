//! Customer discount lookup tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::engine::PricingEngine;

use super::traits::json_result;
use super::{SchemaTool, ToolResult};

/// Input for the get_customer_discount tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CustomerDiscountInput {
    /// Customer identity. Omit to get the default discount.
    #[serde(default)]
    pub customer_id: Option<String>,
}

pub struct CustomerDiscountTool {
    engine: Arc<PricingEngine>,
}

impl CustomerDiscountTool {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SchemaTool for CustomerDiscountTool {
    type Input = CustomerDiscountInput;

    const NAME: &'static str = "get_customer_discount";
    const DESCRIPTION: &'static str = "Look up the discount percentage for a customer. Unknown \
        or absent identities get the configured default discount; this lookup never fails.";

    async fn handle(&self, input: CustomerDiscountInput) -> ToolResult {
        let discount = self
            .engine
            .customer_discount(input.customer_id.as_deref())
            .await;
        json_result(&discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::Tool;

    #[tokio::test]
    async fn test_default_discount_without_identity() {
        let engine = Arc::new(PricingEngine::builder().build().unwrap());
        let tool = CustomerDiscountTool::new(engine);
        let result = tool.execute(serde_json::json!({})).await;
        assert!(!result.is_error());

        let parsed: serde_json::Value = serde_json::from_str(result.content()).unwrap();
        assert_eq!(parsed["discount_percentage"], 10.0);
        assert!(!parsed["customer_id"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_unknown_fields() {
        let engine = Arc::new(PricingEngine::builder().build().unwrap());
        let tool = CustomerDiscountTool::new(engine);
        let result = tool
            .execute(serde_json::json!({"customer": "contoso"}))
            .await;
        assert!(result.is_error());
        assert!(result.content().contains("Invalid input"));
    }
}
