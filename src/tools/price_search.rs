//! Price search tool.

use std::sync::Arc;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::catalog::PriceType;
use crate::engine::{PricingEngine, SearchRequest};

use super::traits::json_result;
use super::{SchemaTool, ToolResult};

fn default_limit() -> usize {
    20
}

/// Input for the price_search tool
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PriceSearchInput {
    /// Azure service name or a free-text hint for it, e.g. "Virtual Machines" or "vm"
    pub service_name: String,
    /// ARM region name, e.g. "eastus". Omit to search across all regions.
    #[serde(default)]
    pub region: Option<String>,
    /// Exact SKU name, e.g. "D4s v3". Omit to list all SKUs.
    #[serde(default)]
    pub sku_name: Option<String>,
    /// Price type filter: "Consumption", "Reservation", or "DevTestConsumption"
    #[serde(default)]
    pub price_type: Option<PriceType>,
    /// ISO currency code. Defaults to USD.
    #[serde(default)]
    pub currency_code: Option<String>,
    /// Maximum number of price items to return
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Discount percentage in [0, 100] to apply to every returned price
    #[serde(default)]
    pub discount_percentage: Option<f64>,
    /// When true and sku_name is set, also validate the SKU against the
    /// catalog and include suggestions if it does not exist
    #[serde(default)]
    pub validate_sku: bool,
}

pub struct PriceSearchTool {
    engine: Arc<PricingEngine>,
}

impl PriceSearchTool {
    pub fn new(engine: Arc<PricingEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl SchemaTool for PriceSearchTool {
    type Input = PriceSearchInput;

    const NAME: &'static str = "price_search";
    const DESCRIPTION: &'static str = "Search Azure retail prices for a service, optionally \
        narrowed by region, SKU, and price type. Returns matching price items with an optional \
        discount applied. An unknown service yields an empty result, not an error.";

    async fn handle(&self, input: PriceSearchInput) -> ToolResult {
        let request = SearchRequest {
            service_name: input.service_name,
            region: input.region,
            sku_name: input.sku_name,
            price_type: input.price_type,
            currency_code: input.currency_code,
            limit: input.limit,
            discount_percentage: input.discount_percentage,
            validate_sku: input.validate_sku,
        };

        match self.engine.search_prices(request).await {
            Ok(result) => json_result(&result),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}
