//! Wire types for the Azure Retail Prices catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pricing model of a catalog record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub enum PriceType {
    Consumption,
    Reservation,
    DevTestConsumption,
    /// Forward compatibility with price types the catalog may add.
    #[serde(other)]
    Other,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Consumption => "Consumption",
            PriceType::Reservation => "Reservation",
            PriceType::DevTestConsumption => "DevTestConsumption",
            PriceType::Other => "Other",
        }
    }
}

impl std::str::FromStr for PriceType {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "Consumption" => Ok(PriceType::Consumption),
            "Reservation" => Ok(PriceType::Reservation),
            "DevTestConsumption" => Ok(PriceType::DevTestConsumption),
            other => Err(crate::Error::invalid(format!(
                "unknown price type '{}', expected Consumption, Reservation, or DevTestConsumption",
                other
            ))),
        }
    }
}

/// Embedded savings-plan rate on a consumption record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPlanRate {
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub retail_price: f64,
    /// Commitment term, e.g. "1 Year" or "3 Years".
    pub term: String,
}

/// Immutable snapshot of one catalog row.
///
/// Produced by [`super::CatalogClient`] and never mutated afterwards, with
/// one exception: the aggregator clones records to apply discounts, filling
/// `original_price` with the pre-discount rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRecord {
    pub service_name: String,
    pub sku_name: String,
    #[serde(default)]
    pub product_name: String,
    pub arm_region_name: String,
    #[serde(default)]
    pub arm_sku_name: Option<String>,
    #[serde(rename = "type", alias = "priceType")]
    pub price_type: PriceType,
    pub unit_of_measure: String,
    pub retail_price: f64,
    #[serde(default)]
    pub unit_price: f64,
    pub currency_code: String,
    #[serde(default)]
    pub effective_start_date: Option<DateTime<Utc>>,
    /// Commitment term for Reservation records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_term: Option<String>,
    /// Savings-plan rates the catalog attaches to some consumption records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub savings_plan: Vec<SavingsPlanRate>,
    /// Pre-discount price, present only after a discount was applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
}

impl PriceRecord {
    /// Whether the record is billed per hour, the only unit the cost
    /// estimator converts.
    pub fn is_hourly(&self) -> bool {
        matches!(
            self.unit_of_measure.trim().to_lowercase().as_str(),
            "1 hour" | "1/hour" | "1 hours"
        )
    }
}

/// One page of the catalog response.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage {
    #[serde(rename = "Items", default)]
    pub items: Vec<PriceRecord>,
    #[serde(rename = "NextPageLink", default)]
    pub next_page_link: Option<String>,
    #[serde(rename = "Count", default)]
    pub count: usize,
}
