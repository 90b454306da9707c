//! Record normalization and discount application.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::PriceRecord;
use crate::resolve::SkuValidationResult;
use crate::{Error, Result};

/// Discount metadata stamped on a [`SearchResult`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiscountApplied {
    pub percentage: f64,
}

/// Ordered price records plus aggregate metadata, the unit every derived
/// view is built from.
///
/// Invariant: `count == items.len()`. When a discount was applied, every
/// item carries both the discounted `retailPrice` and the pre-discount
/// `originalPrice`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub items: Vec<PriceRecord>,
    pub count: usize,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<DiscountApplied>,
    /// Attached only when the caller requested SKU validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_validation: Option<SkuValidationResult>,
}

impl SearchResult {
    pub fn empty(currency: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            count: 0,
            currency: currency.into(),
            discount_applied: None,
            sku_validation: None,
        }
    }

    pub fn with_validation(mut self, validation: SkuValidationResult) -> Self {
        self.sku_validation = Some(validation);
        self
    }
}

/// Normalizes raw catalog records and applies discount policy.
///
/// Stateless; output order matches the input (upstream) order, with no
/// re-sort and no dedup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriceAggregator;

impl PriceAggregator {
    /// Build a [`SearchResult`] from raw records, applying
    /// `discount_percentage` when present.
    ///
    /// Records missing required fields are dropped with a warning rather
    /// than failing the whole call; a discount outside `[0, 100]` is an
    /// input error.
    pub fn aggregate(
        &self,
        records: Vec<PriceRecord>,
        currency: &str,
        discount_percentage: Option<f64>,
    ) -> Result<SearchResult> {
        if let Some(p) = discount_percentage
            && !(0.0..=100.0).contains(&p)
        {
            return Err(Error::invalid(format!(
                "discount_percentage must be between 0 and 100, got {p}"
            )));
        }

        let total = records.len();
        let mut items: Vec<PriceRecord> = records.into_iter().filter(is_usable).collect();
        if items.len() < total {
            warn!(
                dropped = total - items.len(),
                kept = items.len(),
                "Dropped catalog records missing required fields"
            );
        }

        if let Some(percentage) = discount_percentage {
            let factor = 1.0 - percentage / 100.0;
            for item in &mut items {
                item.original_price = Some(item.retail_price);
                item.retail_price *= factor;
            }
        }

        Ok(SearchResult {
            count: items.len(),
            currency: currency.to_string(),
            discount_applied: discount_percentage.map(|percentage| DiscountApplied { percentage }),
            sku_validation: None,
            items,
        })
    }
}

// The catalog is loosely typed; rows occasionally come back without a SKU
// or with a junk price. Those cannot feed any derived view.
fn is_usable(record: &PriceRecord) -> bool {
    !record.service_name.is_empty()
        && !record.sku_name.is_empty()
        && !record.currency_code.is_empty()
        && record.retail_price.is_finite()
        && record.retail_price >= 0.0
}
