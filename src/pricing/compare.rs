//! Cross-dimension price comparison.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::aggregate::{PriceAggregator, SearchResult};
use crate::catalog::{CatalogClient, CatalogFilter};
use crate::{Error, Result};

/// Summary of one dimension's prices, derived from a [`SearchResult`].
///
/// A dimension whose query failed still gets an entry, with the failure
/// attached as `error` and an empty summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    /// The region or SKU this entry summarizes.
    pub dimension_value: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Comparison across regions or SKUs, preserving caller-supplied order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// `"regions"` or `"skus"`.
    pub comparison_type: String,
    pub service_name: String,
    pub currency: String,
    pub comparisons: Vec<ComparisonEntry>,
}

/// Runs parallel aggregator queries across a set of dimensions and
/// assembles a comparison table.
#[derive(Clone)]
pub struct ComparisonEngine {
    client: Arc<CatalogClient>,
    aggregator: PriceAggregator,
    per_dimension_limit: usize,
}

impl ComparisonEngine {
    pub fn new(client: Arc<CatalogClient>, per_dimension_limit: usize) -> Self {
        Self {
            client,
            aggregator: PriceAggregator,
            per_dimension_limit,
        }
    }

    /// Compare one SKU's prices across `regions`, in the given order.
    pub async fn compare_regions(
        &self,
        service: &str,
        sku_name: Option<&str>,
        regions: &[String],
        currency: &str,
    ) -> Result<ComparisonResult> {
        if regions.is_empty() {
            return Err(Error::invalid("regions must not be empty"));
        }

        let entries = self
            .run_dimensions(regions, currency, |region| {
                let mut filter = CatalogFilter::new().service(service).region(region);
                if let Some(sku) = sku_name {
                    filter = filter.sku(sku);
                }
                filter.currency(currency)
            })
            .await;

        Ok(ComparisonResult {
            comparison_type: "regions".to_string(),
            service_name: service.to_string(),
            currency: currency.to_string(),
            comparisons: entries,
        })
    }

    /// Compare several SKUs within one region, in the given order.
    pub async fn compare_skus(
        &self,
        service: &str,
        sku_names: &[String],
        region: Option<&str>,
        currency: &str,
    ) -> Result<ComparisonResult> {
        if sku_names.is_empty() {
            return Err(Error::invalid("skus must not be empty"));
        }

        let entries = self
            .run_dimensions(sku_names, currency, |sku| {
                let mut filter = CatalogFilter::new().service(service).sku(sku);
                if let Some(region) = region {
                    filter = filter.region(region);
                }
                filter.currency(currency)
            })
            .await;

        Ok(ComparisonResult {
            comparison_type: "skus".to_string(),
            service_name: service.to_string(),
            currency: currency.to_string(),
            comparisons: entries,
        })
    }

    /// Issue one independent query per dimension, concurrently. `join_all`
    /// preserves input order, and a failed dimension degrades to an error
    /// note instead of aborting its siblings.
    async fn run_dimensions(
        &self,
        dimensions: &[String],
        currency: &str,
        build_filter: impl Fn(&str) -> CatalogFilter,
    ) -> Vec<ComparisonEntry> {
        let queries = dimensions.iter().map(|dimension| {
            let filter = build_filter(dimension);
            async move {
                let records = self.client.query(&filter, self.per_dimension_limit).await?;
                self.aggregator.aggregate(records, currency, None)
            }
        });

        join_all(queries)
            .await
            .into_iter()
            .zip(dimensions)
            .map(|(outcome, dimension)| match outcome {
                Ok(result) => summarize(dimension, &result),
                Err(e) => {
                    warn!(dimension = %dimension, error = %e, "Comparison dimension failed");
                    ComparisonEntry {
                        dimension_value: dimension.clone(),
                        count: 0,
                        lowest_price: None,
                        highest_price: None,
                        average_price: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }
}

fn summarize(dimension: &str, result: &SearchResult) -> ComparisonEntry {
    let prices: Vec<f64> = result.items.iter().map(|i| i.retail_price).collect();
    let (lowest, highest, average) = if prices.is_empty() {
        (None, None, None)
    } else {
        let lowest = prices.iter().cloned().fold(f64::INFINITY, f64::min);
        let highest = prices.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let average = prices.iter().sum::<f64>() / prices.len() as f64;
        (Some(lowest), Some(highest), Some(average))
    };

    ComparisonEntry {
        dimension_value: dimension.to_string(),
        count: result.count,
        lowest_price: lowest,
        highest_price: highest,
        average_price: average,
        error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PriceRecord, PriceType};

    fn record(price: f64) -> PriceRecord {
        PriceRecord {
            service_name: "Virtual Machines".into(),
            sku_name: "D4s v3".into(),
            product_name: String::new(),
            arm_region_name: "eastus".into(),
            arm_sku_name: None,
            price_type: PriceType::Consumption,
            unit_of_measure: "1 Hour".into(),
            retail_price: price,
            unit_price: price,
            currency_code: "USD".into(),
            effective_start_date: None,
            reservation_term: None,
            savings_plan: Vec::new(),
            original_price: None,
        }
    }

    #[test]
    fn test_summarize() {
        let result = PriceAggregator
            .aggregate(vec![record(0.1), record(0.3), record(0.2)], "USD", None)
            .unwrap();
        let entry = summarize("eastus", &result);
        assert_eq!(entry.count, 3);
        assert_eq!(entry.lowest_price, Some(0.1));
        assert_eq!(entry.highest_price, Some(0.3));
        assert!((entry.average_price.unwrap() - 0.2).abs() < 1e-9);
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_summarize_empty() {
        let result = PriceAggregator.aggregate(Vec::new(), "USD", None).unwrap();
        let entry = summarize("westus", &result);
        assert_eq!(entry.count, 0);
        assert!(entry.lowest_price.is_none());
        assert!(entry.average_price.is_none());
    }
}
