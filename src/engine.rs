//! Request orchestration.
//!
//! [`PricingEngine`] wires the catalog client, resolvers, aggregator, and
//! derived-view builders together and implements the six logical
//! operations the tool surface exposes. Every call builds request-scoped
//! values only; the engine holds no mutable state across requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{CatalogClient, CatalogFilter, PriceType};
use crate::config::PricingConfig;
use crate::pricing::{
    ComparisonEngine, ComparisonResult, CostEstimate, CostEstimator, CustomerDiscount,
    DiscountPolicy, PriceAggregator, SearchResult, StaticDiscountPolicy,
};
use crate::resolve::{ServiceDiscoveryResult, ServiceNameResolver, SkuValidator};
use crate::{Error, Result};

// Enough rows to cover every meter variant of one SKU in one region,
// consumption and reservation rows included.
const ESTIMATE_RECORD_LIMIT: usize = 100;

/// Parameters for a price search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Service hint; resolved to a canonical name before filtering.
    pub service_name: String,
    pub region: Option<String>,
    pub sku_name: Option<String>,
    pub price_type: Option<PriceType>,
    /// Defaults to the engine's configured currency (USD).
    pub currency_code: Option<String>,
    pub limit: usize,
    pub discount_percentage: Option<f64>,
    /// When set, the requested SKU is checked against the catalog's SKU
    /// universe and the outcome attached to the result.
    pub validate_sku: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            service_name: String::new(),
            region: None,
            sku_name: None,
            price_type: None,
            currency_code: None,
            limit: 20,
            discount_percentage: None,
            validate_sku: false,
        }
    }
}

/// Distinct SKUs available for a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuDiscovery {
    pub service_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub skus: Vec<String>,
    /// Total distinct SKUs in the catalog, which may exceed `skus.len()`
    /// when a limit was applied.
    pub total_skus: usize,
}

/// The pricing query and aggregation core.
///
/// Owns the HTTP session for its whole lifetime; dropping the engine
/// releases it on every exit path. Clones share the same session.
#[derive(Clone)]
pub struct PricingEngine {
    client: Arc<CatalogClient>,
    resolver: ServiceNameResolver,
    validator: SkuValidator,
    aggregator: PriceAggregator,
    estimator: CostEstimator,
    comparison: ComparisonEngine,
    discount_policy: Arc<dyn DiscountPolicy>,
    config: PricingConfig,
}

impl PricingEngine {
    pub fn builder() -> PricingEngineBuilder {
        PricingEngineBuilder::default()
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Search catalog prices for a service, optionally narrowed by region,
    /// SKU, and price type, with an optional discount applied per item.
    ///
    /// Zero matches is a successful empty result, not an error. When
    /// `validate_sku` is set, validation and the main query run
    /// concurrently and the validation outcome is attached.
    pub async fn search_prices(&self, request: SearchRequest) -> Result<SearchResult> {
        if request.limit == 0 {
            return Err(Error::invalid("limit must be positive"));
        }
        if request.service_name.trim().is_empty() {
            return Err(Error::invalid("service_name is required"));
        }
        if let Some(p) = request.discount_percentage
            && !(0.0..=100.0).contains(&p)
        {
            return Err(Error::invalid("discount_percentage must be within [0, 100]"));
        }

        let service = self.canonical_service(&request.service_name);
        let currency = self.currency(request.currency_code.as_deref());

        let mut filter = CatalogFilter::new()
            .service(&service)
            .currency(&currency);
        if let Some(ref region) = request.region {
            filter = filter.region(region);
        }
        if let Some(ref sku) = request.sku_name {
            filter = filter.sku(sku);
        }
        if let Some(price_type) = request.price_type {
            filter = filter.price_type(price_type);
        }

        let mut result = match (&request.sku_name, request.validate_sku) {
            (Some(sku), true) => {
                // Validation needs the full SKU universe, so it is a
                // separate catalog query; run both in parallel.
                let (records, validation) = tokio::join!(
                    self.client.query(&filter, request.limit),
                    self.validator
                        .validate(&service, request.region.as_deref(), sku),
                );
                let result = self.aggregator.aggregate(
                    records?,
                    &currency,
                    request.discount_percentage,
                )?;
                // Validation is advisory; if its sub-query failed, the
                // search result still stands, just without the attachment.
                match validation {
                    Ok(validation) => result.with_validation(validation),
                    Err(e) => {
                        warn!(sku = %sku, error = %e, "SKU validation failed, omitting it");
                        result
                    }
                }
            }
            _ => {
                let records = self.client.query(&filter, request.limit).await?;
                self.aggregator
                    .aggregate(records, &currency, request.discount_percentage)?
            }
        };

        // Advisory validation must not hide an empty result's cause; the
        // suggestions travel with the (possibly empty) result either way.
        if let Some(ref validation) = result.sku_validation
            && !validation.found
        {
            debug!(
                requested = %validation.original_sku,
                suggestions = validation.suggestions.len(),
                "Requested SKU not found, returning suggestions"
            );
        }

        info!(
            service = %service,
            count = result.count,
            currency = %result.currency,
            discounted = result.discount_applied.is_some(),
            "Price search complete"
        );
        Ok(result)
    }

    /// Compare prices across regions or across SKUs. Exactly one dimension
    /// list must be supplied; the other fixed coordinate (SKU for a region
    /// comparison, region for a SKU comparison) is optional.
    pub async fn compare_prices(
        &self,
        service_name: &str,
        sku_name: Option<&str>,
        region: Option<&str>,
        regions: Option<&[String]>,
        skus: Option<&[String]>,
        currency_code: Option<&str>,
    ) -> Result<ComparisonResult> {
        let service = self.canonical_service(service_name);
        let currency = self.currency(currency_code);

        match (regions, skus) {
            (Some(regions), None) => {
                self.comparison
                    .compare_regions(&service, sku_name, regions, &currency)
                    .await
            }
            (None, Some(skus)) => {
                self.comparison
                    .compare_skus(&service, skus, region, &currency)
                    .await
            }
            (Some(_), Some(_)) => Err(Error::invalid(
                "provide either regions or skus, not both",
            )),
            (None, None) => Err(Error::invalid("provide regions or skus to compare")),
        }
    }

    /// Compare one SKU across regions.
    pub async fn compare_regions(
        &self,
        service_name: &str,
        sku_name: Option<&str>,
        regions: &[String],
        currency_code: Option<&str>,
    ) -> Result<ComparisonResult> {
        let service = self.canonical_service(service_name);
        let currency = self.currency(currency_code);
        self.comparison
            .compare_regions(&service, sku_name, regions, &currency)
            .await
    }

    /// Compare several SKUs within one region.
    pub async fn compare_skus(
        &self,
        service_name: &str,
        skus: &[String],
        region: Option<&str>,
        currency_code: Option<&str>,
    ) -> Result<ComparisonResult> {
        let service = self.canonical_service(service_name);
        let currency = self.currency(currency_code);
        self.comparison
            .compare_skus(&service, skus, region, &currency)
            .await
    }

    /// Project monthly cost for one service/SKU/region, including
    /// reservation and savings-plan options when the catalog carries them.
    pub async fn estimate_costs(
        &self,
        service_name: &str,
        sku_name: &str,
        region: &str,
        hours_per_month: f64,
        currency_code: Option<&str>,
    ) -> Result<CostEstimate> {
        let service = self.canonical_service(service_name);
        let currency = self.currency(currency_code);

        // No priceType clause: the same query feeds both the on-demand
        // selection and the reservation-based savings plans.
        let filter = CatalogFilter::new()
            .service(&service)
            .sku(sku_name)
            .region(region)
            .currency(&currency);
        let records = self.client.query(&filter, ESTIMATE_RECORD_LIMIT).await?;

        self.estimator.estimate(
            &records,
            &service,
            sku_name,
            region,
            &currency,
            hours_per_month,
        )
    }

    /// List distinct SKUs for a service, optionally narrowed by region.
    pub async fn discover_skus(
        &self,
        service_name: &str,
        region: Option<&str>,
        limit: usize,
    ) -> Result<SkuDiscovery> {
        if limit == 0 {
            return Err(Error::invalid("limit must be positive"));
        }
        let service = self.canonical_service(service_name);

        let all = self
            .client
            .distinct_skus(&service, region, self.config.sku_universe_limit)
            .await?;
        let total_skus = all.len();
        let skus: Vec<String> = all.into_iter().take(limit).collect();

        Ok(SkuDiscovery {
            service_name: service,
            region: region.map(|r| r.to_string()),
            skus,
            total_skus,
        })
    }

    /// Resolve a free-text service hint to a canonical name, or ranked
    /// suggestions when nothing clears the similarity threshold.
    pub fn discover_services(&self, service_hint: &str, limit: usize) -> ServiceDiscoveryResult {
        self.resolver
            .resolve_with_limit(service_hint, limit.max(1))
    }

    /// Resolve the caller's discount. Never fails: unknown identities fall
    /// back to the default policy.
    pub async fn customer_discount(&self, customer_id: Option<&str>) -> CustomerDiscount {
        self.discount_policy.get_discount(customer_id).await
    }

    // A hint that resolves keeps its canonical form; one that does not is
    // passed through verbatim so an unknown service yields an empty result
    // rather than an error.
    fn canonical_service(&self, hint: &str) -> String {
        self.resolver
            .resolve_canonical(hint)
            .unwrap_or_else(|| hint.to_string())
    }

    fn currency(&self, requested: Option<&str>) -> String {
        requested
            .map(|c| c.to_string())
            .unwrap_or_else(|| self.config.default_currency.clone())
    }
}

impl std::fmt::Debug for PricingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PricingEngine")
            .field("endpoint", &self.config.endpoint)
            .finish()
    }
}

/// Builder for [`PricingEngine`].
#[derive(Default)]
pub struct PricingEngineBuilder {
    config: Option<PricingConfig>,
    discount_policy: Option<Arc<dyn DiscountPolicy>>,
}

impl PricingEngineBuilder {
    pub fn config(mut self, config: PricingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Swap the static default policy for a real entitlement source.
    pub fn discount_policy(mut self, policy: Arc<dyn DiscountPolicy>) -> Self {
        self.discount_policy = Some(policy);
        self
    }

    pub fn build(self) -> Result<PricingEngine> {
        let config = self.config.unwrap_or_default();

        let client = Arc::new(
            CatalogClient::builder()
                .endpoint(&config.endpoint)
                .api_version(&config.api_version)
                .timeout(config.request_timeout)
                .retry(config.retry.clone())
                .build()?,
        );

        let resolver = match config.services {
            Some(ref services) => ServiceNameResolver::with_services(
                services.iter().cloned(),
                config.similarity_threshold,
                config.suggestion_limit,
            ),
            None => {
                ServiceNameResolver::new(config.similarity_threshold, config.suggestion_limit)
            }
        };

        let validator = SkuValidator::new(
            client.clone(),
            config.suggestion_limit,
            config.sku_universe_limit,
        );
        let comparison = ComparisonEngine::new(client.clone(), config.default_limit);
        let discount_policy = self.discount_policy.unwrap_or_else(|| {
            Arc::new(StaticDiscountPolicy::new(config.default_discount_percentage))
        });

        Ok(PricingEngine {
            client,
            resolver,
            validator,
            aggregator: PriceAggregator,
            estimator: CostEstimator::new(config.tie_break),
            comparison,
            discount_policy,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let engine = PricingEngine::builder().build().unwrap();
        assert_eq!(engine.config().default_currency, "USD");
    }

    #[test]
    fn test_canonical_service_passthrough() {
        let engine = PricingEngine::builder().build().unwrap();
        assert_eq!(engine.canonical_service("vm"), "Virtual Machines");
        assert_eq!(
            engine.canonical_service("NonExistentService12345"),
            "NonExistentService12345"
        );
    }

    #[tokio::test]
    async fn test_search_rejects_bad_input() {
        let engine = PricingEngine::builder().build().unwrap();

        let err = engine
            .search_prices(SearchRequest {
                service_name: "Storage".into(),
                limit: 0,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));

        let err = engine
            .search_prices(SearchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_compare_requires_exactly_one_dimension() {
        let engine = PricingEngine::builder().build().unwrap();
        let regions = vec!["eastus".to_string()];
        let skus = vec!["D4s v3".to_string()];

        assert!(matches!(
            engine
                .compare_prices("vm", None, None, None, None, None)
                .await
                .unwrap_err(),
            Error::InvalidRequest(_)
        ));
        assert!(matches!(
            engine
                .compare_prices("vm", None, None, Some(&regions), Some(&skus), None)
                .await
                .unwrap_err(),
            Error::InvalidRequest(_)
        ));
    }

    #[tokio::test]
    async fn test_default_customer_discount() {
        let engine = PricingEngine::builder().build().unwrap();
        let discount = engine.customer_discount(None).await;
        assert_eq!(discount.discount_percentage, 10.0);
        assert!(!discount.customer_id.is_empty());
    }
}
