//! Engine configuration.
//!
//! All configuration is read-only after engine construction; there is no
//! shared mutable state across requests.

use std::time::Duration;

use crate::catalog::RetryConfig;

/// Azure Retail Prices API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://prices.azure.com/api/retail/prices";

/// API version pinned for stable response shapes (savings plan fields).
pub const DEFAULT_API_VERSION: &str = "2023-01-01-preview";

/// Default billing month used for monthly cost projections.
pub const DEFAULT_HOURS_PER_MONTH: f64 = 730.0;

/// Tie-break policy when several consumption records match a cost-estimate
/// request (differing meters, spot/low-priority variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// First record in upstream return order.
    #[default]
    FirstUpstream,
    /// Cheapest matching record.
    LowestPrice,
}

/// Configuration for [`crate::PricingEngine`].
#[derive(Debug, Clone)]
pub struct PricingConfig {
    /// Catalog endpoint URL.
    pub endpoint: String,
    /// Catalog API version query parameter.
    pub api_version: String,
    /// Currency used when the caller does not specify one.
    pub default_currency: String,
    /// Per-HTTP-call timeout, distinct from the retry ceiling.
    pub request_timeout: Duration,
    /// Retry/backoff policy for transient catalog failures.
    pub retry: RetryConfig,
    /// Minimum similarity score for a fuzzy service match to count as found.
    pub similarity_threshold: f64,
    /// Maximum number of ranked suggestions returned on a miss.
    pub suggestion_limit: usize,
    /// Maximum records paged in when fetching the full SKU universe for
    /// validation.
    pub sku_universe_limit: usize,
    /// Default limit for search and discovery queries.
    pub default_limit: usize,
    /// Tie-break policy for cost estimation.
    pub tie_break: TieBreak,
    /// Discount applied when no customer identity is configured.
    pub default_discount_percentage: f64,
    /// Canonical service names known to the resolver. `None` uses the
    /// built-in Azure service list.
    pub services: Option<Vec<String>>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            default_currency: "USD".to_string(),
            request_timeout: Duration::from_secs(10),
            retry: RetryConfig::default(),
            similarity_threshold: 0.6,
            suggestion_limit: 5,
            sku_universe_limit: 2000,
            default_limit: 20,
            tie_break: TieBreak::default(),
            default_discount_percentage: 10.0,
            services: None,
        }
    }
}

impl PricingConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Replace the built-in canonical service-name set.
    pub fn with_services(mut self, services: impl IntoIterator<Item = String>) -> Self {
        self.services = Some(services.into_iter().collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PricingConfig::default();
        assert_eq!(config.default_currency, "USD");
        assert_eq!(config.suggestion_limit, 5);
        assert_eq!(config.tie_break, TieBreak::FirstUpstream);
        assert!(config.endpoint.starts_with("https://prices.azure.com"));
    }

    #[test]
    fn test_builder_methods() {
        let config = PricingConfig::default()
            .with_currency("EUR")
            .with_similarity_threshold(1.5)
            .with_tie_break(TieBreak::LowestPrice);

        assert_eq!(config.default_currency, "EUR");
        assert_eq!(config.similarity_threshold, 1.0);
        assert_eq!(config.tie_break, TieBreak::LowestPrice);
    }
}
