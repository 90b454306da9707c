//! Free-text service hint resolution.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::similarity::{NameSimilarity, Scorer, rank_candidates};

/// Azure service names the resolver knows out of the box.
///
/// Matches the catalog's `serviceName` values; overridable via
/// [`crate::PricingConfig::with_services`].
pub const DEFAULT_SERVICES: &[&str] = &[
    "API Management",
    "App Configuration",
    "Application Gateway",
    "Azure App Service",
    "Azure Bastion",
    "Azure Cache for Redis",
    "Azure Container Apps",
    "Azure Cosmos DB",
    "Azure Data Factory v2",
    "Azure Database for MySQL",
    "Azure Database for PostgreSQL",
    "Azure DNS",
    "Azure Firewall",
    "Azure Front Door Service",
    "Azure Kubernetes Service",
    "Azure Monitor",
    "Azure NetApp Files",
    "Azure Synapse Analytics",
    "Backup",
    "Bandwidth",
    "Cognitive Services",
    "Container Instances",
    "Container Registry",
    "Content Delivery Network",
    "Event Grid",
    "Event Hubs",
    "ExpressRoute",
    "Functions",
    "HDInsight",
    "Key Vault",
    "Load Balancer",
    "Log Analytics",
    "Logic Apps",
    "Machine Learning",
    "NAT Gateway",
    "Notification Hubs",
    "Service Bus",
    "SQL Database",
    "SQL Managed Instance",
    "Storage",
    "Virtual Machines",
    "Virtual Network",
    "VPN Gateway",
];

/// Outcome of resolving a free-text service hint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDiscoveryResult {
    /// The hint exactly as given.
    pub original_search: String,
    /// Canonical name, present only when a match cleared the threshold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_found: Option<String>,
    /// Ranked candidates, best first. Empty when `service_found` is set.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Maps a free-text service hint to canonical catalog service names.
///
/// Deterministic for a fixed service set: exact case-insensitive match wins
/// outright, otherwise every canonical name is scored and ties break
/// alphabetically.
#[derive(Clone)]
pub struct ServiceNameResolver {
    services: Arc<Vec<String>>,
    scorer: Arc<dyn Scorer>,
    threshold: f64,
    suggestion_limit: usize,
}

impl ServiceNameResolver {
    pub fn new(threshold: f64, suggestion_limit: usize) -> Self {
        Self::with_services(
            DEFAULT_SERVICES.iter().map(|s| s.to_string()),
            threshold,
            suggestion_limit,
        )
    }

    pub fn with_services(
        services: impl IntoIterator<Item = String>,
        threshold: f64,
        suggestion_limit: usize,
    ) -> Self {
        Self {
            services: Arc::new(services.into_iter().collect()),
            scorer: Arc::new(NameSimilarity),
            threshold,
            suggestion_limit,
        }
    }

    /// Swap in a different scorer (stubbed in tests).
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Resolve a hint, reporting either the canonical name or ranked
    /// suggestions.
    pub fn resolve(&self, hint: &str) -> ServiceDiscoveryResult {
        self.resolve_with_limit(hint, self.suggestion_limit)
    }

    /// Like [`Self::resolve`] with a caller-chosen suggestion cap.
    pub fn resolve_with_limit(&self, hint: &str, limit: usize) -> ServiceDiscoveryResult {
        let trimmed = hint.trim();

        if let Some(exact) = self
            .services
            .iter()
            .find(|s| s.eq_ignore_ascii_case(trimmed))
        {
            return ServiceDiscoveryResult {
                original_search: hint.to_string(),
                service_found: Some(exact.clone()),
                suggestions: Vec::new(),
            };
        }

        let ranked = rank_candidates(
            self.scorer.as_ref(),
            self.services.iter().map(|s| s.as_str()),
            trimmed,
        );

        match ranked.first() {
            Some((best, score)) if *score >= self.threshold => {
                debug!(hint = trimmed, resolved = %best, score, "Resolved service hint");
                ServiceDiscoveryResult {
                    original_search: hint.to_string(),
                    service_found: Some(best.clone()),
                    suggestions: Vec::new(),
                }
            }
            _ => ServiceDiscoveryResult {
                original_search: hint.to_string(),
                service_found: None,
                suggestions: ranked
                    .into_iter()
                    .take(limit)
                    .map(|(name, _)| name)
                    .collect(),
            },
        }
    }

    /// Canonical name for a hint, used by other components to normalize
    /// before filtering. `None` when nothing clears the threshold.
    pub fn resolve_canonical(&self, hint: &str) -> Option<String> {
        self.resolve(hint).service_found
    }
}

impl std::fmt::Debug for ServiceNameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceNameResolver")
            .field("services", &self.services.len())
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ServiceNameResolver {
        ServiceNameResolver::new(0.6, 5)
    }

    #[test]
    fn test_exact_match_wins() {
        let result = resolver().resolve("virtual machines");
        assert_eq!(result.service_found.as_deref(), Some("Virtual Machines"));
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_vm_resolves_to_virtual_machines() {
        let result = resolver().resolve("vm");
        assert_eq!(result.service_found.as_deref(), Some("Virtual Machines"));
    }

    #[test]
    fn test_app_service_hint() {
        let result = resolver().resolve("app service");
        let found = result.service_found.expect("should resolve");
        assert!(found.contains("App Service"), "resolved to {found}");
    }

    #[test]
    fn test_unknown_hint_yields_suggestions() {
        let result = resolver().resolve("totally-unknown-xyz");
        assert!(result.service_found.is_none());
        assert!(!result.suggestions.is_empty());
        assert!(result.suggestions.len() <= 5);
        assert_eq!(result.original_search, "totally-unknown-xyz");
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let first = resolver().resolve("databse");
        let second = resolver().resolve("databse");
        assert_eq!(first.suggestions, second.suggestions);
        assert_eq!(first.service_found, second.service_found);
    }

    #[test]
    fn test_stub_scorer_injection() {
        struct AlwaysZero;
        impl Scorer for AlwaysZero {
            fn score(&self, _: &str, _: &str) -> f64 {
                0.0
            }
        }

        let resolver = resolver().with_scorer(Arc::new(AlwaysZero));
        let result = resolver.resolve("vm");
        assert!(result.service_found.is_none());
        assert!(!result.suggestions.is_empty());
    }
}
