//! SKU validation against the live catalog.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::similarity::{NameSimilarity, Scorer, rank_candidates};
use crate::Result;
use crate::catalog::CatalogClient;

/// Outcome of validating a requested SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuValidationResult {
    /// The SKU exactly as requested.
    pub original_sku: String,
    pub found: bool,
    /// Ranked candidate SKU names, most similar first. Empty when found.
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Checks a requested SKU against the SKUs actually available for a
/// service/region, offering ranked suggestions on mismatch.
///
/// Validation is advisory: callers that skip it simply get an empty result
/// set for a non-matching SKU instead of an error.
#[derive(Clone)]
pub struct SkuValidator {
    client: Arc<CatalogClient>,
    scorer: Arc<dyn Scorer>,
    suggestion_limit: usize,
    universe_limit: usize,
}

impl SkuValidator {
    pub fn new(client: Arc<CatalogClient>, suggestion_limit: usize, universe_limit: usize) -> Self {
        Self {
            client,
            scorer: Arc::new(NameSimilarity),
            suggestion_limit,
            universe_limit,
        }
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Validate `requested` against the full SKU universe for the service,
    /// independent of any search result limit.
    pub async fn validate(
        &self,
        service: &str,
        region: Option<&str>,
        requested: &str,
    ) -> Result<SkuValidationResult> {
        let skus = self
            .client
            .distinct_skus(service, region, self.universe_limit)
            .await?;

        if skus.iter().any(|s| s == requested) {
            return Ok(SkuValidationResult {
                original_sku: requested.to_string(),
                found: true,
                suggestions: Vec::new(),
            });
        }

        // Catalog SKU naming is inconsistent about case and spacing
        // ("D4s v3" vs "D4s_v3"), so fall back to a normalized match.
        let normalized = normalize(requested);
        if skus.iter().any(|s| normalize(s) == normalized) {
            return Ok(SkuValidationResult {
                original_sku: requested.to_string(),
                found: true,
                suggestions: Vec::new(),
            });
        }

        let suggestions: Vec<String> =
            rank_candidates(self.scorer.as_ref(), skus.iter().map(|s| s.as_str()), requested)
                .into_iter()
                .take(self.suggestion_limit)
                .map(|(name, _)| name)
                .collect();

        debug!(
            service,
            requested,
            candidates = suggestions.len(),
            "Requested SKU not found in catalog"
        );

        Ok(SkuValidationResult {
            original_sku: requested.to_string(),
            found: false,
            suggestions,
        })
    }
}

fn normalize(sku: &str) -> String {
    sku.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

impl std::fmt::Debug for SkuValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkuValidator")
            .field("suggestion_limit", &self.suggestion_limit)
            .field("universe_limit", &self.universe_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("D4s v3"), "d4sv3");
        assert_eq!(normalize("Standard_D4s_v3"), "standardd4sv3");
        assert_eq!(normalize("E2-16s v5"), "e216sv5");
    }
}
