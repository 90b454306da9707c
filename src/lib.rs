//! # azure-pricing
//!
//! Query and aggregation core for the Azure Retail Prices catalog.
//!
//! This crate turns loose service/SKU/region hints into precise catalog
//! queries, pages through the upstream API, reconciles partial records,
//! applies customer discounts, and builds derived views: cost estimates,
//! cross-region/cross-SKU comparisons, and fuzzy SKU discovery. The results
//! are exposed as callable tools that a transport layer (MCP, HTTP, CLI)
//! can register and dispatch.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use azure_pricing::{PricingEngine, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), azure_pricing::Error> {
//!     let engine = PricingEngine::builder().build()?;
//!
//!     let result = engine
//!         .search_prices(SearchRequest {
//!             service_name: "Virtual Machines".into(),
//!             region: Some("eastus".into()),
//!             sku_name: Some("D4s v3".into()),
//!             limit: 5,
//!             ..Default::default()
//!         })
//!         .await?;
//!
//!     println!("{} records in {}", result.count, result.currency);
//!     Ok(())
//! }
//! ```
//!
//! ## Tool Surface
//!
//! ```rust,no_run
//! use azure_pricing::PricingEngine;
//! use azure_pricing::tools::ToolRegistry;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), azure_pricing::Error> {
//! let engine = Arc::new(PricingEngine::builder().build()?);
//! let registry = ToolRegistry::with_defaults(engine);
//!
//! let result = registry
//!     .execute(
//!         "price_search",
//!         serde_json::json!({ "service_name": "Storage", "region": "eastus" }),
//!     )
//!     .await;
//! println!("{}", result.content());
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod pricing;
pub mod resolve;
pub mod tools;

// Re-exports for convenience
pub use catalog::{
    CatalogClient, CatalogClientBuilder, CatalogFilter, CatalogPage, ExponentialBackoff,
    PriceRecord, PriceType, RetryConfig, SavingsPlanRate,
};
pub use config::{PricingConfig, TieBreak};
pub use engine::{PricingEngine, PricingEngineBuilder, SearchRequest, SkuDiscovery};
pub use pricing::{
    ComparisonEngine, ComparisonEntry, ComparisonResult, CostEstimate, CostEstimator,
    CustomerDiscount, DiscountApplied, DiscountPolicy, OnDemandPricing, PriceAggregator,
    SavingsPlan, SearchResult, StaticDiscountPolicy,
};
pub use resolve::{
    NameSimilarity, Scorer, ServiceDiscoveryResult, ServiceNameResolver, SkuValidationResult,
    SkuValidator,
};
pub use tools::{Tool, ToolDefinition, ToolRegistry, ToolResult};

/// Error type for pricing operations.
///
/// Transient upstream failures are retried inside [`CatalogClient`] and only
/// surface here once retries are exhausted; input errors surface immediately
/// and are never retried.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Caller-supplied parameters are invalid.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The catalog rejected the query or retries were exhausted.
    #[error("Catalog query failed (HTTP {status}): {message}")]
    CatalogQuery { status: u16, message: String },

    /// Network connectivity or request failure.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failure.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Catalog rate limit exceeded.
    #[error("Rate limit exceeded{}", match retry_after {
        Some(d) => format!(", retry in {:.0}s", d.as_secs_f64()),
        None => String::new(),
    })]
    RateLimit {
        retry_after: Option<std::time::Duration>,
    },

    /// A single HTTP call exceeded its timeout.
    #[error("Operation timed out after {:.1}s", .0.as_secs_f64())]
    Timeout(std::time::Duration),

    /// Response shape did not match the catalog contract.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidRequest(message.into())
    }

    /// Transient errors may succeed on retry; input and 4xx errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimit { .. } | Error::Timeout(_) => true,
            Error::Network(e) => !e.is_builder() && !e.is_redirect(),
            Error::CatalogQuery { status, .. } => (500..=599).contains(status),
            _ => false,
        }
    }

    pub fn retry_after(&self) -> Option<std::time::Duration> {
        match self {
            Error::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::CatalogQuery { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
