//! Fuzzy resolution of user-supplied service and SKU hints.

mod service;
mod similarity;
mod sku;

pub use service::{DEFAULT_SERVICES, ServiceDiscoveryResult, ServiceNameResolver};
pub use similarity::{NameSimilarity, Scorer, rank_candidates};
pub use sku::{SkuValidationResult, SkuValidator};
