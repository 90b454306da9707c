//! Azure Retail Prices catalog access.
//!
//! Provides the filtered, paginated, retried HTTP client plus the wire
//! types and query-intent value objects it works with.

mod client;
mod filter;
mod resilience;
mod types;

pub use client::{CatalogClient, CatalogClientBuilder};
pub use filter::CatalogFilter;
pub use resilience::{ExponentialBackoff, RetryConfig};
pub use types::{CatalogPage, PriceRecord, PriceType, SavingsPlanRate};
