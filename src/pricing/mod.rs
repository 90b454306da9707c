//! Price aggregation and derived views.

mod aggregate;
mod compare;
mod discount;
mod estimate;

pub use aggregate::{DiscountApplied, PriceAggregator, SearchResult};
pub use compare::{ComparisonEngine, ComparisonEntry, ComparisonResult};
pub use discount::{CustomerDiscount, DiscountPolicy, StaticDiscountPolicy};
pub use estimate::{CostEstimate, CostEstimator, OnDemandPricing, SavingsPlan};
