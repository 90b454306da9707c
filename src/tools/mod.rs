//! Callable tool surface.
//!
//! Each pricing operation is exposed as a named tool with a typed input
//! (JSON schema derived via schemars) and a JSON payload result, so a
//! host can advertise and dispatch them generically via [`ToolRegistry`].

mod cost_estimate;
mod customer_discount;
mod discover_skus;
mod price_compare;
mod price_search;
mod registry;
mod service_discovery;
mod traits;

pub use cost_estimate::{CostEstimateInput, CostEstimateTool};
pub use customer_discount::{CustomerDiscountInput, CustomerDiscountTool};
pub use discover_skus::{DiscoverSkusInput, DiscoverSkusTool};
pub use price_compare::{PriceCompareInput, PriceCompareTool};
pub use price_search::{PriceSearchInput, PriceSearchTool};
pub use registry::ToolRegistry;
pub use service_discovery::{ServiceDiscoveryInput, ServiceDiscoveryTool};
pub use traits::{SchemaTool, Tool, ToolDefinition, ToolResult};
