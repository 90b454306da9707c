//! Customer discount policy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A customer's negotiated discount, resolved by a [`DiscountPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDiscount {
    pub customer_id: String,
    /// Percentage in `[0, 100]`.
    pub discount_percentage: f64,
}

/// Resolves a customer identity to a discount percentage.
///
/// Discounts are advisory, not security-critical: implementations must not
/// fail for valid (possibly absent) input, and unknown identities fall back
/// to a default rather than erroring. The trait is the seam for a real
/// entitlement lookup later.
#[async_trait]
pub trait DiscountPolicy: Send + Sync {
    async fn get_discount(&self, customer_id: Option<&str>) -> CustomerDiscount;
}

/// Fixed-percentage policy used when no real entitlement source is
/// configured.
#[derive(Debug, Clone)]
pub struct StaticDiscountPolicy {
    percentage: f64,
    default_customer_id: String,
}

impl StaticDiscountPolicy {
    pub fn new(percentage: f64) -> Self {
        Self {
            percentage,
            default_customer_id: "default-customer".to_string(),
        }
    }
}

impl Default for StaticDiscountPolicy {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[async_trait]
impl DiscountPolicy for StaticDiscountPolicy {
    async fn get_discount(&self, customer_id: Option<&str>) -> CustomerDiscount {
        CustomerDiscount {
            customer_id: customer_id
                .unwrap_or(&self.default_customer_id)
                .to_string(),
            discount_percentage: self.percentage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_discount() {
        let policy = StaticDiscountPolicy::default();
        let discount = policy.get_discount(None).await;
        assert_eq!(discount.discount_percentage, 10.0);
        assert_eq!(discount.customer_id, "default-customer");
    }

    #[tokio::test]
    async fn test_identity_passthrough() {
        let policy = StaticDiscountPolicy::new(15.0);
        let discount = policy.get_discount(Some("contoso")).await;
        assert_eq!(discount.customer_id, "contoso");
        assert_eq!(discount.discount_percentage, 15.0);
    }
}
