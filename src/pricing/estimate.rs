//! Monthly/hourly cost projection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{PriceRecord, PriceType};
use crate::config::TieBreak;
use crate::{Error, Result};

const HOURS_PER_YEAR: f64 = 8760.0;

/// On-demand (Consumption) rates for the selected record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OnDemandPricing {
    pub hourly_rate: f64,
    pub monthly_cost: f64,
}

/// One alternative purchase option (reservation or savings plan).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsPlan {
    /// Commitment term, e.g. "1 Year".
    pub term: String,
    pub hourly_rate: f64,
    /// Percentage saved relative to the on-demand hourly rate.
    pub savings_percent: f64,
}

/// Cost projection for one service/SKU/region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostEstimate {
    pub service_name: String,
    pub sku_name: String,
    pub region: String,
    pub currency: String,
    pub hours_per_month: f64,
    pub on_demand_pricing: OnDemandPricing,
    /// Alternative purchase options, term ascending. Empty when the
    /// catalog carries none for this SKU.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub savings_plans: Vec<SavingsPlan>,
}

/// Builds cost projections from catalog records.
#[derive(Debug, Clone, Copy)]
pub struct CostEstimator {
    tie_break: TieBreak,
}

impl CostEstimator {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    /// Project monthly cost from `records` (one catalog query's worth of
    /// consumption and reservation rows for a service/SKU/region).
    ///
    /// The on-demand record must be billed hourly; other units of measure
    /// are rejected rather than silently mis-converted.
    pub fn estimate(
        &self,
        records: &[PriceRecord],
        service_name: &str,
        sku_name: &str,
        region: &str,
        currency: &str,
        hours_per_month: f64,
    ) -> Result<CostEstimate> {
        if !(hours_per_month > 0.0) {
            return Err(Error::invalid(format!(
                "hours_per_month must be positive, got {hours_per_month}"
            )));
        }

        let on_demand = self.select_on_demand(records).ok_or_else(|| {
            Error::invalid(format!(
                "no on-demand (Consumption) price found for '{sku_name}' in '{region}'"
            ))
        })?;

        if !on_demand.is_hourly() {
            return Err(Error::invalid(format!(
                "unit of measure '{}' is not hourly; cost estimation only supports hourly SKUs",
                on_demand.unit_of_measure
            )));
        }

        let hourly_rate = on_demand.retail_price;
        let monthly_cost = hourly_rate * hours_per_month;

        let mut savings_plans = collect_savings_plans(on_demand, records, hourly_rate);
        savings_plans.sort_by(|a, b| {
            term_years(&a.term)
                .partial_cmp(&term_years(&b.term))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.term.cmp(&b.term))
        });

        debug!(
            sku = sku_name,
            region,
            hourly_rate,
            plans = savings_plans.len(),
            "Built cost estimate"
        );

        Ok(CostEstimate {
            service_name: service_name.to_string(),
            sku_name: sku_name.to_string(),
            region: region.to_string(),
            currency: currency.to_string(),
            hours_per_month,
            on_demand_pricing: OnDemandPricing {
                hourly_rate,
                monthly_cost,
            },
            savings_plans,
        })
    }

    fn select_on_demand<'a>(&self, records: &'a [PriceRecord]) -> Option<&'a PriceRecord> {
        let mut consumption = records
            .iter()
            .filter(|r| r.price_type == PriceType::Consumption);

        match self.tie_break {
            TieBreak::FirstUpstream => consumption.next(),
            TieBreak::LowestPrice => consumption.min_by(|a, b| {
                a.retail_price
                    .partial_cmp(&b.retail_price)
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
        }
    }
}

impl Default for CostEstimator {
    fn default() -> Self {
        Self::new(TieBreak::default())
    }
}

/// Plans come from two places: rates embedded on the consumption record,
/// and sibling Reservation records whose term price is spread over the
/// term's hours.
fn collect_savings_plans(
    on_demand: &PriceRecord,
    records: &[PriceRecord],
    on_demand_hourly: f64,
) -> Vec<SavingsPlan> {
    let mut plans = Vec::new();

    for rate in &on_demand.savings_plan {
        plans.push(plan_entry(&rate.term, rate.retail_price, on_demand_hourly));
    }

    for record in records {
        if record.price_type != PriceType::Reservation {
            continue;
        }
        let Some(ref term) = record.reservation_term else {
            continue;
        };
        // Unparseable terms yield infinity; a plan cannot be derived from
        // them, only fabricated.
        let years = term_years(term);
        if !years.is_finite() || years <= 0.0 {
            continue;
        }
        let hourly = record.retail_price / (years * HOURS_PER_YEAR);
        plans.push(plan_entry(term, hourly, on_demand_hourly));
    }

    plans
}

fn plan_entry(term: &str, hourly_rate: f64, on_demand_hourly: f64) -> SavingsPlan {
    let savings_percent = if on_demand_hourly > 0.0 {
        (on_demand_hourly - hourly_rate) / on_demand_hourly * 100.0
    } else {
        0.0
    };
    SavingsPlan {
        term: term.to_string(),
        hourly_rate,
        savings_percent,
    }
}

/// Parse "1 Year" / "3 Years" into a year count; unparseable terms sort
/// last via infinity.
fn term_years(term: &str) -> f64 {
    term.split_whitespace()
        .next()
        .and_then(|n| n.parse::<f64>().ok())
        .unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SavingsPlanRate;

    fn consumption(price: f64) -> PriceRecord {
        PriceRecord {
            service_name: "Virtual Machines".into(),
            sku_name: "D4s v3".into(),
            product_name: String::new(),
            arm_region_name: "eastus".into(),
            arm_sku_name: Some("Standard_D4s_v3".into()),
            price_type: PriceType::Consumption,
            unit_of_measure: "1 Hour".into(),
            retail_price: price,
            unit_price: price,
            currency_code: "USD".into(),
            effective_start_date: None,
            reservation_term: None,
            savings_plan: Vec::new(),
            original_price: None,
        }
    }

    fn reservation(term: &str, total_price: f64) -> PriceRecord {
        let mut record = consumption(total_price);
        record.price_type = PriceType::Reservation;
        record.reservation_term = Some(term.into());
        record
    }

    fn estimate(records: &[PriceRecord], hours: f64) -> Result<CostEstimate> {
        CostEstimator::default().estimate(
            records,
            "Virtual Machines",
            "D4s v3",
            "eastus",
            "USD",
            hours,
        )
    }

    #[test]
    fn test_monthly_equals_hourly_times_hours() {
        let estimate = estimate(&[consumption(0.192)], 730.0).unwrap();
        let od = estimate.on_demand_pricing;
        assert!((od.monthly_cost - od.hourly_rate * 730.0).abs() < 1e-3);
        assert!((od.hourly_rate - 0.192).abs() < 1e-9);
    }

    #[test]
    fn test_nonpositive_hours_rejected() {
        for hours in [0.0, -5.0, f64::NAN] {
            assert!(matches!(
                estimate(&[consumption(0.192)], hours),
                Err(Error::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_non_hourly_unit_rejected() {
        let mut record = consumption(0.0184);
        record.unit_of_measure = "1 GB/Month".into();
        assert!(matches!(
            estimate(&[record], 730.0),
            Err(Error::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_no_consumption_record() {
        let err = estimate(&[reservation("1 Year", 1000.0)], 730.0).unwrap_err();
        assert!(err.to_string().contains("no on-demand"));
    }

    #[test]
    fn test_first_upstream_tie_break() {
        let estimate = estimate(&[consumption(0.25), consumption(0.10)], 730.0).unwrap();
        assert!((estimate.on_demand_pricing.hourly_rate - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_lowest_price_tie_break() {
        let estimator = CostEstimator::new(TieBreak::LowestPrice);
        let records = [consumption(0.25), consumption(0.10)];
        let estimate = estimator
            .estimate(&records, "Virtual Machines", "D4s v3", "eastus", "USD", 730.0)
            .unwrap();
        assert!((estimate.on_demand_pricing.hourly_rate - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_savings_plans_sorted_and_bounded() {
        let mut od = consumption(0.192);
        od.savings_plan = vec![
            SavingsPlanRate {
                unit_price: 0.113,
                retail_price: 0.113,
                term: "3 Years".into(),
            },
            SavingsPlanRate {
                unit_price: 0.152,
                retail_price: 0.152,
                term: "1 Year".into(),
            },
        ];
        // 1yr reserved at ~20% off on-demand: 0.192 * 0.8 * 8760
        let records = [od, reservation("1 Year", 1345.33)];
        let estimate = estimate(&records, 730.0).unwrap();

        let terms: Vec<&str> = estimate.savings_plans.iter().map(|p| p.term.as_str()).collect();
        assert_eq!(terms, ["1 Year", "1 Year", "3 Years"]);

        let od_rate = estimate.on_demand_pricing.hourly_rate;
        for plan in &estimate.savings_plans {
            assert!(plan.hourly_rate <= od_rate);
            let expected = (od_rate - plan.hourly_rate) / od_rate * 100.0;
            assert!((plan.savings_percent - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unparseable_reservation_term_is_skipped() {
        let records = [consumption(0.192), reservation("Unknown", 1000.0)];
        let estimate = estimate(&records, 730.0).unwrap();
        assert!(estimate.savings_plans.is_empty());

        let records = [consumption(0.192), reservation("Unknown", 1000.0), reservation("1 Year", 1345.33)];
        let estimate = self::estimate(&records, 730.0).unwrap();
        assert_eq!(estimate.savings_plans.len(), 1);
        assert_eq!(estimate.savings_plans[0].term, "1 Year");
        assert!(estimate.savings_plans[0].hourly_rate > 0.0);
        assert!(estimate.savings_plans[0].savings_percent < 100.0);
    }

    #[test]
    fn test_no_savings_plans_is_empty_not_error() {
        let estimate = estimate(&[consumption(0.192)], 730.0).unwrap();
        assert!(estimate.savings_plans.is_empty());
    }
}
