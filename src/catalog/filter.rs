//! Catalog query intent and its OData translation.

use super::types::PriceType;

/// Value object capturing the intent of one logical catalog query.
///
/// Built once per request and translated into the catalog's `$filter`
/// syntax by [`super::CatalogClient`]. All matches are exact conjunctions;
/// fuzzy resolution happens before the filter is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogFilter {
    pub service_name: Option<String>,
    pub sku_name: Option<String>,
    pub arm_sku_name: Option<String>,
    pub region: Option<String>,
    pub price_type: Option<PriceType>,
    pub currency_code: Option<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn service(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    pub fn sku(mut self, name: impl Into<String>) -> Self {
        self.sku_name = Some(name.into());
        self
    }

    pub fn arm_sku(mut self, name: impl Into<String>) -> Self {
        self.arm_sku_name = Some(name.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn price_type(mut self, price_type: PriceType) -> Self {
        self.price_type = Some(price_type);
        self
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency_code = Some(code.into());
        self
    }

    /// Render the filter as an OData `$filter` expression, or `None` when
    /// no field is constrained.
    pub fn to_odata(&self) -> Option<String> {
        let mut clauses = Vec::new();

        if let Some(ref service) = self.service_name {
            clauses.push(format!("serviceName eq '{}'", escape(service)));
        }
        if let Some(ref sku) = self.sku_name {
            clauses.push(format!("skuName eq '{}'", escape(sku)));
        }
        if let Some(ref arm_sku) = self.arm_sku_name {
            clauses.push(format!("armSkuName eq '{}'", escape(arm_sku)));
        }
        if let Some(ref region) = self.region {
            clauses.push(format!("armRegionName eq '{}'", escape(region)));
        }
        if let Some(price_type) = self.price_type {
            clauses.push(format!("priceType eq '{}'", price_type.as_str()));
        }

        if clauses.is_empty() {
            None
        } else {
            Some(clauses.join(" and "))
        }
    }
}

// OData string literals escape single quotes by doubling them.
fn escape(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_filter() {
        let filter = CatalogFilter::new()
            .service("Virtual Machines")
            .sku("D4s v3")
            .region("eastus")
            .price_type(PriceType::Consumption);

        assert_eq!(
            filter.to_odata().unwrap(),
            "serviceName eq 'Virtual Machines' and skuName eq 'D4s v3' and \
             armRegionName eq 'eastus' and priceType eq 'Consumption'"
        );
    }

    #[test]
    fn test_empty_filter() {
        assert!(CatalogFilter::new().to_odata().is_none());
        // Currency is a query parameter, not a filter clause.
        assert!(CatalogFilter::new().currency("EUR").to_odata().is_none());
    }

    #[test]
    fn test_quote_escaping() {
        let filter = CatalogFilter::new().service("O'Brien's Service");
        assert_eq!(
            filter.to_odata().unwrap(),
            "serviceName eq 'O''Brien''s Service'"
        );
    }
}
