//! HTTP client for the Azure Retail Prices catalog.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use super::filter::CatalogFilter;
use super::resilience::RetryConfig;
use super::types::{CatalogPage, PriceRecord};
use crate::config::{DEFAULT_API_VERSION, DEFAULT_ENDPOINT};
use crate::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for filtered, paginated catalog queries.
///
/// Owns one `reqwest::Client` (connection pool) for its whole lifetime;
/// the pool is released when the client is dropped, on every exit path.
/// The client never re-sorts: records come back in upstream page order.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: String,
    api_version: String,
    retry: RetryConfig,
    timeout: Duration,
}

impl CatalogClient {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    /// Fetch up to `limit` records matching `filter`, following
    /// `NextPageLink` until the limit is satisfied or the catalog is
    /// exhausted. A limit of zero is an input error.
    pub async fn query(&self, filter: &CatalogFilter, limit: usize) -> Result<Vec<PriceRecord>> {
        if limit == 0 {
            return Err(Error::invalid("limit must be positive"));
        }

        let mut records = Vec::new();
        let mut next_url = Some(self.first_page_url(filter));

        while let Some(url) = next_url {
            let page = self.fetch_page(&url).await?;
            debug!(
                items = page.items.len(),
                collected = records.len(),
                has_next = page.next_page_link.is_some(),
                "Fetched catalog page"
            );

            // An empty page makes no progress toward the limit; following
            // its next link could page forever.
            if page.items.is_empty() {
                break;
            }

            records.extend(page.items);
            if records.len() >= limit {
                records.truncate(limit);
                break;
            }
            next_url = page.next_page_link;
        }

        Ok(records)
    }

    /// Distinct SKU names available for a service, optionally narrowed by
    /// region, in first-seen upstream order.
    ///
    /// Pages up to `universe_limit` records so validation sees the full SKU
    /// universe rather than a truncated result page.
    pub async fn distinct_skus(
        &self,
        service: &str,
        region: Option<&str>,
        universe_limit: usize,
    ) -> Result<Vec<String>> {
        let mut filter = CatalogFilter::new().service(service);
        if let Some(region) = region {
            filter = filter.region(region);
        }

        let records = self.query(&filter, universe_limit.max(1)).await?;

        let mut seen = std::collections::HashSet::new();
        let mut skus = Vec::new();
        for record in records {
            if seen.insert(record.sku_name.clone()) {
                skus.push(record.sku_name);
            }
        }
        Ok(skus)
    }

    fn first_page_url(&self, filter: &CatalogFilter) -> String {
        let mut url = format!("{}?api-version={}", self.endpoint, self.api_version);
        if let Some(ref currency) = filter.currency_code {
            url.push_str("&currencyCode='");
            url.push_str(&urlencoding::encode(currency));
            url.push('\'');
        }
        if let Some(odata) = filter.to_odata() {
            url.push_str("&$filter=");
            url.push_str(&urlencoding::encode(&odata));
        }
        url
    }

    /// One page fetch with bounded retries on transient failures.
    async fn fetch_page(&self, url: &str) -> Result<CatalogPage> {
        let mut attempts = 0u32;
        loop {
            match self.fetch_page_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    attempts += 1;
                    if !e.is_retryable() || attempts > self.retry.max_retries {
                        return Err(e);
                    }

                    let delay = self.retry.backoff.delay_for(attempts);
                    let delay = e.retry_after().map_or(delay, |ra| ra.max(delay));
                    warn!(
                        error = %e,
                        attempt = attempts,
                        max_retries = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "Transient catalog failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    async fn fetch_page_once(&self, url: &str) -> Result<CatalogPage> {
        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.timeout)
            } else {
                Error::Network(e)
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(Error::RateLimit { retry_after });
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::CatalogQuery {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CatalogPage>()
            .await
            .map_err(|e| Error::Parse(format!("malformed catalog page: {}", e)))
    }
}

/// Builder for [`CatalogClient`].
#[derive(Debug, Default)]
pub struct CatalogClientBuilder {
    endpoint: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    retry: Option<RetryConfig>,
}

impl CatalogClientBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Per-HTTP-call timeout, distinct from the retry/backoff ceiling.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    pub fn build(self) -> Result<CatalogClient> {
        let endpoint = self.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        url::Url::parse(&endpoint)
            .map_err(|e| Error::invalid(format!("invalid endpoint '{}': {}", endpoint, e)))?;

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Network)?;

        Ok(CatalogClient {
            http,
            timeout,
            endpoint,
            api_version: self
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            retry: self.retry.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PriceType;

    #[test]
    fn test_zero_limit_rejected() {
        let client = CatalogClient::new().unwrap();
        let filter = CatalogFilter::new().service("Storage");
        let err = tokio_test::block_on(client.query(&filter, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_first_page_url() {
        let client = CatalogClient::builder()
            .endpoint("https://example.test/api/retail/prices")
            .api_version("2023-01-01-preview")
            .build()
            .unwrap();

        let filter = CatalogFilter::new()
            .service("Virtual Machines")
            .price_type(PriceType::Consumption)
            .currency("EUR");
        let url = client.first_page_url(&filter);

        assert!(url.starts_with("https://example.test/api/retail/prices?api-version="));
        assert!(url.contains("currencyCode='EUR'"));
        assert!(url.contains("%24filter=") || url.contains("$filter="));
        assert!(url.contains(&urlencoding::encode("serviceName eq 'Virtual Machines'").into_owned()));
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = CatalogClient::builder()
            .endpoint("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_unfiltered_url_has_no_filter_param() {
        let client = CatalogClient::new().unwrap();
        let url = client.first_page_url(&CatalogFilter::new());
        assert!(!url.contains("$filter"));
    }
}
