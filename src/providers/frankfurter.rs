use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::rates::FiatSource;

/// Primary fiat source: frankfurter.app (ECB reference rates). Quotes one
/// USD in each requested counter currency. Currencies the ECB does not
/// publish (RUB since 2022) are simply absent from the response.
pub struct FrankfurterSource {
    base_url: String,
}

impl FrankfurterSource {
    pub fn new(base_url: &str) -> Self {
        FrankfurterSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl FiatSource for FrankfurterSource {
    fn name(&self) -> &'static str {
        "frankfurter"
    }

    #[instrument(name = "FrankfurterFetch", skip(self))]
    async fn usd_quotes(&self, symbols: &[&str]) -> Result<HashMap<String, f64>> {
        let url = format!("{}/latest?from=USD&to={}", self.base_url, symbols.join(","));
        debug!("Requesting fiat rates from {}", url);

        let client = reqwest::Client::builder().user_agent("kasa/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from frankfurter", response.status()));
        }

        let data = response.json::<FrankfurterResponse>().await?;
        if data.rates.is_empty() {
            return Err(anyhow!("No rates in frankfurter response"));
        }

        Ok(data.rates)
    }
}
