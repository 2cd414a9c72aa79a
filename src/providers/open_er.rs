use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use crate::core::rates::FiatSource;

/// Secondary fiat source: open.er-api.com. Returns the full USD rate sheet
/// in one call; the response is filtered down to the requested symbols.
/// Also serves as the dedicated RUB call when the primary chain leaves RUB
/// missing.
pub struct OpenErApiSource {
    base_url: String,
}

impl OpenErApiSource {
    pub fn new(base_url: &str) -> Self {
        OpenErApiSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenErApiResponse {
    result: String,
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl FiatSource for OpenErApiSource {
    fn name(&self) -> &'static str {
        "open-er-api"
    }

    #[instrument(name = "OpenErApiFetch", skip(self))]
    async fn usd_quotes(&self, symbols: &[&str]) -> Result<HashMap<String, f64>> {
        let url = format!("{}/v6/latest/USD", self.base_url);
        debug!("Requesting fiat rates from {}", url);

        let client = reqwest::Client::builder().user_agent("kasa/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        let text = response.text().await?;
        let data: OpenErApiResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse open.er-api response");
                return Err(anyhow!("Failed to parse open.er-api response: {}", e));
            }
        };

        if data.result != "success" {
            return Err(anyhow!("open.er-api reported result: {}", data.result));
        }
        let rates = data
            .rates
            .ok_or_else(|| anyhow!("No rates in open.er-api response"))?;

        let filtered: HashMap<String, f64> = symbols
            .iter()
            .filter_map(|symbol| {
                rates
                    .get(*symbol)
                    .map(|rate| (symbol.to_string(), *rate))
            })
            .collect();

        if filtered.is_empty() {
            return Err(anyhow!("open.er-api returned none of: {}", symbols.join(",")));
        }
        Ok(filtered)
    }
}
