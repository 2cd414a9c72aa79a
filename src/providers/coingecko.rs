use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::rates::{BITCOIN, CryptoDenomination, CryptoSource, ETHEREUM, RIPPLE};

/// Primary crypto source: CoinGecko simple price, quoted directly in the
/// base currency so it works even when every fiat source is down.
pub struct CoinGeckoSource {
    base_url: String,
    vs_currency: String,
}

impl CoinGeckoSource {
    pub fn new(base_url: &str, vs_currency: &str) -> Self {
        CoinGeckoSource {
            base_url: base_url.to_string(),
            vs_currency: vs_currency.to_lowercase(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    bitcoin: Option<HashMap<String, f64>>,
    ethereum: Option<HashMap<String, f64>>,
    ripple: Option<HashMap<String, f64>>,
}

#[async_trait]
impl CryptoSource for CoinGeckoSource {
    fn name(&self) -> &'static str {
        "coingecko"
    }

    fn denomination(&self) -> CryptoDenomination {
        CryptoDenomination::Base
    }

    #[instrument(name = "CoinGeckoFetch", skip(self))]
    async fn crypto_quotes(&self) -> Result<HashMap<String, f64>> {
        let url = format!(
            "{}/api/v3/simple/price?ids=bitcoin,ethereum,ripple&vs_currencies={}",
            self.base_url, self.vs_currency
        );
        debug!("Requesting crypto prices from {}", url);

        let client = reqwest::Client::builder().user_agent("kasa/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {} from coingecko", response.status()));
        }

        let data = response.json::<CoinGeckoResponse>().await?;

        let mut quotes = HashMap::new();
        let mut insert = |code: &str, entry: &Option<HashMap<String, f64>>| {
            if let Some(price) = entry.as_ref().and_then(|p| p.get(&self.vs_currency)) {
                quotes.insert(code.to_string(), *price);
            }
        };
        insert(BITCOIN, &data.bitcoin);
        insert(ETHEREUM, &data.ethereum);
        insert(RIPPLE, &data.ripple);

        if quotes.is_empty() {
            return Err(anyhow!("No crypto prices in coingecko response"));
        }
        Ok(quotes)
    }
}
