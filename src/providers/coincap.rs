use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, error, instrument};

use crate::core::rates::{BITCOIN, CryptoDenomination, CryptoSource, ETHEREUM, RIPPLE};

/// Fallback crypto source: CoinCap assets. Quotes in USD as decimal strings;
/// the aggregator converts through the USD rate, so this source is unusable
/// when the fiat step contributed nothing.
pub struct CoinCapSource {
    base_url: String,
}

impl CoinCapSource {
    pub fn new(base_url: &str) -> Self {
        CoinCapSource {
            base_url: base_url.to_string(),
        }
    }

    fn asset_code(id: &str) -> Option<&'static str> {
        match id {
            "bitcoin" => Some(BITCOIN),
            "ethereum" => Some(ETHEREUM),
            "xrp" => Some(RIPPLE),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CoinCapResponse {
    data: Vec<CoinCapAsset>,
}

#[derive(Debug, Deserialize)]
struct CoinCapAsset {
    id: String,
    #[serde(rename = "priceUsd")]
    price_usd: String,
}

#[async_trait]
impl CryptoSource for CoinCapSource {
    fn name(&self) -> &'static str {
        "coincap"
    }

    fn denomination(&self) -> CryptoDenomination {
        CryptoDenomination::Usd
    }

    #[instrument(name = "CoinCapFetch", skip(self))]
    async fn crypto_quotes(&self) -> Result<HashMap<String, f64>> {
        let url = format!("{}/v2/assets?ids=bitcoin,ethereum,xrp", self.base_url);
        debug!("Requesting crypto prices from {}", url);

        let client = reqwest::Client::builder().user_agent("kasa/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        let text = response.text().await?;
        let data: CoinCapResponse = match serde_json::from_str(&text) {
            Ok(data) => data,
            Err(e) => {
                error!(error = ?e, response = %text, "Failed to parse coincap response");
                return Err(anyhow!("Failed to parse coincap response: {}", e));
            }
        };

        let mut quotes = HashMap::new();
        for asset in &data.data {
            let Some(code) = Self::asset_code(&asset.id) else {
                continue;
            };
            let price: f64 = asset
                .price_usd
                .parse()
                .with_context(|| format!("Invalid priceUsd for {}", asset.id))?;
            quotes.insert(code.to_string(), price);
        }

        if quotes.is_empty() {
            return Err(anyhow!("No crypto prices in coincap response"));
        }
        Ok(quotes)
    }
}
