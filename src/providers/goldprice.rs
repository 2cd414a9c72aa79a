use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::core::rates::{MetalQuote, MetalSource};

/// Metal source: data-asg.goldprice.org. Quotes one troy ounce of gold and
/// silver in USD.
pub struct GoldPriceSource {
    base_url: String,
}

impl GoldPriceSource {
    pub fn new(base_url: &str) -> Self {
        GoldPriceSource {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoldPriceResponse {
    items: Vec<GoldPriceItem>,
}

#[derive(Debug, Deserialize)]
struct GoldPriceItem {
    #[serde(rename = "xauPrice")]
    xau_price: Option<f64>,
    #[serde(rename = "xagPrice")]
    xag_price: Option<f64>,
}

#[async_trait]
impl MetalSource for GoldPriceSource {
    fn name(&self) -> &'static str {
        "goldprice"
    }

    #[instrument(name = "GoldPriceFetch", skip(self))]
    async fn ounce_quotes(&self) -> Result<MetalQuote> {
        let url = format!("{}/dbXRates/USD", self.base_url);
        debug!("Requesting metal quotes from {}", url);

        let client = reqwest::Client::builder().user_agent("kasa/1.0").build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        let data = response.json::<GoldPriceResponse>().await?;
        let item = data
            .items
            .first()
            .ok_or_else(|| anyhow!("No items in goldprice response"))?;

        match (item.xau_price, item.xag_price) {
            (Some(gold), Some(silver)) if gold > 0.0 && silver > 0.0 => Ok(MetalQuote {
                gold_usd_per_ounce: gold,
                silver_usd_per_ounce: silver,
            }),
            _ => Err(anyhow!("Metal quote format has changed or is invalid")),
        }
    }
}
