//! Multi-source exchange-rate aggregation
//!
//! Merges three independent source families into one [`RateTable`]: fiat
//! cross rates derived from USD quotes, gram prices for gold/silver, and
//! crypto prices. Each family is an ordered provider list tried in sequence
//! until the first success; a family that exhausts its list contributes
//! nothing. Fiat is awaited first because the metal conversion and the
//! USD-denominated crypto fallback both need the USD rate; metals and crypto
//! then run concurrently.

use crate::core::currency::Currency;
use crate::core::rates::{
    CryptoDenomination, CryptoSource, FiatSource, GOLD_GRAM, MetalSource, OUNCE_TO_GRAM,
    RateTable, SILVER_GRAM,
};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

pub struct RateAggregator {
    base: Currency,
    fiat_sources: Vec<Box<dyn FiatSource>>,
    rub_fallbacks: Vec<Box<dyn FiatSource>>,
    metal_sources: Vec<Box<dyn MetalSource>>,
    crypto_sources: Vec<Box<dyn CryptoSource>>,
}

/// Fiat result: base-per-unit rates plus the raw USD rate the later steps
/// depend on.
struct FiatRates {
    usd_to_base: f64,
    rates: HashMap<String, f64>,
}

impl RateAggregator {
    pub fn new(
        base: Currency,
        fiat_sources: Vec<Box<dyn FiatSource>>,
        rub_fallbacks: Vec<Box<dyn FiatSource>>,
        metal_sources: Vec<Box<dyn MetalSource>>,
        crypto_sources: Vec<Box<dyn CryptoSource>>,
    ) -> Self {
        Self {
            base,
            fiat_sources,
            rub_fallbacks,
            metal_sources,
            crypto_sources,
        }
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    /// Rebuilds the rate table from scratch. `None` means total failure:
    /// no source of any family contributed a single rate.
    pub async fn fetch(&self) -> Option<RateTable> {
        let mut table = RateTable::new(self.base);

        let fiat = self.fetch_fiat().await;
        let usd_to_base = fiat.as_ref().map(|f| f.usd_to_base);
        if let Some(fiat) = fiat {
            table.merge(fiat.rates);
        }

        let (metals, crypto) = futures::join!(
            self.fetch_metals(usd_to_base),
            self.fetch_crypto(usd_to_base)
        );
        if let Some(metals) = metals {
            table.merge(metals);
        }
        if let Some(crypto) = crypto {
            table.merge(crypto);
        }

        if table.is_base_only() {
            error!("All rate sources failed, no exchange rates available");
            return None;
        }
        Some(table)
    }

    /// Counter currencies to quote against USD: the base itself plus every
    /// supported non-USD currency.
    fn fiat_symbols(&self) -> Vec<&'static str> {
        Currency::ALL
            .iter()
            .filter(|c| **c != Currency::Usd)
            .map(|c| c.code())
            .collect()
    }

    /// Derives base-per-unit rates from USD quotes: with `usd_to_base` units
    /// of base per USD and `usd_c` units of currency c per USD, one unit of
    /// c is worth `usd_to_base / usd_c` in base. Sources quote against USD,
    /// so a USD base is the identity, not a lookup.
    fn derive(&self, quotes: &HashMap<String, f64>) -> Option<FiatRates> {
        let usd_to_base = if self.base == Currency::Usd {
            1.0
        } else {
            let rate = quotes.get(self.base.code()).copied()?;
            if rate <= 0.0 {
                return None;
            }
            rate
        };

        let mut rates = HashMap::new();
        rates.insert(Currency::Usd.code().to_string(), usd_to_base);
        for currency in Currency::ALL {
            if currency == Currency::Usd || currency == self.base {
                continue;
            }
            if let Some(usd_c) = quotes.get(currency.code()).copied()
                && usd_c > 0.0
            {
                rates.insert(currency.code().to_string(), usd_to_base / usd_c);
            }
        }
        Some(FiatRates { usd_to_base, rates })
    }

    async fn fetch_fiat(&self) -> Option<FiatRates> {
        let symbols = self.fiat_symbols();
        let mut fiat: Option<FiatRates> = None;

        for source in &self.fiat_sources {
            match source.usd_quotes(&symbols).await {
                Ok(quotes) => match self.derive(&quotes) {
                    Some(derived) => {
                        debug!(source = source.name(), "Fiat rates fetched");
                        fiat = Some(derived);
                        break;
                    }
                    None => {
                        warn!(
                            source = source.name(),
                            "Fiat source returned no usable {} quote", self.base
                        );
                    }
                },
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Fiat source failed");
                }
            }
        }

        let mut fiat = fiat?;

        // RUB is dropped by some primary sources; one more dedicated call.
        if !fiat.rates.contains_key(Currency::Rub.code()) {
            for source in &self.rub_fallbacks {
                match source.usd_quotes(&[Currency::Rub.code()]).await {
                    Ok(quotes) => {
                        if let Some(usd_rub) = quotes.get(Currency::Rub.code()).copied()
                            && usd_rub > 0.0
                        {
                            info!(source = source.name(), "RUB recovered via dedicated call");
                            fiat.rates.insert(
                                Currency::Rub.code().to_string(),
                                fiat.usd_to_base / usd_rub,
                            );
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(source = source.name(), error = %e, "RUB fallback failed");
                    }
                }
            }
        }

        Some(fiat)
    }

    /// Gram prices for gold and silver in base currency. Needs the USD rate
    /// from the fiat step; skipped entirely without it.
    async fn fetch_metals(&self, usd_to_base: Option<f64>) -> Option<HashMap<String, f64>> {
        let usd_to_base = match usd_to_base {
            Some(rate) => rate,
            None => {
                debug!("Skipping metal rates, no USD rate available");
                return None;
            }
        };

        for source in &self.metal_sources {
            match source.ounce_quotes().await {
                Ok(quote) => {
                    debug!(source = source.name(), "Metal quotes fetched");
                    return Some(HashMap::from([
                        (
                            GOLD_GRAM.to_string(),
                            (quote.gold_usd_per_ounce / OUNCE_TO_GRAM) * usd_to_base,
                        ),
                        (
                            SILVER_GRAM.to_string(),
                            (quote.silver_usd_per_ounce / OUNCE_TO_GRAM) * usd_to_base,
                        ),
                    ]));
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Metal source failed");
                }
            }
        }
        None
    }

    async fn fetch_crypto(&self, usd_to_base: Option<f64>) -> Option<HashMap<String, f64>> {
        for source in &self.crypto_sources {
            // A USD-denominated source cannot be converted without a USD
            // rate; treat it as exhausted rather than guessing.
            if source.denomination() == CryptoDenomination::Usd && usd_to_base.is_none() {
                warn!(
                    source = source.name(),
                    "Skipping USD-denominated crypto source, no USD rate available"
                );
                continue;
            }

            match source.crypto_quotes().await {
                Ok(quotes) => {
                    debug!(source = source.name(), "Crypto prices fetched");
                    return Some(match source.denomination() {
                        CryptoDenomination::Base => quotes,
                        CryptoDenomination::Usd => {
                            let rate = usd_to_base.expect("checked above");
                            quotes
                                .into_iter()
                                .map(|(code, price)| (code, price * rate))
                                .collect()
                        }
                    });
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Crypto source failed");
                }
            }
        }
        None
    }
}
