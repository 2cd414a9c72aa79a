//! Rate table and the provider seams the aggregator is built on

use crate::core::currency::Currency;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Asset codes beyond the fiat enum: gram-denominated metals and crypto.
pub const GOLD_GRAM: &str = "XAU_GRAM";
pub const SILVER_GRAM: &str = "XAG_GRAM";
pub const BITCOIN: &str = "BTC";
pub const ETHEREUM: &str = "ETH";
pub const RIPPLE: &str = "XRP";

/// Troy ounce in grams, used to convert metal quotes to gram prices.
pub const OUNCE_TO_GRAM: f64 = 31.1035;

/// A snapshot of exchange rates: units of the base currency per one unit of
/// each code. Rebuilt from scratch on every fetch, never persisted. The base
/// currency itself is always present with rate 1.
///
/// A missing code is propagated as `None`; callers decide how to render
/// absence. There is deliberately no identity fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: Currency,
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn new(base: Currency) -> Self {
        let mut rates = HashMap::new();
        rates.insert(base.code().to_string(), 1.0);
        Self { base, rates }
    }

    pub fn base(&self) -> Currency {
        self.base
    }

    pub fn insert(&mut self, code: impl Into<String>, rate: f64) {
        self.rates.insert(code.into(), rate);
    }

    pub fn merge(&mut self, other: HashMap<String, f64>) {
        self.rates.extend(other);
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn get_currency(&self, currency: Currency) -> Option<f64> {
        self.get(currency.code())
    }

    /// Converts an amount denominated in `currency` into the base currency.
    pub fn to_base(&self, amount: f64, currency: Currency) -> Option<f64> {
        self.get_currency(currency).map(|rate| amount * rate)
    }

    /// Converts an amount already in the base currency into `currency`.
    pub fn from_base(&self, amount_in_base: f64, currency: Currency) -> Option<f64> {
        self.get_currency(currency).map(|rate| amount_in_base / rate)
    }

    /// True when no source contributed anything beyond the base entry.
    pub fn is_base_only(&self) -> bool {
        self.rates.len() <= 1
    }
}

/// Quotes the US dollar against a set of counter currencies, returning units
/// of counter currency per one USD for every code the source knows about.
/// Sources may return a subset of the requested codes.
#[async_trait]
pub trait FiatSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn usd_quotes(&self, symbols: &[&str]) -> Result<HashMap<String, f64>>;
}

/// Per-ounce USD prices for gold and silver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetalQuote {
    pub gold_usd_per_ounce: f64,
    pub silver_usd_per_ounce: f64,
}

#[async_trait]
pub trait MetalSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn ounce_quotes(&self) -> Result<MetalQuote>;
}

/// Which currency a crypto source quotes in. Base-denominated sources can be
/// used standalone; USD-denominated ones need a known USD rate to convert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoDenomination {
    Base,
    Usd,
}

#[async_trait]
pub trait CryptoSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn denomination(&self) -> CryptoDenomination;
    /// Prices keyed by asset code (BTC, ETH, XRP). Coins the source cannot
    /// quote are simply absent.
    async fn crypto_quotes(&self) -> Result<HashMap<String, f64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_entry_is_always_present() {
        let table = RateTable::new(Currency::Try);
        assert_eq!(table.get("TRY"), Some(1.0));
        assert!(table.is_base_only());
    }

    #[test]
    fn test_conversions_propagate_absence() {
        let mut table = RateTable::new(Currency::Try);
        table.insert("USD", 32.5);

        assert_eq!(table.to_base(2.0, Currency::Usd), Some(65.0));
        assert_eq!(table.from_base(65.0, Currency::Usd), Some(2.0));
        assert_eq!(table.to_base(2.0, Currency::Eur), None);
        assert_eq!(table.from_base(65.0, Currency::Rub), None);
    }

    #[test]
    fn test_merge_overrides_and_extends() {
        let mut table = RateTable::new(Currency::Try);
        table.insert("USD", 30.0);
        table.merge(HashMap::from([
            ("USD".to_string(), 32.5),
            (BITCOIN.to_string(), 3_500_000.0),
        ]));

        assert_eq!(table.get("USD"), Some(32.5));
        assert_eq!(table.get(BITCOIN), Some(3_500_000.0));
        assert!(!table.is_base_only());
    }
}
