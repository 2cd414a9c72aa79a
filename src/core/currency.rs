//! Supported fiat currencies and their display symbols

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Fiat currencies a transaction can be denominated in. TRY is the base
/// currency all rates are expressed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "TRY")]
    Try,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
    #[serde(rename = "RUB")]
    Rub,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Try, Currency::Usd, Currency::Eur, Currency::Rub];

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Try => "TRY",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Rub => "RUB",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Try => "₺",
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Rub => "₽",
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::Try
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TRY" => Ok(Currency::Try),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "RUB" => Ok(Currency::Rub),
            _ => Err(anyhow::anyhow!("Unsupported currency: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for currency in Currency::ALL {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert!("GBP".parse::<Currency>().is_err());
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();
        assert_eq!(json, r#""EUR""#);
        let parsed: Currency = serde_json::from_str(r#""RUB""#).unwrap();
        assert_eq!(parsed, Currency::Rub);
    }

    #[test]
    fn test_default_is_base() {
        assert_eq!(Currency::default(), Currency::Try);
        assert_eq!(Currency::Try.symbol(), "₺");
    }
}
