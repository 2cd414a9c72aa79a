//! Transaction records and input validation

use crate::core::currency::Currency;
use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Expense category used for asset purchases; such transactions carry the
/// purchase rate and quantity alongside the computed cost.
pub const SAVINGS_CATEGORY: &str = "Savings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

/// An immutable record of one money movement. Expenses carry a negative
/// amount, incomes a positive one; construction goes through
/// [`TransactionDraft`] which enforces that invariant. Records are created
/// and deleted, never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub currency: Currency,
    pub kind: TransactionKind,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_quantity: Option<f64>,
}

/// Raw form input for a new transaction, validated into a [`Transaction`].
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub description: Option<String>,
    pub amount: String,
    pub category: String,
    pub currency: Currency,
    pub kind: TransactionKind,
    pub purchase_rate: Option<String>,
}

/// Accepts a comma as the decimal separator, as entered on numeric keypads.
fn parse_amount(input: &str) -> Result<f64> {
    let normalized = input.replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| anyhow::anyhow!("Not a valid number: {}", input))?;
    if !value.is_finite() || value <= 0.0 {
        bail!("Amount must be a positive number, got: {}", input);
    }
    Ok(value)
}

impl TransactionDraft {
    /// Validates the draft and builds the transaction dated `now`.
    ///
    /// Expenses require a description and are stored negative; incomes reuse
    /// the category as description. A Savings expense is an asset purchase:
    /// the amount field is the quantity, a purchase rate is required, and
    /// the stored cost is `quantity * rate`.
    pub fn build(self, now: DateTime<Utc>) -> Result<Transaction> {
        if self.category.trim().is_empty() {
            bail!("Category is required");
        }

        let is_expense = self.kind == TransactionKind::Expense;
        let description = match (&self.kind, &self.description) {
            (TransactionKind::Expense, Some(d)) if !d.trim().is_empty() => d.clone(),
            (TransactionKind::Expense, _) => bail!("Description is required for expenses"),
            (TransactionKind::Income, _) => self.category.clone(),
        };

        let amount = parse_amount(&self.amount)?;

        let is_savings = is_expense && self.category == SAVINGS_CATEGORY;
        let (total, purchase_rate, asset_quantity) = if is_savings {
            let rate_input = self
                .purchase_rate
                .as_deref()
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| anyhow::anyhow!("Purchase rate is required for Savings"))?;
            let rate = parse_amount(rate_input)?;
            (amount * rate, Some(rate), Some(amount))
        } else {
            (amount, None, None)
        };

        let signed = if is_expense { -total.abs() } else { total.abs() };

        Ok(Transaction {
            id: Uuid::new_v4().to_string(),
            description,
            amount: signed,
            category: self.category,
            currency: self.currency,
            kind: self.kind,
            date: now,
            purchase_rate,
            asset_quantity,
        })
    }
}

/// Time windows for the transaction list, anchored at local midnight of the
/// window start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    All,
    ThisWeek,
    ThisMonth,
    LastThreeMonths,
    LastSixMonths,
    ThisYear,
}

impl DateFilter {
    pub fn label(&self) -> &'static str {
        match self {
            DateFilter::All => "All",
            DateFilter::ThisWeek => "This Week",
            DateFilter::ThisMonth => "This Month",
            DateFilter::LastThreeMonths => "Last 3 Months",
            DateFilter::LastSixMonths => "Last 6 Months",
            DateFilter::ThisYear => "This Year",
        }
    }

    /// Inclusive start of the window, `None` for the unbounded filter.
    pub fn start(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let midnight = |date: chrono::NaiveDate| {
            Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("valid midnight"))
        };
        let today = now.date_naive();
        match self {
            DateFilter::All => None,
            DateFilter::ThisWeek => {
                let days_from_sunday = today.weekday().num_days_from_sunday() as i64;
                Some(midnight(today - Duration::days(days_from_sunday)))
            }
            DateFilter::ThisMonth => Some(midnight(today.with_day(1).expect("day 1"))),
            DateFilter::LastThreeMonths => Some(midnight(months_back(today, 2))),
            DateFilter::LastSixMonths => Some(midnight(months_back(today, 5))),
            DateFilter::ThisYear => Some(midnight(
                chrono::NaiveDate::from_ymd_opt(today.year(), 1, 1).expect("jan 1"),
            )),
        }
    }

    pub fn matches(&self, date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.start(now) {
            Some(start) => date >= start,
            None => true,
        }
    }
}

/// First day of the month `months` before the one containing `date`.
fn months_back(date: chrono::NaiveDate, months: u32) -> chrono::NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 - months as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12));
    chrono::NaiveDate::from_ymd_opt(year, month0 as u32 + 1, 1).expect("first of month")
}

impl FromStr for DateFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DateFilter::All),
            "this-week" => Ok(DateFilter::ThisWeek),
            "this-month" => Ok(DateFilter::ThisMonth),
            "last-3-months" => Ok(DateFilter::LastThreeMonths),
            "last-6-months" => Ok(DateFilter::LastSixMonths),
            "this-year" => Ok(DateFilter::ThisYear),
            _ => Err(anyhow::anyhow!("Invalid date filter: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(kind: TransactionKind) -> TransactionDraft {
        TransactionDraft {
            description: Some("Groceries".to_string()),
            amount: "120.50".to_string(),
            category: "Food".to_string(),
            currency: Currency::Try,
            kind,
            purchase_rate: None,
        }
    }

    #[test]
    fn test_expense_is_stored_negative() {
        let tx = draft(TransactionKind::Expense).build(Utc::now()).unwrap();
        assert_eq!(tx.amount, -120.50);
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.description, "Groceries");
        assert!(tx.purchase_rate.is_none());
    }

    #[test]
    fn test_income_uses_category_as_description() {
        let mut d = draft(TransactionKind::Income);
        d.description = None;
        d.category = "Salary".to_string();
        let tx = d.build(Utc::now()).unwrap();
        assert_eq!(tx.amount, 120.50);
        assert_eq!(tx.description, "Salary");
    }

    #[test]
    fn test_comma_decimal_separator() {
        let mut d = draft(TransactionKind::Expense);
        d.amount = "99,90".to_string();
        let tx = d.build(Utc::now()).unwrap();
        assert_eq!(tx.amount, -99.90);
    }

    #[test]
    fn test_expense_requires_description() {
        let mut d = draft(TransactionKind::Expense);
        d.description = None;
        assert!(d.build(Utc::now()).is_err());
    }

    #[test]
    fn test_rejects_non_numeric_and_non_positive_amounts() {
        for bad in ["abc", "", "-5", "0"] {
            let mut d = draft(TransactionKind::Expense);
            d.amount = bad.to_string();
            assert!(d.build(Utc::now()).is_err(), "accepted: {bad}");
        }
    }

    #[test]
    fn test_savings_purchase_computes_cost() {
        let mut d = draft(TransactionKind::Expense);
        d.category = SAVINGS_CATEGORY.to_string();
        d.amount = "2".to_string(); // grams
        d.purchase_rate = Some("2500".to_string());
        let tx = d.build(Utc::now()).unwrap();

        assert_eq!(tx.amount, -5000.0);
        assert_eq!(tx.purchase_rate, Some(2500.0));
        assert_eq!(tx.asset_quantity, Some(2.0));
    }

    #[test]
    fn test_savings_requires_purchase_rate() {
        let mut d = draft(TransactionKind::Expense);
        d.category = SAVINGS_CATEGORY.to_string();
        assert!(d.build(Utc::now()).is_err());
    }

    #[test]
    fn test_transaction_serde_roundtrip() {
        let tx = draft(TransactionKind::Expense).build(Utc::now()).unwrap();
        let json = serde_json::to_string(&tx).unwrap();
        assert!(!json.contains("purchase_rate")); // optional fields omitted
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_date_filter_this_month() {
        let now = Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap();
        let filter = DateFilter::ThisMonth;
        let inside = Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap();
        let outside = Utc.with_ymd_and_hms(2026, 7, 31, 23, 59, 0).unwrap();
        assert!(filter.matches(inside, now));
        assert!(!filter.matches(outside, now));
    }

    #[test]
    fn test_date_filter_months_back_crosses_year() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap();
        let start = DateFilter::LastThreeMonths.start(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_date_filter_parse() {
        assert_eq!(
            "last-6-months".parse::<DateFilter>().unwrap(),
            DateFilter::LastSixMonths
        );
        assert!("yesterday".parse::<DateFilter>().is_err());
    }
}
