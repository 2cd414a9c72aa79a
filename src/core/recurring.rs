//! Recurring income templates and the once-per-month due check

use crate::core::currency::Currency;
use crate::core::transaction::{Transaction, TransactionKind};
use anyhow::{Result, bail};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A template that materializes one income transaction per calendar month
/// once its trigger day is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringIncome {
    pub id: String,
    pub amount: f64,
    pub category: String,
    pub currency: Currency,
    pub day_of_month: u32,
    pub last_added: Option<DateTime<Utc>>,
}

impl RecurringIncome {
    pub fn new(amount: f64, category: String, currency: Currency, day_of_month: u32) -> Result<Self> {
        if category.trim().is_empty() {
            bail!("Category is required");
        }
        if !(1..=31).contains(&day_of_month) {
            bail!("Day must be between 1 and 31, got {}", day_of_month);
        }
        if !amount.is_finite() || amount <= 0.0 {
            bail!("Amount must be a positive number");
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            amount,
            category,
            currency,
            day_of_month,
            last_added: None,
        })
    }

    /// Due when the trigger day has been reached this month and nothing was
    /// materialized in the current month and year yet.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        let day_reached = now.day() >= self.day_of_month;
        let added_this_month = self
            .last_added
            .map(|last| last.month() == now.month() && last.year() == now.year())
            .unwrap_or(false);
        day_reached && !added_this_month
    }

    /// Builds the income transaction for the current month, dated on the
    /// trigger day (clamped to the month's length for short months).
    pub fn materialize(&self, now: DateTime<Utc>) -> Transaction {
        let last_day = days_in_month(now.year(), now.month());
        let day = self.day_of_month.min(last_day);
        let date = Utc
            .with_ymd_and_hms(now.year(), now.month(), day, 0, 0, 0)
            .single()
            .unwrap_or(now);

        Transaction {
            id: Uuid::new_v4().to_string(),
            description: format!("Recurring: {}", self.category),
            amount: self.amount.abs(),
            category: self.category.clone(),
            currency: self.currency,
            kind: TransactionKind::Income,
            date,
            purchase_rate: None,
            asset_quantity: None,
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    chrono::NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}
