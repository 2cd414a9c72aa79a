//! Ledger aggregation: totals and category breakdowns in the base currency

use crate::core::currency::Currency;
use crate::core::rates::RateTable;
use crate::core::transaction::{Transaction, TransactionKind};
use std::collections::HashMap;

/// Income, expense and balance totals expressed in the base currency.
/// Transactions whose currency has no rate in the table are skipped and
/// counted instead of being converted at an assumed identity rate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LedgerSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub skipped: usize,
}

pub fn summarize(transactions: &[Transaction], rates: &RateTable) -> LedgerSummary {
    let mut summary = LedgerSummary::default();
    for tx in transactions {
        let Some(amount_in_base) = rates.to_base(tx.amount, tx.currency) else {
            summary.skipped += 1;
            continue;
        };
        match tx.kind {
            TransactionKind::Income => summary.total_income += amount_in_base,
            // Expenses are stored negative, so adding keeps the sign.
            TransactionKind::Expense => summary.total_expense += amount_in_base,
        }
    }
    summary.balance = summary.total_income + summary.total_expense;
    summary
}

/// Per-category totals (absolute amounts, base currency) for one side of the
/// ledger, sorted largest first. Returns the totals and the count of
/// transactions skipped for lack of a rate.
pub fn category_breakdown(
    transactions: &[Transaction],
    rates: &RateTable,
    kind: TransactionKind,
) -> (Vec<(String, f64)>, usize) {
    let mut totals: HashMap<String, f64> = HashMap::new();
    let mut skipped = 0;

    for tx in transactions.iter().filter(|t| t.kind == kind) {
        let Some(amount_in_base) = rates.to_base(tx.amount.abs(), tx.currency) else {
            skipped += 1;
            continue;
        };
        let category = if tx.category.trim().is_empty() {
            "Uncategorized".to_string()
        } else {
            tx.category.clone()
        };
        *totals.entry(category).or_default() += amount_in_base;
    }

    let mut sorted: Vec<(String, f64)> = totals.into_iter().collect();
    sorted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    (sorted, skipped)
}

/// Converts a base-currency total for display. `None` when the display
/// currency itself has no rate; the caller renders that as N/A.
pub fn display_amount(amount_in_base: f64, display: Currency, rates: &RateTable) -> Option<f64> {
    rates.from_base(amount_in_base, display)
}
