use super::ui;
use crate::aggregator::RateAggregator;
use crate::core::analytics;
use crate::core::currency::Currency;
use crate::core::recurring::RecurringIncome;
use crate::core::transaction::{Transaction, TransactionKind};
use crate::ledger::Ledger;
use crate::store::Collection;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};

pub async fn run<T, R>(
    ledger: &Ledger<T, R>,
    aggregator: &RateAggregator,
    kind: TransactionKind,
    display: Option<Currency>,
) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    let rates = super::fetch_rates_or_base(aggregator).await;
    let base = rates.base();
    let display = display.unwrap_or(base);

    let transactions = ledger.transactions().await?;
    let (totals, skipped) = analytics::category_breakdown(&transactions, &rates, kind);

    let title = match kind {
        TransactionKind::Income => "Income by Category",
        TransactionKind::Expense => "Expenses by Category",
    };

    if totals.is_empty() {
        println!(
            "{}\n\n{}",
            ui::style_text(title, ui::StyleType::Title),
            ui::style_text("No transactions to break down", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let grand_total: f64 = totals.iter().map(|(_, v)| v).sum();

    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell("Category"),
        ui::header_cell(&format!("Amount ({})", base.code())),
        ui::header_cell("Share"),
    ];
    if display != base {
        header.insert(
            2,
            ui::header_cell(&format!("Amount ({})", display.code())),
        );
    }
    table.set_header(header);

    for (category, amount) in &totals {
        let share = if grand_total > 0.0 {
            amount / grand_total * 100.0
        } else {
            0.0
        };
        let mut row = vec![
            Cell::new(category),
            Cell::new(format!("{}{amount:.2}", base.symbol()))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{share:.1}%")).set_alignment(CellAlignment::Right),
        ];
        if display != base {
            row.insert(
                2,
                ui::format_optional_cell(
                    analytics::display_amount(*amount, display, &rates),
                    |v| format!("{}{v:.2}", display.symbol()),
                ),
            );
        }
        table.add_row(row);
    }

    println!(
        "{}\n\n{table}\n\nTotal: {}",
        ui::style_text(title, ui::StyleType::Title),
        ui::style_text(
            &format!("{}{grand_total:.2}", base.symbol()),
            ui::StyleType::TotalValue
        )
    );

    if skipped > 0 {
        println!(
            "\n{}",
            ui::style_text(
                &format!("{skipped} transaction(s) skipped, no rate for their currency"),
                ui::StyleType::Subtle,
            )
        );
    }

    Ok(())
}
