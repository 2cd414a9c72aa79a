use super::ui;
use crate::aggregator::RateAggregator;
use crate::core::analytics;
use crate::core::currency::Currency;
use crate::core::recurring::RecurringIncome;
use crate::core::transaction::Transaction;
use crate::ledger::Ledger;
use crate::store::Collection;
use anyhow::Result;

pub async fn run<T, R>(
    ledger: &Ledger<T, R>,
    aggregator: &RateAggregator,
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
    let summary = analytics::summarize(&transactions, &rates);

    let mut table = ui::new_styled_table();
    let mut header = vec![
        ui::header_cell(""),
        ui::header_cell(&format!("Amount ({})", base.code())),
    ];
    if display != base {
        header.push(ui::header_cell(&format!("Amount ({})", display.code())));
    }
    table.set_header(header);

    for (label, amount) in [
        ("Income", summary.total_income),
        ("Expense", summary.total_expense),
        ("Balance", summary.balance),
    ] {
        let mut row = vec![
            comfy_table::Cell::new(label),
            ui::amount_cell(amount, format!("{}{amount:.2}", base.symbol())),
        ];
        if display != base {
            row.push(ui::format_optional_cell(
                analytics::display_amount(amount, display, &rates),
                |v| format!("{}{v:.2}", display.symbol()),
            ));
        }
        table.add_row(row);
    }

    println!(
        "{}\n\n{table}",
        ui::style_text("Ledger Summary", ui::StyleType::Title)
    );

    if summary.skipped > 0 {
        println!(
            "\n{}",
            ui::style_text(
                &format!(
                    "{} transaction(s) skipped, no rate for their currency",
                    summary.skipped
                ),
                ui::StyleType::Subtle,
            )
        );
    }

    Ok(())
}
