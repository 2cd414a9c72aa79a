use super::ui;
use crate::core::currency::Currency;
use crate::core::recurring::RecurringIncome;
use crate::core::transaction::Transaction;
use crate::ledger::Ledger;
use crate::store::Collection;
use anyhow::{Result, bail};
use comfy_table::{Cell, CellAlignment};

pub async fn add<T, R>(
    ledger: &Ledger<T, R>,
    amount: f64,
    category: String,
    currency: Currency,
    day: u32,
) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    let income = RecurringIncome::new(amount, category, currency, day)?;
    println!(
        "Recurring income saved: {} {}{:.2} on day {} ({})",
        income.category,
        income.currency.symbol(),
        income.amount,
        income.day_of_month,
        ui::style_text(&income.id, ui::StyleType::Subtle)
    );
    ledger.add_recurring(income).await
}

pub async fn list<T, R>(ledger: &Ledger<T, R>) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    let incomes = ledger.recurring_incomes().await?;

    if incomes.is_empty() {
        println!(
            "{}",
            ui::style_text("No recurring incomes configured", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Day"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell("Last added"),
        ui::header_cell("Id"),
    ]);

    for income in &incomes {
        table.add_row(vec![
            Cell::new(income.day_of_month).set_alignment(CellAlignment::Right),
            Cell::new(&income.category),
            Cell::new(format!(
                "{}{:.2}",
                income.currency.symbol(),
                income.amount
            ))
            .set_alignment(CellAlignment::Right),
            ui::format_optional_cell(income.last_added, |d| {
                d.format("%Y-%m-%d").to_string()
            }),
            Cell::new(&income.id),
        ]);
    }

    println!(
        "{}\n\n{table}",
        ui::style_text("Recurring Incomes", ui::StyleType::Title)
    );
    Ok(())
}

pub async fn remove<T, R>(ledger: &Ledger<T, R>, id: &str) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    if !ledger.remove_recurring(id).await? {
        bail!("No recurring income with id {id}");
    }
    println!("Removed recurring income {id}");
    Ok(())
}
