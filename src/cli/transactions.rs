use super::ui;
use crate::core::recurring::RecurringIncome;
use crate::core::transaction::{DateFilter, Transaction, TransactionDraft, TransactionKind};
use crate::ledger::Ledger;
use crate::store::Collection;
use anyhow::{Result, bail};
use chrono::Utc;
use comfy_table::Cell;

pub async fn add<T, R>(ledger: &Ledger<T, R>, draft: TransactionDraft) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    let tx = ledger.add(draft, Utc::now()).await?;
    let label = match tx.kind {
        TransactionKind::Income => "income",
        TransactionKind::Expense => "expense",
    };
    println!(
        "Recorded {label}: {} {}{:.2} ({})",
        tx.description,
        tx.currency.symbol(),
        tx.amount.abs(),
        ui::style_text(&tx.id, ui::StyleType::Subtle)
    );
    Ok(())
}

pub async fn list<T, R>(
    ledger: &Ledger<T, R>,
    period: DateFilter,
    category: Option<&str>,
) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    let transactions = ledger.filtered(period, category, Utc::now()).await?;

    if transactions.is_empty() {
        println!(
            "{}",
            ui::style_text("No transactions in this period", ui::StyleType::Subtle)
        );
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell("Description"),
        ui::header_cell("Category"),
        ui::header_cell("Amount"),
        ui::header_cell("Id"),
    ]);

    for tx in &transactions {
        table.add_row(vec![
            Cell::new(tx.date.format("%Y-%m-%d").to_string()),
            Cell::new(&tx.description),
            Cell::new(&tx.category),
            ui::amount_cell(
                tx.amount,
                format!("{}{:.2}", tx.currency.symbol(), tx.amount),
            ),
            Cell::new(&tx.id),
        ]);
    }

    println!(
        "{}\n\n{table}",
        ui::style_text(
            &format!("Transactions ({})", period.label()),
            ui::StyleType::Title
        )
    );
    Ok(())
}

pub async fn delete<T, R>(ledger: &Ledger<T, R>, id: &str) -> Result<()>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    if !ledger.delete(id).await? {
        bail!("No transaction with id {id}");
    }
    println!("Deleted transaction {id}");
    Ok(())
}
