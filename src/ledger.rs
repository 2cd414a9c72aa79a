//! The transaction ledger: CRUD over the stored collections and the
//! recurring-income materialization check

use crate::core::recurring::RecurringIncome;
use crate::core::transaction::{DateFilter, Transaction, TransactionDraft, TransactionKind};
use crate::store::Collection;
use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::info;

pub struct Ledger<T, R>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    transactions: T,
    recurring: R,
}

impl<T, R> Ledger<T, R>
where
    T: Collection<Transaction>,
    R: Collection<RecurringIncome>,
{
    pub fn new(transactions: T, recurring: R) -> Self {
        Self {
            transactions,
            recurring,
        }
    }

    /// Validates the draft and records the resulting transaction.
    pub async fn add(&self, draft: TransactionDraft, now: DateTime<Utc>) -> Result<Transaction> {
        let tx = draft.build(now)?;
        self.transactions.insert(&tx.id, &tx).await?;
        Ok(tx)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.transactions.remove(id).await
    }

    /// All transactions, newest first.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let mut txs = self.transactions.list().await?;
        txs.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(txs)
    }

    /// Transactions within the date window and category filter, newest
    /// first. Incomes always pass the category filter; it narrows expenses
    /// only.
    pub async fn filtered(
        &self,
        filter: DateFilter,
        category: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let txs = self.transactions().await?;
        Ok(txs
            .into_iter()
            .filter(|tx| filter.matches(tx.date, now))
            .filter(|tx| match category {
                Some(cat) => tx.kind == TransactionKind::Income || tx.category == cat,
                None => true,
            })
            .collect())
    }

    pub async fn add_recurring(&self, income: RecurringIncome) -> Result<()> {
        self.recurring.insert(&income.id, &income).await
    }

    pub async fn remove_recurring(&self, id: &str) -> Result<bool> {
        self.recurring.remove(id).await
    }

    /// Saved recurring incomes, ordered by trigger day.
    pub async fn recurring_incomes(&self) -> Result<Vec<RecurringIncome>> {
        let mut incomes = self.recurring.list().await?;
        incomes.sort_by_key(|r| r.day_of_month);
        Ok(incomes)
    }

    /// Spawns one income transaction for every template that is due and
    /// stamps it as materialized for this month. Runs opportunistically
    /// before ledger reads; a month where the app is never opened gets no
    /// transaction, matching the on-open semantics of the check.
    pub async fn materialize_due(&self, now: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let mut spawned = Vec::new();
        for mut income in self.recurring.list().await? {
            if !income.is_due(now) {
                continue;
            }
            let tx = income.materialize(now);
            self.transactions.insert(&tx.id, &tx).await?;
            income.last_added = Some(now);
            self.recurring.insert(&income.id, &income).await?;
            info!(category = %income.category, amount = income.amount, "Recurring income materialized");
            spawned.push(tx);
        }
        Ok(spawned)
    }
}
