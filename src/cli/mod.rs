pub mod breakdown;
pub mod rates;
pub mod recurring;
pub mod setup;
pub mod summary;
pub mod transactions;
pub mod ui;

use crate::aggregator::RateAggregator;
use crate::core::rates::RateTable;

/// Fetches a fresh rate table with a spinner on the terminal.
pub async fn fetch_rates(aggregator: &RateAggregator) -> Option<RateTable> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let table = aggregator.fetch().await;
    spinner.finish_and_clear();
    table
}

/// A rate table to run conversions against even when every source failed:
/// only base-currency amounts convert, everything else is skipped.
pub async fn fetch_rates_or_base(aggregator: &RateAggregator) -> RateTable {
    match fetch_rates(aggregator).await {
        Some(table) => table,
        None => {
            println!(
                "{}",
                ui::style_text(
                    "Exchange rates unavailable, amounts in other currencies are skipped",
                    ui::StyleType::Error,
                )
            );
            RateTable::new(aggregator.base())
        }
    }
}
