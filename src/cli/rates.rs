use super::ui;
use crate::aggregator::RateAggregator;
use crate::core::rates::{BITCOIN, ETHEREUM, GOLD_GRAM, RIPPLE, RateTable, SILVER_GRAM};
use anyhow::{Result, bail};
use chrono::Local;
use comfy_table::{Cell, CellAlignment, Table};
use std::time::Duration;

const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Display order for the ticker. Rows whose code is absent from the table
/// are hidden rather than shown with a placeholder value.
const ROWS: &[(&str, &str)] = &[
    ("US Dollar", "USD"),
    ("Euro", "EUR"),
    ("Russian Ruble", "RUB"),
    ("Gold (gram)", GOLD_GRAM),
    ("Silver (gram)", SILVER_GRAM),
    ("Bitcoin", BITCOIN),
    ("Ethereum", ETHEREUM),
    ("Ripple", RIPPLE),
];

fn render(rates: &RateTable) -> Table {
    let base = rates.base();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Asset"),
        ui::header_cell(&format!("Rate ({})", base.code())),
    ]);

    for (label, code) in ROWS {
        if *code == base.code() {
            continue;
        }
        if let Some(rate) = rates.get(code) {
            table.add_row(vec![
                Cell::new(format!("{label} ({code})")),
                Cell::new(format!("{}{rate:.2}", base.symbol()))
                    .set_alignment(CellAlignment::Right),
            ]);
        }
    }
    table
}

pub async fn run(aggregator: &RateAggregator, watch: bool) -> Result<()> {
    loop {
        match super::fetch_rates(aggregator).await {
            Some(rates) => {
                println!(
                    "{}  {}\n\n{}",
                    ui::style_text("Exchange Rates", ui::StyleType::Title),
                    ui::style_text(
                        &Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                        ui::StyleType::Subtle,
                    ),
                    render(&rates)
                );
            }
            None if watch => {
                println!(
                    "{}",
                    ui::style_text("All rate sources failed, retrying", ui::StyleType::Error)
                );
            }
            None => bail!("All rate sources failed, no exchange rates available"),
        }

        if !watch {
            return Ok(());
        }
        tokio::time::sleep(REFRESH_INTERVAL).await;
        ui::print_separator();
    }
}
