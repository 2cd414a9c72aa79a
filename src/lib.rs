pub mod aggregator;
pub mod cli;
pub mod core;
pub mod ledger;
pub mod providers;
pub mod store;

use crate::aggregator::RateAggregator;
use crate::core::config::AppConfig;
use crate::core::currency::Currency;
use crate::core::recurring::RecurringIncome;
use crate::core::transaction::{DateFilter, Transaction, TransactionDraft, TransactionKind};
use crate::ledger::Ledger;
use crate::providers::{
    CoinCapSource, CoinGeckoSource, FrankfurterSource, GoldPriceSource, OpenErApiSource,
};
use crate::store::Store;
use anyhow::Result;
use chrono::Utc;
use tracing::{debug, info};

/// A fully parsed command, decoupled from the clap surface so the library
/// can be driven from integration tests.
pub enum AppCommand {
    Summary {
        currency: Option<Currency>,
    },
    Breakdown {
        kind: TransactionKind,
        currency: Option<Currency>,
    },
    Rates {
        watch: bool,
    },
    Add(TransactionDraft),
    List {
        period: DateFilter,
        category: Option<String>,
    },
    Delete {
        id: String,
    },
    RecurringAdd {
        amount: f64,
        category: String,
        currency: Currency,
        day: u32,
    },
    RecurringList,
    RecurringRemove {
        id: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Kasa starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let store = Store::open(&config.data_path()?)?;
    let ledger = Ledger::new(
        store.collection::<Transaction>("transactions")?,
        store.collection::<RecurringIncome>("recurring_incomes")?,
    );

    // Recurring incomes materialize on open, before any read or write.
    let spawned = ledger.materialize_due(Utc::now()).await?;
    for tx in &spawned {
        println!(
            "Added recurring income: {} {}{:.2}",
            tx.description,
            tx.currency.symbol(),
            tx.amount
        );
    }

    let aggregator = build_aggregator(&config);

    match command {
        AppCommand::Summary { currency } => {
            cli::summary::run(&ledger, &aggregator, currency).await
        }
        AppCommand::Breakdown { kind, currency } => {
            cli::breakdown::run(&ledger, &aggregator, kind, currency).await
        }
        AppCommand::Rates { watch } => cli::rates::run(&aggregator, watch).await,
        AppCommand::Add(draft) => cli::transactions::add(&ledger, draft).await,
        AppCommand::List { period, category } => {
            cli::transactions::list(&ledger, period, category.as_deref()).await
        }
        AppCommand::Delete { id } => cli::transactions::delete(&ledger, &id).await,
        AppCommand::RecurringAdd {
            amount,
            category,
            currency,
            day,
        } => cli::recurring::add(&ledger, amount, category, currency, day).await,
        AppCommand::RecurringList => cli::recurring::list(&ledger).await,
        AppCommand::RecurringRemove { id } => cli::recurring::remove(&ledger, &id).await,
    }
}

/// Wires the provider fallback chains: Frankfurter then open.er-api for
/// fiat, open.er-api again for the dedicated RUB call, goldprice for
/// metals, CoinGecko (quoting in the base currency) then CoinCap for
/// crypto.
fn build_aggregator(config: &AppConfig) -> RateAggregator {
    let providers = &config.providers;
    let frankfurter = providers
        .frankfurter
        .as_ref()
        .map_or("https://api.frankfurter.app", |p| &p.base_url);
    let er_api = providers
        .er_api
        .as_ref()
        .map_or("https://open.er-api.com", |p| &p.base_url);
    let goldprice = providers
        .goldprice
        .as_ref()
        .map_or("https://data-asg.goldprice.org", |p| &p.base_url);
    let coingecko = providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com", |p| &p.base_url);
    let coincap = providers
        .coincap
        .as_ref()
        .map_or("https://api.coincap.io", |p| &p.base_url);

    RateAggregator::new(
        config.currency,
        vec![
            Box::new(FrankfurterSource::new(frankfurter)),
            Box::new(OpenErApiSource::new(er_api)),
        ],
        vec![Box::new(OpenErApiSource::new(er_api))],
        vec![Box::new(GoldPriceSource::new(goldprice))],
        vec![
            Box::new(CoinGeckoSource::new(coingecko, config.currency.code())),
            Box::new(CoinCapSource::new(coincap)),
        ],
    )
}
