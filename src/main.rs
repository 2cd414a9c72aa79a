use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use kasa::core::currency::Currency;
use kasa::core::log::init_logging;
use kasa::core::transaction::{DateFilter, TransactionDraft, TransactionKind};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for TransactionKind {
    fn from(kind: KindArg) -> TransactionKind {
        match kind {
            KindArg::Income => TransactionKind::Income,
            KindArg::Expense => TransactionKind::Expense,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display income, expense and balance totals
    Summary {
        /// Additional display currency
        #[arg(short = 'd', long)]
        currency: Option<Currency>,
    },
    /// Display per-category totals
    Breakdown {
        #[arg(short, long, value_enum, default_value = "expense")]
        kind: KindArg,
        /// Additional display currency
        #[arg(short = 'd', long)]
        currency: Option<Currency>,
    },
    /// Display current exchange rates
    Rates {
        /// Refresh every minute until interrupted
        #[arg(short, long)]
        watch: bool,
    },
    /// Record a transaction
    Add {
        /// Amount, decimal comma accepted
        amount: String,
        #[arg(short = 'g', long)]
        category: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short = 'u', long, default_value = "TRY")]
        currency: Currency,
        #[arg(short, long, value_enum, default_value = "expense")]
        kind: KindArg,
        /// Exchange rate at purchase time, required for savings
        #[arg(short, long)]
        purchase_rate: Option<String>,
    },
    /// List transactions
    List {
        /// all, this-week, this-month, last-3-months, last-6-months, this-year
        #[arg(short, long, default_value = "all")]
        period: DateFilter,
        #[arg(short = 'g', long)]
        category: Option<String>,
    },
    /// Delete a transaction by id
    Delete { id: String },
    /// Manage recurring incomes
    Recurring {
        #[command(subcommand)]
        command: RecurringCommands,
    },
}

#[derive(Subcommand)]
enum RecurringCommands {
    /// Save a recurring income template
    Add {
        amount: f64,
        #[arg(short = 'g', long)]
        category: String,
        #[arg(short = 'u', long, default_value = "TRY")]
        currency: Currency,
        /// Day of the month it becomes due (1-31)
        #[arg(short, long)]
        day: u32,
    },
    /// List recurring incomes
    List,
    /// Remove a recurring income by id
    Remove { id: String },
}

impl From<Commands> for kasa::AppCommand {
    fn from(cmd: Commands) -> kasa::AppCommand {
        match cmd {
            Commands::Summary { currency } => kasa::AppCommand::Summary { currency },
            Commands::Breakdown { kind, currency } => kasa::AppCommand::Breakdown {
                kind: kind.into(),
                currency,
            },
            Commands::Rates { watch } => kasa::AppCommand::Rates { watch },
            Commands::Add {
                amount,
                category,
                description,
                currency,
                kind,
                purchase_rate,
            } => kasa::AppCommand::Add(TransactionDraft {
                description,
                amount,
                category,
                currency,
                kind: kind.into(),
                purchase_rate,
            }),
            Commands::List { period, category } => kasa::AppCommand::List { period, category },
            Commands::Delete { id } => kasa::AppCommand::Delete { id },
            Commands::Recurring { command } => match command {
                RecurringCommands::Add {
                    amount,
                    category,
                    currency,
                    day,
                } => kasa::AppCommand::RecurringAdd {
                    amount,
                    category,
                    currency,
                    day,
                },
                RecurringCommands::List => kasa::AppCommand::RecurringList,
                RecurringCommands::Remove { id } => kasa::AppCommand::RecurringRemove { id },
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => kasa::cli::setup::setup(),
        Some(cmd) => kasa::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
