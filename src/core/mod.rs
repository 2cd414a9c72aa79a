//! Core business logic: data model, rates, and aggregation math

pub mod analytics;
pub mod config;
pub mod currency;
pub mod log;
pub mod rates;
pub mod recurring;
pub mod transaction;

// Re-export main types for cleaner imports
pub use currency::Currency;
pub use rates::{CryptoSource, FiatSource, MetalSource, RateTable};
pub use recurring::RecurringIncome;
pub use transaction::{DateFilter, Transaction, TransactionDraft, TransactionKind};
