pub mod coincap;
pub mod coingecko;
pub mod frankfurter;
pub mod goldprice;
pub mod open_er;

pub use coincap::CoinCapSource;
pub use coingecko::CoinGeckoSource;
pub use frankfurter::FrankfurterSource;
pub use goldprice::GoldPriceSource;
pub use open_er::OpenErApiSource;
