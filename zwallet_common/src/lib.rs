//!
//! Quote fetching and trade arithmetic for the `zwallet` BTC/BRL ticker.
//!
//! This crate aggregates:
//! - `error`: unified error type `WalletError` used across the workspace.
//! - `result`: handy `Result<T, WalletError>` alias.
//! - `exchange`: the `ExchangeClient` trait and the BitcoinTrade public API client.
//! - `quote`: the `Quote` record and the normalizer turning raw payloads into it.
//! - `trend`: up/down/equal classification between two readings.
//! - `fee`: BitcoinTrade transfer fee schedule.
//! - `monitor`: session target trade and its profit/loss position.
//! - `format`: explicit currency formatting configuration.
#![warn(missing_docs)]
pub mod error;
pub mod exchange;
pub mod fee;
pub mod format;
pub mod monitor;
pub mod quote;
pub mod result;
pub mod trend;

pub use error::WalletError;
pub use exchange::{BitcoinTradePublic, ExchangeClient};
pub use quote::{Quote, QuoteStatus, Reading};
pub use result::Result;
pub use trend::Trend;
