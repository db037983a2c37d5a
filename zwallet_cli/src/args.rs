//! Command-line arguments for `zwallet`.
//!
//! This module defines the CLI interface using `clap`. Every option can also be
//! supplied through a `ZWALLET_`-prefixed environment variable.
use clap::{Parser, Subcommand};
use zwallet_common::exchange::BASE_URL;

/// Lowest accepted `--sleep-interval`, in seconds.
pub const MIN_SLEEP_INTERVAL: u64 = 1;
/// Highest accepted `--sleep-interval`, in seconds.
pub const MAX_SLEEP_INTERVAL: u64 = 60;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "zwallet", version, about = "Track BTC/BRL quotes on BitcoinTrade", long_about = None)]
pub struct Args {
    /// Base URL of the BitcoinTrade API.
    #[arg(long, global = true, env = "ZWALLET_API_URL", default_value = BASE_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Track current BTC prices.
    Ticker(PollArgs),
    /// Track current BTC prices and calculate if you are making or losing money.
    Monitor(MonitorArgs),
}

/// Options shared by every polling subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct PollArgs {
    /// BTC quote is continuously checked.
    #[arg(short, long, env = "ZWALLET_FOLLOW")]
    pub follow: bool,

    /// With -f, sleep for approximately N seconds between iterations (clamped to 1..=60).
    #[arg(
        short,
        long,
        env = "ZWALLET_SLEEP_INTERVAL",
        default_value_t = MAX_SLEEP_INTERVAL,
        value_parser = parse_sleep_interval
    )]
    pub sleep_interval: u64,

    /// Print one JSON object per poll instead of the formatted ticker.
    #[arg(long, env = "ZWALLET_JSON")]
    pub json: bool,
}

/// Options of `zwallet monitor`. Missing values are prompted for.
#[derive(Debug, Clone, clap::Args)]
pub struct MonitorArgs {
    #[command(flatten)]
    pub poll: PollArgs,

    /// USD BRL quote.
    #[arg(long, env = "ZWALLET_USDBRL")]
    pub usdbrl: Option<f64>,

    /// USD BTC quote.
    #[arg(long, env = "ZWALLET_USDBTC")]
    pub usdbtc: Option<f64>,

    /// BTC quantity to monitor.
    #[arg(long, env = "ZWALLET_BTC")]
    pub btc: Option<f64>,
}

/// Parses a sleep interval, clamping it into the accepted range.
fn parse_sleep_interval(raw: &str) -> Result<u64, String> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{:?} is not a valid integer", raw))?;
    Ok(value.clamp(MIN_SLEEP_INTERVAL as i64, MAX_SLEEP_INTERVAL as i64) as u64)
}
