//! zwallet: a BTC/BRL ticker for the BitcoinTrade exchange.
//!
//! `ticker` prints the current buy/sell/last prices with an arrow showing how
//! each moved since the previous poll. `monitor` additionally values a BTC
//! quantity bought at a known USD price against the exchange's last trade.
//!
//! Usage example (CLI):
//! ```bash
//! zwallet ticker --follow --sleep-interval 10
//! zwallet monitor --usdbrl 5.10 --usdbtc 20000 --btc 0.5
//! ```
//!
//! Exit codes: `0` on success, `1` when the exchange answers without quote
//! data, `2` on transport, I/O or input errors, `130` after Ctrl+C.
#![warn(missing_docs)]
mod args;
mod presenter;
mod prompt;
mod session;

use crate::args::{Args, Command, MonitorArgs};
use crate::presenter::Presenter;
use crate::prompt::value_or_prompt;
use crate::session::{INTERRUPTED_EXIT_CODE, Interrupt, Outcome, SessionOptions};
use clap::Parser;
use log::{error, info, warn};
use std::io::{self, IsTerminal};
use std::process::{self, ExitCode};
use std::sync::Arc;
use zwallet_common::Result;
use zwallet_common::exchange::BitcoinTradePublic;
use zwallet_common::format::CurrencyFormat;
use zwallet_common::monitor::MonitorTarget;

/// Exit code for failures other than an exchange error payload.
const FAILURE_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();
    let interrupt = Arc::new(Interrupt::new());
    {
        let interrupt = interrupt.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Stopping...");
            if !interrupt.request() {
                process::exit(INTERRUPTED_EXIT_CODE.into());
            }
        }) {
            warn!("Failed to install Ctrl+C handler: {}", e);
        }
    }

    match run(args, &interrupt) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            error!("{}", e);
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

fn run(args: Args, interrupt: &Interrupt) -> Result<Outcome> {
    let client = BitcoinTradePublic::with_base_url(&args.api_url)?;
    info!("Using ticker endpoint {}", client.ticker_url());

    let (poll, target) = match args.command {
        Command::Ticker(poll) => (poll, None),
        Command::Monitor(monitor) => {
            let target = monitor_target(&monitor)?;
            (monitor.poll, Some(target))
        }
    };

    let stdout = io::stdout();
    let interactive = stdout.is_terminal();
    let mut presenter = Presenter::new(
        stdout.lock(),
        io::stderr(),
        CurrencyFormat::brl(),
        interactive,
    );
    session::run(
        &client,
        &mut presenter,
        target.as_ref(),
        &SessionOptions::from(&poll),
        interrupt,
    )
}

/// Builds the session target, prompting for options not given on the command line.
fn monitor_target(monitor: &MonitorArgs) -> Result<MonitorTarget> {
    let mut input = io::stdin().lock();
    let mut output = io::stdout();
    let usdbrl = value_or_prompt(monitor.usdbrl, "USD BRL quote", &mut input, &mut output)?;
    let usdbtc = value_or_prompt(monitor.usdbtc, "USD BTC quote", &mut input, &mut output)?;
    let btc = value_or_prompt(monitor.btc, "BTC quantity", &mut input, &mut output)?;
    Ok(MonitorTarget::new(btc, usdbtc, usdbrl))
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();
}
