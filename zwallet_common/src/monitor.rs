//! Target trade tracked by `zwallet monitor`.
//!
//! A `MonitorTarget` is computed once per session from the trade the user
//! paid for (BTC quantity bought at a USD price, with USD bought in BRL).
//! Each poll then values the same BTC at the exchange's last trade price
//! and reports the difference as a `Position`.
use log::info;
use serde::Serialize;

use crate::fee::compute_fee;
use crate::trend::Trend;

/// Session-wide target trade. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonitorTarget {
    /// BTC quantity being monitored.
    pub btc_quantity: f64,
    /// USD price of one BTC at purchase.
    pub usd_per_btc: f64,
    /// BRL price of one USD at purchase (the `--usdbrl` quote).
    pub usd_per_brl: f64,
    /// `btc_quantity * usd_per_btc`.
    pub target_usd_value: f64,
    /// `target_usd_value * usd_per_brl`.
    pub target_brl_value: f64,
    /// Fee to move `target_brl_value` into the exchange.
    pub transfer_fee: f64,
    /// `target_brl_value + transfer_fee`.
    pub target_brl_value_with_fee: f64,
}

/// Valuation of the monitored BTC at one poll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    /// `btc_quantity * last_trade`.
    pub current_brl_value: f64,
    /// `current_brl_value - target_brl_value`; negative means a loss.
    pub delta: f64,
    /// Direction of the current value relative to the target.
    pub trend: Trend,
}

impl MonitorTarget {
    /// Derives the target values for `btc_quantity` bought at `usd_per_btc`
    /// with dollars bought at `usd_per_brl`.
    pub fn new(btc_quantity: f64, usd_per_btc: f64, usd_per_brl: f64) -> Self {
        let target_usd_value = btc_quantity * usd_per_btc;
        let target_brl_value = target_usd_value * usd_per_brl;
        let transfer_fee = compute_fee(target_brl_value);
        let target = MonitorTarget {
            btc_quantity,
            usd_per_btc,
            usd_per_brl,
            target_usd_value,
            target_brl_value,
            transfer_fee,
            target_brl_value_with_fee: target_brl_value + transfer_fee,
        };
        info!(
            "Monitoring BTC {} (target R$ {:.2} + fee R$ {:.2})",
            btc_quantity, target.target_brl_value, target.transfer_fee
        );
        target
    }

    /// Values the monitored BTC at `last_trade` BRL.
    pub fn position(&self, last_trade: f64) -> Position {
        let current_brl_value = self.btc_quantity * last_trade;
        Position {
            current_brl_value,
            delta: current_brl_value - self.target_brl_value,
            trend: Trend::compare(current_brl_value, self.target_brl_value),
        }
    }
}
