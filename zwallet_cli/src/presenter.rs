//! Console rendering of quotes and monitor positions.
//!
//! Colors and screen clearing only apply when the output is an interactive
//! terminal; otherwise the presenter writes plain text. Exchange error
//! messages go to a separate writer (stderr in the binary).
use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Stylize};
use crossterm::terminal::{Clear, ClearType};
use serde::Serialize;
use zwallet_common::Result;
use zwallet_common::format::CurrencyFormat;
use zwallet_common::monitor::{MonitorTarget, Position};
use zwallet_common::quote::{Quote, ReadingTrends};
use zwallet_common::trend::Trend;

/// Layout of the timestamp in the ticker header.
const HEADER_DATE_FORMAT: &str = "%b %d %Y %H:%M:%S";

/// One poll as written by `--json`.
#[derive(Serialize)]
struct Snapshot<'a> {
    quote: &'a Quote,
    trends: &'a ReadingTrends,
    target: Option<&'a MonitorTarget>,
    position: Option<&'a Position>,
}

/// Writes ticker and monitor blocks to `out`, exchange errors to `errors`.
pub struct Presenter<W: Write, E: Write> {
    out: W,
    errors: E,
    currency: CurrencyFormat,
    interactive: bool,
}

impl<W: Write, E: Write> Presenter<W, E> {
    /// Creates a presenter. `interactive` enables colors and screen clearing.
    pub fn new(out: W, errors: E, currency: CurrencyFormat, interactive: bool) -> Self {
        Self {
            out,
            errors,
            currency,
            interactive,
        }
    }

    /// Clears the terminal before the next snapshot in follow mode.
    pub fn clear(&mut self) -> Result<()> {
        if self.interactive {
            queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
            self.out.flush()?;
        }
        Ok(())
    }

    /// Renders the ticker block. Error quotes print their message to the
    /// error writer instead of prices.
    pub fn ticker(&mut self, quote: &Quote, trends: &ReadingTrends) -> Result<()> {
        writeln!(
            self.out,
            "BitcoinTrade Quotes - {}",
            quote.timestamp.format(HEADER_DATE_FORMAT)
        )?;
        writeln!(self.out)?;

        let Some(prices) = quote.prices.as_ref() else {
            self.flush()?;
            if self.interactive {
                writeln!(self.errors, "{}", quote.message.as_str().with(Color::Red))?;
            } else {
                writeln!(self.errors, "{}", quote.message)?;
            }
            self.errors.flush()?;
            return Ok(());
        };

        let sell = format!(
            "Venda:  {} {}",
            self.currency.format(prices.sell),
            arrow(trends.sell)
        );
        let last = format!(
            "Último: {} {}",
            self.currency.format(prices.last),
            arrow(trends.last)
        );
        let buy = format!(
            "Compra: {} {}",
            self.currency.format(prices.buy),
            arrow(trends.buy)
        );
        self.line(&sell, Some(Color::Green))?;
        self.line(&last, None)?;
        self.line(&buy, Some(Color::Red))?;
        self.flush()
    }

    /// Renders the profit/loss block for `target` valued at `position`.
    pub fn monitor(&mut self, target: &MonitorTarget, position: &Position) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "BTC Payment:  BTC {}", target.btc_quantity)?;
        writeln!(
            self.out,
            "USD Payment:  US$ {}",
            self.currency.format_amount(target.target_usd_value)
        )?;
        writeln!(
            self.out,
            "BRL Target Payment:  {} ({} + {})",
            self.currency.format(target.target_brl_value_with_fee),
            self.currency.format(target.target_brl_value),
            self.currency.format(target.transfer_fee)
        )?;
        writeln!(
            self.out,
            "BRL Current Payment: {}",
            self.currency.format(position.current_brl_value)
        )?;

        let delta = format!(
            "BRL Delta:           {} {}",
            self.currency.format(position.delta),
            position.trend
        );
        let color = if position.delta < 0.0 {
            Color::Red
        } else {
            Color::Green
        };
        self.line(&delta, Some(color))?;
        self.flush()
    }

    /// Writes one poll as a single JSON line.
    pub fn json(
        &mut self,
        quote: &Quote,
        trends: &ReadingTrends,
        target: Option<&MonitorTarget>,
        position: Option<&Position>,
    ) -> Result<()> {
        let snapshot = Snapshot {
            quote,
            trends,
            target,
            position,
        };
        writeln!(self.out, "{}", serde_json::to_string(&snapshot)?)?;
        self.flush()
    }

    /// Returns the output and error writers.
    #[cfg(test)]
    pub fn into_parts(self) -> (W, E) {
        (self.out, self.errors)
    }

    fn line(&mut self, text: &str, color: Option<Color>) -> Result<()> {
        match color {
            Some(color) if self.interactive => writeln!(self.out, "{}", text.with(color))?,
            _ => writeln!(self.out, "{}", text)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Arrow for `trend`, or a blank when there is no previous reading.
fn arrow(trend: Option<Trend>) -> String {
    trend.map(|t| t.to_string()).unwrap_or_else(|| " ".to_string())
}
