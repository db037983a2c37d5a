//! Canonical quote record and the normalizer building it from raw payloads.
//!
//! The exchange answers with `{"data": {...}}`. `normalize` maps that body
//! into a `Quote`, converting the exchange timestamp to the local timezone.
//! A structurally valid response the normalizer cannot use (no `data`,
//! null prices, unparseable date) yields an error `Quote` rather than an
//! `Err`: the caller decides how to surface it.
use chrono::{DateTime, Local, NaiveDateTime};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::exchange::{ExchangeClient, RawPayload};
use crate::trend::Trend;

/// Message carried by an error quote when the exchange sent no data.
pub const NO_DATA_MESSAGE: &str = "No data from exchange BitcoinTrade";
/// Message carried by every successful quote.
pub const OK_MESSAGE: &str = "Ok";

/// Timestamp layouts accepted when the exchange omits the UTC offset.
/// Such timestamps are taken as UTC.
const NAIVE_DATE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Outcome of a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    /// The exchange returned usable quote data.
    Ok,
    /// The exchange response carried no usable data; see `Quote::message`.
    Error,
}

/// Market figures of an ok quote, exactly as sent by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    /// Best bid.
    pub buy: f64,
    /// Best ask.
    pub sell: f64,
    /// Last traded price.
    pub last: f64,
    /// Highest price of the last 24h.
    pub high: f64,
    /// Lowest price of the last 24h.
    pub low: f64,
    /// Traded BTC volume of the last 24h.
    pub volume: f64,
    /// Number of trades of the last 24h.
    pub trades_quantity: u64,
}

/// One point-in-time BTC/BRL market reading.
///
/// `prices` is `Some` exactly when `status` is `Ok`; build quotes through
/// [`Quote::ok`] and [`Quote::error`] to keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    /// Exchange timestamp (or poll time for error quotes) in local time.
    pub timestamp: DateTime<Local>,
    /// Whether the poll produced usable data.
    pub status: QuoteStatus,
    /// `"Ok"`, or a human-readable description of the failure.
    pub message: String,
    /// Market figures, present for ok quotes only.
    #[serde(flatten)]
    pub prices: Option<Prices>,
}

impl Quote {
    /// Builds a successful quote.
    pub fn ok(prices: Prices, timestamp: DateTime<Local>) -> Self {
        Quote {
            timestamp,
            status: QuoteStatus::Ok,
            message: OK_MESSAGE.to_string(),
            prices: Some(prices),
        }
    }

    /// Builds an error quote carrying `message`.
    pub fn error(message: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Quote {
            timestamp,
            status: QuoteStatus::Error,
            message: message.into(),
            prices: None,
        }
    }

    /// Returns `true` if the exchange reported no usable data.
    pub fn is_error(&self) -> bool {
        self.status == QuoteStatus::Error
    }

    /// The `(buy, sell, last)` triple compared from one poll to the next.
    pub fn reading(&self) -> Option<Reading> {
        self.prices.as_ref().map(Reading::from)
    }
}

/// Prices carried between polls to compute trends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Best bid.
    pub buy: f64,
    /// Best ask.
    pub sell: f64,
    /// Last traded price.
    pub last: f64,
}

impl From<&Prices> for Reading {
    fn from(prices: &Prices) -> Self {
        Reading {
            buy: prices.buy,
            sell: prices.sell,
            last: prices.last,
        }
    }
}

/// Per-field trends of a reading; `None` when there was no previous reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReadingTrends {
    /// Trend of the best bid.
    pub buy: Option<Trend>,
    /// Trend of the best ask.
    pub sell: Option<Trend>,
    /// Trend of the last traded price.
    pub last: Option<Trend>,
}

impl Reading {
    /// Compares this reading against the one from the previous poll.
    pub fn trends(&self, previous: Option<&Reading>) -> ReadingTrends {
        ReadingTrends {
            buy: Trend::since(self.buy, previous.map(|p| p.buy)),
            sell: Trend::since(self.sell, previous.map(|p| p.sell)),
            last: Trend::since(self.last, previous.map(|p| p.last)),
        }
    }
}

/// Normalizes a raw ticker payload, stamping error quotes with the current time.
pub fn normalize(raw: &RawPayload) -> Quote {
    normalize_at(raw, Local::now())
}

/// Normalizes a raw ticker payload; `now` stamps error quotes.
pub fn normalize_at(raw: &RawPayload, now: DateTime<Local>) -> Quote {
    let data = match raw.get("data") {
        Some(data) if !data.is_null() => data,
        _ => {
            info!("Ticker payload has no data: {}", raw);
            return Quote::error(NO_DATA_MESSAGE, now);
        }
    };

    let prices = match Prices::deserialize(data) {
        Ok(prices) => prices,
        Err(e) => {
            info!("Ticker data rejected: {}", e);
            return Quote::error(format!("Invalid quote data from exchange: {}", e), now);
        }
    };

    let timestamp = match data.get("date").and_then(|d| d.as_str()) {
        Some(raw_date) => match parse_exchange_date(raw_date) {
            Ok(timestamp) => timestamp,
            Err(e) => {
                info!("Ticker date {:?} rejected: {}", raw_date, e);
                return Quote::error(
                    format!("Invalid date from exchange: {:?} ({})", raw_date, e),
                    now,
                );
            }
        },
        None => {
            info!("Ticker data has no date");
            return Quote::error("Invalid date from exchange: missing", now);
        }
    };

    debug!(
        "Normalized quote: buy={} sell={} last={} at {}",
        prices.buy, prices.sell, prices.last, timestamp
    );
    Quote::ok(prices, timestamp)
}

/// Fetches the ticker through `client` and normalizes it.
///
/// Transport failures are returned as `Err`; everything else becomes a `Quote`.
pub fn fetch_quote<C: ExchangeClient + ?Sized>(client: &C) -> Result<Quote, WalletError> {
    let raw = client.get_ticker()?;
    Ok(normalize(&raw))
}

/// Parses an exchange timestamp into local time.
///
/// RFC 3339 is tried first; offset-less timestamps are read as UTC.
pub fn parse_exchange_date(raw: &str) -> Result<DateTime<Local>, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.with_timezone(&Local));
    }
    NaiveDateTime::parse_from_str(raw, NAIVE_DATE_FORMATS[0])
        .or_else(|_| NaiveDateTime::parse_from_str(raw, NAIVE_DATE_FORMATS[1]))
        .map(|naive| naive.and_utc().with_timezone(&Local))
}
