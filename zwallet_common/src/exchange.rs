//! Access to the exchange's public ticker endpoint.
//!
//! `ExchangeClient` is the seam between quote normalization and the network:
//! the CLI talks to `BitcoinTradePublic`, tests plug in canned payloads.
use log::debug;
use reqwest::blocking::Client;
use serde_json::Value;

use crate::error::WalletError;

/// Base URL of the BitcoinTrade REST API.
pub const BASE_URL: &str = "https://api.bitcointrade.com.br";
/// Path of the public BTC/BRL ticker, relative to the base URL.
pub const TICKER_PATH: &str = "/v3/public/BRLBTC/ticker";
/// `User-Agent` sent with every request.
pub const USER_AGENT: &str = concat!("zwallet/", env!("CARGO_PKG_VERSION"));

/// Raw decoded JSON body returned by the ticker endpoint.
pub type RawPayload = Value;

/// Source of raw ticker payloads.
pub trait ExchangeClient {
    /// Fetches the current ticker as raw decoded JSON.
    ///
    /// A single attempt is made. Network failures, non-success statuses and
    /// undecodable bodies are returned as errors.
    fn get_ticker(&self) -> Result<RawPayload, WalletError>;
}

/// Unauthenticated client for the BitcoinTrade public API.
pub struct BitcoinTradePublic {
    client: Client,
    base_url: String,
}

impl BitcoinTradePublic {
    /// Creates a client for the production API.
    pub fn new() -> Result<Self, WalletError> {
        Self::with_base_url(BASE_URL)
    }

    /// Creates a client targeting `base_url` (scheme and host, no trailing path).
    pub fn with_base_url(base_url: &str) -> Result<Self, WalletError> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the ticker endpoint.
    pub fn ticker_url(&self) -> String {
        format!("{}{}", self.base_url, TICKER_PATH)
    }
}

impl ExchangeClient for BitcoinTradePublic {
    fn get_ticker(&self) -> Result<RawPayload, WalletError> {
        let url = self.ticker_url();
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                debug!("Ticker request to {} failed: {}", url, e);
                WalletError::Http(e)
            })?;

        let body: Value = response.json()?;
        debug!("Ticker response: {}", body);
        Ok(body)
    }
}
