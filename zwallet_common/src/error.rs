//! Error types shared between the library and the CLI.
//!
//! The `WalletError` enum unifies transport, decoding, I/O and interactive
//! input failures, allowing both crates to propagate a single error type.
//! A structurally valid exchange response without quote data is not an error
//! here: it becomes an error `Quote` (see `quote::normalize`).
use std::io;

use thiserror::Error;

/// Unified error type shared by the library and the CLI.
#[derive(Error, Debug)]
pub enum WalletError {
    /// Transport failure talking to the exchange: connection, non-success
    /// HTTP status or an unreadable body.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// I/O error originating from the terminal or the standard streams.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Interactive input was closed or could not be read.
    #[error("Prompt error: {0}")]
    Prompt(String),
}
