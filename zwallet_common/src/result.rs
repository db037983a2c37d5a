//! Result type alias shared across the workspace.
//!
//! This module defines a convenient alias that defaults the error type to the
//! common `WalletError`, so functions can simply return `Result<T>`.
use crate::error::WalletError;

/// Workspace-wide `Result` alias with `WalletError` as the default error.
pub type Result<T, E = WalletError> = std::result::Result<T, E>;
