//! Framework error type.
//!
//! Sub-crates define their own error enums (`WorldError`, `ExecError`,
//! `PathfinderError`).  `VnError` covers what the core itself can fail at:
//! loading and validating configuration.

use thiserror::Error;

/// The top-level error type for `vn-core`.
#[derive(Debug, Error)]
pub enum VnError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `vn-core`.
pub type VnResult<T> = Result<T, VnError>;
