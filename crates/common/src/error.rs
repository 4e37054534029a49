//! Startup error types
//!
//! Everything in here is fatal: a missing account or proxy file, or a
//! config file that does not parse, stops the process before the first round.

use std::path::PathBuf;

use thiserror::Error;

/// Startup/configuration error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;
