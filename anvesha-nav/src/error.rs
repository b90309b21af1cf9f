//! Error types for Anvesha-Nav.

use thiserror::Error;

/// Anvesha-Nav error type.
///
/// Runtime degradation of the navigation engine (no clear path, stuck,
/// lost lock) is modeled as state, never as an error; these variants
/// cover the fallible setup surface only.
#[derive(Error, Debug)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
