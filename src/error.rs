//! Error types for the jumpbox menu

use crate::config::ConfigError;
use thiserror::Error;

/// Result type alias for jumpbox operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the jumpbox menu
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Attaching menu {child} under menu {parent} would create a cycle")]
    Cycle { parent: usize, child: usize },

    #[error("Menu {child} is already attached under menu {parent}")]
    AlreadyAttached { parent: usize, child: usize },

    #[error("Menu {0} does not belong to this tree")]
    UnknownNode(usize),

    #[error("Menu {0} is already active")]
    AlreadyActive(usize),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode directory response: {0}")]
    Decode(#[from] serde_json::Error),
}
