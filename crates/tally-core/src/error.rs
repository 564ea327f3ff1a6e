//! Error types for Tally core.

use thiserror::Error;

use tally_engine::{FormatError, StoreError};

/// Errors that can occur in a Tally document
#[derive(Error, Debug)]
pub enum TallyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings parse error: {0}")]
    Settings(#[from] toml::de::Error),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Invalid formula: {0}")]
    Formula(#[from] FormatError),
}

pub type Result<T> = std::result::Result<T, TallyError>;
