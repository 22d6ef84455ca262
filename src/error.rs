//! Error handling for the cohort generator.

use polars::prelude::PolarsError;
use std::io;
use thiserror::Error;

/// Everything that can go wrong while generating or exporting a cohort.
/// None of these are recoverable; the binary reports them and exits.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// A distribution was asked for with parameters outside its domain
    #[error("invalid parameter for {distribution}: {reason}")]
    InvalidParameter {
        distribution: &'static str,
        reason: String,
    },
    /// Offsetting the base date left the representable calendar
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
    #[error("table error: {0}")]
    Table(#[from] PolarsError),
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse generator configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl GenerateError {
    pub(crate) fn invalid(distribution: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            distribution,
            reason: reason.into(),
        }
    }
}

/// Result type for cohort generation
pub type Result<T> = std::result::Result<T, GenerateError>;
