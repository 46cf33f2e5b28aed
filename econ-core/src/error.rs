//! Configuration errors.
//!
//! The only failures the core reports are invalid calibrations caught before
//! the first step. Once an economy exists, every agent procedure is total.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must lie in [0, 1], got {value}")]
    NotProbability { name: &'static str, value: f64 },

    #[error("{lower_name} ({lower}) must be below {upper_name} ({upper})")]
    InvertedBounds {
        lower_name: &'static str,
        lower: f64,
        upper_name: &'static str,
        upper: f64,
    },

    #[error("need at least {needed} market firms for {what}, got {got}")]
    TooFewFirms {
        what: &'static str,
        needed: usize,
        got: usize,
    },
}

/// Shorthand result type for fallible construction.
pub type EconResult<T> = Result<T, ConfigError>;
