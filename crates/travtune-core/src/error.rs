//! Error types for the auto-tuning engine

use thiserror::Error;

use crate::configuration::{Configuration, Newton3Option};

/// Main error type for travtune operations.
///
/// Every variant is fatal: the tuning engine does not attempt recovery or
/// retry, it surfaces the triggering parameter and lets the host decide.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AutoTuneError {
    /// Search-space construction produced an empty set.
    #[error("no valid configurations: allowed option sets produced an empty search space")]
    NoValidConfigurations,

    /// Evidence was reported for a configuration outside the search space.
    #[error("unknown configuration: {0:?} is not a member of the search space")]
    UnknownConfiguration(Configuration),

    /// The active candidate set for a phase is empty.
    #[error("no candidates: active set is empty at phase start")]
    NoCandidates,

    /// A phase ended without any evidence having been recorded.
    #[error("no measurements: phase ended without any recorded evidence")]
    NoMeasurements,

    /// `removeN3Option` emptied the search space.
    #[error("search space emptied after invalidating newton3 option {0:?}")]
    EmptyAfterInvalidation(Newton3Option),

    /// A reported cost could not be interpreted as a non-negative measurement.
    #[error("negative or non-finite cost reported: {0}")]
    NegativeCost(String),

    /// A cell-size factor outside the valid domain (positive, finite) was supplied.
    #[error("invalid cell-size factor: {0}")]
    InvalidCellSizeFactor(f64),
}

/// Result type alias for travtune operations.
pub type Result<T> = std::result::Result<T, AutoTuneError>;
