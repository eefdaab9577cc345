//! travtune Tuning - the auto-tuning engine
//!
//! Drives one tuning phase at a time: yields the next configuration to
//! measure, accepts measurements, selects the phase-optimum, and responds
//! to structural events (newton3-option invalidation, explicit reset).
//!
//! The [`TuningController`] is the single entry point a host embeds; the
//! [`EvidenceStore`] and [`Predictor`]/[`active_set`] machinery it is built
//! from are exposed for hosts that want to drive the state machine
//! themselves or plug in a different prediction strategy.

pub mod builder;
pub mod controller;
pub mod evidence;
pub mod predictor;

pub use builder::build_search_space;
pub use controller::TuningController;
pub use evidence::{Evidence, EvidenceStore};
pub use predictor::{active_set, ActiveSetParams, LinearExtrapolationPredictor, Predictor};

pub use travtune_core::{
    AutoTuneError, CapabilityOracle, CellSizeFactor, Configuration, Container, DataLayout,
    DefaultCapabilityOracle, Newton3Option, SearchSpace, TraversalKind,
};
