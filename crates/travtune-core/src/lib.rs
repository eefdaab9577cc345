//! travtune Core - data model for the auto-tuning engine
//!
//! This crate provides the fundamental abstractions reused by the rest of
//! the workspace:
//! - [`Configuration`] and its component enumerations
//! - [`SearchSpace`], the ordered, shrink-only set of candidates
//! - [`CapabilityOracle`], the container/traversal compatibility table
//! - the shared error taxonomy

pub mod capability;
pub mod configuration;
pub mod error;
pub mod search_space;

pub use capability::{CapabilityOracle, DefaultCapabilityOracle};
pub use configuration::{
    CellSizeFactor, Configuration, Container, DataLayout, Newton3Option, TraversalKind,
};
pub use error::AutoTuneError;
pub use search_space::SearchSpace;
