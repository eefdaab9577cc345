//! Loadable configuration for travtune's auto-tuning engine.
//!
//! Load the allowed option sets and tuning parameters from TOML or YAML so
//! the search space and tuning thresholds can be changed without a
//! recompile.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use travtune_config::TuningConfig;
//!
//! let config = TuningConfig::from_toml_str(r#"
//!     containers = ["linked_cells", "direct_sum"]
//!     cell_size_factors = [1.0]
//!     traversals = ["c08", "c01", "direct_sum_traversal"]
//!     data_layouts = ["ao_s", "so_a"]
//!     newton3_options = ["enabled", "disabled"]
//!
//!     [tuning]
//!     relative_optimum_range = 1.2
//!     max_phases_without_test = 5
//! "#).unwrap();
//!
//! assert_eq!(config.tuning.relative_optimum_range, 1.2);
//! ```
//!
//! Use defaults when the file is missing:
//!
//! ```
//! use travtune_config::TuningConfig;
//!
//! let config = TuningConfig::load("tuning.toml").unwrap_or_default();
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use travtune_core::{CellSizeFactor, Container, DataLayout, Newton3Option, TraversalKind};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// The relative optimum range (`R`) and staleness threshold (`S`) that
/// drive active-set derivation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TuningParameters {
    /// Admission threshold for predicted near-optimal candidates.
    #[serde(default = "TuningParameters::default_relative_optimum_range")]
    pub relative_optimum_range: f64,

    /// Forces re-measurement of candidates unseen for this many phases.
    #[serde(default = "TuningParameters::default_max_phases_without_test")]
    pub max_phases_without_test: u32,
}

impl TuningParameters {
    fn default_relative_optimum_range() -> f64 {
        1.2
    }

    fn default_max_phases_without_test() -> u32 {
        5
    }
}

impl Default for TuningParameters {
    fn default() -> Self {
        Self {
            relative_optimum_range: Self::default_relative_optimum_range(),
            max_phases_without_test: Self::default_max_phases_without_test(),
        }
    }
}

/// The allowed option sets and tuning parameters that seed a tuning
/// session.
///
/// Constructed either in code via the builder methods or loaded from a
/// TOML/YAML document.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TuningConfig {
    /// Allowed containers.
    #[serde(default)]
    pub containers: Vec<Container>,

    /// Allowed cell-size factors.
    #[serde(default)]
    pub cell_size_factors: Vec<CellSizeFactor>,

    /// Allowed traversals (pruned per-container by the capability oracle).
    #[serde(default)]
    pub traversals: Vec<TraversalKind>,

    /// Allowed data layouts.
    #[serde(default)]
    pub data_layouts: Vec<DataLayout>,

    /// Allowed newton3 options.
    #[serde(default)]
    pub newton3_options: Vec<Newton3Option>,

    /// Tuning thresholds (`R` and `S`).
    #[serde(default)]
    pub tuning: TuningParameters,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            containers: vec![Container::LinkedCells, Container::DirectSum],
            cell_size_factors: vec![CellSizeFactor::new(1.0).expect("1.0 is a valid factor")],
            traversals: vec![
                TraversalKind::C08,
                TraversalKind::C01,
                TraversalKind::DirectSumTraversal,
            ],
            data_layouts: vec![DataLayout::AoS, DataLayout::SoA],
            newton3_options: vec![Newton3Option::Enabled, Newton3Option::Disabled],
            tuning: TuningParameters::default(),
        }
    }
}

impl TuningConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file doesn't exist or contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the relative optimum range (`R`).
    pub fn with_relative_optimum_range(mut self, r: f64) -> Self {
        self.tuning.relative_optimum_range = r;
        self
    }

    /// Sets the max-phases-without-test staleness threshold (`S`).
    pub fn with_max_phases_without_test(mut self, s: u32) -> Self {
        self.tuning.max_phases_without_test = s;
        self
    }

    /// Adds an allowed container.
    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    /// Adds an allowed cell-size factor.
    pub fn with_cell_size_factor(mut self, factor: CellSizeFactor) -> Self {
        self.cell_size_factors.push(factor);
        self
    }

    /// Adds an allowed traversal.
    pub fn with_traversal(mut self, traversal: TraversalKind) -> Self {
        self.traversals.push(traversal);
        self
    }

    /// Adds an allowed data layout.
    pub fn with_data_layout(mut self, layout: DataLayout) -> Self {
        self.data_layouts.push(layout);
        self
    }

    /// Adds an allowed newton3 option.
    pub fn with_newton3_option(mut self, option: Newton3Option) -> Self {
        self.newton3_options.push(option);
        self
    }

    /// Validates that every option set is non-empty and the tuning
    /// parameters are in a sane range.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.containers.is_empty() {
            return Err(ConfigError::Invalid("containers must not be empty".into()));
        }
        if self.cell_size_factors.is_empty() {
            return Err(ConfigError::Invalid(
                "cell_size_factors must not be empty".into(),
            ));
        }
        if self.traversals.is_empty() {
            return Err(ConfigError::Invalid("traversals must not be empty".into()));
        }
        if self.data_layouts.is_empty() {
            return Err(ConfigError::Invalid(
                "data_layouts must not be empty".into(),
            ));
        }
        if self.newton3_options.is_empty() {
            return Err(ConfigError::Invalid(
                "newton3_options must not be empty".into(),
            ));
        }
        if self.tuning.relative_optimum_range < 1.0 {
            return Err(ConfigError::Invalid(
                "relative_optimum_range must be at least 1.0".into(),
            ));
        }
        Ok(())
    }
}
