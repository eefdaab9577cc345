//! The `Configuration` value type and its component enumerations.

use std::fmt;

use crate::error::{AutoTuneError, Result};

/// Particle container strategies a traversal can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Container {
    DirectSum,
    LinkedCells,
    VerletLists,
    VerletListsCells,
    VerletClusterLists,
    PairwiseVerletLists,
    Octree,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Pairwise-interaction traversal algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraversalKind {
    DirectSumTraversal,
    C01,
    C04,
    C08,
    C18,
    Sliced,
    SlicedC02,
    VerletTraversal,
    VerletClusterCells,
    OctreeDfs,
}

impl fmt::Display for TraversalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Particle data layout used by a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DataLayout {
    AoS,
    SoA,
}

impl fmt::Display for DataLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Whether the traversal exploits Newton's third law to halve force
/// computations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Newton3Option {
    Disabled,
    Enabled,
}

impl fmt::Display for Newton3Option {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A positive, finite cell-size factor.
///
/// Restricted to finite, positive values so that bit-pattern ordering
/// (used for `Eq`/`Hash`/`Ord`) coincides with numeric ordering.
#[derive(Debug, Clone, Copy)]
pub struct CellSizeFactor(f64);

impl CellSizeFactor {
    /// Builds a `CellSizeFactor`, rejecting non-finite or non-positive values.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value <= 0.0 {
            return Err(AutoTuneError::InvalidCellSizeFactor(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for CellSizeFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for CellSizeFactor {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for CellSizeFactor {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        CellSizeFactor::new(value).map_err(serde::de::Error::custom)
    }
}

impl PartialEq for CellSizeFactor {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for CellSizeFactor {}

impl std::hash::Hash for CellSizeFactor {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for CellSizeFactor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellSizeFactor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.to_bits().cmp(&other.0.to_bits())
    }
}

/// A single point in the tuning search space: container, cell-size factor,
/// traversal, data layout, and newton3 option.
///
/// Value-equal, hashable, and totally orderable by lexicographic tuple
/// order on the field declaration order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Configuration {
    pub container: Container,
    pub cell_size_factor: CellSizeFactor,
    pub traversal: TraversalKind,
    pub data_layout: DataLayout,
    pub newton3: Newton3Option,
}

impl Configuration {
    pub fn new(
        container: Container,
        cell_size_factor: CellSizeFactor,
        traversal: TraversalKind,
        data_layout: DataLayout,
        newton3: Newton3Option,
    ) -> Self {
        Self {
            container,
            cell_size_factor,
            traversal,
            data_layout,
            newton3,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.container, self.cell_size_factor, self.traversal, self.data_layout, self.newton3
        )
    }
}
