//! The ordered, shrink-only set of candidate configurations.

use crate::configuration::{Configuration, Newton3Option};
use crate::error::{AutoTuneError, Result};

/// An ordered set of configurations.
///
/// Populated once at construction and thereafter only shrunk, by
/// [`SearchSpace::remove_newton3_option`]. Iteration order is the total
/// order on [`Configuration`].
#[derive(Debug, Clone)]
pub struct SearchSpace {
    configurations: Vec<Configuration>,
}

impl SearchSpace {
    /// Builds a search space from an arbitrary configuration iterator.
    ///
    /// Sorts and deduplicates. Fails with [`AutoTuneError::NoValidConfigurations`]
    /// if the result is empty.
    pub fn from_configurations<I>(configs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Configuration>,
    {
        let mut configurations: Vec<Configuration> = configs.into_iter().collect();
        configurations.sort();
        configurations.dedup();
        if configurations.is_empty() {
            return Err(AutoTuneError::NoValidConfigurations);
        }
        Ok(Self { configurations })
    }

    /// Number of configurations currently in the space.
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    /// True if the space has no configurations (should not occur: the space
    /// is rejected at construction and never allowed to shrink to empty).
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// True if the space has exactly one element.
    pub fn is_trivial(&self) -> bool {
        self.configurations.len() == 1
    }

    /// Whether `config` is a member of this space.
    pub fn contains(&self, config: &Configuration) -> bool {
        self.configurations.binary_search(config).is_ok()
    }

    /// Index of `config` in the total order, if present.
    pub fn position(&self, config: &Configuration) -> Option<usize> {
        self.configurations.binary_search(config).ok()
    }

    /// Configuration at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Configuration> {
        self.configurations.get(index)
    }

    /// Iterates configurations in total order.
    pub fn iter(&self) -> impl Iterator<Item = &Configuration> {
        self.configurations.iter()
    }

    /// Removes every configuration whose newton3 field equals `option`.
    ///
    /// Fails with [`AutoTuneError::EmptyAfterInvalidation`] if this empties
    /// the space. Returns the removed configurations (in their prior order)
    /// on success.
    pub fn remove_newton3_option(
        &mut self,
        option: Newton3Option,
    ) -> Result<Vec<Configuration>> {
        let (kept, removed): (Vec<_>, Vec<_>) = self
            .configurations
            .drain(..)
            .partition(|c| c.newton3 != option);
        self.configurations = kept;
        if self.configurations.is_empty() {
            return Err(AutoTuneError::EmptyAfterInvalidation(option));
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{CellSizeFactor, Container, DataLayout, TraversalKind};

    fn config(newton3: Newton3Option) -> Configuration {
        Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C08,
            DataLayout::AoS,
            newton3,
        )
    }

    #[test]
    fn empty_iterator_is_rejected() {
        let result = SearchSpace::from_configurations(std::iter::empty());
        assert!(matches!(result, Err(AutoTuneError::NoValidConfigurations)));
    }

    #[test]
    fn construction_is_idempotent() {
        let configs = vec![config(Newton3Option::Enabled), config(Newton3Option::Disabled)];
        let a = SearchSpace::from_configurations(configs.clone()).unwrap();
        let b = SearchSpace::from_configurations(configs).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn removing_the_only_option_in_use_empties_the_space() {
        let mut space =
            SearchSpace::from_configurations(vec![config(Newton3Option::Enabled)]).unwrap();
        let result = space.remove_newton3_option(Newton3Option::Enabled);
        assert!(matches!(result, Err(AutoTuneError::EmptyAfterInvalidation(_))));
    }

    #[test]
    fn removing_one_option_keeps_the_other() {
        let mut space = SearchSpace::from_configurations(vec![
            config(Newton3Option::Enabled),
            config(Newton3Option::Disabled),
        ])
        .unwrap();
        let removed = space.remove_newton3_option(Newton3Option::Disabled).unwrap();
        assert_eq!(removed.len(), 1);
        assert_eq!(space.len(), 1);
        assert!(space.iter().all(|c| c.newton3 == Newton3Option::Enabled));
    }
}
