//! Search-Space Builder: Cartesian product of allowed options, pruned by
//! the capability oracle.

use travtune_config::TuningConfig;
use travtune_core::{AutoTuneError, CapabilityOracle, Configuration, SearchSpace};

/// Builds a [`SearchSpace`] from allowed options, pruning traversals the
/// capability oracle does not support for a given container.
pub fn build_search_space(
    config: &TuningConfig,
    oracle: &impl CapabilityOracle,
) -> std::result::Result<SearchSpace, AutoTuneError> {
    let mut configurations = Vec::new();

    for &container in &config.containers {
        let compatible = oracle.compatible_traversals(container);
        let allowed_traversals = config.traversals.iter().copied().filter(|t| compatible.contains(t));

        for traversal in allowed_traversals {
            for &cell_size_factor in &config.cell_size_factors {
                for &data_layout in &config.data_layouts {
                    for &newton3 in &config.newton3_options {
                        configurations.push(Configuration::new(
                            container,
                            cell_size_factor,
                            traversal,
                            data_layout,
                            newton3,
                        ));
                    }
                }
            }
        }
    }

    SearchSpace::from_configurations(configurations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use travtune_core::{CellSizeFactor, Container, DataLayout, DefaultCapabilityOracle, Newton3Option, TraversalKind};

    #[test]
    fn prunes_incompatible_traversals() {
        let config = TuningConfig {
            containers: vec![Container::DirectSum],
            cell_size_factors: vec![CellSizeFactor::new(1.0).unwrap()],
            traversals: vec![TraversalKind::DirectSumTraversal, TraversalKind::C08],
            data_layouts: vec![DataLayout::AoS],
            newton3_options: vec![Newton3Option::Enabled],
            tuning: Default::default(),
        };

        let space = build_search_space(&config, &DefaultCapabilityOracle).unwrap();
        assert_eq!(space.len(), 1);
        assert_eq!(space.get(0).unwrap().traversal, TraversalKind::DirectSumTraversal);
    }

    #[test]
    fn empty_result_is_an_error() {
        let config = TuningConfig {
            containers: vec![Container::DirectSum],
            cell_size_factors: vec![CellSizeFactor::new(1.0).unwrap()],
            traversals: vec![TraversalKind::C08],
            data_layouts: vec![DataLayout::AoS],
            newton3_options: vec![Newton3Option::Enabled],
            tuning: Default::default(),
        };

        let result = build_search_space(&config, &DefaultCapabilityOracle);
        assert!(result.is_err());
    }

    #[test]
    fn cartesian_product_covers_all_dimensions() {
        let config = TuningConfig {
            containers: vec![Container::LinkedCells],
            cell_size_factors: vec![
                CellSizeFactor::new(1.0).unwrap(),
                CellSizeFactor::new(1.5).unwrap(),
            ],
            traversals: vec![TraversalKind::C08, TraversalKind::C01],
            data_layouts: vec![DataLayout::AoS, DataLayout::SoA],
            newton3_options: vec![Newton3Option::Enabled, Newton3Option::Disabled],
            tuning: Default::default(),
        };

        let space = build_search_space(&config, &DefaultCapabilityOracle).unwrap();
        assert_eq!(space.len(), 2 * 2 * 2 * 2);
    }
}
