//! Tuning Controller: the per-phase state machine that drives a tuning
//! session.

use travtune_config::TuningConfig;
use travtune_core::{AutoTuneError, CapabilityOracle, Configuration, Newton3Option, SearchSpace};
use tracing::{debug, info};

use crate::builder::build_search_space;
use crate::evidence::EvidenceStore;
use crate::predictor::{active_set, ActiveSetParams, LinearExtrapolationPredictor, Predictor};

/// Drives one configuration at a time through a tuning phase, collects
/// evidence, and selects the phase-optimal configuration once the active
/// set has been fully measured.
///
/// Single-threaded and cooperative: every operation runs to completion
/// synchronously, and `removeN3Option`/`reset` must not be called
/// concurrently with `tune`/`addEvidence`.
pub struct TuningController<P: Predictor = LinearExtrapolationPredictor> {
    search_space: SearchSpace,
    evidence: EvidenceStore,
    predictor: P,
    params: ActiveSetParams,
    active: std::collections::HashSet<Configuration>,
    cursor: Configuration,
    phase: u64,
}

impl TuningController<LinearExtrapolationPredictor> {
    /// Builds a controller from loaded configuration and a capability
    /// oracle, using the default linear-extrapolation predictor.
    pub fn from_config(
        config: &TuningConfig,
        oracle: &impl CapabilityOracle,
    ) -> std::result::Result<Self, AutoTuneError> {
        let search_space = build_search_space(config, oracle)?;
        let params = ActiveSetParams {
            relative_optimum_range: config.tuning.relative_optimum_range,
            max_phases_without_test: config.tuning.max_phases_without_test,
        };
        Self::new(search_space, params, LinearExtrapolationPredictor)
    }
}

impl<P: Predictor> TuningController<P> {
    /// Builds a controller over an already-constructed search space.
    pub fn new(
        search_space: SearchSpace,
        params: ActiveSetParams,
        predictor: P,
    ) -> std::result::Result<Self, AutoTuneError> {
        let phase = 1;
        let active = active_set(&search_space, &EvidenceStore::new(), &predictor, phase, params)?;
        let cursor = first_active(&search_space, &active).ok_or(AutoTuneError::NoCandidates)?;

        debug!(
            event = "search_space_built",
            size = search_space.len(),
        );
        debug!(
            event = "phase_start",
            phase,
            active_set_size = active.len(),
        );

        Ok(Self {
            search_space,
            evidence: EvidenceStore::new(),
            predictor,
            params,
            active,
            cursor,
            phase,
        })
    }

    /// The configuration the outer simulation should execute next.
    pub fn current_configuration(&self) -> Configuration {
        self.cursor
    }

    /// The current phase number.
    pub fn phase(&self) -> u64 {
        self.phase
    }

    /// True if the search space has exactly one configuration.
    pub fn search_space_is_trivial(&self) -> bool {
        self.search_space.is_trivial()
    }

    /// True if the search space has no configurations left.
    pub fn search_space_is_empty(&self) -> bool {
        self.search_space.is_empty()
    }

    /// Records a measured cost for the current configuration in the
    /// current phase.
    pub fn add_evidence(&mut self, cost: i64) -> std::result::Result<(), AutoTuneError> {
        self.evidence
            .record(&self.search_space, self.cursor, self.phase, cost)
    }

    /// Advances within the current phase's active set.
    ///
    /// Returns `true` while more configurations remain to be measured.
    /// Returns `false` once the phase has been finalized: a new optimum has
    /// been selected and a new phase's active set is ready.
    ///
    /// The caller must have called [`Self::add_evidence`] for the current
    /// configuration before calling this.
    pub fn tune(&mut self) -> std::result::Result<bool, AutoTuneError> {
        match next_active_after(&self.search_space, &self.active, self.cursor) {
            Some(next) => {
                self.cursor = next;
                Ok(true)
            }
            None => {
                self.finalize_phase()?;
                Ok(false)
            }
        }
    }

    fn finalize_phase(&mut self) -> std::result::Result<(), AutoTuneError> {
        let selected = self
            .evidence
            .latest_iter()
            .min_by(|(c1, cost1), (c2, cost2)| cost1.cmp(cost2).then_with(|| c1.cmp(c2)))
            .map(|(config, _)| *config)
            .ok_or(AutoTuneError::NoMeasurements)?;

        info!(
            event = "phase_end",
            phase = self.phase,
            selected = %selected,
        );

        self.evidence.clear_current_phase();
        self.phase += 1;

        self.active = active_set(
            &self.search_space,
            &self.evidence,
            &self.predictor,
            self.phase,
            self.params,
        )?;
        self.cursor =
            first_active(&self.search_space, &self.active).ok_or(AutoTuneError::NoCandidates)?;

        debug!(
            event = "phase_start",
            phase = self.phase,
            active_set_size = self.active.len(),
        );

        Ok(())
    }

    /// Invalidates a newton3 option (e.g. the force functor rejects it),
    /// removing every configuration using it from the search space.
    pub fn remove_newton3_option(
        &mut self,
        option: Newton3Option,
    ) -> std::result::Result<(), AutoTuneError> {
        self.search_space.remove_newton3_option(option)?;
        self.active.retain(|c| c.newton3 != option);
        if self.active.is_empty() {
            return Err(AutoTuneError::NoCandidates);
        }

        info!(event = "newton3_option_removed", option = %option);

        if self.cursor.newton3 != option && self.active.contains(&self.cursor) {
            return Ok(());
        }

        // The deleted configuration was the cursor's. If no active
        // configuration at or after it survives, the active set for this
        // phase is exhausted, the same outcome as `tune()` running off the
        // end, so finalize the phase with whatever evidence is in hand
        // rather than treating it as a fatal condition.
        match first_active_at_or_after(&self.search_space, &self.active, self.cursor) {
            Some(next) => {
                self.cursor = next;
                Ok(())
            }
            None => self.finalize_phase(),
        }
    }

    /// Starts a fresh round of measurement within the current phase, using
    /// accumulated history. Clears the current phase's measurements but
    /// keeps history.
    pub fn reset(&mut self) -> std::result::Result<(), AutoTuneError> {
        self.evidence.clear_current_phase();
        self.active = active_set(
            &self.search_space,
            &self.evidence,
            &self.predictor,
            self.phase,
            self.params,
        )?;
        self.cursor =
            first_active(&self.search_space, &self.active).ok_or(AutoTuneError::NoCandidates)?;

        debug!(
            event = "reset",
            phase = self.phase,
            active_set_size = self.active.len(),
        );
        Ok(())
    }
}

fn first_active(
    search_space: &SearchSpace,
    active: &std::collections::HashSet<Configuration>,
) -> Option<Configuration> {
    search_space.iter().copied().filter(|c| active.contains(c)).min()
}

fn first_active_at_or_after(
    search_space: &SearchSpace,
    active: &std::collections::HashSet<Configuration>,
    threshold: Configuration,
) -> Option<Configuration> {
    search_space
        .iter()
        .copied()
        .filter(|c| active.contains(c) && *c >= threshold)
        .min()
}

fn next_active_after(
    search_space: &SearchSpace,
    active: &std::collections::HashSet<Configuration>,
    current: Configuration,
) -> Option<Configuration> {
    search_space
        .iter()
        .copied()
        .filter(|c| active.contains(c) && *c > current)
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use travtune_core::{CellSizeFactor, Container, DataLayout, TraversalKind};

    fn single_config() -> Configuration {
        Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C08,
            DataLayout::AoS,
            Newton3Option::Enabled,
        )
    }

    #[test]
    fn single_element_space_stays_current_across_phases() {
        let space = SearchSpace::from_configurations(vec![single_config()]).unwrap();
        let mut controller = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();

        assert!(controller.search_space_is_trivial());
        assert_eq!(controller.current_configuration(), single_config());

        controller.add_evidence(1000).unwrap();
        let more = controller.tune().unwrap();
        assert!(!more);
        assert_eq!(controller.current_configuration(), single_config());
        assert_eq!(controller.phase(), 2);
    }

    fn config(traversal: TraversalKind) -> Configuration {
        Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            traversal,
            DataLayout::AoS,
            Newton3Option::Enabled,
        )
    }

    #[test]
    fn cold_phase_measures_every_configuration() {
        let a = config(TraversalKind::C01);
        let b = config(TraversalKind::C04);
        let c = config(TraversalKind::C08);
        let space = SearchSpace::from_configurations(vec![a, b, c]).unwrap();
        let mut controller = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();

        let mut seen = vec![controller.current_configuration()];
        controller.add_evidence(100).unwrap();
        assert!(controller.tune().unwrap());
        seen.push(controller.current_configuration());
        controller.add_evidence(200).unwrap();
        assert!(controller.tune().unwrap());
        seen.push(controller.current_configuration());
        controller.add_evidence(300).unwrap();
        assert!(!controller.tune().unwrap());

        assert_eq!(seen, vec![a, b, c]);
    }

    #[test]
    fn ties_are_broken_lexicographically() {
        let a = config(TraversalKind::C01);
        let b = config(TraversalKind::C04);
        let space = SearchSpace::from_configurations(vec![a, b]).unwrap();
        let mut controller = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();

        controller.add_evidence(100).unwrap();
        controller.tune().unwrap();
        controller.add_evidence(100).unwrap();
        controller.tune().unwrap();

        assert_eq!(controller.current_configuration(), a);
    }

    #[test]
    fn removing_newton3_option_empties_trivial_space() {
        let space = SearchSpace::from_configurations(vec![single_config()]).unwrap();
        let mut controller = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();

        let result = controller.remove_newton3_option(Newton3Option::Enabled);
        assert!(matches!(result, Err(AutoTuneError::EmptyAfterInvalidation(_))));
    }

    #[test]
    fn reset_twice_is_idempotent() {
        let a = config(TraversalKind::C01);
        let b = config(TraversalKind::C04);
        let space = SearchSpace::from_configurations(vec![a, b]).unwrap();
        let mut once = TuningController::new(
            space.clone(),
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();
        once.add_evidence(100).unwrap();
        once.reset().unwrap();

        let mut twice = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();
        twice.add_evidence(100).unwrap();
        twice.reset().unwrap();
        twice.reset().unwrap();

        assert_eq!(once.current_configuration(), twice.current_configuration());
        assert_eq!(once.phase(), twice.phase());
    }

    #[test]
    fn removing_newton3_option_finalizes_phase_when_nothing_survives_after_cursor() {
        let a = Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C01,
            DataLayout::AoS,
            Newton3Option::Disabled,
        );
        let b = Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C04,
            DataLayout::AoS,
            Newton3Option::Disabled,
        );
        let c = Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C08,
            DataLayout::AoS,
            Newton3Option::Enabled,
        );
        let space = SearchSpace::from_configurations(vec![a, b, c]).unwrap();
        let mut controller = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();

        assert_eq!(controller.current_configuration(), a);
        controller.add_evidence(100).unwrap();
        assert!(controller.tune().unwrap());
        assert_eq!(controller.current_configuration(), b);
        controller.add_evidence(200).unwrap();
        assert!(controller.tune().unwrap());
        assert_eq!(controller.current_configuration(), c);

        // C was the last element in iteration order; deleting it leaves no
        // active configuration at or after the cursor, which must finalize
        // the phase using A's and B's evidence rather than error out.
        controller.remove_newton3_option(Newton3Option::Enabled).unwrap();
        assert_eq!(controller.phase(), 2);
        assert_eq!(controller.current_configuration(), a);
    }

    #[test]
    fn removing_newton3_option_advances_cursor_if_needed() {
        let enabled = Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C01,
            DataLayout::AoS,
            Newton3Option::Enabled,
        );
        let disabled = Configuration::new(
            Container::LinkedCells,
            CellSizeFactor::new(1.0).unwrap(),
            TraversalKind::C01,
            DataLayout::AoS,
            Newton3Option::Disabled,
        );
        let space = SearchSpace::from_configurations(vec![enabled, disabled]).unwrap();
        let mut controller = TuningController::new(
            space,
            ActiveSetParams::default(),
            LinearExtrapolationPredictor,
        )
        .unwrap();

        // Configuration::Ord sorts Newton3Option::Disabled before Enabled,
        // so the cursor starts on `disabled`.
        assert_eq!(controller.current_configuration(), disabled);
        controller.remove_newton3_option(Newton3Option::Disabled).unwrap();
        assert_eq!(controller.current_configuration(), enabled);
    }
}
