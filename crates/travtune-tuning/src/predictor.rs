//! Predictor: per-configuration cost projection and active-set derivation.

use std::collections::{HashMap, HashSet};

use travtune_core::{AutoTuneError, Configuration, SearchSpace};

use crate::evidence::{Evidence, EvidenceStore};

/// A pluggable cost-projection strategy.
///
/// Given a configuration's full measurement history and the phase the
/// projection is for, returns a projected cost, or `None` if the history is
/// insufficient to project from.
pub trait Predictor {
    fn predict(&self, history: &[Evidence], phase_now: u64) -> Option<f64>;
}

/// Linear extrapolation from the two most recent measurements.
///
/// `t_hat = t2 + (t2 - t1) / (p2 - p1) * (phase_now - p2)`, clamped at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExtrapolationPredictor;

impl Predictor for LinearExtrapolationPredictor {
    fn predict(&self, history: &[Evidence], phase_now: u64) -> Option<f64> {
        let t2 = history.last()?;
        let t1 = history.get(history.len().checked_sub(2)?)?;
        if t2.phase == t1.phase {
            return None;
        }
        let slope = (t2.cost as f64 - t1.cost as f64) / (t2.phase as f64 - t1.phase as f64);
        let projected = t2.cost as f64 + slope * (phase_now as f64 - t2.phase as f64);
        Some(projected.max(0.0))
    }
}

/// `R` and `S`: the active-set admission thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveSetParams {
    /// Relative optimum range (`R`).
    pub relative_optimum_range: f64,
    /// Max phases without test (`S`).
    pub max_phases_without_test: u32,
}

impl Default for ActiveSetParams {
    fn default() -> Self {
        Self {
            relative_optimum_range: 1.2,
            max_phases_without_test: 5,
        }
    }
}

/// Derives the active candidate set for `phase_now`.
///
/// Cold phases (0 or 1) and trivial search spaces always yield the full
/// search space. Otherwise a configuration is admitted if its projected
/// cost is within `R` of the best projection, if it hasn't been measured
/// in the last `S` phases, or if it has fewer than two historical
/// measurements to project from.
pub fn active_set(
    search_space: &SearchSpace,
    evidence: &EvidenceStore,
    predictor: &dyn Predictor,
    phase_now: u64,
    params: ActiveSetParams,
) -> std::result::Result<HashSet<Configuration>, AutoTuneError> {
    if search_space.is_trivial() || phase_now <= 1 {
        return Ok(search_space.iter().copied().collect());
    }

    let mut projections: HashMap<Configuration, f64> = HashMap::new();
    for config in search_space.iter() {
        let history = evidence.history_of(config);
        if history.len() >= 2 {
            if let Some(projected) = predictor.predict(history, phase_now) {
                projections.insert(*config, projected);
            }
        }
    }
    let best_projection = projections
        .values()
        .copied()
        .fold(f64::INFINITY, f64::min);

    let mut active = HashSet::new();
    for config in search_space.iter() {
        let history = evidence.history_of(config);
        if history.len() < 2 {
            active.insert(*config);
            continue;
        }

        let last_phase = history.last().map(|e| e.phase).unwrap_or(0);
        let stale = phase_now.saturating_sub(last_phase) >= params.max_phases_without_test as u64;

        let near_optimal = projections
            .get(config)
            .map(|&projected| {
                best_projection.is_finite() && projected / best_projection <= params.relative_optimum_range
            })
            .unwrap_or(false);

        if stale || near_optimal {
            active.insert(*config);
        }
    }

    if active.is_empty() {
        return Err(AutoTuneError::NoCandidates);
    }
    Ok(active)
}
