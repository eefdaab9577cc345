//! Evidence Store: per-configuration, per-phase measurement bookkeeping.

use std::collections::HashMap;

use travtune_core::{AutoTuneError, Configuration, SearchSpace};

/// A single measurement: the phase it was taken in and its cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evidence {
    pub phase: u64,
    pub cost: u64,
}

/// Records measurements and exposes two views over them: the current
/// phase's latest cost per configuration, and the full cross-phase
/// history.
#[derive(Debug, Clone, Default)]
pub struct EvidenceStore {
    latest: HashMap<Configuration, u64>,
    history: HashMap<Configuration, Vec<Evidence>>,
}

impl EvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a measurement for `config` at `phase`.
    ///
    /// Fails with [`AutoTuneError::UnknownConfiguration`] if `config` is not
    /// a member of `search_space`, or [`AutoTuneError::NegativeCost`] if
    /// `cost` cannot be interpreted as a non-negative measurement.
    ///
    /// Recording a second measurement for a (config, phase) pair already
    /// present overwrites that phase's cost rather than appending a
    /// duplicate entry.
    pub fn record(
        &mut self,
        search_space: &SearchSpace,
        config: Configuration,
        phase: u64,
        cost: i64,
    ) -> std::result::Result<(), AutoTuneError> {
        if !search_space.contains(&config) {
            return Err(AutoTuneError::UnknownConfiguration(config));
        }
        let cost: u64 = cost
            .try_into()
            .map_err(|_| AutoTuneError::NegativeCost(cost.to_string()))?;

        let entries = self.history.entry(config).or_default();
        match entries.binary_search_by_key(&phase, |e| e.phase) {
            Ok(existing) => entries[existing].cost = cost,
            Err(insert_at) => entries.insert(insert_at, Evidence { phase, cost }),
        }

        self.latest.insert(config, cost);
        Ok(())
    }

    /// The cost recorded for `config` in the current phase, if any.
    pub fn latest_cost(&self, config: &Configuration) -> Option<u64> {
        self.latest.get(config).copied()
    }

    /// Every configuration measured in the current phase, with its cost.
    pub fn latest_iter(&self) -> impl Iterator<Item = (&Configuration, &u64)> {
        self.latest.iter()
    }

    /// Full ordered history for `config`, oldest phase first.
    pub fn history_of(&self, config: &Configuration) -> &[Evidence] {
        self.history.get(config).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Clears the current phase's latest-cost view. History is preserved.
    pub fn clear_current_phase(&mut self) {
        self.latest.clear();
    }

    /// Clears both views entirely.
    pub fn clear_all(&mut self) {
        self.latest.clear();
        self.history.clear();
    }
}
