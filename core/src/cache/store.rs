//! Per-trial result cache kept in step with the trials that exist.
//!
//! The cache never computes anything itself. Reconciliation drops tests
//! that disappeared from the ground truth and reports every existing trial
//! that has no stored record; whoever receives those requests is expected
//! to compute the statistics and hand them back through `append`.

use crate::cache::backend::{CacheBackend, CacheStore, TrialMap};
use crate::cache::CacheRecord;
use crate::prelude::StatsResult;
use crate::telemetry::log::LogManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// test name -> trial ids that currently exist
pub type GroundTruth = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrialKey {
    pub test: String,
    pub trial: String,
}

impl TrialKey {
    pub fn new(test: impl Into<String>, trial: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            trial: trial.into(),
        }
    }
}

impl fmt::Display for TrialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.test, self.trial)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Tests dropped because they no longer exist.
    pub removed: usize,
    /// Statistics-needed requests issued.
    pub appended_pending: usize,
    pub pending: Vec<TrialKey>,
}

pub struct ResultCache<S, B> {
    store: CacheStore<S>,
    backend: B,
    logger: LogManager,
}

impl<S, B> ResultCache<S, B>
where
    S: CacheRecord + Serialize + DeserializeOwned,
    B: CacheBackend,
{
    pub fn open(backend: B) -> StatsResult<Self> {
        let store = backend.load()?;
        let logger = LogManager::new("cache");
        logger.verbose(&format!("opened with {} tests", store.len()));
        Ok(Self {
            store,
            backend,
            logger,
        })
    }

    /// Persists once more and hands the backend back.
    pub fn close(mut self) -> StatsResult<B> {
        self.backend.save(&self.store)?;
        Ok(self.backend)
    }

    /// Stores `statistics` under (test, trial), replacing any previous
    /// record wholesale. Nothing changes if persisting fails.
    pub fn append(&mut self, test: &str, trial: &str, statistics: S) -> StatsResult<()> {
        let created_test = !self.store.contains_key(test);
        let previous = self
            .store
            .entry(test.to_string())
            .or_default()
            .insert(trial.to_string(), statistics);

        if let Err(err) = self.backend.save(&self.store) {
            self.undo_append(test, trial, previous, created_test);
            return Err(err);
        }
        Ok(())
    }

    /// Only a test entry that `append` itself created is dropped again.
    fn undo_append(&mut self, test: &str, trial: &str, previous: Option<S>, created_test: bool) {
        if created_test {
            self.store.remove(test);
            return;
        }
        let Some(trials) = self.store.get_mut(test) else {
            return;
        };
        match previous {
            Some(previous) => {
                trials.insert(trial.to_string(), previous);
            }
            None => {
                trials.remove(trial);
            }
        }
    }

    pub fn reconcile(&mut self, ground_truth: &GroundTruth) -> StatsResult<ReconcileReport> {
        self.reconcile_with(ground_truth, |_| {})
    }

    /// Drops stored tests missing from `ground_truth`, then calls `notify`
    /// once for every existing trial without a stored record.
    ///
    /// Removals are persisted before any request goes out. If persisting
    /// fails the store is left as it was and nobody is notified.
    pub fn reconcile_with<F>(
        &mut self,
        ground_truth: &GroundTruth,
        mut notify: F,
    ) -> StatsResult<ReconcileReport>
    where
        F: FnMut(&TrialKey),
    {
        let stale: Vec<String> = self
            .store
            .keys()
            .filter(|test| !ground_truth.contains_key(*test))
            .cloned()
            .collect();

        if !stale.is_empty() {
            let dropped: Vec<(String, TrialMap<S>)> = stale
                .iter()
                .filter_map(|test| self.store.remove_entry(test))
                .collect();

            if let Err(err) = self.backend.save(&self.store) {
                self.store.extend(dropped);
                return Err(err);
            }
            for (test, trials) in &dropped {
                self.logger
                    .record(&format!("dropped \"{}\" ({} trials)", test, trials.len()));
            }
        }

        let pending: Vec<TrialKey> = ground_truth
            .iter()
            .flat_map(|(test, trials)| {
                let stored = self.store.get(test);
                trials
                    .iter()
                    .filter(move |trial| !stored.is_some_and(|s| s.contains_key(*trial)))
                    .map(move |trial| TrialKey::new(test.as_str(), trial.as_str()))
            })
            .collect();

        for key in &pending {
            self.logger
                .record(&format!("appending statistics for \"{}\" ...", key));
            notify(key);
        }

        self.logger.record(&format!(
            "reconciled: {} removed, {} pending",
            stale.len(),
            pending.len()
        ));

        Ok(ReconcileReport {
            removed: stale.len(),
            appended_pending: pending.len(),
            pending,
        })
    }

    pub fn test(&self, test: &str) -> Option<&TrialMap<S>> {
        self.store.get(test)
    }

    pub fn trial(&self, test: &str, trial: &str) -> Option<&S> {
        self.store.get(test).and_then(|trials| trials.get(trial))
    }

    pub fn tests(&self) -> impl Iterator<Item = &str> {
        self.store.keys().map(String::as_str)
    }

    /// Every stored record of `kind` across all tests, except trial
    /// `except_trial`.
    pub fn trials_of_type(&self, kind: &str, except_trial: &str) -> Vec<&S> {
        self.store
            .values()
            .flat_map(|trials| trials.iter())
            .filter(|(trial, record)| record.kind() == kind && trial.as_str() != except_trial)
            .map(|(_, record)| record)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.store.values().map(TrialMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.store.values().all(TrialMap::is_empty)
    }
}
