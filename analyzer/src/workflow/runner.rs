use crate::ingest::trial_dir::{enumerate_trials, load_recording};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use gazecore::cache::{CacheBackend, ResultCache, TrialKey};
use gazecore::processing::{TrialAnalyzer, TrialStatistics};
use gazecore::telemetry::{MetricsRecorder, MetricsSnapshot};
use log::{info, warn};

pub struct WorkflowResult {
    pub removed: usize,
    pub requested: usize,
    pub computed: Vec<TrialKey>,
    pub failed: Vec<(TrialKey, String)>,
}

pub struct Runner {
    config: WorkflowConfig,
    analyzer: TrialAnalyzer,
    metrics: MetricsRecorder,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> anyhow::Result<Self> {
        let analyzer = TrialAnalyzer::new(&config.stats).context("configuring trial analyzer")?;
        Ok(Self {
            config,
            analyzer,
            metrics: MetricsRecorder::new(),
        })
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Loads and analyzes one trial's recording.
    pub fn compute(&self, key: &TrialKey) -> anyhow::Result<TrialStatistics> {
        let recording = load_recording(&self.config.data_folder, key)?;
        self.analyzer
            .analyze(&recording.kind, &recording.fixations, &recording.saccades)
            .with_context(|| format!("analyzing {}", key))
    }

    /// Reconciles `cache` against the trial folders, then computes and
    /// appends every trial it asked for. A trial that fails to compute is
    /// reported and asked for again on the next run; a cache write failure
    /// aborts the run.
    pub fn execute<B: CacheBackend>(
        &self,
        cache: &mut ResultCache<TrialStatistics, B>,
    ) -> anyhow::Result<WorkflowResult> {
        let ground_truth = enumerate_trials(&self.config.data_folder)?;

        let mut requests = Vec::new();
        let report = cache
            .reconcile_with(&ground_truth, |key| requests.push(key.clone()))
            .context("reconciling statistics cache")?;
        self.metrics
            .record_reconcile(report.removed, report.appended_pending);

        let mut computed = Vec::new();
        let mut failed = Vec::new();
        for key in requests {
            match self.compute(&key) {
                Ok(statistics) => {
                    cache
                        .append(&key.test, &key.trial, statistics)
                        .with_context(|| format!("storing statistics for {}", key))?;
                    info!("computed statistics for {}", key);
                    self.metrics.record_computed();
                    computed.push(key);
                }
                Err(err) => {
                    warn!("statistics for {} unavailable: {:#}", key, err);
                    self.metrics.record_failed();
                    failed.push((key, format!("{:#}", err)));
                }
            }
        }

        Ok(WorkflowResult {
            removed: report.removed,
            requested: report.appended_pending,
            computed,
            failed,
        })
    }
}
