use std::sync::Mutex;

/// Counters for a statistics run.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub computed: usize,
    pub failed: usize,
    pub removed: usize,
    pub requested: usize,
}

#[derive(Default)]
struct Metrics {
    computed: usize,
    failed: usize,
    removed: usize,
    requested: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_computed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.computed += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn record_reconcile(&self, removed: usize, requested: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.removed += removed;
            metrics.requested += requested;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                computed: metrics.computed,
                failed: metrics.failed,
                removed: metrics.removed,
                requested: metrics.requested,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
