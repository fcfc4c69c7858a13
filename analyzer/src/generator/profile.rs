use crate::ingest::trial_dir::{write_recording, TrialRecording};
use anyhow::Context;
use gazecore::cache::TrialKey;
use gazecore::samples::{Fixation, Saccade};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for generating synthetic trial recordings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub tests: usize,
    pub trials_per_test: usize,
    pub duration_secs: f64,
    /// Share of saccades that move forward, the rest spread over the circle.
    pub forward_bias: f64,
    pub seed: u64,
    pub kinds: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            tests: 2,
            trials_per_test: 3,
            duration_secs: 60.0,
            forward_bias: 0.6,
            seed: 0,
            kinds: vec!["reading".into(), "search".into()],
        }
    }
}

/// Alternating fixation/saccade stream starting at an arbitrary tracker time.
pub fn build_recording(
    kind: &str,
    duration_secs: f64,
    forward_bias: f64,
    rng: &mut StdRng,
) -> TrialRecording {
    let start: i64 = rng.gen_range(1_000_000..1_000_000_000);
    let end = start + (duration_secs.max(0.0) * 1_000_000.0) as i64;

    let mut fixations = Vec::new();
    let mut saccades = Vec::new();
    let mut timestamp = start;

    while timestamp <= end {
        let duration: u64 = rng.gen_range(80_000..900_000);
        fixations.push(Fixation::new(timestamp, duration));
        timestamp += duration as i64;

        let angle = if rng.gen_bool(forward_bias.clamp(0.0, 1.0)) {
            (rng.gen_range(-30.0..30.0_f64) + 360.0) % 360.0
        } else {
            rng.gen_range(0.0..360.0)
        };
        saccades.push(Saccade::new(timestamp, rng.gen_range(0.3..12.0), angle));
        timestamp += rng.gen_range(20_000..80_000);
    }

    TrialRecording {
        kind: kind.to_string(),
        fixations,
        saccades,
    }
}

/// Writes `tests * trials_per_test` recordings under `root`; returns the
/// keys written.
pub fn write_synthetic_tests(
    root: &Path,
    config: &GeneratorConfig,
) -> anyhow::Result<Vec<TrialKey>> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut written = Vec::with_capacity(config.tests * config.trials_per_test);

    for test_index in 0..config.tests {
        let kind = if config.kinds.is_empty() {
            "default"
        } else {
            config.kinds[test_index % config.kinds.len()].as_str()
        };
        for trial_index in 0..config.trials_per_test {
            let key = TrialKey::new(
                format!("test-{:02}", test_index + 1),
                format!("trial-{:02}", trial_index + 1),
            );
            let recording =
                build_recording(kind, config.duration_secs, config.forward_bias, &mut rng);
            write_recording(root, &key, &recording)
                .with_context(|| format!("generating recording for {}", key))?;
            written.push(key);
        }
    }

    Ok(written)
}
