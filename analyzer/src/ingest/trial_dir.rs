use anyhow::Context;
use gazecore::cache::{GroundTruth, TrialKey};
use gazecore::samples::{Fixation, Saccade};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const RECORDING_FILE: &str = "recording.json";

/// Parsed samples of one trial, as left by the ingestion step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialRecording {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub fixations: Vec<Fixation>,
    #[serde(default)]
    pub saccades: Vec<Saccade>,
}

pub fn trial_path(root: &Path, key: &TrialKey) -> PathBuf {
    root.join(&key.test).join(&key.trial)
}

/// `<root>/<test>/<trial>/` directories that exist right now. The root is
/// created when missing.
pub fn enumerate_trials(root: &Path) -> anyhow::Result<GroundTruth> {
    fs::create_dir_all(root).with_context(|| format!("creating data folder {}", root.display()))?;

    let mut ground_truth = GroundTruth::new();
    for test in subfolders(root)? {
        let trials = subfolders(&root.join(&test))?;
        ground_truth.insert(test, trials.into_iter().collect());
    }
    Ok(ground_truth)
}

fn subfolders(dir: &Path) -> anyhow::Result<Vec<String>> {
    let entries = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if name.starts_with('.') => {}
            Ok(name) => names.push(name),
            Err(raw) => warn!("skipping non UTF-8 folder {:?} in {}", raw, dir.display()),
        }
    }
    names.sort();
    Ok(names)
}

pub fn load_recording(root: &Path, key: &TrialKey) -> anyhow::Result<TrialRecording> {
    let path = trial_path(root, key).join(RECORDING_FILE);
    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading recording {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("parsing recording {}", path.display()))
}

pub fn write_recording(
    root: &Path,
    key: &TrialKey,
    recording: &TrialRecording,
) -> anyhow::Result<PathBuf> {
    let dir = trial_path(root, key);
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join(RECORDING_FILE);
    let document = serde_json::to_vec_pretty(recording)?;
    fs::write(&path, document).with_context(|| format!("writing recording {}", path.display()))?;
    Ok(path)
}
