use anyhow::Context;
use gazecore::prelude::StatsConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// `<data_folder>/<test>/<trial>/recording.json`
    pub data_folder: PathBuf,
    pub cache_path: PathBuf,
    #[serde(flatten)]
    pub stats: StatsConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            data_folder: PathBuf::from("data"),
            cache_path: PathBuf::from("data/statistics.json"),
            stats: StatsConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(data_folder: PathBuf, cache_path: PathBuf, window_length_secs: f64) -> Self {
        Self {
            data_folder,
            cache_path,
            stats: StatsConfig {
                window_length_secs,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazecore::prelude::GapPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_keeps_default_bounds() {
        let cfg = WorkflowConfig::from_args("d".into(), "d/c.json".into(), 2.5);
        assert_eq!(cfg.stats.window_length_secs, 2.5);
        assert_eq!(cfg.stats.radar_sectors, 8);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"data_folder: /srv/gaze\nwindow_length_secs: 5.0\nradar_sectors: 12\ngap_policy: emit_empty\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.data_folder, PathBuf::from("/srv/gaze"));
        assert_eq!(cfg.cache_path, PathBuf::from("data/statistics.json"));
        assert_eq!(cfg.stats.window_length_secs, 5.0);
        assert_eq!(cfg.stats.radar_sectors, 12);
        assert_eq!(cfg.stats.gap_policy, GapPolicy::EmitEmpty);
        assert_eq!(cfg.stats.saccade_amplitude_bounds_deg, vec![1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn config_load_reports_missing_file() {
        let err = WorkflowConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(err.to_string().contains("reading workflow config"));
    }
}
