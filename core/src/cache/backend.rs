use crate::prelude::StatsResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// trial id -> record
pub type TrialMap<S> = BTreeMap<String, S>;

/// test name -> trial id -> record
pub type CacheStore<S> = BTreeMap<String, TrialMap<S>>;

/// Durable home of a [`CacheStore`].
///
/// `save` must replace the previous document atomically: a crash part way
/// through leaves either the old or the new document, never a mix.
pub trait CacheBackend {
    fn load<S: DeserializeOwned>(&self) -> StatsResult<CacheStore<S>>;
    fn save<S: Serialize>(&mut self, store: &CacheStore<S>) -> StatsResult<()>;
}

/// Single JSON document on disk, replaced through a rename.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CacheBackend for JsonFileBackend {
    fn load<S: DeserializeOwned>(&self) -> StatsResult<CacheStore<S>> {
        if !self.path.exists() {
            return Ok(CacheStore::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(CacheStore::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn save<S: Serialize>(&mut self, store: &CacheStore<S>) -> StatsResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let document = serde_json::to_vec_pretty(store)?;
        let staging = self.staging_path();
        {
            let mut file = File::create(&staging)?;
            file.write_all(&document)?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// In-process document; useful for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    document: Option<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheBackend for MemoryBackend {
    fn load<S: DeserializeOwned>(&self) -> StatsResult<CacheStore<S>> {
        match &self.document {
            Some(document) => Ok(serde_json::from_str(document)?),
            None => Ok(CacheStore::new()),
        }
    }

    fn save<S: Serialize>(&mut self, store: &CacheStore<S>) -> StatsResult<()> {
        self.document = Some(serde_json::to_string(store)?);
        Ok(())
    }
}
