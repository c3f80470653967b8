use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum AnalyticsError {
    Io(std::io::Error),
    Encoding(serde_json::Error),
}

impl std::fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsError::Io(e) => write!(f, "IO error: {}", e),
            AnalyticsError::Encoding(e) => write!(f, "Analytics encoding error: {}", e),
        }
    }
}

impl std::error::Error for AnalyticsError {}

impl From<std::io::Error> for AnalyticsError {
    fn from(err: std::io::Error) -> Self {
        AnalyticsError::Io(err)
    }
}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::Encoding(err)
    }
}

/// Small persisted map of operational metrics (`build_speed` and friends).
/// Loaded once at startup; every write rewrites the whole file.
pub struct AnalyticsStore {
    path: PathBuf,
    values: BTreeMap<String, u64>,
}

impl AnalyticsStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AnalyticsError> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            serde_json::from_slice(&std::fs::read(&path)?)?
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, values })
    }

    pub fn record(&mut self, key: &str, value: u64) -> Result<(), AnalyticsError> {
        self.values.insert(key.to_string(), value);
        std::fs::write(&self.path, serde_json::to_vec(&self.values)?)?;
        Ok(())
    }

    pub fn snapshot(&self) -> &BTreeMap<String, u64> {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_persists_whole_map() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.bin");

        let mut store = AnalyticsStore::load(&path).unwrap();
        store.record("build_speed", 1_200_000).unwrap();
        store.record("build_speed", 900_000).unwrap();
        store.record("posts_total", 3).unwrap();

        let reloaded = AnalyticsStore::load(&path).unwrap();
        assert_eq!(reloaded.snapshot().get("build_speed"), Some(&900_000));
        assert_eq!(reloaded.snapshot().get("posts_total"), Some(&3));
    }

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = AnalyticsStore::load(dir.path().join("analytics.bin")).unwrap();
        assert!(store.snapshot().is_empty());
    }
}
