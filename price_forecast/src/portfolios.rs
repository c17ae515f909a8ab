//! Saved portfolio settings persisted as a JSON array on disk

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One saved entry: an id plus whatever settings the client stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPortfolio {
    pub id: String,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

/// File-backed list of saved portfolios
#[derive(Debug, Clone)]
pub struct PortfolioStore {
    path: PathBuf,
}

impl PortfolioStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All saved entries; a missing file is an empty store
    pub fn list(&self) -> Result<Vec<SavedPortfolio>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Append `settings` under a fresh millisecond-timestamp id and return the id
    pub fn save(&self, settings: Value) -> Result<String> {
        let mut settings = match settings {
            Value::Object(map) => map,
            other => {
                return Err(ForecastError::InvalidParameter(format!(
                    "Portfolio settings must be a JSON object, got {other}"
                )))
            }
        };
        settings.remove("id");

        let mut entries = self.list()?;
        let mut stamp = chrono::Utc::now().timestamp_millis();
        while entries.iter().any(|e| e.id == stamp.to_string()) {
            stamp += 1;
        }
        let id = stamp.to_string();

        entries.push(SavedPortfolio {
            id: id.clone(),
            settings,
        });
        self.write(&entries)?;
        info!(id = %id, path = %self.path.display(), "portfolio saved");
        Ok(id)
    }

    /// Remove the entry with `id`; returns whether one was removed
    pub fn delete(&self, id: &str) -> Result<bool> {
        let mut entries = self.list()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if removed {
            self.write(&entries)?;
        }
        debug!(id, removed, "portfolio delete");
        Ok(removed)
    }

    fn write(&self, entries: &[SavedPortfolio]) -> Result<()> {
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = PortfolioStore::new(dir.path().join("portfolios.json"));
        assert!(store.list().unwrap().is_empty());
        assert!(!store.delete("1").unwrap());
    }

    #[test]
    fn test_save_list_delete() {
        let dir = tempdir().unwrap();
        let store = PortfolioStore::new(dir.path().join("portfolios.json"));

        let first = store
            .save(json!({"name": "Tech", "stocks": ["AAPL"], "weights": {"AAPL": 1.0}}))
            .unwrap();
        let second = store.save(json!({"name": "Other", "id": "spoofed"})).unwrap();
        assert_ne!(first, second);

        let saved = store.list().unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, first);
        assert_eq!(saved[0].settings["name"], json!("Tech"));
        assert_eq!(saved[1].id, second);

        assert!(store.delete(&first).unwrap());
        let saved = store.list().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, second);
    }

    #[test]
    fn test_rejects_non_object_settings() {
        let dir = tempdir().unwrap();
        let store = PortfolioStore::new(dir.path().join("portfolios.json"));
        assert!(matches!(
            store.save(json!([1, 2])),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolios.json");
        fs::write(&path, "not json").unwrap();
        assert!(PortfolioStore::new(path).list().is_err());
    }
}
