use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quotey_core::UsageLedger;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<UsageLedger>;
    async fn save(&self, ledger: &UsageLedger) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    #[serde(default)]
    used_quotes: UsageLedger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

/// Keeps the usage ledger in its own JSON file, rewritten in full on save.
pub struct JsonLedgerStore {
    path: PathBuf,
}

impl JsonLedgerStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl LedgerStore for JsonLedgerStore {
    async fn load(&self) -> Result<UsageLedger> {
        if !self.path.exists() {
            return Ok(UsageLedger::new());
        }
        let raw = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read state file {}", self.path.display()))?;
        let state: StateFile = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse state file {}", self.path.display()))?;
        Ok(state.used_quotes)
    }

    async fn save(&self, ledger: &UsageLedger) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create state directory {}", parent.display()))?;
        }
        let state = StateFile {
            used_quotes: ledger.clone(),
            saved_at: Some(Utc::now()),
        };
        let payload = serde_json::to_vec_pretty(&state).context("failed to serialize state")?;

        // Write then rename so a crash never leaves a half-written ledger.
        let temp = self.temp_path();
        fs::write(&temp, payload)
            .await
            .with_context(|| format!("failed to write state file {}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("failed to replace state file {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_empty_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLedgerStore::new(dir.path().join("state.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_restores_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonLedgerStore::new(dir.path().join("nested").join("state.json"));
        let ledger: UsageLedger = ["b", "a", "c"].into_iter().collect();

        store.save(&ledger).await.unwrap();
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().await.unwrap(), ledger);
    }

    #[tokio::test]
    async fn reads_state_without_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"used_quotes":["x"]}"#).await.unwrap();

        let ledger = JsonLedgerStore::new(path).load().await.unwrap();
        assert_eq!(ledger.iter().collect::<Vec<_>>(), vec!["x"]);
    }

    #[tokio::test]
    async fn malformed_state_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").await.unwrap();

        let error = JsonLedgerStore::new(path).load().await.unwrap_err();
        assert!(format!("{error:#}").contains("failed to parse state file"));
    }
}
