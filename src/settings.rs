//! Host-owned settings passed through to the tools.
//!
//! Persisted at `{working_dir}/.taskqueue-bridge/settings.json`. The adapter
//! never interprets these; the tool layer forwards them (default recall
//! limit, memory categories, whether learnings are persisted at all).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

fn default_context_items() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_recall_types() -> Vec<String> {
    vec!["all".to_string()]
}

/// Settings controlling how the host uses the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeSettings {
    /// Inject recalled context into new sessions automatically.
    #[serde(default = "default_true")]
    pub auto_inject_context: bool,

    /// How many memory items to fetch when recalling.
    #[serde(default = "default_context_items")]
    pub context_items: usize,

    /// Whether the `remember` tool stores learnings at all.
    #[serde(default = "default_true")]
    pub persist_learnings: bool,

    /// Memory categories to recall; `["all"]` means no filter.
    #[serde(default = "default_recall_types")]
    pub recall_types: Vec<String>,

    /// Verbose tool logging.
    #[serde(default)]
    pub debug: bool,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            auto_inject_context: true,
            context_items: default_context_items(),
            persist_learnings: true,
            recall_types: default_recall_types(),
            debug: false,
        }
    }
}

/// In-memory settings store with disk persistence.
#[derive(Debug)]
pub struct SettingsStore {
    settings: RwLock<BridgeSettings>,
    storage_path: PathBuf,
}

impl SettingsStore {
    /// Create a store, loading from disk if a settings file exists.
    pub async fn new(working_dir: &PathBuf) -> Self {
        let storage_path = working_dir.join(".taskqueue-bridge/settings.json");

        let settings = if storage_path.exists() {
            match Self::load_from_path(&storage_path) {
                Ok(s) => {
                    tracing::info!("Loaded settings from {}", storage_path.display());
                    s
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to load settings from {}: {}, using defaults",
                        storage_path.display(),
                        e
                    );
                    BridgeSettings::default()
                }
            }
        } else {
            tracing::debug!(
                "No settings file at {}, using defaults",
                storage_path.display()
            );
            BridgeSettings::default()
        };

        Self {
            settings: RwLock::new(settings),
            storage_path,
        }
    }

    fn load_from_path(path: &PathBuf) -> Result<BridgeSettings, std::io::Error> {
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    async fn save_to_disk(&self) -> Result<(), std::io::Error> {
        let settings = self.settings.read().await;

        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(&*settings)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(&self.storage_path, contents)?;
        tracing::debug!("Saved settings to {}", self.storage_path.display());
        Ok(())
    }

    /// Get a clone of the current settings.
    pub async fn get(&self) -> BridgeSettings {
        self.settings.read().await.clone()
    }

    /// Replace settings and persist to disk.
    pub async fn update(&self, new_settings: BridgeSettings) -> Result<(), std::io::Error> {
        let mut settings = self.settings.write().await;
        *settings = new_settings;
        drop(settings);
        self.save_to_disk().await
    }
}

/// Shared settings store for concurrent tool access.
pub type SharedSettingsStore = Arc<SettingsStore>;
