use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the per-key catalog files.
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: "data".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Suggested debounce for search inputs, in milliseconds. Collaborators
    /// read it; the store itself does not debounce.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { debounce_ms: default_debounce_ms() }
    }
}

fn default_debounce_ms() -> u64 {
    300
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.storage.normalize_from_env();
        self.storage.validate()?;
        self.ui.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    /// Let the environment override the data directory.
    pub fn normalize_from_env(&mut self) {
        if let Ok(dir) = std::env::var("CATALOG_DATA_DIR") {
            if !dir.trim().is_empty() {
                self.data_dir = dir;
            }
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = "data".to_string();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_dir.trim().is_empty() {
            return Err(anyhow!("storage.data_dir is empty"));
        }
        Ok(())
    }
}

impl UiConfig {
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms > 10_000 {
            return Err(anyhow!("ui.debounce_ms must be at most 10000"));
        }
        Ok(())
    }
}
