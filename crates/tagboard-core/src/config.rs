use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the board data file used by the JSON-backed store.
    #[serde(default)]
    pub data_file: Option<String>,

    /// Grouping dimension the board opens with ("STATUS", "PRIORITY",
    /// "CATEGORY" or "CLIENT").
    #[serde(default)]
    pub default_dimension: Option<String>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/tagboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("tagboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("tagboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(config) = toml::from_str(&content) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn effective_data_file(&self) -> &str {
        self.data_file.as_deref().unwrap_or("tagboard.json")
    }

    pub fn effective_default_dimension(&self) -> &str {
        self.default_dimension.as_deref().unwrap_or("STATUS")
    }
}
