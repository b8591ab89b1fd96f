use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "clubfind";
const CONFIG_FILE: &str = "config.json";

/// Application configuration stored in the user's config directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Schools pre-selected in the school facet when a session starts
    #[serde(default = "default_schools")]
    pub default_schools: Vec<String>,

    /// Capacity of the per-index prefix lookup cache (0 disables it)
    #[serde(default = "default_prefix_cache_size")]
    pub prefix_cache_size: usize,

    /// Colorize terminal output
    #[serde(default = "default_color")]
    pub color: bool,

    /// Maximum number of results printed by the CLI
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
}

fn default_schools() -> Vec<String> {
    vec!["COLLEGE".to_string()]
}

fn default_prefix_cache_size() -> usize {
    256
}

fn default_color() -> bool {
    true
}

fn default_result_limit() -> usize {
    50
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_schools: default_schools(),
            prefix_cache_size: default_prefix_cache_size(),
            color: default_color(),
            result_limit: default_result_limit(),
        }
    }
}

impl AppConfig {
    /// Load config from the app config directory, or return default if not found
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path, or return default if the file does not exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
            let config: AppConfig = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to the given path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .context("Failed to create config directory")?;
        }
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_config_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application config directory
pub fn get_app_config_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support"))
    } else {
        // Linux/Unix: XDG_CONFIG_HOME or ~/.config; Windows: %APPDATA%
        dirs::config_dir()
    };

    let base = base.context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}
