use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::rank::RankStrategy;
use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "PUMP_SELECTOR_CONFIG";

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog files in priority order; later entries are fallbacks.
    pub catalog_sources: Vec<PathBuf>,
    /// Curve-table files in priority order.
    pub curve_sources: Vec<PathBuf>,
    /// Initial "show top N %" setting.
    pub display_percent: u8,
    pub ranking: RankStrategy,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_sources: vec![PathBuf::from("Pump Selection Data.csv")],
            curve_sources: vec![PathBuf::from("Pump Curve Data.csv")],
            display_percent: 100,
            ranking: RankStrategy::BestMatch,
            window_size: [1280.0, 820.0],
        }
    }
}

impl AppConfig {
    /// `$PUMP_SELECTOR_CONFIG`, else `<config dir>/pump-selector/config.json`.
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("pump-selector").join("config.json"))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file if there is one; fall back to defaults otherwise.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("{e}; using defaults");
                Self::default()
            }
        }
    }
}
