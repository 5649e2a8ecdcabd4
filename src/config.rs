use crate::client::ApiSettings;
use crate::pdf::{PdfFonts, ThemeName};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "ASTROLUMINA_CONFIG";
pub const API_KEY_ENV: &str = "ASTROLUMINA_API_KEY";
const DEFAULT_CONFIG_FILE: &str = "astrolumina.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeoSettings {
    /// JSON dataset replacing the bundled one
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfSettings {
    #[serde(flatten)]
    pub fonts: PdfFonts,
    pub theme: ThemeName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    pub api: ApiSettings,
    pub geo: GeoSettings,
    pub pdf: PdfSettings,
    pub server: ServerSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            api: ApiSettings::default(),
            geo: GeoSettings::default(),
            pdf: PdfSettings::default(),
            server: ServerSettings::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text, &path.display().to_string())
    }

    /// Explicit path, else `./astrolumina.toml` when present, else defaults.
    /// `ASTROLUMINA_API_KEY` overrides the file's key.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::from_path(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_path(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };
        config.apply_api_key(std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.is_empty()) {
            self.api.api_key = Some(key);
        }
    }
}
