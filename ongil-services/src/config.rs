//! Application configuration: `config.toml` under the user config dir, then
//! environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

pub const API_PREFIX: &str = "/api";
pub const ENV_BASE_URL: &str = "ONGIL_API_BASE_URL";
pub const ENV_DATA_DIR: &str = "ONGIL_DATA_DIR";
pub const ENV_LOG: &str = "ONGIL_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Full URL of an API route, e.g. `endpoint("/analysis")`.
    pub fn endpoint(&self, route: &str) -> String {
        format!("{}{API_PREFIX}{route}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Defaults to `<platform data dir>/ongil`.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    /// File name inside the data dir, or an absolute path.
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: PathBuf::from("ongil.log"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

impl AppConfig {
    /// `<config dir>/ongil/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ongil").join("config.toml"))
    }

    /// Load from `path` (or the default path), then apply environment overrides.
    ///
    /// A missing file is not an error; the defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);
        let mut config = match path {
            Some(path) if path.exists() => {
                let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;
                let config = Self::from_toml_str(&text)
                    .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
                info!(path = %path.display(), "loaded config");
                config
            }
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Apply `ONGIL_*` overrides from `lookup`. Blank values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = get(ENV_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(dir) = get(ENV_DATA_DIR) {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = get(ENV_LOG) {
            self.log.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url must start with http:// or https://, got '{url}'"
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid("api.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.data_dir {
            return dir.clone();
        }
        match dirs::data_dir() {
            Some(dir) => dir.join("ongil"),
            None => {
                warn!("no platform data dir, using ./.ongil");
                PathBuf::from(".ongil")
            }
        }
    }

    pub fn log_path(&self) -> PathBuf {
        if self.log.file.is_absolute() {
            self.log.file.clone()
        } else {
            self.data_dir().join(&self.log.file)
        }
    }

    pub fn community_path(&self) -> PathBuf {
        self.data_dir().join("community.json")
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir().join("session.json")
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults() {
        let c = AppConfig::default();
        assert_eq!(c.api.endpoint("/analysis"), "http://localhost:8080/api/analysis");
        assert_eq!(c.api.timeout_secs, 30);
        assert_eq!(c.log.level, "info");
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c = AppConfig::from_toml_str("[api]\nbase_url = \"https://ongil.example/\"\n").unwrap();
        assert_eq!(c.api.endpoint("/analysis"), "https://ongil.example/api/analysis");
        assert_eq!(c.api.timeout_secs, 30);
        assert_eq!(c.log.file, PathBuf::from("ongil.log"));
    }

    #[test]
    fn env_overrides_win_over_file() {
        let mut c = AppConfig::from_toml_str("[log]\nlevel = \"warn\"\n").unwrap();
        let env: HashMap<&str, &str> = [
            (ENV_BASE_URL, "http://10.0.0.2:9000"),
            (ENV_DATA_DIR, "/tmp/ongil-test"),
            (ENV_LOG, " "),
        ]
        .into_iter()
        .collect();
        c.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.api.base_url, "http://10.0.0.2:9000");
        assert_eq!(c.data_dir(), PathBuf::from("/tmp/ongil-test"));
        assert_eq!(c.community_path(), PathBuf::from("/tmp/ongil-test/community.json"));
        assert_eq!(c.log.level, "warn");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut c = AppConfig::default();
        c.api.base_url = "localhost:8080".into();
        assert!(matches!(c.validate(), Err(ConfigError::Invalid(_))));
        c.api.base_url = "http://localhost".into();
        c.api.timeout_secs = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api\nbase_url = 1").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn load_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let c = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(c.api.timeout_secs, 30);
    }

    #[test]
    fn toml_round_trip() {
        let mut c = AppConfig::default();
        c.storage.data_dir = Some(PathBuf::from("/var/lib/ongil"));
        let text = c.to_toml_string().unwrap();
        assert_eq!(AppConfig::from_toml_str(&text).unwrap(), c);
    }
}
