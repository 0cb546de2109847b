//! Ceroba configuration document.
//!
//! Persisted as pretty-printed JSON with stable camelCase key names. Keys
//! missing from the file take their default value.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the bundled Vosk speech model.
pub const DEFAULT_VOSK_MODEL_PATH: &str = "ceroba-assets/models/vosk-model-small-ru-0.22.zip";

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file could not be written.
    #[error("failed to save configuration to {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not a valid document.
    #[error("failed to parse configuration {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CerobaConfig {
    #[serde(rename = "useInternalVoskModel")]
    use_internal_vosk_model: bool,

    #[serde(rename = "voskModelPath")]
    vosk_model_path: String,
}

impl Default for CerobaConfig {
    fn default() -> Self {
        Self {
            use_internal_vosk_model: true,
            vosk_model_path: DEFAULT_VOSK_MODEL_PATH.to_string(),
        }
    }
}

impl CerobaConfig {
    /// Load the configuration from `path`.
    ///
    /// When the file does not exist, the default configuration is written to
    /// `path` (creating parent directories) and returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
        } else {
            log::info!("No configuration at {}, writing defaults", path.display());
            let config = Self::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Save the configuration to `path` as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)
    }

    /// Whether the bundled Vosk model is used.
    pub fn use_internal_vosk_model(&self) -> bool {
        self.use_internal_vosk_model
    }

    pub fn set_use_internal_vosk_model(&mut self, value: bool) {
        self.use_internal_vosk_model = value;
    }

    /// Path of the Vosk model archive.
    pub fn vosk_model_path(&self) -> &str {
        &self.vosk_model_path
    }

    pub fn set_vosk_model_path(&mut self, value: impl Into<String>) {
        self.vosk_model_path = value.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ceroba.json");

        let config = CerobaConfig::load(&path).unwrap();
        assert!(config.use_internal_vosk_model());
        assert_eq!(config.vosk_model_path(), DEFAULT_VOSK_MODEL_PATH);

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["useInternalVoskModel"], true);
        assert_eq!(written["voskModelPath"], DEFAULT_VOSK_MODEL_PATH);
    }

    #[test]
    fn test_load_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("conf").join("ceroba.json");

        CerobaConfig::load(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ceroba.json");
        fs::write(
            &path,
            r#"{ "useInternalVoskModel": false, "voskModelPath": "/opt/vosk/model.zip" }"#,
        )
        .unwrap();

        let config = CerobaConfig::load(&path).unwrap();
        assert!(!config.use_internal_vosk_model());
        assert_eq!(config.vosk_model_path(), "/opt/vosk/model.zip");
    }

    #[test]
    fn test_missing_keys_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ceroba.json");
        fs::write(&path, r#"{ "useInternalVoskModel": false }"#).unwrap();

        let config = CerobaConfig::load(&path).unwrap();
        assert!(!config.use_internal_vosk_model());
        assert_eq!(config.vosk_model_path(), DEFAULT_VOSK_MODEL_PATH);
    }

    #[test]
    fn test_invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ceroba.json");
        fs::write(&path, "not json at all").unwrap();

        let err = CerobaConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("ceroba.json"));
    }

    #[test]
    fn test_saved_changes_are_loaded_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ceroba.json");

        let mut config = CerobaConfig::load(&path).unwrap();
        config.set_use_internal_vosk_model(false);
        config.set_vosk_model_path("models/custom.zip");
        config.save(&path).unwrap();

        assert_eq!(CerobaConfig::load(&path).unwrap(), config);
    }
}
