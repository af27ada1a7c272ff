//! TOML-based application settings.
//!
//! Stores the user-facing flags (theme, notifications, devmode) at
//! `~/.config/dayledger/config.toml`. The same struct is embedded in the
//! JSON export bundle.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Returns `~/.config/dayledger[-dev]/` based on DAYLEDGER_ENV.
///
/// Set DAYLEDGER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("DAYLEDGER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("dayledger-dev")
    } else {
        base_dir.join("dayledger")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default)]
    pub dev_mode: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            notifications_enabled: true,
            dev_mode: false,
        }
    }
}

impl Settings {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or, when no file exists yet, write and return the
    /// default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed,
    /// or the default cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            }),
            // Only a genuinely absent file gets the default written over
            // it; an unreadable existing file must not be clobbered.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.save_to(path)?;
                Ok(settings)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.clone(),
                message: e.to_string(),
            }),
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })
    }

    /// Get a settings value as a string by key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        json.get(key).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a settings value by key and persist.
    ///
    /// # Errors
    ///
    /// Returns an error on an unknown key, an unparsable value, or a
    /// failed save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::new(),
            message: e.to_string(),
        })?;
        let obj = json
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(key)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(value.parse::<bool>().map_err(
                |_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("cannot parse '{value}' as bool"),
                },
            )?),
            _ => serde_json::Value::String(value.to_string()),
        };
        obj.insert(key.to_string(), new_value);
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn absent_config_writes_and_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }

    #[test]
    fn unreadable_config_propagates_instead_of_clobbering() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the config path fails the read with something
        // other than NotFound; the default must not be written over it.
        let path = dir.path().join("config.toml");
        std::fs::create_dir(&path).unwrap();
        assert!(Settings::load_from(&path).is_err());
        assert!(path.is_dir());
    }

    #[test]
    fn malformed_config_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "dark_mode = \"maybe\"").unwrap();
        assert!(Settings::load_from(&path).is_err());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "dark_mode = \"maybe\""
        );
    }

    #[test]
    fn get_returns_string_for_all_flags() {
        let settings = Settings::default();
        assert_eq!(settings.get("dark_mode").as_deref(), Some("true"));
        assert_eq!(settings.get("dev_mode").as_deref(), Some("false"));
        assert!(settings.get("missing").is_none());
    }
}
