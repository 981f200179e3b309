use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const API_KEY_VAR: &str = "API_KEY";
const DATA_DIR: &str = "hujiang_case";

// Define a structure to hold application settings with serialization and deserialization capabilities.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub language: String,        // Language the Game Master writes in.
    pub api_key: Option<String>, // Optional API key for the hosted model.
    pub api_base: String,        // OpenAI-compatible endpoint of the provider.
    pub model: String,
    pub debug_mode: bool, // Flag to enable or disable debug mode.
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            language: "Traditional Chinese (Taiwan usage)".to_string(),
            api_key: None,
            api_base: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
            model: "gemini-2.5-flash".to_string(),
            debug_mode: false,
        }
    }
}

impl Settings {
    /// Loads the settings file, falling back to defaults, then lets the
    /// environment override the API key.
    pub fn load() -> Result<Self> {
        let path = settings_path()?;
        Ok(Self::load_from(&path, std::env::var(API_KEY_VAR).ok()))
    }

    pub fn load_from(path: &Path, env_key: Option<String>) -> Self {
        let settings = match Self::load_settings_from_file(path) {
            Ok(settings) => settings,
            Err(AppError::IO(e)) if e.kind() == ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                // A stored key is lost here, so leave a trace.
                log::warn!("Unreadable settings at {}, using defaults: {e}", path.display());
                Settings::default()
            }
        };
        settings.with_api_key_from(env_key)
    }

    pub fn load_settings_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&data)?;
        Ok(settings)
    }

    /// A non-empty key from the environment wins over the stored one.
    pub fn with_api_key_from(mut self, env_key: Option<String>) -> Self {
        if let Some(key) = env_key.filter(|key| !key.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

pub fn data_dir() -> Result<PathBuf> {
    let home_dir = dir::home_dir().ok_or(AppError::NoHomeDirectory)?;
    Ok(home_dir.join(DATA_DIR).join("data"))
}

fn settings_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("settings.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_load_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        let settings = Settings {
            language: "English".to_string(),
            api_key: Some("stored".to_string()),
            debug_mode: true,
            ..Settings::default()
        };
        fs::write(&path, serde_json::to_string_pretty(&settings).expect("serialize"))
            .expect("write settings");

        assert_eq!(Settings::load_from(&path, None), settings);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "model": "gemini-2.5-pro" }"#).expect("write settings");

        let loaded = Settings::load_settings_from_file(&path).expect("load settings");
        assert_eq!(loaded.model, "gemini-2.5-pro");
        assert_eq!(loaded.api_base, Settings::default().api_base);
        assert_eq!(loaded.api_key, None);
    }

    #[test]
    fn missing_or_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.json");
        assert_eq!(Settings::load_from(&missing, None), Settings::default());

        let corrupt = dir.path().join("settings.json");
        fs::write(&corrupt, "{ \"api_key\": ").expect("write settings");
        assert!(matches!(
            Settings::load_settings_from_file(&corrupt),
            Err(AppError::Serialization(_))
        ));
        let loaded = Settings::load_from(&corrupt, Some("from-env".into()));
        assert_eq!(loaded.api_key.as_deref(), Some("from-env"));
        assert_eq!(loaded.model, Settings::default().model);
    }

    #[test]
    fn environment_key_overrides_stored_key() {
        let stored = Settings {
            api_key: Some("stored".to_string()),
            ..Settings::default()
        };
        assert_eq!(
            stored.clone().with_api_key_from(Some("from-env".into())).api_key.as_deref(),
            Some("from-env")
        );
        assert_eq!(
            stored.clone().with_api_key_from(Some("  ".into())).api_key.as_deref(),
            Some("stored")
        );
        assert!(!Settings::default().with_api_key_from(None).has_api_key());
    }
}
