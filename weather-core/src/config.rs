use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::{Language, Units};

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const SPEECH_KEY_ENV: &str = "GOOGLE_SPEECH_API_KEY";

/// Base URLs of the external services. Overridable so tests and proxies can
/// point the app elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub weather: String,
    pub icons: String,
    pub translation: String,
    pub speech: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            weather: "https://api.openweathermap.org/data/2.5".to_string(),
            icons: "https://openweathermap.org/img/wn".to_string(),
            translation: "https://api.mymemory.translated.net".to_string(),
            speech: "https://speech.googleapis.com".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// language = "hi"
///
/// [endpoints]
/// weather = "https://api.openweathermap.org/data/2.5"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,
    /// Google Speech-to-Text API key, used for voice search.
    pub speech_api_key: Option<String>,
    pub units: Units,
    pub language: Language,
    pub endpoints: Endpoints,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Overlay API keys from the environment, which win over the file.
    pub fn apply_env(&mut self) {
        self.apply_overrides(std::env::var(API_KEY_ENV).ok(), std::env::var(SPEECH_KEY_ENV).ok());
    }

    fn apply_overrides(&mut self, api_key: Option<String>, speech_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(key) = speech_key.filter(|k| !k.trim().is_empty()) {
            self.speech_api_key = Some(key);
        }
    }

    /// Returns the weather API key or a hint on how to configure one.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {API_KEY_ENV}."
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_api_key_has_hint() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let cfg = Config::from_toml(
            r#"
            api_key = "KEY"
            language = "mr"
            [endpoints]
            weather = "http://localhost:9000"
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.require_api_key().unwrap(), "KEY");
        assert_eq!(cfg.language, Language::Marathi);
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.endpoints.weather, "http://localhost:9000");
        assert_eq!(cfg.endpoints.icons, Endpoints::default().icons);
    }

    #[test]
    fn toml_round_trip_keeps_units() {
        let cfg = Config { units: Units::Imperial, ..Config::default() };
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("units = \"imperial\""));
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }

    #[test]
    fn env_overrides_win_but_blank_is_ignored() {
        let mut cfg = Config { api_key: Some("FILE".into()), ..Config::default() };
        cfg.apply_overrides(Some("ENV".into()), Some("  ".into()));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV"));
        assert_eq!(cfg.speech_api_key, None);
    }
}
