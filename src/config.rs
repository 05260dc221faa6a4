// Runtime configuration
//
// Layered: built-in defaults, then a JSON file (~/.videoscout/config.json or an
// explicit path), then VIDEOSCOUT_* environment variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_FILENAME, DEFAULT_GRAMMAR_LANGUAGE, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LANGUAGETOOL_URL,
    DEFAULT_TRANSCRIPTION_LANGUAGE, DEFAULT_WHISPER_MODEL_FILE, DEFAULT_WORKERS, MAX_WORKERS,
    MODELS_FOLDER, VIDEOSCOUT_FOLDER,
};
use crate::error::{Result, ScoutError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// whisper.cpp model file. None means ~/.videoscout/models/ggml-base.bin
    pub whisper_model: Option<PathBuf>,
    pub transcription_language: String,
    pub languagetool_url: String,
    pub grammar_language: String,
    pub workers: usize,
    pub http_timeout_secs: u64,
    /// Where extracted audio is written. None means the system temp dir
    pub temp_dir: Option<PathBuf>,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            whisper_model: None,
            transcription_language: DEFAULT_TRANSCRIPTION_LANGUAGE.to_string(),
            languagetool_url: DEFAULT_LANGUAGETOOL_URL.to_string(),
            grammar_language: DEFAULT_GRAMMAR_LANGUAGE.to_string(),
            workers: DEFAULT_WORKERS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            temp_dir: None,
        }
    }
}

/// ~/.videoscout
fn home_folder() -> Result<PathBuf> {
    let home = directories::BaseDirs::new()
        .ok_or_else(|| ScoutError::Config("Could not determine home directory".to_string()))?;
    Ok(home.home_dir().join(VIDEOSCOUT_FOLDER))
}

/// Get the path to the default config file: ~/.videoscout/config.json
pub fn default_config_path() -> Result<PathBuf> {
    Ok(home_folder()?.join(CONFIG_FILENAME))
}

impl ScoutConfig {
    /// Load configuration.
    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(ScoutError::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)?
            }
            None => match default_config_path() {
                Ok(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents).map_err(|e| {
            ScoutError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply VIDEOSCOUT_* overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("VIDEOSCOUT_WHISPER_MODEL") {
            self.whisper_model = Some(PathBuf::from(v));
        }
        if let Some(v) = lookup("VIDEOSCOUT_LANGUAGETOOL_URL") {
            self.languagetool_url = v;
        }
        if let Some(v) = lookup("VIDEOSCOUT_GRAMMAR_LANGUAGE") {
            self.grammar_language = v;
        }
        if let Some(v) = lookup("VIDEOSCOUT_WORKERS") {
            self.workers = v.trim().parse().map_err(|_| {
                ScoutError::Config(format!("VIDEOSCOUT_WORKERS is not a number: {}", v))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(ScoutError::Config(format!(
                "workers must be between 1 and {}, got {}",
                MAX_WORKERS, self.workers
            )));
        }
        if !(self.languagetool_url.starts_with("http://")
            || self.languagetool_url.starts_with("https://"))
        {
            return Err(ScoutError::Config(format!(
                "languagetool_url must be an http(s) URL, got {}",
                self.languagetool_url
            )));
        }
        if self.grammar_language.trim().is_empty() {
            return Err(ScoutError::Config("grammar_language is empty".to_string()));
        }
        if self.http_timeout_secs == 0 {
            return Err(ScoutError::Config("http_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Resolved whisper model path
    pub fn whisper_model_path(&self) -> Result<PathBuf> {
        match &self.whisper_model {
            Some(path) => Ok(path.clone()),
            None => Ok(home_folder()?.join(MODELS_FOLDER).join(DEFAULT_WHISPER_MODEL_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ScoutConfig::default();
        assert_eq!(config.workers, 2);
        assert_eq!(config.grammar_language, "en-GB");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"workers": 4, "languagetool_url": "http://lt:8010"}"#).unwrap();

        let config = ScoutConfig::load(Some(&path)).unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.languagetool_url, "http://lt:8010");
        assert_eq!(config.transcription_language, "en");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScoutConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert_eq!(err.kind(), "config_error");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ workers: ").unwrap();
        assert_eq!(ScoutConfig::from_file(&path).unwrap_err().kind(), "config_error");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ScoutConfig::default();
        config
            .apply_env_overrides(env(&[
                ("VIDEOSCOUT_WORKERS", " 3 "),
                ("VIDEOSCOUT_GRAMMAR_LANGUAGE", "en-US"),
                ("VIDEOSCOUT_WHISPER_MODEL", "/models/small.bin"),
            ]))
            .unwrap();

        assert_eq!(config.workers, 3);
        assert_eq!(config.grammar_language, "en-US");
        assert_eq!(config.whisper_model_path().unwrap(), PathBuf::from("/models/small.bin"));
        assert_eq!(config.languagetool_url, DEFAULT_LANGUAGETOOL_URL);
    }

    #[test]
    fn test_bad_worker_env_is_error() {
        let mut config = ScoutConfig::default();
        let err = config
            .apply_env_overrides(env(&[("VIDEOSCOUT_WORKERS", "many")]))
            .unwrap_err();
        assert_eq!(err.kind(), "config_error");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_workers = ScoutConfig { workers: 0, ..Default::default() };
        assert!(zero_workers.validate().is_err());

        let too_many = ScoutConfig { workers: MAX_WORKERS + 1, ..Default::default() };
        assert!(too_many.validate().is_err());

        let bad_url = ScoutConfig { languagetool_url: "localhost:8081".into(), ..Default::default() };
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_default_model_under_home_folder() {
        let config = ScoutConfig::default();
        // No home directory is a config error, not a panic
        if let Ok(path) = config.whisper_model_path() {
            assert!(path.ends_with(".videoscout/models/ggml-base.bin"));
        }
    }
}
