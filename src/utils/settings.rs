use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Persisted application state: the gateway credential and the theme mode.
/// The credential is written eagerly when a catalog load is initiated, which
/// means an unvalidated key can end up on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub openrouter_api_key: Option<String>,
    pub theme_mode: ThemeMode,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn data_theme(self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not find a config directory")]
    NoConfigDir,
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            theme_mode: ThemeMode::Dark,
        }
    }
}

impl Settings {
    /// Platform-specific settings directory.
    pub fn settings_dir() -> Result<PathBuf, SettingsError> {
        let config_dir = if cfg!(any(target_os = "windows", target_os = "macos")) {
            dirs::config_dir()
                .ok_or(SettingsError::NoConfigDir)?
                .join("modelgrid")
        } else {
            dirs::home_dir()
                .ok_or(SettingsError::NoConfigDir)?
                .join(".modelgrid")
        };

        Ok(config_dir)
    }

    pub fn settings_path() -> Result<PathBuf, SettingsError> {
        Ok(Self::settings_dir()?.join("settings.toml"))
    }

    /// Load from the config file; defaults when the file doesn't exist yet.
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&Self::settings_path()?)
    }

    fn load_from(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let dir = Self::settings_dir()?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        self.save_to(&Self::settings_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        // The key is a live credential; owner-only on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.openrouter_api_key.is_some()
    }

    pub fn get_api_key(&self) -> Option<&str> {
        self.openrouter_api_key.as_deref()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openrouter_api_key = Some(api_key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.openrouter_api_key, None);
        assert_eq!(settings.theme_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_has_api_key() {
        let mut settings = Settings::default();
        assert!(!settings.has_api_key());

        settings.set_api_key("test-key".to_string());
        assert!(settings.has_api_key());
        assert_eq!(settings.get_api_key(), Some("test-key"));
    }

    #[test]
    fn test_theme_mode_toggle() {
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut settings = Settings::default();
        settings.set_api_key("sk-or-v1-test".to_string());
        settings.theme_mode = ThemeMode::Light;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Settings::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(loaded, Settings::default());
    }
}
