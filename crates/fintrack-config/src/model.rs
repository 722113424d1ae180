use serde::{de::Deserializer, Deserialize, Serialize};
use std::{env, fmt, path::PathBuf};

use crate::ConfigError;

/// Environment variable that overrides the default data root.
pub const HOME_ENV: &str = "FINTRACK_HOME";
pub const DEFAULT_STORAGE_KEY: &str = "finance-storage";
/// Upper bound for projection and history ranges.
pub const MAX_RANGE_MONTHS: u32 = 120;

/// Stores user-configurable CLI preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub locale: String,
    /// ISO 4217 code of the display currency.
    pub currency: String,
    #[serde(default = "Config::default_storage_key")]
    pub storage_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root for documents and backups. Defaults to `$FINTRACK_HOME`
    /// or `~/.fintrack`.
    pub data_root: Option<PathBuf>,
    #[serde(default = "Config::default_range_months")]
    pub projection_months: u32,
    #[serde(default = "Config::default_range_months")]
    pub history_months: u32,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default)]
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            storage_key: Self::default_storage_key(),
            data_root: None,
            projection_months: Self::default_range_months(),
            history_months: Self::default_range_months(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn default_storage_key() -> String {
        DEFAULT_STORAGE_KEY.into()
    }

    pub fn default_range_months() -> u32 {
        12
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Root directory for stored documents: `data_root`, then `$FINTRACK_HOME`,
    /// then `~/.fintrack`.
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        Self::default_home()
    }

    /// Base directory used when no explicit data root is configured.
    pub fn default_home() -> PathBuf {
        if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            return PathBuf::from(home);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".fintrack")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid("currency cannot be empty".into()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage key cannot be empty".into()));
        }
        for (field, value) in [
            ("projection_months", self.projection_months),
            ("history_months", self.history_months),
        ] {
            if value == 0 || value > MAX_RANGE_MONTHS {
                return Err(ConfigError::Invalid(format!(
                    "{field} must be between 1 and {MAX_RANGE_MONTHS} (got {value})"
                )));
            }
        }
        Ok(())
    }
}

/// How much decoration the CLI adds around figures.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Plain,
    #[default]
    Rich,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_str(v.trim()))
            .unwrap_or_default()
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Theme::Plain,
            _ => Theme::Rich,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Plain => "plain",
            Theme::Rich => "rich",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config: Config =
            serde_json::from_str(r#"{"locale":"en-US","currency":"EUR","theme":"neon"}"#)
                .expect("parse config");
        assert_eq!(config.theme, Theme::Rich);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.projection_months, 12);
        assert!(config.ui_color_enabled);
    }

    #[test]
    fn explicit_data_root_wins() {
        let config = Config {
            data_root: Some(PathBuf::from("/srv/fintrack")),
            ..Config::default()
        };
        assert_eq!(config.resolve_data_root(), PathBuf::from("/srv/fintrack"));
    }

    #[test]
    fn validate_rejects_empty_ranges() {
        let config = Config {
            history_months: 0,
            ..Config::default()
        };
        let err = config.validate().expect_err("zero months");
        assert!(err.to_string().contains("history_months"));
        assert!(Config::default().validate().is_ok());
    }
}
