//! User-facing display preferences stored alongside the finance records.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};

/// Display currency. Amounts are never converted; this is a label only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Currency {
    pub code: String,
    pub symbol: String,
    pub name: String,
}

impl Currency {
    pub fn new(code: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into().to_uppercase(),
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    pub fn usd() -> Self {
        Self::new("USD", "$", "US Dollar")
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub first_time_setup_completed: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            user_name: String::new(),
            currency: Currency::default(),
            theme: Theme::default(),
            first_time_setup_completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
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
        Ok(value.map(|v| Theme::from_str(&v)).unwrap_or_default())
    }
}
