//! Theme preference types

use serde::{Deserialize, Serialize};

/// Theme mode selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    System,
}

impl ThemeMode {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

/// Persisted theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub is_dark: bool,
}

impl ThemeSettings {
    /// Settings for an explicitly chosen mode
    pub fn with_mode(mode: ThemeMode) -> Self {
        Self {
            mode,
            is_dark: mode == ThemeMode::Dark,
        }
    }

    /// Flip between light and dark; `system` flips to light
    #[must_use]
    pub fn toggled(self) -> Self {
        match self.mode {
            ThemeMode::Light => Self::with_mode(ThemeMode::Dark),
            ThemeMode::Dark | ThemeMode::System => Self::with_mode(ThemeMode::Light),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_dark_mode_is_dark() {
        assert!(ThemeSettings::with_mode(ThemeMode::Dark).is_dark);
        assert!(!ThemeSettings::with_mode(ThemeMode::System).is_dark);
        assert!(!ThemeSettings::default().is_dark);
    }

    #[test]
    fn toggle_flips_light_and_dark() {
        let light = ThemeSettings::default();
        let dark = light.toggled();
        assert_eq!(dark.mode, ThemeMode::Dark);
        assert_eq!(dark.toggled().mode, ThemeMode::Light);
        assert_eq!(
            ThemeSettings::with_mode(ThemeMode::System).toggled().mode,
            ThemeMode::Light
        );
    }
}
