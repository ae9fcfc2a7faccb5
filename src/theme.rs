//! Theme preference, passed explicitly to whatever renders the widget.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::preferences::{PreferenceError, PreferenceStore};

/// Preference key holding the chosen theme.
pub const THEME_STORAGE_KEY: &str = "app_theme_preference";

pub const DEFAULT_THEME: ThemePreference = ThemePreference::Light;

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("invalid theme: {0}. Must be one of: light, dark, system")]
    InvalidTheme(String),
    #[error(transparent)]
    Storage(#[from] PreferenceError),
}

/// Theme chosen by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
    /// Follow the operating system
    System,
}

impl ThemePreference {
    pub const ALL: [ThemePreference; 3] = [
        ThemePreference::Light,
        ThemePreference::Dark,
        ThemePreference::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s)
            .ok_or_else(|| ThemeError::InvalidTheme(s.to_string()))
    }
}

/// Theme actually applied once `system` is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedTheme {
    Light,
    Dark,
}

/// Theme state handed to the render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeContext {
    preference: ThemePreference,
    system_prefers_dark: bool,
}

impl ThemeContext {
    pub fn new(preference: ThemePreference, system_prefers_dark: bool) -> Self {
        Self {
            preference,
            system_prefers_dark,
        }
    }

    /// Reads the stored preference. A missing or unknown value falls back to
    /// dark when the system prefers dark, otherwise to the default theme.
    pub fn load(
        store: &dyn PreferenceStore,
        system_prefers_dark: bool,
    ) -> Result<Self, PreferenceError> {
        let stored = store.get(THEME_STORAGE_KEY)?;
        let preference = match stored.as_deref().map(str::parse::<ThemePreference>) {
            Some(Ok(theme)) => theme,
            Some(Err(err)) => {
                log::warn!("ignoring stored theme: {err}");
                Self::fallback(system_prefers_dark)
            }
            None => Self::fallback(system_prefers_dark),
        };
        Ok(Self::new(preference, system_prefers_dark))
    }

    fn fallback(system_prefers_dark: bool) -> ThemePreference {
        if system_prefers_dark {
            ThemePreference::Dark
        } else {
            DEFAULT_THEME
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn effective(&self) -> ResolvedTheme {
        match self.preference {
            ThemePreference::Light => ResolvedTheme::Light,
            ThemePreference::Dark => ResolvedTheme::Dark,
            ThemePreference::System if self.system_prefers_dark => ResolvedTheme::Dark,
            ThemePreference::System => ResolvedTheme::Light,
        }
    }

    pub fn is_dark(&self) -> bool {
        self.effective() == ResolvedTheme::Dark
    }

    pub fn is_light(&self) -> bool {
        self.effective() == ResolvedTheme::Light
    }

    pub fn is_theme(&self, theme: ResolvedTheme) -> bool {
        self.effective() == theme
    }

    /// Records a change of the operating system's colour scheme.
    pub fn set_system_prefers_dark(&mut self, prefers_dark: bool) {
        self.system_prefers_dark = prefers_dark;
    }

    /// Validates and persists a new theme. Nothing changes on error.
    pub fn change_theme(
        &mut self,
        store: &dyn PreferenceStore,
        name: &str,
    ) -> Result<(), ThemeError> {
        let preference: ThemePreference = name.parse()?;
        store.set(THEME_STORAGE_KEY, preference.as_str())?;
        self.preference = preference;
        log::debug!("theme changed to {preference}");
        Ok(())
    }
}

impl Default for ThemeContext {
    fn default() -> Self {
        Self::new(DEFAULT_THEME, false)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::preferences::MemoryPreferenceStore;

    #[rstest]
    #[case(None, false, ThemePreference::Light)]
    #[case(None, true, ThemePreference::Dark)]
    #[case(Some("system"), true, ThemePreference::System)]
    #[case(Some("light"), true, ThemePreference::Light)]
    #[case(Some("purple"), false, ThemePreference::Light)]
    #[case(Some("purple"), true, ThemePreference::Dark)]
    fn initial_preference(
        #[case] stored: Option<&str>,
        #[case] system_dark: bool,
        #[case] expected: ThemePreference,
    ) {
        let store = MemoryPreferenceStore::default();
        if let Some(value) = stored {
            store.set(THEME_STORAGE_KEY, value).unwrap();
        }
        let ctx = ThemeContext::load(&store, system_dark).unwrap();
        assert_eq!(ctx.preference(), expected);
    }

    #[test]
    fn system_follows_os_scheme() {
        let mut ctx = ThemeContext::new(ThemePreference::System, false);
        assert!(ctx.is_light());
        ctx.set_system_prefers_dark(true);
        assert!(ctx.is_dark());
        assert!(ctx.is_theme(ResolvedTheme::Dark));
    }

    #[test]
    fn change_theme_persists_valid_names() {
        let store = MemoryPreferenceStore::default();
        let mut ctx = ThemeContext::default();
        ctx.change_theme(&store, "dark").unwrap();
        assert_eq!(ctx.effective(), ResolvedTheme::Dark);
        assert_eq!(
            store.get(THEME_STORAGE_KEY).unwrap().as_deref(),
            Some("dark")
        );
    }

    #[test]
    fn invalid_theme_changes_nothing() {
        let store = MemoryPreferenceStore::default();
        let mut ctx = ThemeContext::default();
        let err = ctx.change_theme(&store, "Dark").unwrap_err();
        assert!(matches!(err, ThemeError::InvalidTheme(_)));
        assert_eq!(ctx.preference(), ThemePreference::Light);
        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn preference_serializes_lowercase() {
        let json = serde_json::to_string(&ThemePreference::System).unwrap();
        assert_eq!(json, "\"system\"");
    }
}
