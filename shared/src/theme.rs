//! Light/dark theme preference.

use crate::config::THEME_KEY;
use crate::storage::{KeyValueStore, StorageError};
use log::{error, warn};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme `{0}`")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// The document the theme is applied to.
pub trait ThemeSurface {
    /// Set the theme attribute the stylesheet keys off (`data-bs-theme`).
    fn set_theme_attribute(&mut self, theme: Theme);

    /// Explicit background override; `None` clears it.
    fn set_background_override(&mut self, color: Option<&str>);

    /// Resolved dark background color (the `--dark-bg` custom property).
    fn dark_background(&self) -> String;
}

/// Apply a theme. Re-applying the same theme is a no-op in effect.
pub fn apply_theme<T: ThemeSurface + ?Sized>(theme: Theme, surface: &mut T) {
    surface.set_theme_attribute(theme);
    match theme {
        Theme::Dark => {
            let color = surface.dark_background();
            surface.set_background_override(Some(color.trim()));
        }
        Theme::Light => surface.set_background_override(None),
    }
}

/// Two-state toggle backed by a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct ThemeToggle<S> {
    store: S,
    current: Theme,
}

impl<S: KeyValueStore> ThemeToggle<S> {
    /// Reads the persisted theme; anything missing or unrecognised is light.
    pub fn new(store: S) -> Self {
        let current = match store.get(THEME_KEY) {
            None => Theme::Light,
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored theme: {}", e);
                Theme::Light
            }),
        };
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip, persist and apply. Returns the new theme.
    pub fn toggle<T: ThemeSurface + ?Sized>(&mut self, surface: &mut T) -> Theme {
        self.current = self.current.toggled();
        if let Err(e) = self.persist() {
            error!("Theme switched to {} but not saved: {}", self.current, e);
        }
        apply_theme(self.current, surface);
        self.current
    }

    /// Apply the current theme without changing it, e.g. on page load.
    pub fn apply<T: ThemeSurface + ?Sized>(&self, surface: &mut T) {
        apply_theme(self.current, surface);
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.store.set(THEME_KEY, self.current.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[derive(Default)]
    struct FakeDocument {
        attribute: Option<Theme>,
        background: Option<String>,
    }

    impl ThemeSurface for FakeDocument {
        fn set_theme_attribute(&mut self, theme: Theme) {
            self.attribute = Some(theme);
        }

        fn set_background_override(&mut self, color: Option<&str>) {
            self.background = color.map(str::to_string);
        }

        fn dark_background(&self) -> String {
            " #1e1e2f ".to_string()
        }
    }

    #[test]
    fn test_defaults_to_light() {
        let toggle = ThemeToggle::new(MemoryStore::new());
        assert_eq!(toggle.current(), Theme::Light);
    }

    #[test]
    fn test_unknown_stored_value_defaults_to_light() {
        let store = MemoryStore::new();
        store.insert(THEME_KEY, "sepia");
        assert_eq!(ThemeToggle::new(store).current(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists_and_sets_dark_background() {
        let store = MemoryStore::new();
        let mut toggle = ThemeToggle::new(store.clone());
        let mut document = FakeDocument::default();

        assert_eq!(toggle.toggle(&mut document), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));
        assert_eq!(document.attribute, Some(Theme::Dark));
        assert_eq!(document.background.as_deref(), Some("#1e1e2f"));
    }

    #[test]
    fn test_double_toggle_restores_original_and_clears_override() {
        let store = MemoryStore::new();
        let mut toggle = ThemeToggle::new(store.clone());
        let mut document = FakeDocument::default();

        toggle.toggle(&mut document);
        toggle.toggle(&mut document);

        assert_eq!(toggle.current(), Theme::Light);
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(document.attribute, Some(Theme::Light));
        assert!(document.background.is_none());
    }

    #[test]
    fn test_apply_on_load_is_idempotent() {
        let store = MemoryStore::new();
        store.insert(THEME_KEY, "dark");
        let toggle = ThemeToggle::new(store);
        let mut document = FakeDocument::default();

        toggle.apply(&mut document);
        toggle.apply(&mut document);

        assert_eq!(document.attribute, Some(Theme::Dark));
        assert_eq!(document.background.as_deref(), Some("#1e1e2f"));
    }

    #[test]
    fn test_toggle_without_storage_still_switches() {
        let mut toggle = ThemeToggle::new(MemoryStore::read_only());
        let mut document = FakeDocument::default();
        assert_eq!(toggle.toggle(&mut document), Theme::Dark);
        assert_eq!(document.attribute, Some(Theme::Dark));
    }
}
