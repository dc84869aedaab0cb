//! Theme preference — the only persisted setting.
//!
//! One key, [`THEME_KEY`], holding one of the [`Theme`] names. It is read
//! once on load and written on every change. Anything absent or
//! unrecognised falls back to [`Theme::Light`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PreferenceError;

pub const THEME_KEY: &str = "morse-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const ALL: [Theme; 2] = [Theme::Light, Theme::Dark];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(name: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Class applied to the page body.
    pub fn css_class(self) -> String {
        format!("theme-{}", self.as_str())
    }
}

/// Resolve a stored value to a theme, falling back to the default.
pub fn resolve_theme(stored: Option<&str>) -> Theme {
    match stored {
        Some(name) => Theme::parse(name).unwrap_or_else(|| {
            log::debug!("unrecognised theme {name:?}, using default");
            Theme::default()
        }),
        None => Theme::default(),
    }
}

// ── Stores ──────────────────────────────────────────────────

/// A string-valued key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// In-process store, for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk. The file is created on the first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Map<String, Value>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = if path.exists() {
            let text = fs::read_to_string(&path).map_err(|e| PreferenceError::Io {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            serde_json::from_str(&text).map_err(|e| PreferenceError::Malformed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            Map::new()
        };
        Ok(JsonFileStore { path, values })
    }

    /// `preferences.json` in the per-user config directory.
    #[cfg(feature = "native")]
    pub fn default_location() -> Result<PathBuf, PreferenceError> {
        directories::ProjectDirs::from("", "", "morse-translator")
            .map(|dirs| dirs.config_dir().join("preferences.json"))
            .ok_or(PreferenceError::NoConfigDir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), PreferenceError> {
        let io_err = |e: std::io::Error| PreferenceError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(&self.values).map_err(|e| {
            PreferenceError::Malformed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        fs::write(&self.path, text).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).and_then(Value::as_str).map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values
            .insert(key.to_string(), Value::String(value.to_string()));
        self.write()
    }
}

// ── Theme preference ────────────────────────────────────────

#[derive(Debug)]
pub struct ThemePreference<K: KeyValueStore> {
    store: K,
    theme: Theme,
}

impl<K: KeyValueStore> ThemePreference<K> {
    pub fn load(store: K) -> Self {
        let theme = resolve_theme(store.get(THEME_KEY).as_deref());
        log::debug!("theme loaded: {}", theme.as_str());
        ThemePreference { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Apply and persist a theme. The in-memory value changes even if the
    /// write fails.
    pub fn set(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        self.theme = theme;
        self.store.set(THEME_KEY, theme.as_str())
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn into_store(self) -> K {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("morse-core-{}-{name}", std::process::id()))
            .join("preferences.json")
    }

    #[test]
    fn defaults_to_light() {
        let pref = ThemePreference::load(MemoryStore::default());
        assert_eq!(pref.theme(), Theme::Light);
    }

    #[test]
    fn unknown_value_falls_back() {
        let mut store = MemoryStore::default();
        store.set(THEME_KEY, "neon").unwrap();
        assert_eq!(ThemePreference::load(store).theme(), Theme::Light);
    }

    #[test]
    fn set_writes_through() {
        let mut pref = ThemePreference::load(MemoryStore::default());
        pref.set(Theme::Dark).unwrap();
        assert_eq!(pref.store().get(THEME_KEY).as_deref(), Some("dark"));

        let reloaded = ThemePreference::load(pref.into_store());
        assert_eq!(reloaded.theme(), Theme::Dark);
    }

    #[test]
    fn file_store_persists_across_reload() {
        let path = scratch_path("reload");
        let _ = fs::remove_file(&path);

        let mut pref = ThemePreference::load(JsonFileStore::open(&path).unwrap());
        assert_eq!(pref.theme(), Theme::Light);
        pref.set(Theme::Dark).unwrap();

        let reopened = ThemePreference::load(JsonFileStore::open(&path).unwrap());
        assert_eq!(reopened.theme(), Theme::Dark);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_path("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        let err = JsonFileStore::open(&path).unwrap_err();
        assert!(matches!(err, PreferenceError::Malformed { .. }));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn theme_names() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("Dark"), None);
        assert_eq!(Theme::Light.css_class(), "theme-light");
        assert_eq!(resolve_theme(None), Theme::Light);
    }
}
