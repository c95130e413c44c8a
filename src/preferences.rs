// src/preferences.rs
// =============================================================================
// Display preferences that survive between runs.
//
// Two independent settings:
//   - theme: "dark" or "light"
//   - code_theme: the highlight palette handed to the renderer
//
// Code themes belong to one display theme. Switching the display theme
// keeps the code theme only if it fits the new mode, otherwise it falls
// back to that mode's default.
//
// Stored as TOML in ~/.config/repo-explorer/preferences.toml (or the
// platform's config dir). A missing or unreadable file means defaults.
// =============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DARK_CODE_THEMES: &[(&str, &str)] = &[
    ("vscDarkPlus", "VS Code Dark+"),
    ("oneDark", "One Dark"),
    ("atomDark", "Atom Dark"),
    ("dracula", "Dracula"),
    ("materialDark", "Material Dark"),
    ("tomorrow", "Tomorrow"),
    ("twilight", "Twilight"),
];

pub const LIGHT_CODE_THEMES: &[(&str, &str)] = &[
    ("vs", "Visual Studio"),
    ("oneLight", "One Light"),
    ("materialLight", "Material Light"),
    ("prism", "Prism"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Code themes that can be used with this display theme, as `(value, label)`.
    pub fn code_themes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Theme::Dark => DARK_CODE_THEMES,
            Theme::Light => LIGHT_CODE_THEMES,
        }
    }

    pub fn default_code_theme(self) -> &'static str {
        match self {
            Theme::Dark => "vscDarkPlus",
            Theme::Light => "vs",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    fn allows(self, code_theme: &str) -> bool {
        self.code_themes().iter().any(|(value, _)| *value == code_theme)
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "dark" => Ok(Theme::Dark),
            "light" => Ok(Theme::Light),
            other => anyhow::bail!("Unknown theme '{}': expected 'dark' or 'light'", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub theme: Theme,
    pub code_theme: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            theme: Theme::Dark,
            code_theme: Theme::Dark.default_code_theme().to_string(),
        }
    }
}

impl Preferences {
    /// Switches the display theme, resetting an incompatible code theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if !theme.allows(&self.code_theme) {
            self.code_theme = theme.default_code_theme().to_string();
        }
    }

    /// Picks a code theme; it must belong to the current display theme.
    pub fn set_code_theme(&mut self, code_theme: &str) -> Result<()> {
        if !self.theme.allows(code_theme) {
            anyhow::bail!(
                "Code theme '{}' is not available in {} mode",
                code_theme,
                self.theme
            );
        }
        self.code_theme = code_theme.to_string();
        Ok(())
    }

    // Loaded files are normalised so a hand-edited mismatch between theme
    // and code theme does not survive.
    fn normalised(mut self) -> Self {
        self.set_theme(self.theme);
        self
    }
}

/// `{config_dir}/repo-explorer/preferences.toml`
pub fn preferences_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("repo-explorer").join("preferences.toml"))
}

/// Loads from the default location, falling back to defaults.
pub fn load() -> Preferences {
    preferences_path()
        .map(|path| load_from(&path))
        .unwrap_or_default()
}

pub fn load_from(path: &Path) -> Preferences {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<Preferences>(&contents) {
            Ok(prefs) => prefs.normalised(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable preferences: {e}");
                Preferences::default()
            }
        },
        Err(_) => Preferences::default(),
    }
}

pub fn save(prefs: &Preferences) -> Result<PathBuf> {
    let path = preferences_path().context("Could not determine config directory")?;
    save_to(prefs, &path)?;
    Ok(path)
}

pub fn save_to(prefs: &Preferences, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let contents = toml::to_string_pretty(prefs).context("Failed to serialize preferences")?;
    std::fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
