//! Light/dark theme preference
//!
//! The preference lives under the `theme` key. When nothing valid is stored
//! the terminal's own color scheme decides.

use super::{SharedStorage, THEME_KEY};
use std::fmt;

/// Available display modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Parse a persisted value; anything but the two exact names is invalid
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visible state of the theme toggle control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    pub label: &'static str,
    pub pressed: bool,
}

impl ToggleState {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self { label: "switch to light", pressed: true },
            ThemeMode::Light => Self { label: "switch to dark", pressed: false },
        }
    }
}

/// Derive the system preference from `COLORFGBG` (`"fg;bg"` or `"fg;default;bg"`)
pub fn system_preference(colorfgbg: Option<&str>) -> ThemeMode {
    let bg = colorfgbg
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());

    match bg {
        // Standard palette: 7 and 9-15 are light backgrounds
        Some(7) | Some(9..=15) => ThemeMode::Light,
        Some(_) => ThemeMode::Dark,
        None => ThemeMode::Dark,
    }
}

pub struct ThemeManager {
    mode: ThemeMode,
    toggle: ToggleState,
    storage: SharedStorage,
}

impl ThemeManager {
    /// Load the persisted mode, or derive it from the environment
    pub fn load(storage: SharedStorage) -> Self {
        let system = system_preference(std::env::var("COLORFGBG").ok().as_deref());
        Self::load_with_system(storage, system)
    }

    pub fn load_with_system(storage: SharedStorage, system: ThemeMode) -> Self {
        let saved = match storage.get_item(THEME_KEY) {
            Ok(value) => value.as_deref().and_then(ThemeMode::parse),
            Err(e) => {
                tracing::warn!("Failed to load theme: {}", e);
                None
            }
        };

        let mode = saved.unwrap_or_else(|| {
            tracing::debug!("No saved theme, using system preference ({})", system);
            system
        });

        let mut manager = Self {
            mode,
            toggle: ToggleState::for_mode(mode),
            storage,
        };
        manager.apply(mode);
        manager
    }

    /// Make `mode` the active theme and refresh the toggle control
    pub fn apply(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.toggle = ToggleState::for_mode(mode);
    }

    /// Flip, apply, and persist. Returns the new mode.
    pub fn toggle(&mut self) -> ThemeMode {
        let next = self.mode.toggled();
        self.apply(next);
        self.save();
        next
    }

    fn save(&self) {
        if let Err(e) = self.storage.set_item(THEME_KEY, self.mode.as_str()) {
            tracing::warn!("Failed to save theme: {}", e);
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn toggle_state(&self) -> ToggleState {
        self.toggle
    }
}
