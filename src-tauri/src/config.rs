//! Runtime configuration from the environment.
//!
//! Nothing is persisted. Values come from process environment variables,
//! optionally seeded from a `.env` file:
//!
//! - `REGION_SNIP_HOTKEY`: accelerator that opens the overlay
//!   (default `CommandOrControl+Shift+S`)
//! - `REGION_SNIP_SAVE_DIR`: starting directory of the save dialog
//!   (default: the user's Pictures directory)

use std::path::PathBuf;
use tauri_plugin_global_shortcut::Shortcut;

pub const HOTKEY_VAR: &str = "REGION_SNIP_HOTKEY";
pub const SAVE_DIR_VAR: &str = "REGION_SNIP_SAVE_DIR";
pub const DEFAULT_HOTKEY: &str = "CommandOrControl+Shift+S";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Accelerator text as configured, for display.
    pub hotkey_label: String,
    pub hotkey: Shortcut,
    pub save_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => log::info!("[CONFIG] Loaded {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("[CONFIG] Ignoring unreadable .env: {}", e),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    ///
    /// Invalid values are logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let requested = lookup(HOTKEY_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let (hotkey_label, hotkey) = match requested {
            Some(text) => match parse_hotkey(&text) {
                Ok(shortcut) => (text, shortcut),
                Err(e) => {
                    log::warn!("[CONFIG] {} — using {}", e, DEFAULT_HOTKEY);
                    default_hotkey()
                }
            },
            None => default_hotkey(),
        };

        let save_dir = lookup(SAVE_DIR_VAR)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_save_dir);

        Self {
            hotkey_label,
            hotkey,
            save_dir,
        }
    }
}

/// Parses an accelerator such as `CommandOrControl+Shift+S`.
pub fn parse_hotkey(accelerator: &str) -> Result<Shortcut, ConfigError> {
    accelerator
        .parse::<Shortcut>()
        .map_err(|e| ConfigError::InvalidHotkey {
            value: accelerator.to_string(),
            reason: e.to_string(),
        })
}

fn default_hotkey() -> (String, Shortcut) {
    let shortcut = parse_hotkey(DEFAULT_HOTKEY).unwrap_or_else(|_| {
        use tauri_plugin_global_shortcut::{Code, Modifiers};
        Shortcut::new(Some(Modifiers::CONTROL | Modifiers::SHIFT), Code::KeyS)
    });
    (DEFAULT_HOTKEY.to_string(), shortcut)
}

/// Pictures directory, falling back to home.
fn default_save_dir() -> Option<PathBuf> {
    dirs::picture_dir().or_else(dirs::home_dir)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid hotkey '{value}': {reason}")]
    InvalidHotkey { value: String, reason: String },
}
