//! User configuration for imgrev.
//!
//! Read from `$XDG_CONFIG_HOME/imgrev/config.toml`, falling back to
//! `~/.config/imgrev/config.toml`. Every key is optional:
//!
//! ```toml
//! theme = "catppuccin-mocha"   # or "dark"
//! role = "verifier"            # or "annotator"
//! auto_advance_ms = 500
//! db_path = ".imgrev/reviews.db"
//! ```
//!
//! Config errors never prevent startup: a missing file means defaults, and an
//! unreadable or malformed file is logged and replaced by defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::app::Role;
use crate::scheduler::DEFAULT_DELAY_MS;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub theme: String,
    pub role: Role,
    /// Delay before moving on after a decision, in milliseconds.
    pub auto_advance_ms: u64,
    /// Where submissions are stored.
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            role: Role::default(),
            auto_advance_ms: DEFAULT_DELAY_MS,
            db_path: PathBuf::from(".imgrev").join("reviews.db"),
        }
    }
}

impl Config {
    /// Parses a config file body.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Loads the config at `path`, or the defaults when it is missing or invalid.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config, using defaults: {e}");
                return Self::default();
            }
        };
        match Self::from_toml_str(&raw) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), ?config, "config loaded");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "config parse error, using defaults: {e}");
                Self::default()
            }
        }
    }
}

/// Returns the default config file location.
///
/// Prefers `$XDG_CONFIG_HOME/imgrev/config.toml`; falls back to
/// `~/.config/imgrev/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join("imgrev").join("config.toml")
}
