//! Optional user configuration, read from `~/.keydeck/config.json`.
//!
//! Every field has a default; a missing or unparseable config file is
//! logged and replaced with the defaults, never an error.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::storage::JsonFileStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Override for the shortcuts file location. `~` is expanded.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "shortcutsFile")]
    pub shortcuts_file: Option<String>,
    /// Shell used to run bound commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell: Option<String>,
}

impl Config {
    /// Returns the configured shell, falling back to $SHELL and then the
    /// platform default.
    pub fn get_shell(&self) -> String {
        self.shell
            .clone()
            .or_else(|| std::env::var("SHELL").ok())
            .unwrap_or_else(|| default_shell().to_string())
    }

    /// Returns the shortcuts file path, honoring the override.
    pub fn shortcuts_path(&self) -> PathBuf {
        self.shortcuts_file
            .as_deref()
            .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
            .unwrap_or_else(JsonFileStore::default_path)
    }
}

fn default_shell() -> &'static str {
    if cfg!(windows) {
        "cmd"
    } else {
        "/bin/sh"
    }
}

/// Path of the config file: `~/.keydeck/config.json`.
pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".keydeck"))
        .unwrap_or_else(|| std::env::temp_dir().join("keydeck"))
        .join("config.json")
}

pub fn load_config() -> Config {
    let path = config_path();
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Config::default();
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(config) => {
            info!(path = %path.display(), "config loaded");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_overrides() {
        let config = Config::default();
        assert_eq!(config.shortcuts_file, None);
        assert_eq!(config.shell, None);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = Config {
            shortcuts_file: Some("/tmp/deck.json".to_string()),
            shell: Some("/bin/zsh".to_string()),
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.shortcuts_file, config.shortcuts_file);
        assert_eq!(back.shell, config.shell);
    }

    #[test]
    fn unknown_and_missing_fields_are_tolerated() {
        let config: Config =
            serde_json::from_str(r#"{"shell": "/bin/bash", "theme": "dark"}"#).unwrap();
        assert_eq!(config.shell.as_deref(), Some("/bin/bash"));
        assert_eq!(config.shortcuts_file, None);
    }

    #[test]
    fn explicit_shell_wins_over_environment() {
        let config = Config {
            shortcuts_file: None,
            shell: Some("/opt/fish".to_string()),
        };
        assert_eq!(config.get_shell(), "/opt/fish");
    }

    #[test]
    fn shortcuts_path_override_is_used() {
        let config = Config {
            shortcuts_file: Some("/tmp/my-shortcuts.json".to_string()),
            shell: None,
        };
        assert_eq!(
            config.shortcuts_path(),
            PathBuf::from("/tmp/my-shortcuts.json")
        );
    }
}
