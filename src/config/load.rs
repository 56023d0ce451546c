//! The main config loading module for dirnav.
//!
//! Handles loading and deserializing settings from `dirnav.toml`.
//!
//! [RawConfig] mirrors the file; [Config] is the processed form the rest of the app reads.
//! Also writes the commented default file for `dn --init`.

use crate::config::{General, InternalGeneral, Keys, Theme};
use crate::core::Interpreters;

use serde::Deserialize;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Raw configuration as read from the toml file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    scripts: HashMap<String, String>,
    theme: Theme,
    keys: Keys,
}

/// Processed configuration used by dirnav.
#[derive(Debug, Clone)]
pub struct Config {
    general: InternalGeneral,
    interpreters: Interpreters,
    theme: Theme,
    keys: Keys,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            interpreters: Interpreters::with_overrides(raw.scripts),
            theme: raw.theme,
            keys: raw.keys,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl Config {
    /// Loads the configuration from [Config::default_path].
    ///
    /// A missing file means internal defaults. A file that fails to read or parse is
    /// reported on stderr and also falls back to the defaults.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Error parsing config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn interpreters(&self) -> &Interpreters {
        &self.interpreters
    }

    #[inline]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    #[inline]
    pub fn keys(&self) -> &Keys {
        &self.keys
    }

    /// Determine the configuration file path.
    /// Checks DIRNAV_CONFIG first, then XDG_CONFIG_HOME,
    /// then defaults to ~/.config/dirnav/dirnav.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("DIRNAV_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("dirnav/dirnav.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/dirnav/dirnav.toml");
        }
        PathBuf::from("dirnav.toml")
    }

    /// Writes the commented default configuration to `path`.
    /// Refuses to overwrite an existing file.
    pub fn generate_default(path: &Path) -> io::Result<()> {
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("Config file already exists at {}", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, DEFAULT_TOML)?;
        println!("Default config generated at {}", path.display());
        Ok(())
    }
}

const DEFAULT_TOML: &str = r##"# dirnav.toml - default configuration for dirnav
#
# Commented values are the internal defaults.
# Colors are terminal names ("cyan") or hex codes ("#RRGGBB").

[general]
show_hidden = true
# Wait for Enter after a script finishes before returning to the browser
# pause_after_script = true
# Pager for plain files. Falls back to $PAGER, then "less"
# pager = "less"
# Log level for ~/.cache/dirnav/dirnav.log (DIRNAV_LOG overrides it)
# log_level = "info"

# Extension = interpreter. Merged over the built-in table,
# an empty string disables an extension.
[scripts]
# py = "python3"
# sh = "sh"
# bash = "bash"
# pl = "perl"
# rb = "ruby"
# lua = "lua"
# js = "node"

# [theme.path]
# fg = "default"
# [theme.border]
# fg = "#444444"
# [theme.entry]
# fg = "default"
# [theme.directory]
# fg = "blue"
# [theme.script]
# fg = "green"
# [theme.selection]
# fg = "black"
# bg = "cyan"
# [theme.info]
# fg = "default"
# [theme.error]
# fg = "red"
# [theme.prompt]
# fg = "yellow"

# [keys]
# go_up = ["k", "Up"]
# go_down = ["j", "Down"]
# page_up = ["PageUp"]
# page_down = ["PageDown"]
# go_to_top = ["g", "Home"]
# go_to_bottom = ["G", "End"]
# go_parent = ["h", "Left", "Backspace", "u"]
# open = ["Enter", "l", "Right"]
# rename = ["r"]
# copy = ["c"]
# delete = ["d"]
# refresh = ["Ctrl+r"]
# quit = ["q"]
"##;
