//! The general configuration settings for dirnav.
//!
//! [General] is deserialized from the `[general]` table of dirnav.toml and converted into
//! [InternalGeneral], which has the environment fallbacks applied.

use serde::Deserialize;

/// Pager used when neither the config nor `$PAGER` names one.
pub const DEFAULT_PAGER: &str = "less";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    show_hidden: bool,
    pause_after_script: bool,
    pager: Option<String>,
    log_level: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            show_hidden: true,
            pause_after_script: true,
            pager: None,
            log_level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct InternalGeneral {
    show_hidden: bool,
    pause_after_script: bool,
    pager: String,
    log_level: String,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        let pager = g
            .pager
            .filter(|p| !p.trim().is_empty())
            .or_else(|| std::env::var("PAGER").ok().filter(|p| !p.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_PAGER.to_string());

        let log_level = if g.log_level.trim().is_empty() {
            DEFAULT_LOG_LEVEL.to_string()
        } else {
            g.log_level.trim().to_string()
        };

        Self {
            show_hidden: g.show_hidden,
            pause_after_script: g.pause_after_script,
            pager,
            log_level,
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn pause_after_script(&self) -> bool {
        self.pause_after_script
    }

    /// Pager command line, possibly with arguments (`less -R`).
    #[inline]
    pub fn pager(&self) -> &str {
        &self.pager
    }

    #[inline]
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}
