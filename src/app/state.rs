//! Application state and main controller module for dirnav.
//!
//! This module defines the [AppState] struct, which holds everything the UI and the event
//! loop need:
//! - Configuration and the keymap built from it
//! - The navigation view model ([NavState])
//! - The prompt controller for rename/copy/delete dialogs
//! - The single status line message
//! - Current layout metrics reported by the renderer
//!
//! Key events are routed here; the handlers live in the handlers module.

use crate::app::keymap::{Action, Keymap};
use crate::app::nav::NavState;
use crate::app::prompt::PromptController;
use crate::config::Config;
use crate::core::{
    ExternalCommand, LaunchKind, ListOptions, Listing, OpError, exit_code_label, list_dir,
};
use crate::utils::normalize_path;

use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::ExitStatus;

/// Result of one processed key event, consumed by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypressResult {
    Continue,
    Consumed,
    Quit,
    /// Run this program with the terminal released, then call [AppState::finish_launch].
    Launch(ExternalCommand),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// The last message shown on the status line. Replaced, never queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    text: String,
    kind: StatusKind,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Info,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn kind(&self) -> StatusKind {
        self.kind
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

/// Sizes reported by the renderer on every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutMetrics {
    pub width: u16,
    pub height: u16,
    /// Rows available to the entry list.
    pub list_rows: usize,
    pub too_small: bool,
}

pub struct AppState<'a> {
    pub(super) config: &'a Config,
    pub(super) keymap: Keymap,
    pub(super) nav: NavState,
    pub(super) prompt: PromptController,
    pub(super) status: Option<StatusMessage>,
    pub(super) metrics: LayoutMetrics,
}

impl<'a> AppState<'a> {
    /// Builds the state for `path`.
    ///
    /// An unreadable start directory still gives a usable state: an empty listing and an
    /// Error status.
    pub fn from_dir(config: &'a Config, path: &Path) -> Self {
        let path = std::path::absolute(path)
            .map(|p| normalize_path(&p))
            .unwrap_or_else(|_| path.to_path_buf());

        let options = ListOptions {
            show_hidden: config.general().show_hidden(),
            scripts: config.interpreters(),
        };
        let (listing, status) = match list_dir(&path, &options) {
            Ok(listing) if listing.is_empty() => {
                (listing, Some(StatusMessage::info("Directory is empty.")))
            }
            Ok(listing) => (listing, None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "initial listing failed");
                (Listing::empty(path), Some(StatusMessage::error(e.to_string())))
            }
        };
        debug!(dir = %listing.path().display(), entries = listing.len(), "start");

        Self {
            config,
            keymap: Keymap::from_config(config),
            nav: NavState::new(listing),
            prompt: PromptController::new(),
            status,
            metrics: LayoutMetrics::default(),
        }
    }

    // Getters / accessors

    #[inline]
    pub fn config(&self) -> &Config {
        self.config
    }

    #[inline]
    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    #[inline]
    pub fn prompt(&self) -> &PromptController {
        &self.prompt
    }

    #[inline]
    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    #[inline]
    pub fn metrics(&self) -> LayoutMetrics {
        self.metrics
    }

    pub(crate) fn list_options(&self) -> ListOptions<'a> {
        let config: &'a Config = self.config;
        ListOptions {
            show_hidden: config.general().show_hidden(),
            scripts: config.interpreters(),
        }
    }

    pub fn set_status(&mut self, status: StatusMessage) {
        self.status = Some(status);
    }

    /// Called by the renderer with the current frame layout.
    pub fn update_layout_metrics(&mut self, metrics: LayoutMetrics) {
        self.metrics = metrics;
        if !metrics.too_small {
            self.nav.set_viewport_rows(metrics.list_rows);
        }
    }

    /// Central key handler.
    ///
    /// An open prompt takes every key. Otherwise the keymap decides; while the terminal is
    /// too small only quitting is possible.
    pub fn handle_keypress(&mut self, key: KeyEvent) -> KeypressResult {
        if self.prompt.is_active() {
            return self.handle_prompt_key(key);
        }

        match self.keymap.lookup(key) {
            Some(action) if self.metrics.too_small => {
                if action == Action::Quit {
                    KeypressResult::Quit
                } else {
                    KeypressResult::Continue
                }
            }
            Some(action) => self.handle_action(action),
            None => KeypressResult::Continue,
        }
    }

    /// Re-lists the current directory, keeping the selection by name where possible.
    ///
    /// On failure the previous listing stays in place.
    pub fn refresh(&mut self, focus: Option<&OsStr>) -> Result<(), OpError> {
        let listing = list_dir(self.nav.current_dir(), &self.list_options())?;
        debug!(dir = %listing.path().display(), entries = listing.len(), "refreshed");
        self.nav.replace_listing(listing, focus);
        Ok(())
    }

    /// Posts the outcome of an external program and refreshes the listing.
    pub fn finish_launch(&mut self, cmd: &ExternalCommand, outcome: Result<ExitStatus, OpError>) {
        let name = cmd.target_name();
        let status = match (cmd.kind(), outcome) {
            (LaunchKind::Script, Ok(exit)) => {
                info!(script = %name, code = ?exit.code(), "script returned");
                StatusMessage::info(format!(
                    "Returned from '{name}' (exit code {}).",
                    exit_code_label(&exit)
                ))
            }
            (LaunchKind::Pager, Ok(_)) => StatusMessage::info(format!("Closed viewer for '{name}'.")),
            (LaunchKind::Script, Err(e)) => {
                warn!(script = %name, error = %e, "script failed to start");
                StatusMessage::error(format!("Cannot run '{name}': {e}"))
            }
            (LaunchKind::Pager, Err(e)) => {
                warn!(file = %name, error = %e, "pager failed to start");
                StatusMessage::error(format!("Cannot view '{name}': {e}"))
            }
        };

        let focus: Option<OsString> = cmd.target().file_name().map(OsStr::to_os_string);
        self.post_with_refresh(status, focus.as_deref());
    }

    /// Sets `status` and refreshes once. A failed refresh turns the status into an error.
    pub(super) fn post_with_refresh(&mut self, status: StatusMessage, focus: Option<&OsStr>) {
        let status = match self.refresh(focus) {
            Ok(()) => status,
            Err(e) => {
                warn!(error = %e, "refresh failed");
                StatusMessage::error(format!("{} Refresh failed: {e}", status.text()))
            }
        };
        self.status = Some(status);
    }
}
