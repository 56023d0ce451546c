//! Input action handler methods for dirnav.
//!
//! This module implements [AppState] methods that process mapped actions, prompt events
//! and the file operations started from them (rename, copy, delete).

use crate::app::keymap::Action;
use crate::app::prompt::{InputPurpose, PromptEvent};
use crate::app::state::{AppState, KeypressResult, StatusMessage};
use crate::core::{
    ExternalCommand, OpError, OperationIntent, destination_exists, execute, list_dir,
    resolve_destination,
};

use crossterm::event::KeyEvent;
use tracing::{debug, info, warn};

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// AppState input and action handlers
impl<'a> AppState<'a> {
    /// Dispatches a mapped action. Only called while no prompt is open.
    pub(super) fn handle_action(&mut self, action: Action) -> KeypressResult {
        match action {
            Action::GoUp => self.step(-1),
            Action::GoDown => self.step(1),
            Action::PageUp => self.step(-self.nav.page_step()),
            Action::PageDown => self.step(self.nav.page_step()),
            Action::GoToTop => self.step(-self.nav.full_step()),
            Action::GoToBottom => self.step(self.nav.full_step()),
            Action::GoParent => self.handle_go_parent(),
            Action::Open => self.handle_open(),
            Action::Rename => self.prompt_rename(),
            Action::Copy => self.prompt_copy(),
            Action::Delete => self.prompt_delete(),
            Action::Refresh => {
                if let Err(e) = self.refresh(None) {
                    warn!(error = %e, "refresh failed");
                    self.set_status(StatusMessage::error(e.to_string()));
                }
                KeypressResult::Consumed
            }
            Action::Quit => KeypressResult::Quit,
        }
    }

    /// Routes a key to the open prompt and acts on what it reports.
    pub(super) fn handle_prompt_key(&mut self, key: KeyEvent) -> KeypressResult {
        match self.prompt.handle_key(key) {
            PromptEvent::Ignored | PromptEvent::Edited => {}
            PromptEvent::Cancelled(verb) => {
                debug!(verb, "prompt cancelled");
                self.set_status(StatusMessage::info(format!("{verb} cancelled.")));
            }
            PromptEvent::Submitted { purpose, input } => self.submit_input(purpose, &input),
            PromptEvent::Confirmed(intent) => self.run_operation(intent),
        }
        KeypressResult::Consumed
    }

    // Navigation handlers

    fn step(&mut self, delta: isize) -> KeypressResult {
        self.nav.move_selection(delta);
        KeypressResult::Consumed
    }

    /// Opens the selected entry.
    ///
    /// Directories are entered, executable scripts with a known interpreter are run and
    /// everything else goes to the pager.
    fn handle_open(&mut self) -> KeypressResult {
        let Some(entry) = self.nav.selected_entry() else {
            return KeypressResult::Continue;
        };
        let name = entry.name_str().into_owned();

        if entry.is_unreadable() {
            self.set_status(StatusMessage::error(format!(
                "Cannot open inaccessible item '{name}'."
            )));
            return KeypressResult::Consumed;
        }

        let path = self.nav.current_dir().join(entry.name());
        if entry.is_dir() {
            match list_dir(&path, &self.list_options()) {
                Ok(listing) => {
                    debug!(dir = %path.display(), entries = listing.len(), "entered directory");
                    self.nav.change_dir(listing, None);
                }
                Err(e) => {
                    warn!(dir = %path.display(), error = %e, "cannot enter directory");
                    self.set_status(StatusMessage::error(e.to_string()));
                }
            }
            return KeypressResult::Consumed;
        }

        let general = self.config.general();
        if entry.is_executable_script()
            && let Some(interpreter) = self.config.interpreters().interpreter_for(entry.name())
        {
            info!(script = %path.display(), interpreter, "running script");
            return KeypressResult::Launch(ExternalCommand::script(
                interpreter,
                &path,
                general.pause_after_script(),
            ));
        }

        debug!(file = %path.display(), pager = general.pager(), "opening in pager");
        KeypressResult::Launch(ExternalCommand::pager(general.pager(), &path))
    }

    /// Moves to the parent directory and reselects the directory just left.
    /// Does nothing at the filesystem root.
    fn handle_go_parent(&mut self) -> KeypressResult {
        let current = self.nav.current_dir().to_path_buf();
        let Some(parent) = current.parent() else {
            return KeypressResult::Continue;
        };
        let exited: Option<OsString> = current.file_name().map(OsStr::to_os_string);

        match list_dir(parent, &self.list_options()) {
            Ok(listing) => {
                debug!(dir = %parent.display(), "went to parent");
                self.nav.change_dir(listing, exited.as_deref());
            }
            Err(e) => {
                warn!(dir = %parent.display(), error = %e, "cannot list parent");
                self.set_status(StatusMessage::error(e.to_string()));
            }
        }
        KeypressResult::Consumed
    }

    // Prompt openers

    fn prompt_rename(&mut self) -> KeypressResult {
        let Some((name, source)) = self.operable_selection("rename") else {
            return KeypressResult::Consumed;
        };
        self.prompt.open_text_input(
            format!("Rename '{name}' to: "),
            name,
            InputPurpose::Rename { source },
        );
        KeypressResult::Consumed
    }

    fn prompt_copy(&mut self) -> KeypressResult {
        if self.nav.selected_entry().is_some_and(|e| e.is_dir()) {
            self.set_status(StatusMessage::error(format!(
                "Copy failed: {}",
                OpError::UnsupportedDirectoryCopy
            )));
            return KeypressResult::Consumed;
        }
        let Some((name, source)) = self.operable_selection("copy") else {
            return KeypressResult::Consumed;
        };
        self.prompt.open_text_input(
            format!("Copy '{name}' to: "),
            name,
            InputPurpose::Copy { source },
        );
        KeypressResult::Consumed
    }

    fn prompt_delete(&mut self) -> KeypressResult {
        let is_dir = self.nav.selected_entry().is_some_and(|e| e.is_dir());
        let Some((name, target)) = self.operable_selection("delete") else {
            return KeypressResult::Consumed;
        };
        let suffix = if is_dir { "/" } else { "" };
        self.prompt.open_confirm(
            format!("Delete '{name}{suffix}'? (y/N)"),
            OperationIntent::Delete { target },
        );
        KeypressResult::Consumed
    }

    /// Name and full path of the selection, or `None` with an error posted when the
    /// selected entry could not be inspected.
    fn operable_selection(&mut self, verb: &str) -> Option<(String, PathBuf)> {
        let entry = self.nav.selected_entry()?;
        let name = entry.name_str().into_owned();
        if entry.is_unreadable() {
            self.set_status(StatusMessage::error(format!(
                "Cannot {verb} inaccessible item '{name}'."
            )));
            return None;
        }
        let path = self.nav.current_dir().join(entry.name());
        Some((name, path))
    }

    // Operation flow

    /// Turns submitted prompt text into an operation.
    ///
    /// A copy onto an existing target asks for a second confirmation before overwriting.
    fn submit_input(&mut self, purpose: InputPurpose, input: &str) {
        let verb = purpose.verb();
        let source = purpose.source().to_path_buf();

        // The pre-filled name is a lossy copy; submitting it untouched names the source.
        let unchanged = source
            .file_name()
            .is_some_and(|name| name.to_string_lossy() == input.trim());
        let destination = if unchanged {
            Some(source.clone())
        } else {
            resolve_destination(self.nav.current_dir(), input, &source)
        };
        let Some(destination) = destination else {
            self.set_status(StatusMessage::info(format!("{verb} cancelled.")));
            return;
        };
        if destination == source {
            self.set_status(StatusMessage::error(
                "Source and destination are the same.",
            ));
            return;
        }

        match purpose {
            InputPurpose::Rename { .. } => self.run_operation(OperationIntent::Rename {
                source,
                destination,
            }),
            InputPurpose::Copy { .. } if destination_exists(&destination) => {
                let label = format!("'{}' exists. Overwrite? (y/N)", display_file_name(&destination));
                self.prompt.open_confirm(
                    label,
                    OperationIntent::Copy {
                        source,
                        destination,
                        overwrite: true,
                    },
                );
            }
            InputPurpose::Copy { .. } => self.run_operation(OperationIntent::Copy {
                source,
                destination,
                overwrite: false,
            }),
        }
    }

    /// Executes `intent`, posts exactly one status and refreshes the listing once.
    fn run_operation(&mut self, intent: OperationIntent) {
        let focus = self.focus_after(&intent);

        let status = match execute(&intent) {
            Ok(message) => {
                info!(op = intent.verb(), source = %intent.source().display(), "{message}");
                StatusMessage::info(message)
            }
            Err(e) => {
                warn!(op = intent.verb(), source = %intent.source().display(), error = %e, "operation failed");
                StatusMessage::error(format!("{} failed: {e}", intent.verb()))
            }
        };
        self.post_with_refresh(status, focus.as_deref());
    }

    /// Which name the selection should land on once the operation is done.
    fn focus_after(&self, intent: &OperationIntent) -> Option<OsString> {
        match intent {
            OperationIntent::Rename { destination, .. }
                if destination.parent() == Some(self.nav.current_dir()) =>
            {
                destination.file_name().map(OsStr::to_os_string)
            }
            OperationIntent::Copy { source, .. } => source.file_name().map(OsStr::to_os_string),
            OperationIntent::Rename { .. } | OperationIntent::Delete { .. } => None,
        }
    }
}

fn display_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
