//! Modal prompts for dirnav.
//!
//! [PromptController] owns the single [PromptState]: either nothing, a one-line text field
//! (rename target, copy destination) or a yes/no confirmation carrying the operation it would
//! run. While a prompt is open it receives every key; the caller acts on the returned
//! [PromptEvent].

use crate::core::OperationIntent;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use std::path::{Path, PathBuf};

/// What a text prompt's input will be used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputPurpose {
    Rename { source: PathBuf },
    Copy { source: PathBuf },
}

impl InputPurpose {
    pub fn source(&self) -> &Path {
        match self {
            InputPurpose::Rename { source } | InputPurpose::Copy { source } => source,
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            InputPurpose::Rename { .. } => "Rename",
            InputPurpose::Copy { .. } => "Copy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PromptState {
    #[default]
    None,
    TextInput {
        label: String,
        buffer: String,
        /// Byte offset, always on a char boundary.
        cursor: usize,
        purpose: InputPurpose,
    },
    Confirm {
        label: String,
        on_confirm: OperationIntent,
    },
}

/// Outcome of feeding one key to an open prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// Key has no meaning here. It is still swallowed.
    Ignored,
    Edited,
    /// Prompt closed without acting. Carries the operation verb.
    Cancelled(&'static str),
    Submitted { purpose: InputPurpose, input: String },
    Confirmed(OperationIntent),
}

#[derive(Debug, Default)]
pub struct PromptController {
    state: PromptState,
}

impl PromptController {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> &PromptState {
        &self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, PromptState::None)
    }

    /// Opens a text field pre-filled with `initial`, cursor at the end.
    pub fn open_text_input(&mut self, label: String, initial: String, purpose: InputPurpose) {
        let cursor = initial.len();
        self.state = PromptState::TextInput {
            label,
            buffer: initial,
            cursor,
            purpose,
        };
    }

    pub fn open_confirm(&mut self, label: String, on_confirm: OperationIntent) {
        self.state = PromptState::Confirm { label, on_confirm };
    }

    pub fn label(&self) -> Option<&str> {
        match &self.state {
            PromptState::None => None,
            PromptState::TextInput { label, .. } | PromptState::Confirm { label, .. } => {
                Some(label)
            }
        }
    }

    /// Buffer and cursor of an open text field.
    pub fn input(&self) -> Option<(&str, usize)> {
        match &self.state {
            PromptState::TextInput { buffer, cursor, .. } => Some((buffer, *cursor)),
            _ => None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PromptEvent {
        match &self.state {
            PromptState::None => PromptEvent::Ignored,
            PromptState::TextInput { .. } => self.handle_text_key(key),
            PromptState::Confirm { .. } => self.handle_confirm_key(key),
        }
    }

    fn handle_text_key(&mut self, key: KeyEvent) -> PromptEvent {
        match key.code {
            KeyCode::Enter => match std::mem::take(&mut self.state) {
                PromptState::TextInput {
                    buffer, purpose, ..
                } => PromptEvent::Submitted {
                    purpose,
                    input: buffer,
                },
                other => {
                    self.state = other;
                    PromptEvent::Ignored
                }
            },
            KeyCode::Esc => {
                let verb = match std::mem::take(&mut self.state) {
                    PromptState::TextInput { purpose, .. } => purpose.verb(),
                    _ => "Input",
                };
                PromptEvent::Cancelled(verb)
            }
            _ => {
                let PromptState::TextInput { buffer, cursor, .. } = &mut self.state else {
                    return PromptEvent::Ignored;
                };
                if edit_buffer(buffer, cursor, key) {
                    PromptEvent::Edited
                } else {
                    PromptEvent::Ignored
                }
            }
        }
    }

    /// Only a plain `y`/`Y` confirms. Other characters, chords included, cancel.
    fn handle_confirm_key(&mut self, key: KeyEvent) -> PromptEvent {
        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        let confirms = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') if plain => true,
            KeyCode::Char(_) | KeyCode::Esc | KeyCode::Enter => false,
            _ => return PromptEvent::Ignored,
        };

        match std::mem::take(&mut self.state) {
            PromptState::Confirm { on_confirm, .. } if confirms => {
                PromptEvent::Confirmed(on_confirm)
            }
            PromptState::Confirm { on_confirm, .. } => PromptEvent::Cancelled(on_confirm.verb()),
            other => {
                self.state = other;
                PromptEvent::Ignored
            }
        }
    }
}

/// Applies an editing key to a text buffer. Returns `false` for keys that are not edits.
fn edit_buffer(buffer: &mut String, cursor: &mut usize, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Left => {
            if let Some((prev, _)) = buffer[..*cursor].char_indices().next_back() {
                *cursor = prev;
            }
        }
        KeyCode::Right => {
            if let Some(ch) = buffer[*cursor..].chars().next() {
                *cursor += ch.len_utf8();
            }
        }
        KeyCode::Home => *cursor = 0,
        KeyCode::End => *cursor = buffer.len(),
        KeyCode::Backspace => {
            if let Some((prev, _)) = buffer[..*cursor].char_indices().next_back() {
                buffer.remove(prev);
                *cursor = prev;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                buffer.remove(*cursor);
            }
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            buffer.insert(*cursor, c);
            *cursor += c.len_utf8();
        }
        _ => return false,
    }
    true
}
