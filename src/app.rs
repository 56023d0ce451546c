//! Application state for dirnav.
//!
//! - [state]: [AppState], the controller every key event goes through.
//! - [nav]: directory, listing, selection and scroll of the list pane.
//! - [prompt]: rename/copy text prompts and yes/no confirmations.
//! - [keymap]: key strings from the config mapped to [Action]s.

mod handlers;
pub mod keymap;
pub mod nav;
pub mod prompt;
pub mod state;

pub use keymap::{Action, Key, Keymap, parse_key};
pub use nav::NavState;
pub use prompt::{InputPurpose, PromptController, PromptEvent, PromptState};
pub use state::{AppState, KeypressResult, LayoutMetrics, StatusKind, StatusMessage};
