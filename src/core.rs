//! Core runtime logic for dirnav.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [fm]: reading one directory level into a sorted [Listing] of [Entry] snapshots.
//! - [formatter]: permission, size and date strings plus the style tag of an entry.
//! - [ops]: rename/move, copy and delete, driven by an [OperationIntent].
//! - [proc]: interpreter lookup and foreground launching of scripts and the pager.
//! - [terminal]: the terminal session, its suspension guard and the event loop.
//! - [error]: the [OpError] taxonomy shared by all of the above.

pub mod error;
pub mod fm;
pub mod formatter;
pub mod ops;
pub mod proc;
pub mod terminal;

pub use error::OpError;
pub use fm::{Entry, EntryKind, ListOptions, Listing, compare_entries, list_dir, sort_entries};
pub use formatter::{FormattedEntry, StyleTag, fit_to_width};
pub use ops::{OperationIntent, destination_exists, execute, resolve_destination};
pub use proc::{ExternalCommand, Interpreters, LaunchKind, exit_code_label, run_foreground};
