//! Miscellaneous utility functions for dirnav.
//!
//! - [helpers]: color parsing and path helpers (`~` handling, lexical normalization)
//! - [cli]: command-line flags
//! - [logging]: the file-backed tracing subscriber

pub mod cli;
pub mod helpers;
pub mod logging;

pub use helpers::{expand_home_path, normalize_path, parse_color, shorten_home_path};
pub use logging::init_logging;
