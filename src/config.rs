//! Configuration for dirnav.
//!
//! - [load]: the [Config] root, file discovery and `--init`
//! - [general]: `[general]` behaviour switches
//! - [input]: `[keys]` bindings
//! - [theme]: `[theme]` colors
//!
//! The `[scripts]` table is folded into [crate::core::Interpreters] at load time.

pub mod general;
pub mod input;
pub mod load;
pub mod theme;

pub use general::{General, InternalGeneral};
pub use input::Keys;
pub use load::{Config, RawConfig};
pub use theme::{ColorPair, Theme};
