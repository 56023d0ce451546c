//! Terminal UI for dirnav.
//!
//! [render] draws one frame from the [AppState](crate::app::AppState): the path header, the
//! bordered entry list and the bottom line (prompt, status message or key help).

pub mod render;
pub mod widgets;

pub use render::render;
