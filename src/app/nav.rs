//! Navigation state for dirnav.
//!
//! [NavState] is the view model of the browser: the current directory, its listing snapshot,
//! the selected entry, the scroll offset and the number of rows the list pane can show.
//!
//! Invariants kept by every method:
//! - the selection is `None` exactly when the listing is empty
//! - the selected row is always inside `scroll..scroll + viewport_rows`
//! - the scroll offset never leaves blank trailing rows when the listing fills the viewport

use crate::core::{Entry, Listing};

use std::ffi::{OsStr, OsString};
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Holds the directory, listing, selection and scroll state of the list pane.
#[derive(Debug, Clone)]
pub struct NavState {
    current_dir: PathBuf,
    listing: Listing,
    selected: Option<usize>,
    scroll: usize,
    viewport_rows: usize,
}

impl NavState {
    pub fn new(listing: Listing) -> Self {
        let selected = (!listing.is_empty()).then_some(0);
        Self {
            current_dir: listing.path().to_path_buf(),
            listing,
            selected,
            scroll: 0,
            viewport_rows: 1,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    #[inline]
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        self.listing.entries()
    }

    #[inline]
    pub fn selected_idx(&self) -> Option<usize> {
        self.selected
    }

    #[inline]
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    #[inline]
    pub fn viewport_rows(&self) -> usize {
        self.viewport_rows
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selected.and_then(|idx| self.listing.get(idx))
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selected_entry()
            .map(|e| self.current_dir.join(e.name()))
    }

    /// Indices of the entries currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.scroll + self.viewport_rows).min(self.listing.len());
        self.scroll.min(end)..end
    }

    // Navigation functions

    /// Moves the selection by `delta` rows, clamped to the listing.
    /// Returns `true` if the selection changed.
    pub fn move_selection(&mut self, delta: isize) -> bool {
        let len = self.listing.len();
        let Some(current) = self.selected else {
            return false;
        };
        if len == 0 {
            return false;
        }

        let next = current.saturating_add_signed(delta).min(len - 1);
        let changed = next != current;
        self.selected = Some(next);
        self.fix_scroll();
        changed
    }

    /// Step size for page up/down.
    #[inline]
    pub fn page_step(&self) -> isize {
        self.viewport_rows.max(1) as isize
    }

    /// Step size that always reaches the first or last entry.
    #[inline]
    pub fn full_step(&self) -> isize {
        self.listing.len().max(1) as isize
    }

    pub fn set_viewport_rows(&mut self, rows: usize) {
        let rows = rows.max(1);
        if rows != self.viewport_rows {
            self.viewport_rows = rows;
            self.fix_scroll();
        }
    }

    /// Swaps in a fresh listing of the current directory.
    ///
    /// The selection follows `focus` if given and present, else the previously selected name,
    /// else stays at the same index clamped to the new length.
    pub fn replace_listing(&mut self, listing: Listing, focus: Option<&OsStr>) {
        let prev_name: Option<OsString> = self.selected_entry().map(|e| e.name().to_os_string());
        let prev_idx = self.selected.unwrap_or(0);

        self.current_dir = listing.path().to_path_buf();
        self.listing = listing;

        self.selected = if self.listing.is_empty() {
            None
        } else {
            focus
                .and_then(|name| self.listing.position(name))
                .or_else(|| {
                    prev_name
                        .as_deref()
                        .and_then(|name| self.listing.position(name))
                })
                .or(Some(prev_idx.min(self.listing.len() - 1)))
        };
        self.fix_scroll();
    }

    /// Commits a directory change. The listing must already be read successfully.
    ///
    /// Selects `focus` when present in the new listing, else the first entry.
    pub fn change_dir(&mut self, listing: Listing, focus: Option<&OsStr>) {
        self.current_dir = listing.path().to_path_buf();
        self.listing = listing;
        self.scroll = 0;
        self.selected = if self.listing.is_empty() {
            None
        } else {
            Some(
                focus
                    .and_then(|name| self.listing.position(name))
                    .unwrap_or(0),
            )
        };
        self.fix_scroll();
    }

    fn fix_scroll(&mut self) {
        let rows = self.viewport_rows.max(1);
        let Some(sel) = self.selected else {
            self.scroll = 0;
            return;
        };

        if sel < self.scroll {
            self.scroll = sel;
        } else if sel >= self.scroll + rows {
            self.scroll = sel + 1 - rows;
        }

        let max_scroll = self.listing.len().saturating_sub(rows);
        if self.scroll > max_scroll {
            self.scroll = max_scroll;
        }
    }
}
