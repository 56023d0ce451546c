//! Display formatting for directory entries in dirnav.
//!
//! Turns an [Entry] into the text columns shown in the listing: permission string,
//! human-readable size, modification date and a [StyleTag] for coloring.
//! Everything here is pure and infallible.

use crate::core::fm::Entry;

use chrono::{DateTime, Local};
use unicode_width::UnicodeWidthChar;

use std::time::SystemTime;

/// Width of the permission column.
pub const PERM_WIDTH: usize = 10;
/// Width of the size column.
pub const SIZE_WIDTH: usize = 7;
/// Width of the `%b %d %H:%M` date column.
pub const DATE_WIDTH: usize = 12;

/// Suffix appended to the name of an entry whose metadata could not be read.
pub const UNREADABLE_MARKER: &str = " [?]";

const UNITS: [char; 4] = ['K', 'M', 'G', 'T'];

/// Coloring category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTag {
    Directory,
    Script,
    Plain,
}

/// All display fields for one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedEntry {
    pub name: String,
    pub permissions: String,
    pub size: String,
    pub date: String,
    pub style: StyleTag,
}

impl FormattedEntry {
    pub fn from_entry(entry: &Entry) -> Self {
        FormattedEntry {
            name: display_name(entry),
            permissions: format_permissions(entry),
            size: format_size(entry),
            date: format_mtime(entry.modified()),
            style: style_tag(entry),
        }
    }
}

/// Name as shown in the list: directories get a trailing `/`, unreadable entries the marker.
pub fn display_name(entry: &Entry) -> String {
    let mut name = entry.name_str().into_owned();
    if entry.is_dir() {
        name.push('/');
    }
    if entry.is_unreadable() {
        name.push_str(UNREADABLE_MARKER);
    }
    name
}

pub fn style_tag(entry: &Entry) -> StyleTag {
    if entry.is_dir() {
        StyleTag::Directory
    } else if entry.is_executable_script() {
        StyleTag::Script
    } else {
        StyleTag::Plain
    }
}

/// Formats the type char and rwx triples, e.g. `drwxr-xr-x`.
///
/// Returns `??????????` when the entry's stat failed.
pub fn format_permissions(entry: &Entry) -> String {
    let Some(mode) = entry.mode() else {
        return "?".repeat(PERM_WIDTH);
    };

    let first = if entry.is_dir() {
        'd'
    } else if entry.is_symlink() {
        'l'
    } else {
        '-'
    };
    let mut chars = [first, '-', '-', '-', '-', '-', '-', '-', '-', '-'];
    let shifts = [6, 3, 0];
    for (i, &shift) in shifts.iter().enumerate() {
        let base = 1 + i * 3;
        if (mode >> (shift + 2)) & 1u32 != 0 {
            chars[base] = 'r';
        }
        if (mode >> (shift + 1)) & 1u32 != 0 {
            chars[base + 1] = 'w';
        }
        if (mode >> shift) & 1u32 != 0 {
            chars[base + 2] = 'x';
        }
    }
    chars.iter().collect()
}

/// Size column for an entry: `-` for directories, `?` when unknown.
pub fn format_size(entry: &Entry) -> String {
    if entry.is_dir() {
        return "-".into();
    }
    match entry.size() {
        Some(bytes) => human_size(bytes),
        None => "?".into(),
    }
}

/// Binary units with one decimal below 10 of a unit. Values are truncated, never rounded up,
/// so a unit boundary is only shown once it is actually reached.
pub fn human_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes}B");
    }

    let mut unit = 0;
    let mut divisor: u128 = 1024;
    while unit + 1 < UNITS.len() && u128::from(bytes) >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let tenths = u128::from(bytes) * 10 / divisor;
    if tenths < 100 {
        format!("{}.{}{}", tenths / 10, tenths % 10, UNITS[unit])
    } else {
        format!("{}{}", tenths / 10, UNITS[unit])
    }
}

/// Local time as `%b %d %H:%M`, always [DATE_WIDTH] columns.
pub fn format_mtime(modified: Option<SystemTime>) -> String {
    match modified {
        Some(mtime) => {
            let dt: DateTime<Local> = DateTime::from(mtime);
            dt.format("%b %d %H:%M").to_string()
        }
        None => format!("{:>width$}", "?", width = DATE_WIDTH),
    }
}

/// Fits a string into exactly `width` terminal columns.
///
/// Control characters are dropped, tabs become a single space, wide characters that would
/// overflow are cut and the rest is padded with spaces.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut current_w = 0;

    for ch in text.chars() {
        let ch = if ch == '\t' { ' ' } else { ch };
        if ch.is_control() {
            continue;
        }
        let w = ch.width().unwrap_or(0);
        if current_w + w > width {
            break;
        }
        out.push(ch);
        current_w += w;
    }

    if current_w < width {
        out.push_str(&" ".repeat(width - current_w));
    }
    out
}
