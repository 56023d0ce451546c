//! Directory listing logic for dirnav.
//!
//! Provides the [Entry] snapshot type, the sorted [Listing] and the [list_dir] function which
//! reads one directory level. Listings are immutable: a refresh always builds a new one.

use crate::core::error::OpError;
use crate::core::proc::Interpreters;

use std::borrow::Cow;
use std::cmp::Ordering;
use std::ffi::{OsStr, OsString};
use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::trace;

/// Whether an entry is a directory or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// A single child of a directory, captured at listing time.
///
/// Metadata fields are `None` when the child could not be stat'ed (permission denied,
/// vanished between readdir and stat, ...). Such entries are flagged unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: Box<OsStr>,
    lowercase_name: Box<str>,
    flags: u8,
    size: Option<u64>,
    modified: Option<SystemTime>,
    mode: Option<u32>,
}

impl Entry {
    // Flag bit definitions
    pub const IS_DIR: u8 = 1 << 0;
    pub const IS_SYMLINK: u8 = 1 << 1;
    pub const IS_HIDDEN: u8 = 1 << 2;
    pub const IS_EXECUTABLE: u8 = 1 << 3;
    pub const IS_SCRIPT: u8 = 1 << 4;
    pub const IS_UNREADABLE: u8 = 1 << 5;

    /// Any of the owner/group/other execute bits.
    pub const EXEC_BITS: u32 = 0o111;

    pub fn new(
        name: OsString,
        flags: u8,
        size: Option<u64>,
        modified: Option<SystemTime>,
        mode: Option<u32>,
    ) -> Self {
        let lowercase_name = name.to_string_lossy().to_lowercase().into_boxed_str();
        Entry {
            name: name.into_boxed_os_str(),
            lowercase_name,
            flags,
            size,
            modified,
            mode,
        }
    }

    // Accessors

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn lowercase_name(&self) -> &str {
        &self.lowercase_name
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        if self.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.flags & Self::IS_DIR != 0
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.flags & Self::IS_SYMLINK != 0
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.flags & Self::IS_HIDDEN != 0
    }

    #[inline]
    pub fn is_executable(&self) -> bool {
        self.flags & Self::IS_EXECUTABLE != 0
    }

    /// Known script extension and an execute bit set.
    #[inline]
    pub fn is_executable_script(&self) -> bool {
        self.flags & Self::IS_SCRIPT != 0
    }

    #[inline]
    pub fn is_unreadable(&self) -> bool {
        self.flags & Self::IS_UNREADABLE != 0
    }

    /// Size in bytes for files. Always `None` for directories.
    #[inline]
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// The 9 rwx permission bits, `None` when the stat failed.
    #[inline]
    pub fn mode(&self) -> Option<u32> {
        self.mode
    }
}

/// The sorted snapshot of one directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Listing {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl Listing {
    /// Builds a listing, sorting the entries with [compare_entries].
    pub fn new(path: PathBuf, mut entries: Vec<Entry>) -> Self {
        sort_entries(&mut entries);
        Listing { path, entries }
    }

    pub fn empty(path: PathBuf) -> Self {
        Listing {
            path,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn get(&self, idx: usize) -> Option<&Entry> {
        self.entries.get(idx)
    }

    pub fn position(&self, name: &OsStr) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &OsStr> {
        self.entries.iter().map(Entry::name)
    }
}

/// Options applied while reading a directory.
#[derive(Debug, Clone, Copy)]
pub struct ListOptions<'a> {
    pub show_hidden: bool,
    pub scripts: &'a Interpreters,
}

/// Directories first, then case-insensitive name, then case-sensitive name.
pub fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    match (a.is_dir(), b.is_dir()) {
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }
    a.lowercase_name()
        .cmp(b.lowercase_name())
        .then_with(|| a.name().cmp(b.name()))
}

pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by(compare_entries);
}

/// Reads the immediate children of `path` into a sorted [Listing].
///
/// Only failing to open the directory itself is an error. Children that cannot be stat'ed
/// are still listed, flagged unreadable and without metadata.
pub fn list_dir(path: &Path, options: &ListOptions) -> Result<Listing, OpError> {
    let read = fs::read_dir(path).map_err(|e| OpError::unreadable(path, e))?;
    let mut entries = Vec::with_capacity(64);

    for dirent in read {
        let dirent = match dirent {
            Ok(d) => d,
            Err(e) => {
                trace!(dir = %path.display(), error = %e, "skipping unreadable dirent");
                continue;
            }
        };

        let name = dirent.file_name();
        if !options.show_hidden && is_hidden_name(&name) {
            continue;
        }
        entries.push(read_entry(&dirent.path(), name, options.scripts));
    }

    Ok(Listing::new(path.to_path_buf(), entries))
}

fn read_entry(path: &Path, name: OsString, scripts: &Interpreters) -> Entry {
    let mut flags = 0u8;
    if is_hidden_name(&name) {
        flags |= Entry::IS_HIDDEN;
    }

    let link_md = match fs::symlink_metadata(path) {
        Ok(md) => md,
        Err(e) => {
            trace!(path = %path.display(), error = %e, "stat failed");
            return Entry::new(name, flags | Entry::IS_UNREADABLE, None, None, None);
        }
    };

    // Symlinks are followed to decide the kind. A dangling one stays a file.
    let (md, broken) = if link_md.file_type().is_symlink() {
        flags |= Entry::IS_SYMLINK;
        match fs::metadata(path) {
            Ok(target) => (target, false),
            Err(_) => (link_md, true),
        }
    } else {
        (link_md, false)
    };

    let mode = permission_bits(&md);
    let size = if md.is_dir() {
        flags |= Entry::IS_DIR;
        None
    } else {
        if !broken && mode & Entry::EXEC_BITS != 0 {
            flags |= Entry::IS_EXECUTABLE;
            if scripts.is_script_name(&name) {
                flags |= Entry::IS_SCRIPT;
            }
        }
        Some(md.len())
    };

    Entry::new(name, flags, size, md.modified().ok(), Some(mode))
}

#[cfg(unix)]
fn permission_bits(md: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    md.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn permission_bits(md: &Metadata) -> u32 {
    let base = if md.permissions().readonly() {
        0o444
    } else {
        0o666
    };
    if md.is_dir() { base | 0o111 } else { base }
}

fn is_hidden_name(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn names(listing: &Listing) -> Vec<String> {
        listing
            .entries()
            .iter()
            .map(|e| e.name_str().into_owned())
            .collect()
    }

    #[test]
    fn entry_flags() {
        let file = Entry::new(OsString::from("notes.txt"), 0, Some(3), None, Some(0o644));
        assert_eq!(file.kind(), EntryKind::File);
        assert!(!file.is_executable_script());

        let dir = Entry::new(
            OsString::from(".cache"),
            Entry::IS_DIR | Entry::IS_HIDDEN,
            None,
            None,
            Some(0o755),
        );
        assert_eq!(dir.kind(), EntryKind::Directory);
        assert!(dir.is_hidden());
        assert_eq!(dir.lowercase_name(), ".cache");
    }

    #[test]
    fn listing_sorts_dirs_first_then_case_insensitive() -> Result<(), Box<dyn std::error::Error>>
    {
        let tmp = tempdir()?;
        File::create(tmp.path().join("b.txt"))?;
        File::create(tmp.path().join("a.py"))?;
        File::create(tmp.path().join("Zeta"))?;
        fs::create_dir(tmp.path().join("Sub"))?;
        fs::create_dir(tmp.path().join("alpha"))?;

        let scripts = Interpreters::default();
        let listing = list_dir(
            tmp.path(),
            &ListOptions {
                show_hidden: true,
                scripts: &scripts,
            },
        )?;

        assert_eq!(names(&listing), ["alpha", "Sub", "a.py", "b.txt", "Zeta"]);
        Ok(())
    }

    #[test]
    fn case_ties_are_broken_by_exact_name() {
        let upper = Entry::new(OsString::from("README"), 0, Some(1), None, Some(0o644));
        let lower = Entry::new(OsString::from("readme"), 0, Some(1), None, Some(0o644));
        let listing = Listing::new(PathBuf::from("/x"), vec![lower.clone(), upper.clone()]);
        assert_eq!(listing.entries(), &[upper, lower]);
    }

    #[test]
    fn hidden_entries_can_be_filtered() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        File::create(tmp.path().join(".secret"))?;
        File::create(tmp.path().join("plain"))?;
        let scripts = Interpreters::default();

        let shown = list_dir(
            tmp.path(),
            &ListOptions {
                show_hidden: true,
                scripts: &scripts,
            },
        )?;
        let hidden = list_dir(
            tmp.path(),
            &ListOptions {
                show_hidden: false,
                scripts: &scripts,
            },
        )?;

        assert_eq!(shown.len(), 2);
        assert_eq!(names(&hidden), ["plain"]);
        Ok(())
    }

    #[test]
    fn missing_directory_is_unreadable() {
        let scripts = Interpreters::default();
        let result = list_dir(
            Path::new("/path/does/not/exist"),
            &ListOptions {
                show_hidden: true,
                scripts: &scripts,
            },
        );
        assert!(matches!(result, Err(OpError::DirectoryUnreadable { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn executable_scripts_and_broken_links() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::{PermissionsExt, symlink};

        let tmp = tempdir()?;
        let script = tmp.path().join("run.sh");
        File::create(&script)?;
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755))?;
        let not_exec = tmp.path().join("idle.py");
        File::create(&not_exec)?;
        fs::set_permissions(&not_exec, fs::Permissions::from_mode(0o644))?;
        symlink(tmp.path().join("nowhere"), tmp.path().join("dangling"))?;

        let scripts = Interpreters::default();
        let listing = list_dir(
            tmp.path(),
            &ListOptions {
                show_hidden: true,
                scripts: &scripts,
            },
        )?;

        let run = listing.get(listing.position(OsStr::new("run.sh")).ok_or("run.sh")?);
        assert!(run.is_some_and(|e| e.is_executable_script()));

        let idle = listing.get(listing.position(OsStr::new("idle.py")).ok_or("idle.py")?);
        assert!(idle.is_some_and(|e| !e.is_executable_script()));

        let dangling = listing
            .get(listing.position(OsStr::new("dangling")).ok_or("dangling")?)
            .ok_or("dangling entry")?;
        assert_eq!(dangling.kind(), EntryKind::File);
        assert!(dangling.is_symlink());
        assert!(!dangling.is_executable());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_directory_is_a_directory() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::symlink;

        let tmp = tempdir()?;
        fs::create_dir(tmp.path().join("real"))?;
        symlink(tmp.path().join("real"), tmp.path().join("link"))?;

        let scripts = Interpreters::default();
        let listing = list_dir(
            tmp.path(),
            &ListOptions {
                show_hidden: true,
                scripts: &scripts,
            },
        )?;
        assert!(listing.entries().iter().all(|e| e.is_dir()));
        assert!(listing.entries().iter().any(|e| e.is_symlink()));
        Ok(())
    }
}
