use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SessionError, SessionResult};
use crate::model::{DirectoryEntry, DirectoryListing, EntryKind};

pub(crate) fn read_local_listing(dir: &Path) -> SessionResult<DirectoryListing> {
    let read = fs::read_dir(dir).map_err(|err| SessionError::local_io(dir, err))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|err| SessionError::local_io(dir, err))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        // follows symlinks; dangling links and sockets are neither and skipped
        let Ok(meta) = fs::metadata(entry.path()) else {
            continue;
        };
        if meta.is_dir() {
            entries.push(DirectoryEntry::directory(name));
        } else if meta.is_file() {
            entries.push(DirectoryEntry::file(name));
        }
    }
    Ok(DirectoryListing::from_entries(entries))
}

#[derive(Debug, Clone)]
pub(crate) struct LocalDirectory {
    current_path: PathBuf,
    listing: DirectoryListing,
    selected: Option<usize>,
}

impl LocalDirectory {
    pub(crate) fn new(start: PathBuf) -> Self {
        Self {
            current_path: start,
            listing: DirectoryListing::default(),
            selected: None,
        }
    }

    pub(crate) fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub(crate) fn listing(&self) -> &DirectoryListing {
        &self.listing
    }

    pub(crate) fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub(crate) fn selection(&self) -> Option<&DirectoryEntry> {
        self.selected.and_then(|index| self.listing.get(index))
    }

    pub(crate) fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|index| *index < self.listing.len());
    }

    pub(crate) fn path_of(&self, name: &str) -> PathBuf {
        self.current_path.join(name)
    }

    pub(crate) fn refresh(&mut self) -> SessionResult<()> {
        self.listing = read_local_listing(&self.current_path)?;
        self.selected = None;
        Ok(())
    }

    /// Returns `false` when nothing changed: a file entry, the parent of the
    /// filesystem root, or a directory that no longer is one.
    pub(crate) fn enter(&mut self, entry: &DirectoryEntry) -> SessionResult<bool> {
        let next = if entry.is_parent() {
            match self.current_path.parent() {
                Some(parent) => parent.to_path_buf(),
                None => return Ok(false),
            }
        } else if entry.kind == EntryKind::Directory {
            self.path_of(&entry.name)
        } else {
            return Ok(false);
        };
        if !next.is_dir() {
            return Ok(false);
        }
        let listing = read_local_listing(&next)?;
        self.current_path = next;
        self.listing = listing;
        self.selected = None;
        Ok(true)
    }
}
