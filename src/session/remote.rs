use tracing::debug;

use crate::device::DeviceLink;
use crate::error::LinkError;
use crate::model::{DirectoryEntry, DirectoryListing, EntryKind};

/// Device root as kept in `current_path`.
pub(crate) const REMOTE_ROOT: &str = "";

pub(crate) fn join_remote(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// Textual parent; the root is its own parent.
pub(crate) fn parent_remote_dir(path: &str) -> String {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map(|(head, _)| head.to_string())
        .unwrap_or_else(|| REMOTE_ROOT.to_string())
}

pub(crate) fn display_remote_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RemoteDirectory {
    current_path: String,
    listing: DirectoryListing,
    selected: Option<usize>,
}

impl RemoteDirectory {
    pub(crate) fn current_path(&self) -> &str {
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

    pub(crate) fn path_of(&self, name: &str) -> String {
        join_remote(&self.current_path, name)
    }

    /// Lists `path` and classifies every name without touching the model.
    fn load(&self, path: &str, link: &DeviceLink) -> Result<DirectoryListing, LinkError> {
        let names = link.list(path)?;
        let entries = names.into_iter().map(|name| {
            if link.is_directory(&join_remote(path, &name)) {
                DirectoryEntry::directory(name)
            } else {
                DirectoryEntry::file(name)
            }
        });
        Ok(DirectoryListing::from_entries(entries.collect::<Vec<_>>()))
    }

    fn commit(&mut self, path: String, listing: DirectoryListing) {
        debug!(
            path = %display_remote_path(&path),
            entries = listing.len(),
            "remote listing replaced"
        );
        self.current_path = path;
        self.listing = listing;
        self.selected = None;
    }

    /// Re-lists `current_path`. The listing is only replaced once every name
    /// has been classified.
    pub(crate) fn reload(&mut self, link: &DeviceLink) -> Result<(), LinkError> {
        let listing = self.load(&self.current_path, link)?;
        self.commit(self.current_path.clone(), listing);
        Ok(())
    }

    /// Switches to `path` once its listing is known; on error path and
    /// listing both stay as they were.
    pub(crate) fn move_to(&mut self, path: &str, link: &DeviceLink) -> Result<(), LinkError> {
        let listing = self.load(path, link)?;
        self.commit(path.to_string(), listing);
        Ok(())
    }

    /// Drops every entry and points at `path`, leaving only the parent marker.
    pub(crate) fn clear_at(&mut self, path: &str) {
        self.commit(path.to_string(), DirectoryListing::default());
    }

    /// Moves into `entry` and reloads. Returns `false` when `entry` is a
    /// file, which leaves everything untouched.
    pub(crate) fn enter(
        &mut self,
        entry: &DirectoryEntry,
        link: &DeviceLink,
    ) -> Result<bool, LinkError> {
        let next = if entry.is_parent() {
            parent_remote_dir(&self.current_path)
        } else if entry.kind == EntryKind::Directory {
            self.path_of(&entry.name)
        } else {
            return Ok(false);
        };
        self.move_to(&next, link)?;
        Ok(true)
    }
}
