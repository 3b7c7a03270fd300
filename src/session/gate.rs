use crate::model::{DirectoryEntry, EntryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Which actions a front end should offer right now. Derived on demand from
/// the connection state and the two pane selections; nothing here is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct EnabledActions {
    pub(crate) refresh: bool,
    pub(crate) make_directory: bool,
    pub(crate) reset: bool,
    pub(crate) run: bool,
    pub(crate) get: bool,
    pub(crate) delete: bool,
    pub(crate) remove_directory: bool,
    pub(crate) put: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectionClass {
    Nothing,
    Parent,
    File,
    Directory,
}

fn classify(selection: Option<&DirectoryEntry>) -> SelectionClass {
    match selection {
        None => SelectionClass::Nothing,
        Some(entry) if entry.is_parent() => SelectionClass::Parent,
        Some(entry) => match entry.kind {
            EntryKind::File => SelectionClass::File,
            EntryKind::Directory => SelectionClass::Directory,
        },
    }
}

pub(crate) fn file_actions_enabled(selection: Option<&DirectoryEntry>) -> bool {
    classify(selection) == SelectionClass::File
}

pub(crate) fn directory_actions_enabled(selection: Option<&DirectoryEntry>) -> bool {
    classify(selection) == SelectionClass::Directory
}

pub(crate) fn enabled_actions(
    state: ConnectionState,
    remote_selection: Option<&DirectoryEntry>,
    local_selection: Option<&DirectoryEntry>,
) -> EnabledActions {
    if state == ConnectionState::Disconnected {
        return EnabledActions::default();
    }
    let files = file_actions_enabled(remote_selection);
    EnabledActions {
        refresh: true,
        make_directory: true,
        reset: true,
        run: true,
        get: files,
        delete: files,
        remove_directory: directory_actions_enabled(remote_selection),
        put: local_selection.is_some_and(|entry| !entry.is_parent()),
    }
}
