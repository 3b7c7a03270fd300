use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_PORT: &str = "/dev/ttyUSB0";
pub(crate) const DEFAULT_BAUD: u32 = 115_200;
pub(crate) const PARENT_MARKER: &str = "..";

pub(crate) const SUPPORTED_BAUD_RATES: [u32; 17] = [
    300, 600, 1200, 2400, 4800, 9600, 14400, 19200, 28800, 38400, 57600, 115_200, 230_400,
    460_800, 500_000, 576_000, 921_600,
];

/// A baud rate from the fixed set the transfer tool is offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub(crate) struct BaudRate(u32);

impl BaudRate {
    pub(crate) fn new(rate: u32) -> Option<Self> {
        SUPPORTED_BAUD_RATES
            .contains(&rate)
            .then_some(Self(rate))
    }

    pub(crate) fn value(self) -> u32 {
        self.0
    }

    fn index(self) -> usize {
        SUPPORTED_BAUD_RATES
            .iter()
            .position(|rate| *rate == self.0)
            .unwrap_or(0)
    }

    pub(crate) fn next(self) -> Self {
        let index = (self.index() + 1) % SUPPORTED_BAUD_RATES.len();
        Self(SUPPORTED_BAUD_RATES[index])
    }

    pub(crate) fn previous(self) -> Self {
        let index = self
            .index()
            .checked_sub(1)
            .unwrap_or(SUPPORTED_BAUD_RATES.len() - 1);
        Self(SUPPORTED_BAUD_RATES[index])
    }
}

impl Default for BaudRate {
    fn default() -> Self {
        Self(DEFAULT_BAUD)
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = String;

    fn try_from(rate: u32) -> Result<Self, Self::Error> {
        Self::new(rate).ok_or_else(|| format!("unsupported baud rate {rate}"))
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> Self {
        rate.0
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Serial settings every transfer tool invocation is prefixed with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ConnectionProfile {
    pub(crate) port: String,
    pub(crate) baud: BaudRate,
    #[serde(deserialize_with = "deserialize_delay")]
    pub(crate) delay: f64,
}

impl Default for ConnectionProfile {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud: BaudRate::default(),
            delay: 0.0,
        }
    }
}

pub(crate) fn valid_delay(delay: f64) -> bool {
    delay.is_finite() && delay >= 0.0
}

fn deserialize_delay<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let delay = f64::deserialize(deserializer)?;
    if valid_delay(delay) {
        Ok(delay)
    } else {
        Err(serde::de::Error::custom(format!(
            "delay must be a non-negative number of seconds, got {delay}"
        )))
    }
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct SettingsFile {
    #[serde(flatten)]
    pub(crate) profile: ConnectionProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_local_dir: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectoryEntry {
    pub(crate) name: String,
    pub(crate) kind: EntryKind,
}

impl DirectoryEntry {
    pub(crate) fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    pub(crate) fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Directory,
        }
    }

    pub(crate) fn parent() -> Self {
        Self::directory(PARENT_MARKER)
    }

    pub(crate) fn is_parent(&self) -> bool {
        self.kind == EntryKind::Directory && self.name == PARENT_MARKER
    }

    pub(crate) fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Entries of one directory: the parent marker, then directories, then
/// files, each group in ascending name order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectoryListing {
    entries: Vec<DirectoryEntry>,
}

impl DirectoryListing {
    pub(crate) fn from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        let (mut dirs, mut files): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .filter(|entry| !entry.is_parent())
            .partition(DirectoryEntry::is_dir);
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        let mut ordered = Vec::with_capacity(dirs.len() + files.len() + 1);
        ordered.push(DirectoryEntry::parent());
        ordered.extend(dirs);
        ordered.extend(files);
        Self { entries: ordered }
    }

    pub(crate) fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub(crate) fn get(&self, index: usize) -> Option<&DirectoryEntry> {
        self.entries.get(index)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }
}

impl Default for DirectoryListing {
    fn default() -> Self {
        Self::from_entries(Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pane {
    Local,
    Remote,
}

impl Pane {
    pub(crate) fn other(self) -> Self {
        match self {
            Pane::Local => Pane::Remote,
            Pane::Remote => Pane::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Normal,
    Settings,
    MakeDirectory,
    ConfirmRemoval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingsField {
    Port,
    Baud,
    Delay,
    ActionSave,
}

#[derive(Debug, Clone)]
pub(crate) struct SettingsState {
    pub(crate) port: String,
    pub(crate) baud: BaudRate,
    pub(crate) delay: f64,
    pub(crate) active_field: SettingsField,
}

impl SettingsState {
    pub(crate) fn from_profile(profile: &ConnectionProfile) -> Self {
        Self {
            port: profile.port.clone(),
            baud: profile.baud,
            delay: profile.delay,
            active_field: SettingsField::Port,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PortPickerState {
    pub(crate) ports: Vec<String>,
    pub(crate) selected: usize,
}

/// Removal waiting for the user's yes/no answer.
#[derive(Debug, Clone)]
pub(crate) struct PendingRemoval {
    pub(crate) entry: DirectoryEntry,
}

impl PendingRemoval {
    pub(crate) fn question(&self) -> String {
        match self.entry.kind {
            EntryKind::File => format!(
                "Are you sure you want to delete the file '{}' from the device?",
                self.entry.name
            ),
            EntryKind::Directory => format!(
                "Are you sure you want to delete the directory '{}' from the device?",
                self.entry.name
            ),
        }
    }
}

/// Work queued by a key press, run after the next frame is drawn.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum AppAction {
    Connect,
    RefreshLocal,
    RefreshRemote,
    EnterLocal,
    EnterRemote,
    Get,
    Put,
    MakeDirectory(String),
    PrepareRemoval,
    Remove { confirmed: bool },
    Reset,
    Run,
    ApplySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct Notice {
    pub(crate) title: String,
    pub(crate) message: String,
}
