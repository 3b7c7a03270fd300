//! Remote filesystem session: connection gate, both directory models and
//! every action that moves data between them.
//!
//! Each remote-affecting method probes the device exactly once before doing
//! anything else and returns [`SessionError::Unreachable`] without touching
//! the device when the probe fails. Models are only replaced once the
//! operation that feeds them has completed.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::device::{DeviceLink, Reachability, Transport};
use crate::error::{SessionError, SessionResult};
use crate::model::{ConnectionProfile, DirectoryEntry, EntryKind};

pub(crate) mod gate;
pub(crate) mod local;
pub(crate) mod remote;

use gate::{ConnectionState, EnabledActions, enabled_actions};
use local::LocalDirectory;
use remote::{REMOTE_ROOT, RemoteDirectory};

pub(crate) const RUN_OUTPUT_HEADER: &str = "---------Run Output---------";
pub(crate) const RUN_OUTPUT_FOOTER: &str = "----------------------------";

pub(crate) fn frame_run_output(stdout: &str) -> String {
    format!("{RUN_OUTPUT_HEADER}\n{}\n{RUN_OUTPUT_FOOTER}", stdout.trim_end())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Upload {
    pub(crate) source: PathBuf,
    pub(crate) dest: String,
}

#[derive(Debug)]
pub(crate) struct Download {
    pub(crate) dest: PathBuf,
    pub(crate) refreshed: SessionResult<()>,
}

pub(crate) struct Session {
    link: DeviceLink,
    state: ConnectionState,
    local: LocalDirectory,
    remote: RemoteDirectory,
}

impl Session {
    pub(crate) fn new(
        profile: ConnectionProfile,
        transport: Arc<dyn Transport>,
        local_start: PathBuf,
    ) -> Self {
        Self {
            link: DeviceLink::new(profile, transport),
            state: ConnectionState::Disconnected,
            local: LocalDirectory::new(local_start),
            remote: RemoteDirectory::default(),
        }
    }

    pub(crate) fn profile(&self) -> &ConnectionProfile {
        self.link.profile()
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.state
    }

    pub(crate) fn local(&self) -> &LocalDirectory {
        &self.local
    }

    pub(crate) fn local_mut(&mut self) -> &mut LocalDirectory {
        &mut self.local
    }

    pub(crate) fn remote(&self) -> &RemoteDirectory {
        &self.remote
    }

    pub(crate) fn remote_mut(&mut self) -> &mut RemoteDirectory {
        &mut self.remote
    }

    pub(crate) fn actions(&self) -> EnabledActions {
        enabled_actions(self.state, self.remote.selection(), self.local.selection())
    }

    /// Replaces the profile. A new port is probed right away.
    pub(crate) fn set_profile(&mut self, profile: ConnectionProfile) -> SessionResult<()> {
        let port_changed = profile.port != self.link.profile().port;
        self.link.configure(profile);
        if port_changed {
            self.ensure_connected()?;
        }
        Ok(())
    }

    pub(crate) fn ensure_connected(&mut self) -> SessionResult<()> {
        match self.link.probe() {
            Reachability::Reachable => {
                if self.state != ConnectionState::Connected {
                    info!(port = %self.link.profile().port, "device connected");
                }
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Reachability::Unreachable => {
                if self.state != ConnectionState::Disconnected {
                    info!(port = %self.link.profile().port, "device disconnected");
                }
                self.state = ConnectionState::Disconnected;
                Err(SessionError::Unreachable {
                    port: self.link.profile().port.clone(),
                })
            }
        }
    }

    pub(crate) fn refresh_remote(&mut self) -> SessionResult<()> {
        self.ensure_connected()?;
        self.remote.reload(&self.link)?;
        Ok(())
    }

    pub(crate) fn enter_remote(&mut self, entry: &DirectoryEntry) -> SessionResult<bool> {
        self.ensure_connected()?;
        Ok(self.remote.enter(entry, &self.link)?)
    }

    pub(crate) fn refresh_local(&mut self) -> SessionResult<()> {
        self.local.refresh()
    }

    pub(crate) fn enter_local(&mut self, entry: &DirectoryEntry) -> SessionResult<bool> {
        self.local.enter(entry)
    }

    /// Creates `name` under the current remote directory. A blank name does
    /// nothing and returns `None`.
    pub(crate) fn make_directory(&mut self, name: &str) -> SessionResult<Option<String>> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.ensure_connected()?;
        let path = self.remote.path_of(name);
        self.link.make_directory(&path)?;
        self.remote.reload(&self.link)?;
        Ok(Some(path))
    }

    pub(crate) fn remove_directory(
        &mut self,
        entry: &DirectoryEntry,
        confirmation: Confirmation,
    ) -> SessionResult<bool> {
        if entry.kind != EntryKind::Directory || entry.is_parent() {
            return Ok(false);
        }
        require_confirmation(confirmation, "directory removal")?;
        self.ensure_connected()?;
        self.link.remove_directory(&self.remote.path_of(&entry.name))?;
        self.remote.reload(&self.link)?;
        Ok(true)
    }

    pub(crate) fn delete_file(
        &mut self,
        entry: &DirectoryEntry,
        confirmation: Confirmation,
    ) -> SessionResult<bool> {
        if entry.kind != EntryKind::File {
            return Ok(false);
        }
        require_confirmation(confirmation, "file deletion")?;
        self.ensure_connected()?;
        self.link.remove(&self.remote.path_of(&entry.name))?;
        self.remote.reload(&self.link)?;
        Ok(true)
    }

    pub(crate) fn reset(&mut self) -> SessionResult<()> {
        self.ensure_connected()?;
        self.link.reset()?;
        // the board is back at its root either way; never keep entries of
        // the old directory under the new path
        if let Err(err) = self.remote.move_to(REMOTE_ROOT, &self.link) {
            self.remote.clear_at(REMOTE_ROOT);
            return Err(err.into());
        }
        Ok(())
    }

    /// Runs a device file and returns its output framed by the run banners.
    pub(crate) fn run(&mut self, entry: &DirectoryEntry) -> SessionResult<Option<String>> {
        if entry.kind != EntryKind::File {
            return Ok(None);
        }
        self.ensure_connected()?;
        let stdout = self.link.run(&self.remote.path_of(&entry.name))?;
        Ok(Some(frame_run_output(&stdout)))
    }

    /// Fetches a remote file into the current local directory. Once the
    /// file has landed the outcome of the local reload is handed back in
    /// [`Download::refreshed`] instead of failing the whole call.
    pub(crate) fn get(&mut self, entry: &DirectoryEntry) -> SessionResult<Option<Download>> {
        if entry.kind != EntryKind::File {
            return Ok(None);
        }
        self.ensure_connected()?;
        let dest = self.local.path_of(&entry.name);
        self.link.get(&self.remote.path_of(&entry.name), &dest)?;
        let refreshed = self.local.refresh();
        Ok(Some(Download { dest, refreshed }))
    }

    /// Uploads a local entry as-is into the current remote directory.
    pub(crate) fn put(&mut self, entry: &DirectoryEntry) -> SessionResult<Option<Upload>> {
        if entry.is_parent() {
            return Ok(None);
        }
        self.ensure_connected()?;
        let source = self.local.path_of(&entry.name);
        let dest = self.remote.path_of(&entry.name);
        self.link.put(&source, &dest)?;
        self.remote.reload(&self.link)?;
        Ok(Some(Upload { source, dest }))
    }
}

fn require_confirmation(confirmation: Confirmation, what: &str) -> SessionResult<()> {
    match confirmation {
        Confirmation::Confirmed => Ok(()),
        Confirmation::Declined => {
            debug!("{what} cancelled");
            Err(SessionError::UserCancelled)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::device::fake::FakeDevice;
    use crate::model::DirectoryListing;

    fn entries(listing: &DirectoryListing) -> Vec<(&str, EntryKind)> {
        listing
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.kind))
            .collect()
    }

    fn session_with(device: &Arc<FakeDevice>, local: &tempfile::TempDir) -> Session {
        Session::new(
            ConnectionProfile::default(),
            device.clone(),
            local.path().to_path_buf(),
        )
    }

    fn board() -> Arc<FakeDevice> {
        let device = Arc::new(FakeDevice::reachable());
        device.add_file("/main.py", b"print('hello')\n");
        device.add_dir("/lib");
        device
    }

    #[test]
    fn connect_builds_ordered_listing() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        assert_eq!(session.state(), ConnectionState::Disconnected);
        session.refresh_remote().unwrap();
        assert_eq!(session.state(), ConnectionState::Connected);
        assert_eq!(
            entries(session.remote().listing()),
            vec![
                ("..", EntryKind::Directory),
                ("lib", EntryKind::Directory),
                ("main.py", EntryKind::File)
            ]
        );
    }

    #[test]
    fn unreachable_device_blocks_every_mutation() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        fs::write(local.path().join("a.txt"), b"a").unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        let before = session.remote().listing().clone();
        device.set_reachable(false);
        device.clear_calls();

        let file = DirectoryEntry::file("main.py");
        let dir = DirectoryEntry::directory("lib");
        let results = [
            session.put(&DirectoryEntry::file("a.txt")).map(|_| ()),
            session.delete_file(&file, Confirmation::Confirmed).map(|_| ()),
            session.remove_directory(&dir, Confirmation::Confirmed).map(|_| ()),
            session.make_directory("new").map(|_| ()),
            session.reset(),
            session.run(&file).map(|_| ()),
            session.get(&file).map(|_| ()),
            session.refresh_remote(),
        ];
        for result in results {
            assert!(matches!(result, Err(SessionError::Unreachable { ref port }) if port == "/dev/ttyUSB0"));
        }
        assert!(device.calls().is_empty());
        assert_eq!(device.mutating_calls(), 0);
        assert_eq!(session.state(), ConnectionState::Disconnected);
        assert_eq!(session.remote().listing(), &before);
        assert_eq!(session.actions(), EnabledActions::default());
    }

    #[test]
    fn each_action_probes_once() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        let probes = device.probes();
        session.make_directory("data").unwrap();
        assert_eq!(device.probes(), probes + 1);
    }

    #[test]
    fn declined_removal_makes_no_device_call() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        let before = session.remote().listing().clone();
        device.clear_calls();

        let err = session
            .delete_file(&DirectoryEntry::file("main.py"), Confirmation::Declined)
            .unwrap_err();
        assert!(matches!(err, SessionError::UserCancelled));
        let err = session
            .remove_directory(&DirectoryEntry::directory("lib"), Confirmation::Declined)
            .unwrap_err();
        assert!(matches!(err, SessionError::UserCancelled));
        assert!(device.calls().is_empty());
        assert_eq!(session.remote().listing(), &before);
    }

    #[test]
    fn remove_directory_ignores_file_entries() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        device.clear_calls();
        let done = session
            .remove_directory(&DirectoryEntry::file("main.py"), Confirmation::Declined)
            .unwrap();
        assert!(!done);
        let done = session
            .delete_file(&DirectoryEntry::directory("lib"), Confirmation::Confirmed)
            .unwrap();
        assert!(!done);
        assert!(device.calls().is_empty());
        assert!(device.has("/main.py"));
    }

    #[test]
    fn confirmed_removals_refresh_listing() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        assert!(
            session
                .delete_file(&DirectoryEntry::file("main.py"), Confirmation::Confirmed)
                .unwrap()
        );
        assert!(
            session
                .remove_directory(&DirectoryEntry::directory("lib"), Confirmation::Confirmed)
                .unwrap()
        );
        assert_eq!(session.remote().listing().len(), 1);
        assert!(!device.has("/main.py") && !device.has("/lib"));
    }

    #[test]
    fn reset_returns_to_root_and_refreshes() {
        let device = board();
        device.add_file("/lib/util.py", b"");
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        session.enter_remote(&DirectoryEntry::directory("lib")).unwrap();
        assert_eq!(session.remote().current_path(), "/lib");
        device.clear_calls();

        session.reset().unwrap();
        assert_eq!(session.remote().current_path(), REMOTE_ROOT);
        let verbs = device.verbs();
        assert_eq!(verbs[0], "reset");
        assert_eq!(device.calls()[1], vec!["ls".to_string(), "/".to_string()]);
        assert!(session.remote().listing().find("main.py").is_some());
    }

    #[test]
    fn failed_reset_keeps_path() {
        let device = board();
        device.add_file("/lib/util.py", b"");
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        session.enter_remote(&DirectoryEntry::directory("lib")).unwrap();
        device.fail_verb("reset", "RuntimeError: could not enter raw repl");
        let err = session.reset().unwrap_err();
        assert!(matches!(
            err,
            SessionError::RemoteCommandFailed { verb: "reset", ref diagnostic }
                if diagnostic == "RuntimeError: could not enter raw repl"
        ));
        assert_eq!(session.remote().current_path(), "/lib");
    }

    #[test]
    fn reset_with_failed_listing_drops_old_entries() {
        let device = board();
        device.add_file("/lib/util.py", b"");
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        session.enter_remote(&DirectoryEntry::directory("lib")).unwrap();
        session.remote_mut().select(Some(1));
        device.fail_verb("ls", "RuntimeError: could not enter raw repl");

        let err = session.reset().unwrap_err();
        assert!(matches!(err, SessionError::RemoteCommandFailed { verb: "ls", .. }));
        assert_eq!(device.verbs()[device.verbs().len() - 2], "reset");
        assert_eq!(session.remote().current_path(), REMOTE_ROOT);
        assert_eq!(
            entries(session.remote().listing()),
            vec![("..", EntryKind::Directory)]
        );
        assert!(session.remote().selection().is_none());
        assert!(!session.actions().delete && !session.actions().run);
    }

    #[test]
    fn put_then_get_round_trips_bytes() {
        let device = board();
        let upload_dir = tempfile::tempdir().unwrap();
        let content = b"line one\nline two\x00\xff";
        fs::write(upload_dir.path().join("a.txt"), content).unwrap();
        let mut session = session_with(&device, &upload_dir);
        session.refresh_local().unwrap();

        let upload = session.put(&DirectoryEntry::file("a.txt")).unwrap().unwrap();
        assert_eq!(upload.dest, "/a.txt");
        assert!(session.remote().listing().find("a.txt").is_some());

        let download_dir = tempfile::tempdir().unwrap();
        *session.local_mut() = LocalDirectory::new(download_dir.path().to_path_buf());
        let download = session.get(&DirectoryEntry::file("a.txt")).unwrap().unwrap();
        assert!(download.refreshed.is_ok());
        assert_eq!(download.dest, download_dir.path().join("a.txt"));
        assert_eq!(fs::read(&download.dest).unwrap(), content);
        assert!(session.local().listing().find("a.txt").is_some());
    }

    #[test]
    fn failed_get_leaves_both_models() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_local().unwrap();
        session.refresh_remote().unwrap();
        session.local_mut().select(Some(0));
        let err = session.get(&DirectoryEntry::file("missing.py")).unwrap_err();
        assert!(matches!(
            err,
            SessionError::RemoteCommandFailed { verb: "get", ref diagnostic }
                if diagnostic.starts_with("RuntimeError:")
        ));
        assert_eq!(session.local().selected_index(), Some(0));
        assert!(!local.path().join("missing.py").exists());
    }

    #[test]
    fn get_reports_landed_file_when_local_reload_fails() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        device.remove_local_dir_after_get();

        let download = session.get(&DirectoryEntry::file("main.py")).unwrap().unwrap();
        assert_eq!(download.dest, local.path().join("main.py"));
        assert!(matches!(download.refreshed, Err(SessionError::LocalIoFailed { .. })));
    }

    #[test]
    fn put_uploads_directory_entry_as_is() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        fs::create_dir(local.path().join("src")).unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        let before = session.remote().listing().clone();
        device.clear_calls();

        let err = session.put(&DirectoryEntry::directory("src")).unwrap_err();
        assert!(matches!(
            err,
            SessionError::RemoteCommandFailed { verb: "put", ref diagnostic }
                if diagnostic.starts_with("RuntimeError:")
        ));
        let source = local.path().join("src").to_string_lossy().into_owned();
        assert_eq!(
            device.calls(),
            vec![vec!["put".to_string(), source, "/src".to_string()]]
        );
        assert_eq!(session.remote().listing(), &before);
    }

    #[test]
    fn get_ignores_directories() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        device.clear_calls();
        assert!(session.get(&DirectoryEntry::directory("lib")).unwrap().is_none());
        assert!(device.calls().is_empty());
    }

    #[test]
    fn make_directory_with_blank_name_does_nothing() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        assert!(session.make_directory("   ").unwrap().is_none());
        assert_eq!(device.probes(), 0);
        assert!(device.calls().is_empty());
    }

    #[test]
    fn make_directory_failure_keeps_listing() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        let before = session.remote().listing().clone();
        let err = session.make_directory("lib").unwrap_err();
        assert!(err.to_string().contains("RuntimeError: Directory already exists"));
        assert_eq!(session.remote().listing(), &before);
        assert_eq!(session.state(), ConnectionState::Connected);
    }

    #[test]
    fn make_directory_under_current_path() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        session.enter_remote(&DirectoryEntry::directory("lib")).unwrap();
        let path = session.make_directory("sub").unwrap();
        assert_eq!(path.as_deref(), Some("/lib/sub"));
        assert!(session.remote().listing().find("sub").is_some_and(|e| e.is_dir()));
    }

    #[test]
    fn run_frames_output() {
        let device = board();
        device.set_run_output("hello\n");
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        let output = session.run(&DirectoryEntry::file("main.py")).unwrap().unwrap();
        assert_eq!(
            output,
            "---------Run Output---------\nhello\n----------------------------"
        );
        assert_eq!(
            device.calls(),
            vec![vec!["run".to_string(), "/main.py".to_string()]]
        );
    }

    #[test]
    fn port_change_reprobes() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        device.set_reachable(false);
        let mut profile = session.profile().clone();
        profile.delay = 1.0;
        session.set_profile(profile.clone()).unwrap();
        assert_eq!(session.state(), ConnectionState::Connected);
        profile.port = "/dev/ttyACM0".to_string();
        let err = session.set_profile(profile).unwrap_err();
        assert!(matches!(err, SessionError::Unreachable { ref port } if port == "/dev/ttyACM0"));
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn selection_drives_enabled_actions() {
        let device = board();
        let local = tempfile::tempdir().unwrap();
        let mut session = session_with(&device, &local);
        session.refresh_remote().unwrap();
        session.remote_mut().select(Some(2));
        let actions = session.actions();
        assert!(actions.get && actions.delete && !actions.remove_directory);
        session.remote_mut().select(Some(1));
        let actions = session.actions();
        assert!(!actions.get && !actions.delete && actions.remove_directory);
    }
}
