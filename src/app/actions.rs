use tracing::debug;

use crate::app::App;
use crate::app::constants::{
    NO_FILE_SELECTED, NOTICE_UNREACHABLE_TITLE, STATUS_CANCELLED, STATUS_READY,
};
use crate::error::SessionError;
use crate::model::{AppAction, EntryKind, Mode, Notice, Pane};
use crate::session::Confirmation;
use crate::session::remote::display_remote_path;

impl App {
    /// Runs the action queued by the last key press. Called by the event
    /// loop once the "working" frame is on screen.
    pub(crate) fn run_pending_action(&mut self) {
        let Some(action) = self.pending_action.take() else {
            return;
        };
        debug!(?action, "running action");
        let result = match action {
            AppAction::Connect => self.connect(),
            AppAction::RefreshLocal => self.session.refresh_local(),
            AppAction::RefreshRemote => self.session.refresh_remote(),
            AppAction::EnterLocal => self.enter(Pane::Local),
            AppAction::EnterRemote => self.enter(Pane::Remote),
            AppAction::Get => self.fetch_selected(),
            AppAction::Put => self.upload_selected(),
            AppAction::MakeDirectory(name) => self.make_directory(&name),
            AppAction::PrepareRemoval => self.prepare_removal(),
            AppAction::Remove { confirmed } => self.remove_pending(confirmed.into()),
            AppAction::Reset => self.reset_device(),
            AppAction::Run => self.run_selected(),
            AppAction::ApplySettings => self.apply_settings(),
        };
        match result {
            Ok(()) => self.status = STATUS_READY.to_string(),
            Err(err) => self.report_error(err),
        }
    }

    pub(crate) fn report_error(&mut self, err: SessionError) {
        match err {
            SessionError::Unreachable { port } => {
                let message = format!("Can't find your remote device '{port}'");
                self.log_line(&message);
                self.notice = Some(Notice {
                    title: NOTICE_UNREACHABLE_TITLE.to_string(),
                    message,
                });
                self.status = STATUS_READY.to_string();
            }
            SessionError::UserCancelled => {
                debug!("action cancelled by user");
                self.status = STATUS_CANCELLED.to_string();
            }
            other => {
                self.print(&other.to_string());
                self.status = STATUS_READY.to_string();
            }
        }
    }

    fn connect(&mut self) -> Result<(), SessionError> {
        self.session.refresh_remote()?;
        let port = self.session.profile().port.clone();
        self.print(&format!("Connected to device {port}"));
        Ok(())
    }

    fn enter(&mut self, pane: Pane) -> Result<(), SessionError> {
        match pane {
            Pane::Local => {
                let Some(entry) = self.session.local().selection().cloned() else {
                    return Ok(());
                };
                self.session.enter_local(&entry)?;
            }
            Pane::Remote => {
                let Some(entry) = self.session.remote().selection().cloned() else {
                    return Ok(());
                };
                if entry.kind == EntryKind::Directory {
                    self.session.enter_remote(&entry)?;
                }
            }
        }
        Ok(())
    }

    fn fetch_selected(&mut self) -> Result<(), SessionError> {
        let Some(entry) = self
            .session
            .remote()
            .selection()
            .filter(|entry| entry.kind == EntryKind::File)
            .cloned()
        else {
            self.print(NO_FILE_SELECTED);
            return Ok(());
        };
        let Some(download) = self.session.get(&entry)? else {
            return Ok(());
        };
        self.print(&format!(
            "File '{}' successfully fetched from device",
            entry.name
        ));
        download.refreshed
    }

    fn upload_selected(&mut self) -> Result<(), SessionError> {
        let Some(entry) = self
            .session
            .local()
            .selection()
            .filter(|entry| !entry.is_parent())
            .cloned()
        else {
            self.print(NO_FILE_SELECTED);
            return Ok(());
        };
        if let Some(upload) = self.session.put(&entry)? {
            self.print(&format!(
                "File '{}' successfully uploaded to device as '{}'",
                upload.source.display(),
                upload.dest
            ));
        }
        Ok(())
    }

    fn make_directory(&mut self, name: &str) -> Result<(), SessionError> {
        if let Some(path) = self.session.make_directory(name)? {
            self.print(&format!("Directory '{path}' created on device"));
        }
        Ok(())
    }

    /// Opens the yes/no prompt only once the board answered a probe.
    fn prepare_removal(&mut self) -> Result<(), SessionError> {
        if self.pending_removal.is_none() {
            return Ok(());
        }
        if let Err(err) = self.session.ensure_connected() {
            self.pending_removal = None;
            return Err(err);
        }
        self.mode = Mode::ConfirmRemoval;
        Ok(())
    }

    fn remove_pending(&mut self, confirmation: Confirmation) -> Result<(), SessionError> {
        let Some(pending) = self.pending_removal.take() else {
            return Ok(());
        };
        let entry = pending.entry;
        match entry.kind {
            EntryKind::File => {
                if self.session.delete_file(&entry, confirmation)? {
                    self.print(&format!(
                        "File '{}' successfully deleted from device",
                        entry.name
                    ));
                }
            }
            EntryKind::Directory => {
                if self.session.remove_directory(&entry, confirmation)? {
                    self.print(&format!(
                        "Directory '{}' successfully deleted from device",
                        entry.name
                    ));
                }
            }
        }
        Ok(())
    }

    fn reset_device(&mut self) -> Result<(), SessionError> {
        self.session.reset()?;
        let path = display_remote_path(self.session.remote().current_path()).to_string();
        self.print(&format!("Device reset, showing {path}"));
        Ok(())
    }

    fn run_selected(&mut self) -> Result<(), SessionError> {
        let Some(entry) = self
            .session
            .remote()
            .selection()
            .filter(|entry| entry.kind == EntryKind::File)
            .cloned()
        else {
            self.print(NO_FILE_SELECTED);
            return Ok(());
        };
        if let Some(output) = self.session.run(&entry)? {
            self.print(&output);
        }
        Ok(())
    }
}
