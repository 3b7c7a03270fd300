use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::app::constants::{
    NO_DIRECTORY_SELECTED, NO_FILE_SELECTED, NOT_CONNECTED_MESSAGE, STATUS_CANCELLED,
    STATUS_WORKING,
};
use crate::model::{AppAction, EntryKind, Mode, Pane, PendingRemoval};
use crate::session::gate::ConnectionState;

impl App {
    /// Returns `true` when the application should quit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return false;
        }
        match self.mode {
            Mode::Normal => return self.handle_normal_key(key),
            Mode::Settings => self.handle_settings_key(key),
            Mode::MakeDirectory => self.handle_make_directory_key(key),
            Mode::ConfirmRemoval => self.handle_confirm_removal_key(key),
        }
        false
    }

    fn queue(&mut self, action: AppAction) {
        self.status = STATUS_WORKING.to_string();
        self.pending_action = Some(action);
    }

    fn require_connection(&mut self) -> bool {
        if self.session.state() == ConnectionState::Connected {
            return true;
        }
        self.set_status(NOT_CONNECTED_MESSAGE);
        false
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab | KeyCode::BackTab => self.focus = self.focus.other(),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Enter => match self.focus {
                Pane::Local => {
                    if self.session.local().selection().is_some_and(|e| e.is_dir()) {
                        self.queue(AppAction::EnterLocal);
                    }
                }
                Pane::Remote => {
                    if self.session.remote().selection().is_some_and(|e| e.is_dir()) {
                        self.queue(AppAction::EnterRemote);
                    }
                }
            },
            KeyCode::Char('c') => self.queue(AppAction::Connect),
            KeyCode::Char('r') => match self.focus {
                Pane::Local => self.queue(AppAction::RefreshLocal),
                Pane::Remote => {
                    if self.require_connection() {
                        self.queue(AppAction::RefreshRemote);
                    }
                }
            },
            KeyCode::Char('g') => {
                if self.require_connection() {
                    self.queue(AppAction::Get);
                }
            }
            KeyCode::Char('p') => {
                if self.require_connection() {
                    self.queue(AppAction::Put);
                }
            }
            KeyCode::Char('e') => {
                if self.require_connection() {
                    self.queue(AppAction::Run);
                }
            }
            KeyCode::Char('R') => {
                if self.require_connection() {
                    self.queue(AppAction::Reset);
                }
            }
            KeyCode::Char('m') => {
                if self.require_connection() {
                    self.directory_name.clear();
                    self.mode = Mode::MakeDirectory;
                    self.set_status("Type a directory name and press Enter");
                }
            }
            KeyCode::Char('x') => self.ask_removal(EntryKind::Directory),
            KeyCode::Char('d') => self.ask_removal(EntryKind::File),
            KeyCode::Char('s') => self.open_settings(),
            KeyCode::Char('C') => self.clear_transcript(),
            _ => {}
        }
        false
    }

    fn move_selection(&mut self, forward: bool) {
        let (current, len) = match self.focus {
            Pane::Local => (
                self.session.local().selected_index(),
                self.session.local().listing().len(),
            ),
            Pane::Remote => (
                self.session.remote().selected_index(),
                self.session.remote().listing().len(),
            ),
        };
        if len == 0 {
            return;
        }
        let next = match current {
            None => 0,
            Some(index) if forward => (index + 1).min(len - 1),
            Some(index) => index.saturating_sub(1),
        };
        match self.focus {
            Pane::Local => self.session.local_mut().select(Some(next)),
            Pane::Remote => self.session.remote_mut().select(Some(next)),
        }
    }

    fn ask_removal(&mut self, kind: EntryKind) {
        if !self.require_connection() {
            return;
        }
        let entry = self
            .session
            .remote()
            .selection()
            .filter(|entry| entry.kind == kind && !entry.is_parent())
            .cloned();
        let Some(entry) = entry else {
            self.set_status(match kind {
                EntryKind::File => NO_FILE_SELECTED,
                EntryKind::Directory => NO_DIRECTORY_SELECTED,
            });
            return;
        };
        self.pending_removal = Some(PendingRemoval { entry });
        self.queue(AppAction::PrepareRemoval);
    }

    fn handle_confirm_removal_key(&mut self, key: KeyEvent) {
        let confirmed = match key.code {
            KeyCode::Enter | KeyCode::Char('y') => true,
            KeyCode::Esc | KeyCode::Char('n') => false,
            _ => return,
        };
        self.mode = Mode::Normal;
        self.queue(AppAction::Remove { confirmed });
    }

    fn handle_make_directory_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.directory_name.clear();
                self.set_status(STATUS_CANCELLED);
            }
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                let name = std::mem::take(&mut self.directory_name);
                if name.trim().is_empty() {
                    self.set_status(STATUS_CANCELLED);
                } else {
                    self.queue(AppAction::MakeDirectory(name));
                }
            }
            KeyCode::Backspace => {
                self.directory_name.pop();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    self.directory_name.push(ch);
                }
            }
            _ => {}
        }
    }
}
