use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::App;
use crate::app::constants::{
    DELAY_MAX, DELAY_STEP, NOTICE_PORT_PICKER_MESSAGE, NOTICE_PORT_PICKER_TITLE,
    STATUS_CANCELLED, STATUS_WORKING,
};
use crate::error::SessionError;
use crate::model::{
    AppAction, ConnectionProfile, Mode, Notice, PortPickerState, SettingsField, SettingsState,
};

const FIELDS: [SettingsField; 4] = [
    SettingsField::Port,
    SettingsField::Baud,
    SettingsField::Delay,
    SettingsField::ActionSave,
];

pub(crate) fn step_delay(delay: f64, forward: bool) -> f64 {
    let next = if forward {
        delay + DELAY_STEP
    } else {
        delay - DELAY_STEP
    };
    ((next.clamp(0.0, DELAY_MAX)) * 10.0).round() / 10.0
}

fn profile_from_form(form: &SettingsState) -> ConnectionProfile {
    ConnectionProfile {
        port: form.port.trim().to_string(),
        baud: form.baud,
        delay: form.delay,
    }
}

impl App {
    pub(crate) fn open_settings(&mut self) {
        self.settings = SettingsState::from_profile(self.session.profile());
        self.mode = Mode::Settings;
        self.set_status("Edit settings and select Save");
    }

    pub(super) fn handle_settings_key(&mut self, key: KeyEvent) {
        if self.port_picker.is_some() {
            self.handle_port_picker_key(key);
            return;
        }
        match key.code {
            KeyCode::Esc => {
                self.mode = Mode::Normal;
                self.set_status(STATUS_CANCELLED);
            }
            KeyCode::Tab | KeyCode::Down => self.advance_settings_field(true),
            KeyCode::BackTab | KeyCode::Up => self.advance_settings_field(false),
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                match self.settings.active_field {
                    SettingsField::Baud => {
                        self.settings.baud = if forward {
                            self.settings.baud.next()
                        } else {
                            self.settings.baud.previous()
                        };
                    }
                    SettingsField::Delay => {
                        self.settings.delay = step_delay(self.settings.delay, forward);
                    }
                    SettingsField::Port | SettingsField::ActionSave => {}
                }
            }
            KeyCode::F(2) => {
                if self.settings.active_field == SettingsField::Port {
                    self.open_port_picker();
                }
            }
            KeyCode::Enter => {
                if self.settings.active_field == SettingsField::ActionSave {
                    if self.settings.port.trim().is_empty() {
                        self.set_status("Port must not be empty");
                        return;
                    }
                    self.mode = Mode::Normal;
                    self.status = STATUS_WORKING.to_string();
                    self.pending_action = Some(AppAction::ApplySettings);
                } else {
                    self.advance_settings_field(true);
                }
            }
            KeyCode::Backspace => {
                if self.settings.active_field == SettingsField::Port {
                    self.settings.port.pop();
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    return;
                }
                if self.settings.active_field == SettingsField::Port {
                    self.settings.port.push(ch);
                }
            }
            _ => {}
        }
    }

    fn advance_settings_field(&mut self, forward: bool) {
        let pos = FIELDS
            .iter()
            .position(|field| *field == self.settings.active_field)
            .unwrap_or(0);
        let next = if forward {
            (pos + 1) % FIELDS.len()
        } else if pos == 0 {
            FIELDS.len() - 1
        } else {
            pos - 1
        };
        self.settings.active_field = FIELDS[next];
    }

    fn open_port_picker(&mut self) {
        match serialport::available_ports() {
            Ok(ports) => {
                let names = ports.into_iter().map(|port| port.port_name).collect();
                self.show_port_picker(names);
            }
            Err(err) => self.set_status(format!("Listing serial ports failed: {err}")),
        }
    }

    pub(super) fn show_port_picker(&mut self, mut ports: Vec<String>) {
        if ports.is_empty() {
            self.notice = Some(Notice {
                title: NOTICE_PORT_PICKER_TITLE.to_string(),
                message: NOTICE_PORT_PICKER_MESSAGE.to_string(),
            });
            return;
        }
        ports.sort();
        let selected = ports
            .iter()
            .position(|port| *port == self.settings.port)
            .unwrap_or(0);
        self.port_picker = Some(PortPickerState { ports, selected });
    }

    fn handle_port_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = &mut self.port_picker else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.port_picker = None;
            }
            KeyCode::Up => {
                if picker.selected > 0 {
                    picker.selected -= 1;
                }
            }
            KeyCode::Down => {
                if picker.selected + 1 < picker.ports.len() {
                    picker.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(port) = picker.ports.get(picker.selected).cloned() {
                    self.settings.port = port;
                }
                self.port_picker = None;
            }
            _ => {}
        }
    }

    /// Applies the settings form to the session and persists it. A new port
    /// is probed right away; the profile is kept even when that probe fails.
    pub(super) fn apply_settings(&mut self) -> Result<(), SessionError> {
        let profile = profile_from_form(&self.settings);
        let summary = format!(
            "Settings saved: port {}, baud {}, delay {}",
            profile.port, profile.baud, profile.delay
        );
        let applied = self.session.set_profile(profile);
        match self.save_settings() {
            Ok(()) => self.print(&summary),
            Err(err) => self.print(&format!("{err:#}")),
        }
        applied
    }
}
