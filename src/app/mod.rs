use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::app::constants::STATUS_READY;
use crate::app::logging::prune_log_file;
use crate::device::{AmpyTransport, Transport};
use crate::model::{
    AppAction, Mode, Notice, Pane, PendingRemoval, PortPickerState, SettingsFile, SettingsState,
};
use crate::session::Session;
use crate::storage::{config_path, load_settings, log_path, save_settings};

mod actions;
pub(crate) mod constants;
mod handlers;
mod logging;
mod settings;

/// Where settings come from and which transfer tool to run.
#[derive(Debug, Clone, Default)]
pub(crate) struct StartupOptions {
    pub(crate) config: Option<PathBuf>,
    pub(crate) program: Option<String>,
}

pub(crate) struct App {
    pub(crate) config_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) status: String,
    pub(crate) transcript: VecDeque<String>,
    pub(crate) session: Session,
    pub(crate) focus: Pane,
    pub(crate) mode: Mode,
    pub(crate) settings: SettingsState,
    pub(crate) port_picker: Option<PortPickerState>,
    pub(crate) directory_name: String,
    pub(crate) pending_removal: Option<PendingRemoval>,
    pub(crate) pending_action: Option<AppAction>,
    pub(crate) notice: Option<Notice>,
}

impl App {
    pub(crate) fn load(options: StartupOptions) -> Result<Self> {
        let config_path = config_path(options.config)?;
        let log_path = log_path()?;
        prune_log_file(&log_path);
        let loaded = load_settings(&config_path);
        let transport = match options.program {
            Some(program) => AmpyTransport::new(program),
            None => AmpyTransport::default(),
        };
        let start = start_directory(loaded.settings.last_local_dir.as_deref())?;
        let mut app = Self::assemble(
            config_path,
            log_path,
            loaded.settings,
            Arc::new(transport),
            start,
        );
        if let Some(reason) = loaded.fallback {
            app.print(&format!("Using default settings ({reason})"));
        }
        if let Err(err) = app.session.refresh_local() {
            app.print(&err.to_string());
        }
        app.set_status(STATUS_READY);
        Ok(app)
    }

    fn assemble(
        config_path: PathBuf,
        log_path: PathBuf,
        settings: SettingsFile,
        transport: Arc<dyn Transport>,
        start: PathBuf,
    ) -> Self {
        let form = SettingsState::from_profile(&settings.profile);
        Self {
            config_path,
            log_path,
            status: STATUS_READY.to_string(),
            transcript: VecDeque::new(),
            session: Session::new(settings.profile, transport, start),
            focus: Pane::Remote,
            mode: Mode::Normal,
            settings: form,
            port_picker: None,
            directory_name: String::new(),
            pending_removal: None,
            pending_action: None,
            notice: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_test(transport: Arc<dyn Transport>, dir: &Path) -> Self {
        let mut app = Self::assemble(
            dir.join("config.json"),
            dir.join("ampy-tui.log"),
            SettingsFile::default(),
            transport,
            dir.to_path_buf(),
        );
        let _ = app.session.refresh_local();
        app
    }

    pub(crate) fn settings_file(&self) -> SettingsFile {
        SettingsFile {
            profile: self.session.profile().clone(),
            last_local_dir: Some(
                self.session
                    .local()
                    .current_path()
                    .to_string_lossy()
                    .into_owned(),
            ),
        }
    }

    pub(crate) fn save_settings(&self) -> Result<()> {
        save_settings(&self.config_path, &self.settings_file())
            .with_context(|| format!("save settings to {}", self.config_path.display()))
    }
}

fn start_directory(last_local_dir: Option<&str>) -> Result<PathBuf> {
    if let Some(dir) = last_local_dir.map(Path::new).filter(|dir| dir.is_dir()) {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir().context("current dir")
}
