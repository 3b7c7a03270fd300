use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod device;
mod error;
mod model;
mod session;
mod storage;
mod ui;

use app::{App, StartupOptions};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const TICK_RATE: Duration = Duration::from_millis(100);
const PROGRAM_ENV: &str = "AMPY_TUI_PROGRAM";

fn print_usage() {
    println!("Usage: ampy-tui [debug] [--config <path>] [--program <name>]");
    println!();
    println!("Options:");
    println!("  debug, --debug      Write a debug log next to the settings file");
    println!("  --config <path>     Read and write settings at <path>");
    println!("  --program <name>    Transfer tool to run (default: ampy, env {PROGRAM_ENV})");
    println!("  --version           Print version and exit");
    println!("  --help              Print this help message");
}

#[derive(Debug, Default)]
struct Args {
    debug: bool,
    help: bool,
    version: bool,
    options: StartupOptions,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "debug" | "--debug" => parsed.debug = true,
            "--help" | "-h" => parsed.help = true,
            "--version" | "-V" => parsed.version = true,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                parsed.options.config = Some(PathBuf::from(path));
            }
            "--program" => {
                let program = args.next().context("--program needs a name")?;
                parsed.options.program = Some(program);
            }
            other => bail!("unknown option: {other}"),
        }
    }
    Ok(parsed)
}

fn init_debug_log() -> Result<()> {
    let path = storage::debug_log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create log dir")?;
    }
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("open debug log {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    info!("ampy-tui {VERSION} starting");
    Ok(())
}

fn main() -> Result<()> {
    let mut args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err}");
            print_usage();
            std::process::exit(2);
        }
    };
    if args.help {
        print_usage();
        return Ok(());
    }
    if args.version {
        println!("ampy-tui {VERSION}");
        return Ok(());
    }
    if args.debug {
        init_debug_log()?;
    }
    if args.options.program.is_none() {
        args.options.program = std::env::var(PROGRAM_ENV).ok().filter(|p| !p.is_empty());
    }

    let mut app = App::load(args.options)?;

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    if let Err(err) = app.save_settings() {
        eprintln!("{err:#}");
    }
    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| ui::draw_ui(frame, app))?;

        // the frame above shows the working status; run the action before reading input
        if app.pending_action.is_some() {
            app.run_pending_action();
            continue;
        }

        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c'));
                if ctrl_c || app.handle_key(key) {
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Result<Args> {
        parse_args(list.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parse_args_reads_flags() {
        let parsed = args(&["debug", "--config", "/tmp/a.json", "--program", "ampy2"]).unwrap();
        assert!(parsed.debug);
        assert_eq!(parsed.options.config, Some(PathBuf::from("/tmp/a.json")));
        assert_eq!(parsed.options.program.as_deref(), Some("ampy2"));
    }

    #[test]
    fn parse_args_rejects_unknown_and_missing_values() {
        assert!(args(&["--bogus"]).is_err());
        assert!(args(&["--config"]).is_err());
        assert!(args(&[]).unwrap().options.config.is_none());
    }
}
