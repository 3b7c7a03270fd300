use std::io;
use std::path::Path;
use std::process::Command;

use tracing::debug;

pub(crate) const DEFAULT_PROGRAM: &str = "ampy";

/// What one run of the transfer tool reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ToolOutput {
    pub(crate) code: Option<i32>,
    pub(crate) stdout: Vec<u8>,
    pub(crate) stderr: Vec<u8>,
}

impl ToolOutput {
    pub(crate) fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub(crate) fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub(crate) fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Process boundary to the device. `execute` receives the full argument
/// vector (profile prefix, verb, verb arguments) and blocks until the tool
/// exits.
pub(crate) trait Transport: Send + Sync {
    fn port_available(&self, port: &str) -> bool;
    fn execute(&self, args: &[String]) -> io::Result<ToolOutput>;
}

#[derive(Debug, Clone)]
pub(crate) struct AmpyTransport {
    program: String,
}

impl AmpyTransport {
    pub(crate) fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub(crate) fn program(&self) -> &str {
        &self.program
    }
}

impl Default for AmpyTransport {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Transport for AmpyTransport {
    fn port_available(&self, port: &str) -> bool {
        !port.trim().is_empty() && Path::new(port).exists()
    }

    fn execute(&self, args: &[String]) -> io::Result<ToolOutput> {
        debug!(program = %self.program, ?args, "running transfer tool");
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|err| io::Error::new(err.kind(), format!("{}: {err}", self.program())))?;
        debug!(code = ?output.status.code(), "transfer tool exited");
        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
