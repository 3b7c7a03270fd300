//! Device link: one transfer tool invocation per remote action.
//!
//! Every invocation is prefixed with the serial settings of the current
//! [`ConnectionProfile`]. The prefix is recomputed whenever the profile is
//! replaced, never per call.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::LinkError;
use crate::model::ConnectionProfile;

#[cfg(test)]
pub(crate) mod fake;
pub(crate) mod transport;

pub(crate) use transport::{AmpyTransport, ToolOutput, Transport};

/// Start of the human readable part of the tool's error output.
pub(crate) const DIAGNOSTIC_MARKER: &str = "RuntimeError:";

pub(crate) const VERB_LIST: &str = "ls";
pub(crate) const VERB_GET: &str = "get";
pub(crate) const VERB_PUT: &str = "put";
pub(crate) const VERB_REMOVE: &str = "rm";
pub(crate) const VERB_REMOVE_DIR: &str = "rmdir";
pub(crate) const VERB_MAKE_DIR: &str = "mkdir";
pub(crate) const VERB_RESET: &str = "reset";
pub(crate) const VERB_RUN: &str = "run";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Reachability {
    Reachable,
    Unreachable,
}

pub(crate) fn command_prefix(profile: &ConnectionProfile) -> Vec<String> {
    vec![
        "--port".to_string(),
        profile.port.clone(),
        "--baud".to_string(),
        profile.baud.value().to_string(),
        "--delay".to_string(),
        format!("{}", profile.delay),
    ]
}

/// Cuts tool output down to the part starting at [`DIAGNOSTIC_MARKER`].
pub(crate) fn extract_diagnostic(text: &str) -> String {
    let start = text.find(DIAGNOSTIC_MARKER).unwrap_or(0);
    text[start..].trim().to_string()
}

fn failure_diagnostic(output: &ToolOutput) -> String {
    let stderr = output.stderr_text();
    if !stderr.trim().is_empty() {
        return extract_diagnostic(&stderr);
    }
    let stdout = output.stdout_text();
    if !stdout.trim().is_empty() {
        return extract_diagnostic(&stdout);
    }
    match output.code {
        Some(code) => format!("exited with status {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// The tool names the device root "/", the session keeps it as "".
fn tool_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

pub(crate) struct DeviceLink {
    profile: ConnectionProfile,
    prefix: Vec<String>,
    transport: Arc<dyn Transport>,
}

impl DeviceLink {
    pub(crate) fn new(profile: ConnectionProfile, transport: Arc<dyn Transport>) -> Self {
        let prefix = command_prefix(&profile);
        Self {
            profile,
            prefix,
            transport,
        }
    }

    pub(crate) fn profile(&self) -> &ConnectionProfile {
        &self.profile
    }

    pub(crate) fn configure(&mut self, profile: ConnectionProfile) {
        self.prefix = command_prefix(&profile);
        self.profile = profile;
        debug!(prefix = ?self.prefix, "device link reconfigured");
    }

    pub(crate) fn probe(&self) -> Reachability {
        if self.transport.port_available(&self.profile.port) {
            Reachability::Reachable
        } else {
            warn!(port = %self.profile.port, "device port not found");
            Reachability::Unreachable
        }
    }

    pub(crate) fn list(&self, path: &str) -> Result<Vec<String>, LinkError> {
        let output = self.invoke(VERB_LIST, &[tool_path(path)])?;
        Ok(output
            .stdout_text()
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| line.rsplit('/').next())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// A path is a directory when the tool can list it.
    pub(crate) fn is_directory(&self, path: &str) -> bool {
        self.invoke(VERB_LIST, &[tool_path(path)]).is_ok()
    }

    pub(crate) fn get(&self, remote: &str, local: &Path) -> Result<(), LinkError> {
        self.invoke(
            VERB_GET,
            &[remote.to_string(), local.to_string_lossy().into_owned()],
        )
        .map(|_| ())
    }

    pub(crate) fn put(&self, local: &Path, remote: &str) -> Result<(), LinkError> {
        self.invoke(
            VERB_PUT,
            &[local.to_string_lossy().into_owned(), remote.to_string()],
        )
        .map(|_| ())
    }

    pub(crate) fn remove(&self, remote: &str) -> Result<(), LinkError> {
        self.invoke(VERB_REMOVE, &[remote.to_string()]).map(|_| ())
    }

    pub(crate) fn remove_directory(&self, remote: &str) -> Result<(), LinkError> {
        self.invoke(VERB_REMOVE_DIR, &[remote.to_string()]).map(|_| ())
    }

    pub(crate) fn make_directory(&self, remote: &str) -> Result<(), LinkError> {
        self.invoke(VERB_MAKE_DIR, &[remote.to_string()]).map(|_| ())
    }

    pub(crate) fn reset(&self) -> Result<(), LinkError> {
        self.invoke(VERB_RESET, &[]).map(|_| ())
    }

    // The tool's run verb uploads and executes a host file; the path handed
    // over here is a device path, so the call only works when the same path
    // also exists locally.
    pub(crate) fn run(&self, remote: &str) -> Result<String, LinkError> {
        self.invoke(VERB_RUN, &[remote.to_string()])
            .map(|output| output.stdout_text())
    }

    fn invoke(&self, verb: &'static str, args: &[String]) -> Result<ToolOutput, LinkError> {
        let mut argv = self.prefix.clone();
        argv.push(verb.to_string());
        argv.extend(args.iter().cloned());
        let output = self.transport.execute(&argv).map_err(|err| LinkError {
            verb,
            diagnostic: format!("failed to launch transfer tool: {err}"),
        })?;
        if output.success() {
            Ok(output)
        } else {
            Err(LinkError {
                verb,
                diagnostic: failure_diagnostic(&output),
            })
        }
    }
}
