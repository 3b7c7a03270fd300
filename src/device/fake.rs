//! In-memory stand-in for a board reached through the transfer tool.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use super::{
    ToolOutput, Transport, VERB_GET, VERB_LIST, VERB_MAKE_DIR, VERB_PUT, VERB_REMOVE,
    VERB_REMOVE_DIR, VERB_RESET, VERB_RUN,
};

const PREFIX_LEN: usize = 6;

/// Verbs that change device state.
pub(crate) const MUTATING_VERBS: [&str; 6] = [
    VERB_PUT,
    VERB_REMOVE,
    VERB_REMOVE_DIR,
    VERB_MAKE_DIR,
    VERB_RESET,
    VERB_RUN,
];

#[derive(Debug, Default)]
struct DeviceState {
    reachable: bool,
    // insertion order is what `ls` reports
    nodes: Vec<(String, Option<Vec<u8>>)>,
    calls: Vec<Vec<String>>,
    probes: usize,
    failures: HashMap<String, String>,
    run_output: String,
    // simulates the local directory vanishing while a file is fetched
    remove_local_dir_after_get: bool,
}

impl DeviceState {
    fn is_dir(&self, path: &str) -> bool {
        path.is_empty() || self.nodes.iter().any(|(p, data)| p == path && data.is_none())
    }

    fn file(&self, path: &str) -> Option<&Vec<u8>> {
        self.nodes
            .iter()
            .find(|(p, _)| p == path)
            .and_then(|(_, data)| data.as_ref())
    }

    fn exists(&self, path: &str) -> bool {
        self.nodes.iter().any(|(p, _)| p == path)
    }

    fn children(&self, dir: &str) -> Vec<String> {
        self.nodes
            .iter()
            .filter(|(p, _)| parent_of(p) == dir)
            .map(|(p, _)| p.clone())
            .collect()
    }
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map(|(head, _)| head).unwrap_or("")
}

fn normalize(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}

fn ok(stdout: impl Into<Vec<u8>>) -> ToolOutput {
    ToolOutput {
        code: Some(0),
        stdout: stdout.into(),
        stderr: Vec::new(),
    }
}

fn fail(message: &str) -> ToolOutput {
    ToolOutput {
        code: Some(1),
        stdout: Vec::new(),
        stderr: format!("Traceback (most recent call last):\n  File \"ampy\", line 1\n{message}\n")
            .into_bytes(),
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeDevice {
    state: Mutex<DeviceState>,
}

impl FakeDevice {
    pub(crate) fn reachable() -> Self {
        let device = Self::default();
        device.set_reachable(true);
        device
    }

    pub(crate) fn set_reachable(&self, reachable: bool) {
        self.state.lock().unwrap().reachable = reachable;
    }

    pub(crate) fn add_file(&self, path: &str, data: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .nodes
            .push((path.to_string(), Some(data.to_vec())));
    }

    pub(crate) fn add_dir(&self, path: &str) {
        self.state.lock().unwrap().nodes.push((path.to_string(), None));
    }

    pub(crate) fn fail_verb(&self, verb: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(verb.to_string(), message.to_string());
    }

    pub(crate) fn remove_local_dir_after_get(&self) {
        self.state.lock().unwrap().remove_local_dir_after_get = true;
    }

    pub(crate) fn set_run_output(&self, output: &str) {
        self.state.lock().unwrap().run_output = output.to_string();
    }

    pub(crate) fn file_data(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().file(path).cloned()
    }

    pub(crate) fn has(&self, path: &str) -> bool {
        self.state.lock().unwrap().exists(path)
    }

    /// Verb and arguments of every invocation, prefix stripped.
    pub(crate) fn calls(&self) -> Vec<Vec<String>> {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .map(|call| call.iter().skip(PREFIX_LEN).cloned().collect())
            .collect()
    }

    pub(crate) fn verbs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.first().cloned())
            .collect()
    }

    pub(crate) fn mutating_calls(&self) -> usize {
        self.verbs()
            .iter()
            .filter(|verb| MUTATING_VERBS.contains(&verb.as_str()))
            .count()
    }

    pub(crate) fn probes(&self) -> usize {
        self.state.lock().unwrap().probes
    }

    pub(crate) fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }
}

impl Transport for FakeDevice {
    fn port_available(&self, _port: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        state.probes += 1;
        state.reachable
    }

    fn execute(&self, args: &[String]) -> io::Result<ToolOutput> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());
        let rest = args.get(PREFIX_LEN..).unwrap_or_default();
        let Some((verb, params)) = rest.split_first() else {
            return Ok(fail("Usage: ampy [OPTIONS] COMMAND [ARGS]..."));
        };
        if let Some(message) = state.failures.get(verb.as_str()) {
            return Ok(fail(message));
        }
        let arg = |index: usize| params.get(index).map(|p| normalize(p)).unwrap_or_default();
        let output = match verb.as_str() {
            VERB_LIST => {
                let dir = arg(0);
                if state.is_dir(&dir) {
                    let listing: String = state
                        .children(&dir)
                        .iter()
                        .map(|path| format!("{path}\n"))
                        .collect();
                    ok(listing)
                } else {
                    fail(&format!("RuntimeError: Failed to list directory: {dir}"))
                }
            }
            VERB_GET => match state.file(&arg(0)) {
                Some(data) => {
                    std::fs::write(&params[1], data)?;
                    if state.remove_local_dir_after_get {
                        if let Some(parent) = Path::new(&params[1]).parent() {
                            std::fs::remove_dir_all(parent)?;
                        }
                    }
                    ok(Vec::new())
                }
                None => fail(&format!("RuntimeError: No such file: {}", arg(0))),
            },
            VERB_PUT => {
                let dest = arg(1);
                if !state.is_dir(parent_of(&dest)) {
                    fail(&format!("RuntimeError: No such directory: {}", parent_of(&dest)))
                } else {
                    match std::fs::read(&params[0]) {
                        Ok(data) => {
                            state.nodes.retain(|(p, _)| *p != dest);
                            state.nodes.push((dest, Some(data)));
                            ok(Vec::new())
                        }
                        Err(err) => fail(&format!("RuntimeError: {}: {err}", params[0])),
                    }
                }
            }
            VERB_REMOVE => {
                let path = arg(0);
                if state.file(&path).is_some() {
                    state.nodes.retain(|(p, _)| *p != path);
                    ok(Vec::new())
                } else {
                    fail(&format!("RuntimeError: No such file: {path}"))
                }
            }
            VERB_REMOVE_DIR => {
                let path = arg(0);
                if !path.is_empty() && state.is_dir(&path) {
                    let nested = format!("{path}/");
                    state
                        .nodes
                        .retain(|(p, _)| *p != path && !p.starts_with(&nested));
                    ok(Vec::new())
                } else {
                    fail(&format!("RuntimeError: No such directory: {path}"))
                }
            }
            VERB_MAKE_DIR => {
                let path = arg(0);
                if state.exists(&path) {
                    fail("RuntimeError: Directory already exists")
                } else {
                    state.nodes.push((path, None));
                    ok(Vec::new())
                }
            }
            VERB_RESET => ok(Vec::new()),
            VERB_RUN => ok(state.run_output.clone().into_bytes()),
            other => fail(&format!("Error: No such command '{other}'.")),
        };
        Ok(output)
    }
}
