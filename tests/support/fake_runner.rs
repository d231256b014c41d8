// ABOUTME: In-memory CommandRunner fake scripting docker responses per machine.
// ABOUTME: Records every command so tests can assert exact call sequences.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use stolos::cluster::{CommandOutput, CommandRunner, SwarmError};
use stolos::types::MachineName;

#[derive(Default)]
struct RunnerState {
    /// Machine that reports `Leader: true` on self-inspection, with the
    /// address it advertises.
    leader: Option<(String, String)>,
    /// Machines that report a manager status without the leader flag.
    managers: HashMap<String, String>,
    inspect_failures: HashMap<String, String>,
    join_failures: HashMap<String, String>,
    token_failure: Option<String>,
    commands: Vec<(String, Vec<String>)>,
}

/// Scriptable docker command runner. Clones share state.
#[derive(Clone, Default)]
pub struct FakeRunner {
    inner: Arc<Mutex<RunnerState>>,
}

fn ok(stdout: impl Into<String>) -> CommandOutput {
    CommandOutput {
        exit_code: 0,
        stdout: stdout.into(),
        stderr: String::new(),
    }
}

fn failed(stderr: impl Into<String>) -> CommandOutput {
    CommandOutput {
        exit_code: 1,
        stdout: String::new(),
        stderr: stderr.into(),
    }
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Designate the machine that reports itself as the swarm leader.
    pub fn set_leader(&self, machine: &MachineName, address: &str) {
        self.inner.lock().leader = Some((machine.to_string(), address.to_string()));
    }

    /// Script a machine as a joined, non-leading manager.
    pub fn set_manager(&self, machine: &MachineName, address: &str) {
        self.inner
            .lock()
            .managers
            .insert(machine.to_string(), address.to_string());
    }

    /// Make `node inspect self` fail on this machine with the given stderr.
    pub fn fail_inspect(&self, machine: &MachineName, stderr: &str) {
        self.inner
            .lock()
            .inspect_failures
            .insert(machine.to_string(), stderr.to_string());
    }

    /// Make `swarm join` fail on this machine with the given stderr.
    pub fn fail_join(&self, machine: &MachineName, stderr: &str) {
        self.inner
            .lock()
            .join_failures
            .insert(machine.to_string(), stderr.to_string());
    }

    /// Make `swarm join-token` fail with the given stderr.
    pub fn fail_join_token(&self, stderr: &str) {
        self.inner.lock().token_failure = Some(stderr.to_string());
    }

    /// Every `(machine, args)` pair seen, in call order.
    pub fn commands(&self) -> Vec<(String, Vec<String>)> {
        self.inner.lock().commands.clone()
    }

    /// Commands whose argument list starts with the given words.
    pub fn commands_starting_with(&self, words: &[&str]) -> Vec<(String, Vec<String>)> {
        self.commands()
            .into_iter()
            .filter(|(_, args)| {
                args.len() >= words.len() && args.iter().zip(words).all(|(a, w)| a == w)
            })
            .collect()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(
        &self,
        machine: &MachineName,
        args: &[String],
    ) -> Result<CommandOutput, SwarmError> {
        let mut state = self.inner.lock();
        state
            .commands
            .push((machine.to_string(), args.to_vec()));

        let words: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = match words.as_slice() {
            ["login", ..] => ok(""),
            ["swarm", "init", ..] => {
                state.leader = Some((machine.to_string(), "10.0.0.1:2377".to_string()));
                ok("")
            }
            ["node", "inspect", "self"] => inspect_response(&state, machine),
            ["swarm", "join-token", "--quiet", role] => match &state.token_failure {
                Some(stderr) => failed(stderr.clone()),
                None => ok(format!("SWMTKN-1-{role}-test\n")),
            },
            ["swarm", "join", ..] => match state.join_failures.get(machine.as_str()) {
                Some(stderr) => failed(stderr.clone()),
                None => ok("This node joined a swarm as a node.\n"),
            },
            ["node", "ls"] => ok("ID   HOSTNAME   STATUS   AVAILABILITY   MANAGER STATUS\n"),
            _ => failed(format!("unscripted command: {words:?}")),
        };

        Ok(output)
    }
}

fn inspect_response(state: &RunnerState, machine: &MachineName) -> CommandOutput {
    if let Some(stderr) = state.inspect_failures.get(machine.as_str()) {
        return failed(stderr.clone());
    }

    if let Some((leader, address)) = &state.leader
        && leader == machine.as_str()
    {
        return ok(format!(
            r#"[{{"ID":"fake","ManagerStatus":{{"Leader":true,"Reachability":"reachable","Addr":"{address}"}}}}]"#
        ));
    }

    if let Some(address) = state.managers.get(machine.as_str()) {
        return ok(format!(
            r#"[{{"ID":"fake","ManagerStatus":{{"Reachability":"reachable","Addr":"{address}"}}}}]"#
        ));
    }

    failed("Error response from daemon: This node is not a swarm manager.")
}
