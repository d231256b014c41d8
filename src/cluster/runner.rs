// ABOUTME: Docker command runner over `docker-machine ssh`.
// ABOUTME: Each invocation shells into the machine and runs the docker CLI there.

use std::time::Duration;

use async_trait::async_trait;
use snafu::ResultExt;
use tokio::process::Command;

use crate::types::MachineName;

use super::error::{LaunchSnafu, SwarmError};
use super::{CommandOutput, CommandRunner};

/// Runs docker commands by shelling into the machine with
/// `docker-machine ssh <machine> docker <args...>`.
pub struct MachineSsh {
    binary: String,
    timeout: Duration,
}

impl MachineSsh {
    pub fn new(timeout: Duration) -> Self {
        Self {
            binary: "docker-machine".to_string(),
            timeout,
        }
    }

    /// Override the docker-machine binary (e.g. a full path).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }
}

#[async_trait]
impl CommandRunner for MachineSsh {
    async fn run(
        &self,
        machine: &MachineName,
        args: &[String],
    ) -> Result<CommandOutput, SwarmError> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("ssh")
            .arg(machine.as_str())
            .arg("docker")
            .args(args)
            .kill_on_drop(true);

        tracing::debug!(machine = %machine, ?args, "running docker command");

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| SwarmError::Timeout {
                machine: machine.to_string(),
                seconds: self.timeout.as_secs(),
            })?
            .context(LaunchSnafu {
                machine: machine.as_str(),
            })?;

        Ok(CommandOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
