// ABOUTME: Cluster command seam: run docker commands against a machine.
// ABOUTME: Executing the command is the runner's job; interpreting output is ours.

mod error;
mod runner;
pub mod swarm;

pub use error::{SwarmError, SwarmErrorKind};
pub use runner::MachineSsh;
pub use swarm::ManagerInspection;

use std::fmt;

use async_trait::async_trait;

use crate::types::MachineName;

/// Executes a docker command on a target machine.
///
/// Implementations own transport and timeouts; they report exit status and
/// captured output without interpreting either.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, machine: &MachineName, args: &[String])
    -> Result<CommandOutput, SwarmError>;
}

/// Output from a command execution on a machine.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code of the command.
    pub exit_code: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Resolved registry credentials, passed to machines after creation.
#[derive(Clone)]
pub struct RegistryAuth {
    pub registry: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RegistryAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryAuth")
            .field("registry", &self.registry)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
