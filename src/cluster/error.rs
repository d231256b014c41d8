// ABOUTME: Swarm command error types with SNAFU pattern.
// ABOUTME: Unifies launch, exit, timeout, and parse failures with stderr probes.

use snafu::Snafu;

/// Unified error for docker commands run against a machine.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SwarmError {
    #[snafu(display("failed to launch command on {machine}: {source}"))]
    Launch {
        machine: String,
        source: std::io::Error,
    },

    #[snafu(display("command timed out after {seconds}s on {machine}"))]
    Timeout { machine: String, seconds: u64 },

    #[snafu(display("`docker {command}` failed on {machine}: {stderr}"))]
    Failed {
        machine: String,
        command: String,
        stderr: String,
    },

    #[snafu(display("could not parse `docker {command}` output: {message}"))]
    Parse { command: String, message: String },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwarmErrorKind {
    /// The command process could not be started.
    Launch,
    /// The command exceeded the configured timeout.
    Timeout,
    /// The command ran and exited non-zero.
    Failed,
    /// The command succeeded but its output was not understood.
    Parse,
}

impl SwarmError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> SwarmErrorKind {
        match self {
            SwarmError::Launch { .. } => SwarmErrorKind::Launch,
            SwarmError::Timeout { .. } => SwarmErrorKind::Timeout,
            SwarmError::Failed { .. } => SwarmErrorKind::Failed,
            SwarmError::Parse { .. } => SwarmErrorKind::Parse,
        }
    }

    /// True when the command failed because the target node is not a swarm
    /// manager. Expected while a cluster is still bootstrapping.
    pub fn is_not_swarm_manager(&self) -> bool {
        matches!(
            self,
            SwarmError::Failed { stderr, .. }
                if stderr.to_lowercase().contains("not a swarm manager")
        )
    }

    /// True when a join failed because the node already belongs to a swarm.
    pub fn is_already_joined(&self) -> bool {
        matches!(
            self,
            SwarmError::Failed { stderr, .. }
                if stderr.to_lowercase().contains("already part of a swarm")
        )
    }
}
