// ABOUTME: Machine status as reported by the provisioning backend.
// ABOUTME: Absent is the implicit status when no machine was ever created.

use std::fmt;

/// Observed state of a node's machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MachineStatus {
    Running,
    Stopped,
    Error,
    /// No machine has ever been created for this node.
    Absent,
    /// Any state the backend reports that we don't model explicitly
    /// (e.g. "Starting", "Timeout").
    Other(String),
}

impl MachineStatus {
    /// Map `docker-machine status` output to a status value.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Running" => MachineStatus::Running,
            "Stopped" => MachineStatus::Stopped,
            "Error" => MachineStatus::Error,
            other => MachineStatus::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, MachineStatus::Running)
    }

    /// Stopped and errored machines are torn down and recreated rather
    /// than restarted in place.
    pub fn needs_repair(&self) -> bool {
        matches!(self, MachineStatus::Stopped | MachineStatus::Error)
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineStatus::Running => write!(f, "Running"),
            MachineStatus::Stopped => write!(f, "Stopped"),
            MachineStatus::Error => write!(f, "Error"),
            MachineStatus::Absent => write!(f, "Absent"),
            MachineStatus::Other(s) => write!(f, "{s}"),
        }
    }
}
