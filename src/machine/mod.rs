// ABOUTME: Machine provisioning seam: status, create, remove, list.
// ABOUTME: Backends own host naming; the shipped one shells out to docker-machine.

mod docker_machine;

pub use docker_machine::DockerMachine;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{MachineName, MachineStatus, NodeRef, NodeRole};

/// Machine provisioning operations.
#[async_trait]
pub trait MachineBackend: Send + Sync {
    /// Query the current status of the node's machine.
    async fn status(&self, node: &NodeRef) -> Result<MachineStatus, MachineError>;

    /// Create a machine for the node.
    async fn create(&self, node: &NodeRef) -> Result<(), MachineError>;

    /// Remove the node's machine.
    async fn remove(&self, node: &NodeRef, force: bool) -> Result<(), MachineError>;

    /// List machines for a role, in ascending index order.
    async fn list(&self, role: NodeRole) -> Result<Vec<MachineSummary>, MachineError>;
}

/// One row of a machine listing.
#[derive(Debug, Clone)]
pub struct MachineSummary {
    pub node: NodeRef,
    pub machine: MachineName,
    pub status: MachineStatus,
    /// Host address, when the backend knows it.
    pub address: Option<String>,
}

/// Errors from machine backend operations.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("failed to launch docker-machine: {source}")]
    Launch { source: std::io::Error },

    #[error("`docker-machine {command}` failed: {stderr}")]
    Failed { command: String, stderr: String },

    #[error("could not parse docker-machine output: {0}")]
    Parse(String),
}
