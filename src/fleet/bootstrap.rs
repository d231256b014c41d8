// ABOUTME: First-manager bootstrap: create machine zero and initialize the swarm.
// ABOUTME: Skips the status query since nothing can exist before the first run.

use thiserror::Error;

use crate::cluster::{CommandRunner, SwarmError, swarm};
use crate::machine::{MachineBackend, MachineError};
use crate::types::{NodeRef, NodeRole};

use super::controller::FleetController;

/// A failed bootstrap aborts the whole run; no join can succeed without
/// an initialized swarm.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to create the first manager: {source}")]
    Provision { source: MachineError },

    #[error("registry authentication failed on the first manager: {source}")]
    RegistryAuth { source: SwarmError },

    #[error("swarm initialization failed: {source}")]
    Init { source: SwarmError },
}

impl<B: MachineBackend, R: CommandRunner> FleetController<B, R> {
    /// Create the first manager machine and initialize the swarm on it.
    pub async fn bootstrap(&self) -> Result<(), BootstrapError> {
        let node = NodeRef::new(NodeRole::Manager, 0);
        let machine = node.machine_name(self.prefix());

        tracing::info!(%machine, "bootstrapping cluster");

        self.backend()
            .create(&node)
            .await
            .map_err(|source| BootstrapError::Provision { source })?;

        if let Some(auth) = self.registry() {
            swarm::registry_login(self.runner(), &machine, auth)
                .await
                .map_err(|source| BootstrapError::RegistryAuth { source })?;
        }

        swarm::swarm_init(self.runner(), &machine, self.advertise_interface())
            .await
            .map_err(|source| BootstrapError::Init { source })?;

        tracing::info!(%machine, "swarm initialized");
        Ok(())
    }
}
