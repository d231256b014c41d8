// ABOUTME: Top-level fleet controller: bootstrap plus maintain.
// ABOUTME: Manager and worker groups reconcile concurrently and independently.

use std::fmt;

use nonempty::NonEmpty;
use thiserror::Error;

use crate::cluster::{CommandRunner, RegistryAuth, SwarmError, swarm};
use crate::diagnostics::Diagnostics;
use crate::machine::MachineBackend;
use crate::types::{MachineName, NodeRole};

use super::FleetSpec;
use super::bootstrap::BootstrapError;
use super::leader::{LeaderError, resolve_leader};
use super::replicator::GroupError;

/// Drives fleet reconciliation against injected collaborators.
///
/// The backend and runner are capability seams: the controller decides
/// when and in what order to request machine and cluster operations, never
/// how they execute.
pub struct FleetController<B, R> {
    backend: B,
    runner: R,
    prefix: MachineName,
    advertise_interface: String,
    registry: Option<RegistryAuth>,
}

impl<B: MachineBackend, R: CommandRunner> FleetController<B, R> {
    pub fn new(
        backend: B,
        runner: R,
        prefix: MachineName,
        advertise_interface: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            runner,
            prefix,
            advertise_interface: advertise_interface.into(),
            registry: None,
        }
    }

    pub fn with_registry(mut self, registry: Option<RegistryAuth>) -> Self {
        self.registry = registry;
        self
    }

    pub(super) fn backend(&self) -> &B {
        &self.backend
    }

    pub(super) fn runner(&self) -> &R {
        &self.runner
    }

    pub(super) fn prefix(&self) -> &MachineName {
        &self.prefix
    }

    pub(super) fn advertise_interface(&self) -> &str {
        &self.advertise_interface
    }

    pub(super) fn registry(&self) -> Option<&RegistryAuth> {
        self.registry.as_ref()
    }

    /// Bootstrap a new cluster, then reconcile it up to the requested
    /// topology.
    ///
    /// A bootstrap failure aborts the run; maintain is not attempted,
    /// since no join can succeed without an initialized swarm.
    pub async fn fleet(&self, spec: &FleetSpec, diag: &Diagnostics) -> Result<(), FleetError> {
        self.bootstrap().await?;
        self.maintain(spec, diag).await?;
        Ok(())
    }

    /// Reconcile both role groups toward the requested replica counts.
    ///
    /// The groups run concurrently on disjoint hosts; a failure in one is
    /// reported without cancelling the other, so partial progress on one
    /// role survives the other role failing.
    pub async fn maintain(&self, spec: &FleetSpec, diag: &Diagnostics) -> Result<(), MaintainError> {
        let (managers, workers) = tokio::join!(
            self.manage(NodeRole::Manager, spec.managers, diag),
            self.manage(NodeRole::Worker, spec.workers, diag),
        );

        let failures: Vec<GroupError> = [managers.err(), workers.err()]
            .into_iter()
            .flatten()
            .collect();

        match NonEmpty::from_vec(failures) {
            None => Ok(()),
            Some(groups) => Err(MaintainError { groups }),
        }
    }

    /// List swarm members as reported by the current leader.
    pub async fn members(&self) -> Result<String, MembersError> {
        let leader = resolve_leader(&self.backend, &self.runner)
            .await?
            .ok_or(MembersError::NoLeader)?;

        Ok(swarm::node_ls(&self.runner, &leader.machine).await?)
    }
}

#[derive(Debug, Error)]
pub enum FleetError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Maintain(#[from] MaintainError),
}

/// Aggregated failures from one or both role groups.
#[derive(Debug)]
pub struct MaintainError {
    pub groups: NonEmpty<GroupError>,
}

impl fmt::Display for MaintainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maintain failed: ")?;
        for (i, group) in self.groups.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{group}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MaintainError {}

#[derive(Debug, Error)]
pub enum MembersError {
    #[error("leader resolution failed: {source}")]
    Leader {
        #[from]
        source: LeaderError,
    },

    #[error("no leader found; is the cluster initialized?")]
    NoLeader,

    #[error("node listing failed: {source}")]
    Query {
        #[from]
        source: SwarmError,
    },
}
