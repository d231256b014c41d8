// ABOUTME: Swarm leader discovery across manager machines.
// ABOUTME: Scans running managers in index order and inspects each for the leader flag.

use thiserror::Error;

use crate::cluster::{CommandRunner, SwarmError, swarm};
use crate::machine::{MachineBackend, MachineError};
use crate::types::{MachineName, NodeRef, NodeRole};

/// The manager currently authoritative for cluster state changes.
#[derive(Debug, Clone)]
pub struct Leader {
    pub node: NodeRef,
    pub machine: MachineName,
    /// Address taken from the leader's own inspection, suitable for joins.
    pub address: String,
}

/// Leader resolution itself failed. Finding no leader is not an error.
#[derive(Debug, Error)]
pub enum LeaderError {
    #[error("failed to list manager machines: {source}")]
    List { source: MachineError },

    #[error("failed to inspect {machine}: {source}")]
    Inspect {
        machine: MachineName,
        source: SwarmError,
    },
}

/// Find the current swarm leader among manager machines.
///
/// Scans managers in ascending index order, skipping non-running entries
/// without inspecting them. Returns `Ok(None)` when no running manager
/// reports itself as leader, which is the expected state before the first
/// manager stabilizes.
pub async fn resolve_leader<B: MachineBackend, R: CommandRunner>(
    backend: &B,
    runner: &R,
) -> Result<Option<Leader>, LeaderError> {
    let managers = backend
        .list(NodeRole::Manager)
        .await
        .map_err(|source| LeaderError::List { source })?;

    for summary in managers {
        if !summary.status.is_running() {
            tracing::debug!(machine = %summary.machine, status = %summary.status, "skipping non-running manager");
            continue;
        }

        let inspection = match swarm::inspect_self(runner, &summary.machine).await {
            Ok(inspection) => inspection,
            // A machine that has not joined the swarm yet cannot be the leader.
            Err(e) if e.is_not_swarm_manager() => continue,
            Err(source) => {
                return Err(LeaderError::Inspect {
                    machine: summary.machine,
                    source,
                });
            }
        };

        if let Some(inspection) = inspection
            && inspection.is_leader
        {
            tracing::debug!(machine = %summary.machine, address = %inspection.address, "resolved leader");
            return Ok(Some(Leader {
                node: summary.node,
                machine: summary.machine,
                address: inspection.address,
            }));
        }
    }

    Ok(None)
}
