// ABOUTME: Fans one role's reconciliation out across every replica index.
// ABOUTME: Indices run concurrently; failures are index-tagged and aggregated.

use std::fmt;

use futures::future::join_all;
use nonempty::NonEmpty;
use thiserror::Error;

use crate::cluster::CommandRunner;
use crate::diagnostics::Diagnostics;
use crate::machine::MachineBackend;
use crate::types::{NodeRef, NodeRole};

use super::controller::FleetController;
use super::lifecycle::{NodeError, Reconcile};

/// A node-scoped failure, tagged with the node it belongs to.
#[derive(Debug, Error)]
#[error("{node}: {source}")]
pub struct NodeFailure {
    pub node: NodeRef,
    pub source: NodeError,
}

/// All failures from one role group, ordered by index.
#[derive(Debug)]
pub struct GroupError {
    pub role: NodeRole,
    pub failures: NonEmpty<NodeFailure>,
}

impl fmt::Display for GroupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} group failed on {} node(s): ",
            self.role,
            self.failures.len()
        )?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

impl std::error::Error for GroupError {}

impl<B: MachineBackend, R: CommandRunner> FleetController<B, R> {
    /// Reconcile every replica of a role, one lifecycle run per index in
    /// `[0, replicas)`.
    ///
    /// Each index owns a disjoint machine identity, so indices run
    /// concurrently. A failing index does not cancel its siblings; every
    /// started run completes, and all failures come back together.
    pub async fn manage(
        &self,
        role: NodeRole,
        replicas: u32,
        diag: &Diagnostics,
    ) -> Result<(), GroupError> {
        let runs = (0..replicas).map(|index| {
            let node = NodeRef::new(role, index);
            async move {
                self.reconcile_node(node, diag)
                    .await
                    .map_err(|source| NodeFailure { node, source })
            }
        });

        let failures: Vec<NodeFailure> = join_all(runs)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect();

        match NonEmpty::from_vec(failures) {
            None => Ok(()),
            Some(failures) => Err(GroupError { role, failures }),
        }
    }

    /// Drive one node through query, provision, and join.
    async fn reconcile_node(&self, node: NodeRef, diag: &Diagnostics) -> Result<(), NodeError> {
        let joined = Reconcile::new(node, self.prefix())
            .query(self.backend())
            .await?
            .ensure_machine(self.backend(), self.runner(), self.registry())
            .await?
            .join(self.backend(), self.runner(), diag)
            .await?;

        let _ = joined.finish();
        Ok(())
    }
}
