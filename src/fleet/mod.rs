// ABOUTME: Fleet reconciliation core: controller, replicator, lifecycle, leader, token.
// ABOUTME: Holds the desired-topology spec shared across the fleet modules.

mod bootstrap;
mod controller;
mod leader;
mod lifecycle;
mod lock;
mod replicator;
mod token;

pub use bootstrap::BootstrapError;
pub use controller::{FleetController, FleetError, MaintainError, MembersError};
pub use leader::{Leader, LeaderError, resolve_leader};
pub use lifecycle::{Joined, NodeError, Pending, Provisioned, Queried, Reconcile};
pub use lock::{LockError, LockInfo, ReconcileLock};
pub use replicator::{GroupError, NodeFailure};
pub use token::{TokenError, request_token};

/// Desired cluster topology for one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetSpec {
    pub managers: u32,
    pub workers: u32,
}

impl FleetSpec {
    pub fn new(managers: u32, workers: u32) -> Self {
        Self { managers, workers }
    }
}
