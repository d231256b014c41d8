// ABOUTME: Per-node reconciliation state machine using the type state pattern.
// ABOUTME: Query, repair or create, then join; each transition consumes self.

use std::marker::PhantomData;

use thiserror::Error;

use crate::cluster::{CommandRunner, RegistryAuth, SwarmError, swarm};
use crate::diagnostics::{Diagnostics, Warning};
use crate::machine::{MachineBackend, MachineError};
use crate::types::{MachineName, MachineStatus, NodeRef};

use super::leader::{LeaderError, resolve_leader};
use super::token::{TokenError, request_token};

/// Errors from reconciling a single node.
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("status query failed: {source}")]
    Query { source: MachineError },

    #[error("provisioning failed: {source}")]
    Provision { source: MachineError },

    #[error("registry authentication failed: {source}")]
    RegistryAuth { source: SwarmError },

    #[error("leader resolution failed: {source}")]
    LeaderUnresolved { source: LeaderError },

    #[error("join token unavailable: {source}")]
    TokenUnavailable { source: TokenError },

    #[error("swarm join failed: {source}")]
    Join { source: SwarmError },
}

/// Fresh node, nothing observed yet.
/// Available actions: `query()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// Machine status observed.
/// Available actions: `ensure_machine()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Queried;

/// Machine exists and is running.
/// Available actions: `join()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Provisioned;

/// Node joined the swarm under its role. Terminal.
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Joined;

/// Reconciliation of one logical node toward a healthy joined machine.
///
/// Steps are strictly sequential per node; the type parameter makes
/// out-of-order transitions unrepresentable.
pub struct Reconcile<S> {
    node: NodeRef,
    machine: MachineName,
    status: Option<MachineStatus>,
    _state: PhantomData<S>,
}

impl<S> Reconcile<S> {
    /// Internal helper to transition to a new state.
    fn transition<T>(self) -> Reconcile<T> {
        Reconcile {
            node: self.node,
            machine: self.machine,
            status: self.status,
            _state: PhantomData,
        }
    }

    pub fn node(&self) -> NodeRef {
        self.node
    }

    pub fn machine(&self) -> &MachineName {
        &self.machine
    }
}

impl Reconcile<Pending> {
    pub fn new(node: NodeRef, prefix: &MachineName) -> Self {
        Reconcile {
            node,
            machine: node.machine_name(prefix),
            status: None,
            _state: PhantomData,
        }
    }

    /// Observe the machine's current status.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Query` if the backend cannot answer.
    #[must_use = "reconcile state must be used"]
    pub async fn query<B: MachineBackend>(
        self,
        backend: &B,
    ) -> Result<Reconcile<Queried>, NodeError> {
        let status = backend
            .status(&self.node)
            .await
            .map_err(|source| NodeError::Query { source })?;

        tracing::debug!(node = %self.node, %status, "observed machine status");

        Ok(Reconcile {
            node: self.node,
            machine: self.machine,
            status: Some(status),
            _state: PhantomData,
        })
    }
}

impl Reconcile<Queried> {
    pub fn observed(&self) -> &MachineStatus {
        self.status
            .as_ref()
            .expect("queried state always has a status")
    }

    /// Bring the machine to a running state.
    ///
    /// Stopped and errored machines are force-removed and recreated;
    /// absent (or otherwise unknown) machines are created outright; a
    /// running machine is left untouched. After a create, the machine is
    /// authenticated against the registry when one is configured.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::Provision` on remove/create failure and
    /// `NodeError::RegistryAuth` on login failure.
    #[must_use = "reconcile state must be used"]
    pub async fn ensure_machine<B: MachineBackend, R: CommandRunner>(
        self,
        backend: &B,
        runner: &R,
        registry: Option<&RegistryAuth>,
    ) -> Result<Reconcile<Provisioned>, NodeError> {
        if self.observed().is_running() {
            tracing::debug!(machine = %self.machine, "machine already running, skipping create");
            return Ok(self.transition());
        }

        if self.observed().needs_repair() {
            tracing::info!(machine = %self.machine, status = %self.observed(), "removing unhealthy machine");
            backend
                .remove(&self.node, true)
                .await
                .map_err(|source| NodeError::Provision { source })?;
        }

        tracing::info!(machine = %self.machine, "creating machine");
        backend
            .create(&self.node)
            .await
            .map_err(|source| NodeError::Provision { source })?;

        if let Some(auth) = registry {
            swarm::registry_login(runner, &self.machine, auth)
                .await
                .map_err(|source| NodeError::RegistryAuth { source })?;
        }

        Ok(self.transition())
    }
}

impl Reconcile<Provisioned> {
    /// Join the machine to the swarm under its role.
    ///
    /// Resolves the current leader, requests a role-scoped token from it,
    /// and runs the join against this machine. A join that reports the
    /// node is already part of a swarm is recorded as a warning and
    /// treated as success.
    ///
    /// # Errors
    ///
    /// Returns `NodeError::LeaderUnresolved`, `NodeError::TokenUnavailable`,
    /// or `NodeError::Join` depending on the failing step.
    #[must_use = "reconcile state must be used"]
    pub async fn join<B: MachineBackend, R: CommandRunner>(
        self,
        backend: &B,
        runner: &R,
        diag: &Diagnostics,
    ) -> Result<Reconcile<Joined>, NodeError> {
        let leader = resolve_leader(backend, runner)
            .await
            .map_err(|source| NodeError::LeaderUnresolved { source })?;

        let token = request_token(runner, leader.as_ref(), self.node.role)
            .await
            .map_err(|source| NodeError::TokenUnavailable { source })?;

        let leader = leader.expect("token request succeeded, so a leader was present");

        match swarm::swarm_join(runner, &self.machine, &token, &leader.address).await {
            Ok(()) => {}
            Err(e) if e.is_already_joined() => {
                diag.warn(Warning::rejoin_skipped(format!(
                    "{} is already part of a swarm, join skipped",
                    self.machine
                )));
            }
            Err(source) => return Err(NodeError::Join { source }),
        }

        tracing::info!(node = %self.node, machine = %self.machine, "node joined");
        Ok(self.transition())
    }
}

impl Reconcile<Joined> {
    /// Consume the reconciliation and return the node it settled.
    pub fn finish(self) -> NodeRef {
        self.node
    }
}
