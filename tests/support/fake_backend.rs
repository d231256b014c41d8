// ABOUTME: In-memory MachineBackend fake with scripted statuses and a call log.
// ABOUTME: Created machines become Running so later steps observe them.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use stolos::machine::{MachineBackend, MachineError, MachineSummary};
use stolos::types::{MachineName, MachineStatus, NodeRef, NodeRole};

/// One recorded backend call, keyed by derived machine name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    Status(String),
    Create(String),
    Remove(String, bool),
    List(NodeRole),
}

#[derive(Default)]
struct BackendState {
    statuses: HashMap<String, MachineStatus>,
    calls: Vec<BackendCall>,
    failing_creates: HashSet<String>,
}

/// Scriptable machine backend. Clones share state, so tests can keep one
/// handle for assertions after moving another into the controller.
#[derive(Clone)]
pub struct FakeBackend {
    prefix: MachineName,
    inner: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn new(prefix: &MachineName) -> Self {
        Self {
            prefix: prefix.clone(),
            inner: Arc::new(Mutex::new(BackendState::default())),
        }
    }

    fn name(&self, node: &NodeRef) -> MachineName {
        node.machine_name(&self.prefix)
    }

    /// Script the status a node's machine reports before any create.
    pub fn set_status(&self, node: NodeRef, status: MachineStatus) {
        let name = self.name(&node);
        self.inner.lock().statuses.insert(name.to_string(), status);
    }

    /// Make `create` fail for this node.
    pub fn fail_create(&self, node: NodeRef) {
        let name = self.name(&node);
        self.inner.lock().failing_creates.insert(name.to_string());
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().calls.clone()
    }

    /// Machine names passed to `create`, in call order.
    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Create(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// `(machine, force)` pairs passed to `remove`, in call order.
    pub fn removed(&self) -> Vec<(String, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                BackendCall::Remove(name, force) => Some((name, force)),
                _ => None,
            })
            .collect()
    }

    /// Number of `list` calls, one per leader resolution.
    pub fn list_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::List(_)))
            .count()
    }
}

#[async_trait]
impl MachineBackend for FakeBackend {
    async fn status(&self, node: &NodeRef) -> Result<MachineStatus, MachineError> {
        let name = self.name(node);
        let mut state = self.inner.lock();
        state.calls.push(BackendCall::Status(name.to_string()));
        Ok(state
            .statuses
            .get(name.as_str())
            .cloned()
            .unwrap_or(MachineStatus::Absent))
    }

    async fn create(&self, node: &NodeRef) -> Result<(), MachineError> {
        let name = self.name(node);
        let mut state = self.inner.lock();
        state.calls.push(BackendCall::Create(name.to_string()));

        if state.failing_creates.contains(name.as_str()) {
            return Err(MachineError::Failed {
                command: format!("create {name}"),
                stderr: "scripted create failure".to_string(),
            });
        }

        state
            .statuses
            .insert(name.to_string(), MachineStatus::Running);
        Ok(())
    }

    async fn remove(&self, node: &NodeRef, force: bool) -> Result<(), MachineError> {
        let name = self.name(node);
        let mut state = self.inner.lock();
        state.calls.push(BackendCall::Remove(name.to_string(), force));
        state.statuses.remove(name.as_str());
        Ok(())
    }

    async fn list(&self, role: NodeRole) -> Result<Vec<MachineSummary>, MachineError> {
        let mut state = self.inner.lock();
        state.calls.push(BackendCall::List(role));

        let mut rows: Vec<MachineSummary> = state
            .statuses
            .iter()
            .filter_map(|(name, status)| {
                let node = NodeRef::from_machine_name(name, &self.prefix)?;
                if node.role != role {
                    return None;
                }
                Some(MachineSummary {
                    node,
                    machine: node.machine_name(&self.prefix),
                    status: status.clone(),
                    address: None,
                })
            })
            .collect();

        rows.sort_by_key(|row| row.node.index);
        Ok(rows)
    }
}
