// ABOUTME: Node identity types: role and logical cluster member reference.
// ABOUTME: A NodeRef deterministically owns one machine name per run.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::machine_name::MachineName;

/// The two cluster roles. Managers participate in leader election and
/// scheduling; workers execute workloads only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Manager,
    Worker,
}

impl NodeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeRole::Manager => "manager",
            NodeRole::Worker => "worker",
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown node role: {0} (expected \"manager\" or \"worker\")")]
pub struct ParseNodeRoleError(String);

impl FromStr for NodeRole {
    type Err = ParseNodeRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(NodeRole::Manager),
            "worker" => Ok(NodeRole::Worker),
            other => Err(ParseNodeRoleError(other.to_string())),
        }
    }
}

/// Logical identity of one cluster member: a role and a replica index.
///
/// The index is stable across runs, so the same NodeRef always maps to the
/// same machine name. This is what makes repair idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub role: NodeRole,
    pub index: u32,
}

impl NodeRef {
    pub fn new(role: NodeRole, index: u32) -> Self {
        Self { role, index }
    }

    /// Derive the machine name for this node: `<prefix>-<role>-<index>`.
    pub fn machine_name(&self, prefix: &MachineName) -> MachineName {
        // The prefix length is capped during config validation, so the
        // derived name always fits the 63-character limit.
        MachineName::new(&format!("{}-{}-{}", prefix, self.role, self.index))
            .expect("derived machine name is always valid")
    }

    /// Recover the node identity from a machine name, if the name belongs
    /// to this fleet prefix.
    pub fn from_machine_name(name: &str, prefix: &MachineName) -> Option<Self> {
        let rest = name.strip_prefix(prefix.as_str())?.strip_prefix('-')?;
        let (role, index) = rest.rsplit_once('-')?;
        Some(Self {
            role: role.parse().ok()?,
            index: index.parse().ok()?,
        })
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.role, self.index)
    }
}
