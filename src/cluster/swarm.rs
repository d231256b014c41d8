// ABOUTME: Typed swarm command wrappers and output parsing.
// ABOUTME: Builds docker CLI argument lists and interprets their results.

use serde::Deserialize;

use crate::types::{JoinToken, MachineName, NodeRole};

use super::error::SwarmError;
use super::{CommandOutput, CommandRunner, RegistryAuth};

/// Manager-side view of one node, from `docker node inspect self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerInspection {
    /// Address the manager advertises for swarm traffic.
    pub address: String,
    /// Whether this manager currently leads the cluster.
    pub is_leader: bool,
}

#[derive(Deserialize)]
struct NodeInspect {
    #[serde(rename = "ManagerStatus")]
    manager_status: Option<ManagerStatus>,
}

#[derive(Deserialize)]
struct ManagerStatus {
    #[serde(rename = "Leader", default)]
    leader: bool,
    #[serde(rename = "Addr")]
    addr: String,
}

fn check(
    command: &str,
    machine: &MachineName,
    output: CommandOutput,
) -> Result<CommandOutput, SwarmError> {
    if output.success() {
        Ok(output)
    } else {
        Err(SwarmError::Failed {
            machine: machine.to_string(),
            command: command.to_string(),
            stderr: output.stderr.trim().to_string(),
        })
    }
}

/// Authenticate the machine's docker daemon against a registry.
pub async fn registry_login<R: CommandRunner>(
    runner: &R,
    machine: &MachineName,
    auth: &RegistryAuth,
) -> Result<(), SwarmError> {
    let args = vec![
        "login".to_string(),
        "--username".to_string(),
        auth.username.clone(),
        "--password".to_string(),
        auth.password.clone(),
        auth.registry.clone(),
    ];
    check("login", machine, runner.run(machine, &args).await?)?;
    Ok(())
}

/// Initialize a new swarm with this machine as the first manager.
pub async fn swarm_init<R: CommandRunner>(
    runner: &R,
    machine: &MachineName,
    advertise_interface: &str,
) -> Result<(), SwarmError> {
    let args = vec![
        "swarm".to_string(),
        "init".to_string(),
        "--advertise-addr".to_string(),
        advertise_interface.to_string(),
    ];
    check("swarm init", machine, runner.run(machine, &args).await?)?;
    Ok(())
}

/// Inspect the machine's own node record.
///
/// Returns `None` when the node carries no manager status (it is a plain
/// worker).
pub async fn inspect_self<R: CommandRunner>(
    runner: &R,
    machine: &MachineName,
) -> Result<Option<ManagerInspection>, SwarmError> {
    let args = vec!["node".to_string(), "inspect".to_string(), "self".to_string()];
    let output = check("node inspect self", machine, runner.run(machine, &args).await?)?;
    parse_inspection(&output.stdout)
}

fn parse_inspection(stdout: &str) -> Result<Option<ManagerInspection>, SwarmError> {
    let parse_error = |message: String| SwarmError::Parse {
        command: "node inspect self".to_string(),
        message,
    };

    let nodes: Vec<NodeInspect> =
        serde_json::from_str(stdout).map_err(|e| parse_error(e.to_string()))?;
    let node = nodes
        .into_iter()
        .next()
        .ok_or_else(|| parse_error("empty inspect result".to_string()))?;

    Ok(node.manager_status.map(|status| ManagerInspection {
        address: status.addr,
        is_leader: status.leader,
    }))
}

/// Fetch the role-scoped admission token from a manager.
pub async fn join_token<R: CommandRunner>(
    runner: &R,
    machine: &MachineName,
    role: NodeRole,
) -> Result<JoinToken, SwarmError> {
    let args = vec![
        "swarm".to_string(),
        "join-token".to_string(),
        "--quiet".to_string(),
        role.as_str().to_string(),
    ];
    let output = check("swarm join-token", machine, runner.run(machine, &args).await?)?;

    let secret = output.stdout.trim();
    if secret.is_empty() {
        return Err(SwarmError::Parse {
            command: "swarm join-token".to_string(),
            message: "empty token".to_string(),
        });
    }

    Ok(JoinToken::new(role, secret))
}

/// Join the machine to the swarm at the leader's address.
pub async fn swarm_join<R: CommandRunner>(
    runner: &R,
    machine: &MachineName,
    token: &JoinToken,
    leader_address: &str,
) -> Result<(), SwarmError> {
    let args = vec![
        "swarm".to_string(),
        "join".to_string(),
        "--token".to_string(),
        token.secret().to_string(),
        leader_address.to_string(),
    ];
    check("swarm join", machine, runner.run(machine, &args).await?)?;
    Ok(())
}

/// List swarm members as reported by a manager.
pub async fn node_ls<R: CommandRunner>(
    runner: &R,
    machine: &MachineName,
) -> Result<String, SwarmError> {
    let args = vec!["node".to_string(), "ls".to_string()];
    let output = check("node ls", machine, runner.run(machine, &args).await?)?;
    Ok(output.stdout)
}
