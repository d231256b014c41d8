// ABOUTME: Machine backend over the docker-machine CLI.
// ABOUTME: Derives host names from the fleet prefix and parses ls/status output.

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::MachineConfig;
use crate::types::{MachineName, MachineStatus, NodeRef, NodeRole};

use super::{MachineBackend, MachineError, MachineSummary};

/// Provisions hosts with the `docker-machine` binary.
pub struct DockerMachine {
    binary: String,
    prefix: MachineName,
    driver: Option<String>,
    create_args: Vec<String>,
}

impl DockerMachine {
    pub fn new(prefix: MachineName, machine: &MachineConfig) -> Self {
        Self {
            binary: "docker-machine".to_string(),
            prefix,
            driver: machine.driver.clone(),
            create_args: machine.create_args.clone(),
        }
    }

    /// Override the docker-machine binary (e.g. a full path).
    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    async fn exec(&self, args: &[&str]) -> Result<std::process::Output, MachineError> {
        tracing::debug!(?args, "running docker-machine");
        Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| MachineError::Launch { source })
    }
}

fn stderr_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).trim().to_string()
}

#[async_trait]
impl MachineBackend for DockerMachine {
    async fn status(&self, node: &NodeRef) -> Result<MachineStatus, MachineError> {
        let machine = node.machine_name(&self.prefix);
        let output = self.exec(&["status", machine.as_str()]).await?;

        if output.status.success() {
            return Ok(MachineStatus::parse(&String::from_utf8_lossy(
                &output.stdout,
            )));
        }

        let stderr = stderr_of(&output);
        if stderr.contains("Host does not exist") {
            return Ok(MachineStatus::Absent);
        }

        Err(MachineError::Failed {
            command: format!("status {machine}"),
            stderr,
        })
    }

    async fn create(&self, node: &NodeRef) -> Result<(), MachineError> {
        let machine = node.machine_name(&self.prefix);
        let mut args = vec!["create"];
        if let Some(driver) = &self.driver {
            args.push("--driver");
            args.push(driver);
        }
        for extra in &self.create_args {
            args.push(extra);
        }
        args.push(machine.as_str());

        let output = self.exec(&args).await?;
        if !output.status.success() {
            return Err(MachineError::Failed {
                command: format!("create {machine}"),
                stderr: stderr_of(&output),
            });
        }
        Ok(())
    }

    async fn remove(&self, node: &NodeRef, force: bool) -> Result<(), MachineError> {
        let machine = node.machine_name(&self.prefix);
        let mut args = vec!["rm", "-y"];
        if force {
            args.push("-f");
        }
        args.push(machine.as_str());

        let output = self.exec(&args).await?;
        if !output.status.success() {
            return Err(MachineError::Failed {
                command: format!("rm {machine}"),
                stderr: stderr_of(&output),
            });
        }
        Ok(())
    }

    async fn list(&self, role: NodeRole) -> Result<Vec<MachineSummary>, MachineError> {
        let output = self
            .exec(&["ls", "--format", "{{.Name}}\t{{.State}}\t{{.URL}}"])
            .await?;
        if !output.status.success() {
            return Err(MachineError::Failed {
                command: "ls".to_string(),
                stderr: stderr_of(&output),
            });
        }

        Ok(parse_machine_list(
            &String::from_utf8_lossy(&output.stdout),
            &self.prefix,
            role,
        ))
    }
}

/// Parse `docker-machine ls` output, keeping only machines that belong to
/// this fleet prefix and role. Rows come back in ascending index order.
fn parse_machine_list(stdout: &str, prefix: &MachineName, role: NodeRole) -> Vec<MachineSummary> {
    let mut rows: Vec<MachineSummary> = stdout
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let mut fields = line.split('\t');
            let name = fields.next()?;
            let state = fields.next().unwrap_or("");
            let url = fields.next().unwrap_or("");

            let node = NodeRef::from_machine_name(name, prefix)?;
            if node.role != role {
                return None;
            }

            Some(MachineSummary {
                node,
                machine: node.machine_name(prefix),
                status: MachineStatus::parse(state),
                address: host_of(url),
            })
        })
        .collect();

    rows.sort_by_key(|row| row.node.index);
    rows
}

/// Extract the host from a docker-machine URL like `tcp://192.168.99.101:2376`.
fn host_of(url: &str) -> Option<String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    let rest = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let host = rest.rsplit_once(':').map(|(host, _)| host).unwrap_or(rest);
    Some(host.to_string())
}
