// ABOUTME: Configuration types and parsing for stolos.yml.
// ABOUTME: Handles YAML parsing, prefix validation, and template scaffolding.

mod registry;

pub use registry::RegistryConfig;

use serde::{Deserialize, Deserializer};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::MachineName;

pub const CONFIG_FILENAME: &str = "stolos.yml";
pub const CONFIG_FILENAME_ALT: &str = "stolos.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".stolos/config.yml";

/// Longest allowed machine name prefix. Leaves room for the
/// `-manager-<index>` suffix within the 63-character name limit.
pub const MAX_PREFIX_LEN: usize = 40;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Machine name prefix: hosts are named `<prefix>-<role>-<index>`.
    #[serde(default = "default_prefix", deserialize_with = "deserialize_prefix")]
    pub prefix: MachineName,

    /// Network interface managers advertise for swarm traffic.
    #[serde(default = "default_advertise_interface")]
    pub advertise_interface: String,

    /// Timeout for a single docker command against a machine.
    #[serde(default = "default_command_timeout", with = "humantime_serde")]
    pub command_timeout: Duration,

    #[serde(default)]
    pub machine: MachineConfig,

    #[serde(default)]
    pub registry: Option<RegistryConfig>,
}

/// Options forwarded to the machine provisioning backend.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct MachineConfig {
    /// Driver passed to `docker-machine create`.
    #[serde(default)]
    pub driver: Option<String>,

    /// Extra arguments appended to `docker-machine create`.
    #[serde(default)]
    pub create_args: Vec<String>,
}

fn default_prefix() -> MachineName {
    MachineName::new("stolos").expect("default prefix is valid")
}

fn default_advertise_interface() -> String {
    "eth1".to_string()
}

fn default_command_timeout() -> Duration {
    Duration::from_secs(120)
}

fn deserialize_prefix<'de, D>(deserializer: D) -> std::result::Result<MachineName, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if raw.len() > MAX_PREFIX_LEN {
        return Err(serde::de::Error::custom(format!(
            "prefix exceeds {MAX_PREFIX_LEN} characters"
        )));
    }
    MachineName::new(&raw).map_err(serde::de::Error::custom)
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn template() -> Self {
        Config {
            prefix: default_prefix(),
            advertise_interface: default_advertise_interface(),
            command_timeout: default_command_timeout(),
            machine: MachineConfig::default(),
            registry: None,
        }
    }
}

pub fn init_config(dir: &Path, prefix: Option<&str>, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(p) = prefix {
        if p.len() > MAX_PREFIX_LEN {
            return Err(Error::InvalidConfig(format!(
                "prefix exceeds {MAX_PREFIX_LEN} characters"
            )));
        }
        config.prefix = MachineName::new(p).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"# Machine name prefix: hosts are named <prefix>-<role>-<index>
prefix: {}

# Interface managers advertise for swarm traffic
advertise_interface: {}

# Timeout for a single docker command against a machine
command_timeout: 120s

# machine:
#   driver: virtualbox

# registry:
#   name: registry.example.com
#   username: deploy
#   password_env: STOLOS_REGISTRY_PASSWORD
"#,
        config.prefix, config.advertise_interface
    )
}
