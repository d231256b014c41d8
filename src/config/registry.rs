// ABOUTME: Registry credential configuration.
// ABOUTME: Passwords come inline or from an environment variable at run time.

use serde::Deserialize;

use crate::cluster::RegistryAuth;
use crate::error::{Error, Result};

/// Registry to authenticate newly created machines against.
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    pub name: String,
    pub username: String,

    #[serde(flatten)]
    password: PasswordSource,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum PasswordSource {
    Literal { password: String },
    FromEnv { password_env: String },
}

impl RegistryConfig {
    /// Resolve credentials into a usable auth value.
    pub fn resolve(&self) -> Result<RegistryAuth> {
        let password = match &self.password {
            PasswordSource::Literal { password } => password.clone(),
            PasswordSource::FromEnv { password_env } => std::env::var(password_env)
                .map_err(|_| Error::MissingEnvVar(password_env.clone()))?,
        };

        Ok(RegistryAuth {
            registry: self.name.clone(),
            username: self.username.clone(),
            password,
        })
    }
}
