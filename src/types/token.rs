// ABOUTME: Role-scoped swarm admission token.
// ABOUTME: Debug output redacts the secret so tokens never leak into logs.

use std::fmt;

use super::node::NodeRole;

/// An admission token obtained from the leader. Manager and worker tokens
/// are distinct and not interchangeable; a token lives only for the
/// duration of one reconciliation run.
#[derive(Clone)]
pub struct JoinToken {
    role: NodeRole,
    secret: String,
}

impl JoinToken {
    pub fn new(role: NodeRole, secret: impl Into<String>) -> Self {
        Self {
            role,
            secret: secret.into(),
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for JoinToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinToken")
            .field("role", &self.role)
            .field("secret", &"<redacted>")
            .finish()
    }
}
