// ABOUTME: Join token brokerage against the resolved leader.
// ABOUTME: Manager and worker tokens are distinct and never interchangeable.

use thiserror::Error;

use crate::cluster::{CommandRunner, SwarmError, swarm};
use crate::types::{JoinToken, NodeRole};

use super::leader::Leader;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no leader available to issue a {role} token")]
    LeaderAbsent { role: NodeRole },

    #[error("join token query failed: {source}")]
    Query { source: SwarmError },
}

/// Ask the leader for a role-scoped admission token.
///
/// # Errors
///
/// Returns `TokenError::LeaderAbsent` when no leader was resolved, and
/// `TokenError::Query` when the leader cannot answer.
pub async fn request_token<R: CommandRunner>(
    runner: &R,
    leader: Option<&Leader>,
    role: NodeRole,
) -> Result<JoinToken, TokenError> {
    let leader = leader.ok_or(TokenError::LeaderAbsent { role })?;

    swarm::join_token(runner, &leader.machine, role)
        .await
        .map_err(|source| TokenError::Query { source })
}
