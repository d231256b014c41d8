// ABOUTME: Type-safe domain types for fleet reconciliation.
// ABOUTME: Validated machine names, node identities, statuses, and tokens.

mod machine_name;
mod node;
mod status;
mod token;

pub use machine_name::{MachineName, MachineNameError};
pub use node::{NodeRef, NodeRole, ParseNodeRoleError};
pub use status::MachineStatus;
pub use token::JoinToken;
