// ABOUTME: Command module aggregator for the stolos CLI.
// ABOUTME: Re-exports the fleet, maintain, and members command handlers.

mod fleet;
mod maintain;
mod members;
mod setup;

pub use fleet::fleet;
pub use maintain::maintain;
pub use members::members;
