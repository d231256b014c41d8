// ABOUTME: Members command implementation.
// ABOUTME: Resolves the current leader and prints the swarm node listing.

use stolos::config::Config;
use stolos::error::Result;

use super::setup;

/// List swarm members as reported by the current leader.
pub async fn members(config: Config) -> Result<()> {
    let controller = setup::controller(&config)?;
    let listing = controller.members().await?;
    println!("{}", listing.trim_end());
    Ok(())
}
