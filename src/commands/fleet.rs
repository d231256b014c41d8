// ABOUTME: Fleet command implementation.
// ABOUTME: Bootstraps a new cluster, then reconciles it to the requested topology.

use stolos::config::Config;
use stolos::diagnostics::Diagnostics;
use stolos::error::Result;
use stolos::fleet::{FleetSpec, ReconcileLock};
use stolos::output::Output;

use super::setup;

/// Bootstrap a new cluster and bring it to the requested topology.
pub async fn fleet(
    config: Config,
    managers: u32,
    workers: u32,
    force: bool,
    mut output: Output,
) -> Result<()> {
    let controller = setup::controller(&config)?;
    let lock = ReconcileLock::acquire(&config.prefix, force)?;

    output.start_timer();
    let diag = Diagnostics::default();
    let spec = FleetSpec::new(managers, workers);

    output.progress(&format!(
        "Bootstrapping fleet '{}': {} manager(s), {} worker(s)",
        config.prefix, managers, workers
    ));

    let result = controller
        .fleet(&spec, &diag)
        .await
        .map_err(Into::into);

    setup::finish(lock, &diag, &output, result, "Fleet reconciled")
}
