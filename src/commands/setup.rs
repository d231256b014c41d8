// ABOUTME: Shared helpers for assembling the fleet controller from configuration.
// ABOUTME: Eliminates duplication across the fleet, maintain, and members commands.

use stolos::cluster::MachineSsh;
use stolos::config::Config;
use stolos::diagnostics::{Diagnostics, Warning};
use stolos::error::Result;
use stolos::fleet::{FleetController, ReconcileLock};
use stolos::machine::DockerMachine;
use stolos::output::Output;

/// Assemble the controller with the shipped docker-machine collaborators.
pub fn controller(config: &Config) -> Result<FleetController<DockerMachine, MachineSsh>> {
    let registry = config.registry.as_ref().map(|r| r.resolve()).transpose()?;

    let backend = DockerMachine::new(config.prefix.clone(), &config.machine);
    let runner = MachineSsh::new(config.command_timeout);

    Ok(FleetController::new(
        backend,
        runner,
        config.prefix.clone(),
        &config.advertise_interface,
    )
    .with_registry(registry))
}

/// Release the reconcile lock, surface collected warnings, and report the
/// final result.
pub fn finish(
    lock: ReconcileLock,
    diag: &Diagnostics,
    output: &Output,
    result: Result<()>,
    done: &str,
) -> Result<()> {
    if let Err(e) = lock.release() {
        diag.warn(Warning::lock_release(format!(
            "failed to release reconcile lock: {e}"
        )));
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    result.map(|()| output.success(done))
}
