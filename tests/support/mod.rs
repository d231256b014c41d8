// ABOUTME: Test support utilities.
// ABOUTME: Provides in-memory collaborator fakes for reconciliation tests.

use std::sync::Once;

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fake_backend;
#[allow(dead_code)]
pub mod fake_runner;

use stolos::types::MachineName;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("stolos=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Machine name prefix shared by the reconciliation tests.
#[allow(dead_code)]
pub fn prefix() -> MachineName {
    MachineName::new("fleet").unwrap()
}
