#![allow(dead_code)]

use rbz_host::ServerRegistry;
use rbz_host::config::Config;
use tracing_subscriber::EnvFilter;

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Registry with default timing and a fixed port seed
pub fn seeded_registry() -> ServerRegistry {
    init_tracing();
    ServerRegistry::new(Config {
        port_seed: Some(42),
        ..Default::default()
    })
}
