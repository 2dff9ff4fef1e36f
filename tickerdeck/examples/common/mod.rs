use std::sync::Arc;

use tickerdeck::Tickerdeck;
use tracing_subscriber::EnvFilter;

/// Log to stderr, honoring `RUST_LOG` (default `tickerdeck=info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tickerdeck=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Mock-backed orchestrator when `TICKERDECK_EXAMPLES_USE_MOCK` is set,
/// otherwise one configured from the environment.
pub fn get_deck() -> Result<Tickerdeck, tickerdeck::TickerdeckError> {
    if std::env::var("TICKERDECK_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using Mock Connector for CI) ---");
        Tickerdeck::builder()
            .with_connector(Arc::new(tickerdeck_mock::MockConnector::new()))
            .build()
    } else {
        Tickerdeck::from_env()
    }
}
