use tracing_subscriber::EnvFilter;

/// Installs the fmt subscriber. `RUST_LOG` selects levels, `info` when unset.
pub fn init_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .without_time()
        .with_env_filter(filter)
        .init();
}
