use std::sync::Arc;

use tracing::{error, info, warn};

use symview::config::Config;
use symview::engine_client::RemoteEngine;
use symview::logging;
use symview::symbol_view::SymbolView;
use symview::view_server::{self, AppState};

#[tokio::main]
async fn main() {
    logging::init_subscriber();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        engine = %config.engine_url,
        architecture = ?config.architecture(),
        "Symbol view starting"
    );

    let engine = RemoteEngine::new(config.engine_url.clone());
    if let Err(e) = engine.ping().await {
        warn!("Debugger engine not reachable yet: {}", e);
    }

    let (view, notifications) = SymbolView::new(Arc::new(engine), &config);
    let state = AppState::new(view, notifications);

    info!(port = config.listen_port, "Starting symbol view server on port");
    if let Err(e) = view_server::run_server(config.listen_port, state).await {
        error!("Server error: {}", e);
    }
}
