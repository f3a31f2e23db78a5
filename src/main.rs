//! Windup - a single countdown timer served over a small local HTTP API
//! 
//! This is the main entry point for the windup server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

use windup::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::vibration_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("windup={},tower_http=info", config.log_level()))
        .init();

    info!("Starting windup server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, step={}s",
          config.host, config.port, config.seconds, config.step);

    let vibration = config.vibration();
    match &vibration.command {
        Some(command) => info!("Vibrating {}ms via `{}`", vibration.duration_ms, command),
        None => info!("No vibration command configured, using the terminal bell"),
    }

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.seconds,
        config.step,
    ));

    // Fire the vibrator whenever a countdown completes
    let vibration_state = Arc::clone(&state);
    tokio::spawn(async move {
        vibration_task(vibration_state, vibration).await;
    });

    if config.autostart {
        if let Err(e) = state.start_timer() {
            error!("Failed to start countdown: {}", e);
        }
    }

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /time/add      - Add time (default {}s)", config.step);
    info!("  POST /time/subtract - Subtract time (default {}s)", config.step);
    info!("  POST /start         - Start the countdown");
    info!("  POST /stop          - Stop the countdown");
    info!("  POST /toggle        - Start or stop the countdown");
    info!("  GET  /status        - Current time and state");
    info!("  GET  /events        - Live event stream");
    info!("  GET  /health        - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = state.stop_timer() {
        error!("Failed to stop countdown on shutdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
