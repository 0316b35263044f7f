//! Countdown Engine - serve a single countdown timer over HTTP

use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;
use tracing::info;

use countdown_engine::{
    api::{create_router, ApiState},
    config::Config,
    engine::TimerEngine,
    machine::TimerStatus,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_engine={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-engine v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, duration={}s, interval={}s",
          config.host, config.port, config.duration, config.interval);

    let engine = TimerEngine::new(config.timer_options())?;

    // Announce expiry once per run
    let was_idle = Mutex::new(engine.status() == TimerStatus::Idle);
    let _expiry = engine.subscribe(move |snapshot| {
        let idle = snapshot.state == TimerStatus::Idle;
        let mut was_idle = was_idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle && !*was_idle {
            info!("Countdown finished after {}s", snapshot.context.elapsed);
        }
        *was_idle = idle;
    });

    let state = Arc::new(ApiState::new(engine));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /pause      - Pause the countdown");
    info!("  POST /unpause    - Resume the countdown");
    info!("  POST /reset      - Restart from zero");
    info!("  POST /duration   - Add {{\"value\": seconds}} to the duration");
    info!("  POST /events     - Send a raw timer event");
    info!("  GET  /status     - Current timer state");
    info!("  GET  /stream     - Server-sent snapshot updates");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
