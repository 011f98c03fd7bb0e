//! Bitmap Cache - interactive shell
//!
//! Drives one size-bounded bitmap cache from stdin, answering each command
//! with a JSON line on stdout. Logs go to stderr.

use tokio::io::BufReader;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bitmap_cache::shell::run_shell;
use bitmap_cache::{spawn_report_task, Config, ShellState};

/// Main entry point for the bitmap cache shell.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create cache store with configured parameters
/// 4. Start the occupancy report task if enabled
/// 5. Serve commands from stdin until EOF, `quit`, or a shutdown signal
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bitmap_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting bitmap cache shell");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size={}KiB, touch_on_miss={}, report_interval={}s",
        config.max_size, config.touch_on_miss, config.report_interval
    );

    let state = ShellState::from_config(&config);

    let report_handle = if config.report_interval > 0 {
        info!("Occupancy report task started");
        Some(spawn_report_task(
            state.cache.clone(),
            config.report_interval,
        ))
    } else {
        None
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();

    tokio::select! {
        result = run_shell(state.clone(), stdin, stdout) => result?,
        _ = shutdown_signal() => {}
    }

    if let Some(handle) = report_handle {
        handle.abort();
        warn!("Report task aborted");
    }

    // Release every cached bitmap before exit
    state.cache.lock().await.clear(true);
    info!("Shell shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
