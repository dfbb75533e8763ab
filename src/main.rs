use anyhow::Context;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kyc_wizard::app::{AppState, router};
use kyc_wizard::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("Invalid configuration")?;

    // Keep the guard alive for the whole process so buffered lines get flushed.
    let _log_guard = init_tracing(&config);

    eprintln!("KYC wizard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Auth API: {}", config.auth_base_url);
    match &config.save_url {
        Some(url) => eprintln!("   Save: POST {url}"),
        None => eprintln!("   Save: {}", config.submissions_dir.display()),
    }
    eprintln!("   Session file: {}", config.session_file.display());

    let state = AppState::from_config(&config);
    match state.session.restore().await {
        Ok(true) => tracing::info!("Resumed signed-in session"),
        Ok(false) => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable session file"),
    }

    let registry = state.registry.clone();
    let idle_timeout = config.wizard_idle_timeout;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        interval.tick().await; // Skip immediate first tick
        loop {
            interval.tick().await;
            registry.prune_idle(idle_timeout).await;
        }
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("Failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "KYC wizard listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await
        .context("Server error")?;

    Ok(())
}

/// Console logging filtered by `RUST_LOG` (default `info`), plus a daily
/// rolling file when a log directory is configured.
fn init_tracing(config: &ServerConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = tracing_subscriber::fmt::layer().with_target(false);

    match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "kyc-wizard.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter())
                .with(console)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter())
                .with(console)
                .init();
            None
        }
    }
}
