mod error;
mod routes;
mod settings;
mod state;

use std::sync::Arc;
use std::time::Duration;

use engine_runtime::{InstanceRegistry, SnapshotManager};
use settings::Settings;
use state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(settings.log_level()).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = engine_runtime::config::load_config(&settings.config_path)?;
    tracing::info!(config_id = %config.game_config_id, path = %settings.config_path.display(), "loaded config");

    let registry = Arc::new(InstanceRegistry::new(
        config,
        settings.admin_api_key.clone(),
        settings.max_idempotency_entries,
        SnapshotManager::new(settings.snapshot_dir.clone()),
    ));
    let restored = registry.restore_from_disk().await?;
    tracing::info!(restored, "restored instances");

    spawn_snapshot_flush_loop(Arc::clone(&registry), settings.snapshot_interval_ms);

    let app_state = AppState {
        registry: Arc::clone(&registry),
        e2e_mode: settings.e2e_mode,
        started_at: std::time::Instant::now(),
    };
    let app = routes::router(app_state).layer(tower_http::trace::TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("flushing snapshots before exit");
    registry.flush_all().await;

    Ok(())
}

fn spawn_snapshot_flush_loop(registry: Arc<InstanceRegistry>, interval_ms: u64) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
        loop {
            ticker.tick().await;
            registry.flush_all().await;
        }
    });
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
