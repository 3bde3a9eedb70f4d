use std::sync::Arc;
use tracing::{info, warn};

use fitola_config::FitolaConfig;
use fitola_core::FitolaError;
use fitola_server::{AppState, build_router};

pub(super) async fn cmd_serve(
    mut config: FitolaConfig,
    listen: Option<String>,
) -> fitola_core::Result<()> {
    if let Some(listen) = listen {
        config.server.listen = listen;
    }

    let listen = config.server.listen.clone();
    println!("Fitola v{}", env!("CARGO_PKG_VERSION"));
    println!("   Model: {}", config.llm.model);
    println!("   Listening: http://{listen}");
    println!();

    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen).await.map_err(|e| {
        FitolaError::Config(format!("failed to bind {listen}: {e}"))
    })?;
    info!(listen = %listen, "fitola api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
