use betteh::app::{build_router, AppState};
use betteh::bootstrap::seed_admin;
use betteh::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "betteh=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting Betteh server...");

    let config = AppConfig::load()?;
    let addr = config.bind_addr();

    let state = AppState::new(config).await?;
    tracing::info!(
        "Data file: {}, uploads: {}",
        state.store.path().display(),
        state.config.upload_dir.display()
    );

    seed_admin(&state.store, &state.config).await?;

    let app = build_router(state);

    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
