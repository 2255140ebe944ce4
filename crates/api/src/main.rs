use anyhow::Context;

use sitegate_api::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sitegate_observability::init();

    let settings = Settings::from_env().context("failed to load settings")?;
    tracing::info!(
        protected_prefix = %settings.gate.protected_prefix(),
        sign_in_path = settings.gate.sign_in_path(),
        assets_dir = %settings.assets_dir.display(),
        "starting sitegate"
    );

    let app = sitegate_api::app::build_app(&settings).context("failed to load signing key")?;

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
