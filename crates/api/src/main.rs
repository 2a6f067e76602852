use anyhow::Context;
use catalog_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    catalog_observability::init(config.debug);
    if !dotenv_loaded {
        tracing::debug!("no .env file found");
    }

    let app = catalog_api::app::build_app(&config).await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
