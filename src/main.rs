use anyhow::{Context, Result};
use content_translations::config::{Config, PropertyRegistry};
use content_translations::db::Database;
use content_translations::server::{build_router, AppState};
use content_translations::translation::HttpTranslator;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("content_translations=info".parse()?),
        )
        .init();

    info!("Starting content translations service");

    let config = Config::from_env()?;

    let db = Database::new(&config.database_path)?;
    info!("Database ready at {}", config.database_path);

    let translator = HttpTranslator::new(
        reqwest::Client::new(),
        config.translation_api_url.clone(),
        config.translation_api_key.clone(),
        config.translation_model.clone(),
    );

    if config.admin_api_key.is_none() {
        warn!("ADMIN_API_KEY not set, admin endpoints will reject every request");
    }

    let state = AppState::new(
        db,
        translator,
        PropertyRegistry::from_config(&config),
        config.admin_api_key.clone(),
    );
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
