use config::{Config, File};
use models::{ModelConfig, OldModel};
use server::store::MemoryStore;
use server::{AppState, get_app};
use std::sync::Arc;
use tracing::info;

async fn load_config() -> anyhow::Result<(String, u16, Vec<ModelConfig>, Vec<OldModel>)> {
    let settings = Config::builder()
        .add_source(File::with_name("config"))
        .build()?;

    let host: String = settings
        .get("host")
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = settings.get("port").unwrap_or(3000);

    let models: Vec<ModelConfig> = settings.get("models")?;
    let old_models: Vec<OldModel> = settings.get("old_models").unwrap_or_default();

    info!(
        "serving {} model(s), {} retired",
        models.len(),
        old_models.len()
    );

    Ok((host, port, models, old_models))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    info!("Initializing chat backend server");

    let (host, port, models, old_models) = load_config().await?;
    let default_model_id = models
        .first()
        .map(|m| m.id.clone())
        .ok_or_else(|| anyhow::anyhow!("at least one model must be configured"))?;

    info!("Starting server on {}:{}", host, port);
    let state = Arc::new(AppState {
        default_model_id,
        models,
        old_models,
        store: Arc::new(MemoryStore::new()),
    });

    let app = get_app(state);

    info!("Routes configured, binding to {}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(format!("{host}:{port}")).await?;
    info!("Server started successfully, listening for requests");

    axum::serve(listener, app).await?;

    Ok(())
}
