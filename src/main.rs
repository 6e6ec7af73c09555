use axum::extract::DefaultBodyLimit;
use examgen_backend::{
    config::{get_config, init_config},
    database::{memory::MemoryStore, postgres::PgStore, ExamStore},
    routes,
    services::model_provider::ProviderRegistry,
    AppState,
};
use reqwest::Client;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
    init_config()?;
    let config = get_config();

    let store: Arc<dyn ExamStore> = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url).await?;
            store.migrate().await?;
            info!("Connected to Postgres");
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; data will not survive restarts");
            Arc::new(MemoryStore::new())
        }
    };

    let http_client = Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    let providers = Arc::new(ProviderRegistry::from_config(config, http_client));
    if providers.is_empty() {
        tracing::warn!(
            "No LLM provider configured; generation will yield empty sets and subjective answers fall back to default credit"
        );
    } else {
        info!(providers = ?providers.names(), "Configured LLM providers");
    }

    let app_state = AppState::new(store, providers, config.default_provider.clone());

    let app = routes::router(app_state)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
