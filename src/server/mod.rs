pub mod handlers;
pub mod types;

use crate::{
    Result,
    chat::Assistant,
    config::Config,
    llm::GeminiClient,
    scan::{HttpImageClassifier, ScanService},
    tabular::{HttpTabularClassifier, TabularService},
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use handlers::AppState;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Brain scans are larger than axum's 2 MB default body limit.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

impl AppState {
    pub fn new(scan: ScanService, tabular: TabularService, assistant: Assistant) -> Self {
        Self {
            scan: Arc::new(scan),
            tabular: Arc::new(tabular),
            assistant: Arc::new(assistant),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        if config.image_classifier.url.is_none() {
            warn!("No image classifier URL configured; scan analysis will fail until IMAGE_API_URL is set");
        }

        Self::new(
            ScanService::new(Box::new(HttpImageClassifier::new(
                config.image_classifier.clone(),
            ))),
            TabularService::new(Box::new(HttpTabularClassifier::new(
                config.tabular_classifier.clone(),
            ))),
            Assistant::new(Box::new(GeminiClient::new(config.llm.clone()))),
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(handlers::status))
        .route("/api/scan", post(handlers::analyze_scan))
        .route("/api/scan/history", get(handlers::scan_history))
        .route("/api/scan/history/:id/image", get(handlers::scan_image))
        .route("/api/tabular/fields", get(handlers::tabular_fields))
        .route(
            "/api/tabular/form",
            get(handlers::tabular_form).patch(handlers::update_tabular_form),
        )
        .route("/api/tabular/predict", post(handlers::tabular_predict))
        .route(
            "/api/chat",
            get(handlers::conversation).post(handlers::chat),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let app = router(AppState::from_config(&config));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
