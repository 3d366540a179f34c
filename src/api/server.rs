//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::api::metrics::Metrics;
use crate::api::routes;
use crate::config::AppConfig;
use crate::corpus::build_corpus;
use crate::embeddings::EmbeddingClient;
use crate::embeddings::EmbeddingConfig;
use crate::embeddings::EmbeddingIndex;
use crate::llm::LlmService;
use crate::loader::load_faq_data;
use crate::rag::RagService;
use crate::rag::Retriever;
use crate::Result;

/// Build the shared application state from configuration.
///
/// The FAQ corpus is loaded once and the index built once; an empty or
/// unreadable FAQ source degrades to an empty corpus (the answer path then
/// serves the fixed apology) rather than failing startup. A missing API
/// token is fatal.
pub async fn build_state(config: &AppConfig) -> Result<AppState> {
    let entries = Arc::new(load_faq_data(config.faq_path()));
    if entries.is_empty() {
        warn!(
            "FAQ corpus at {} is empty; retrieval will return no context",
            config.faq_path()
        );
    }

    let embedding_backend = Arc::new(EmbeddingClient::new(EmbeddingConfig::from_app_config(
        config,
    ))?);
    let corpus = build_corpus(&entries);
    let index = Arc::new(EmbeddingIndex::build(embedding_backend, corpus).await?);
    let retriever = Retriever::new(index, entries.clone());

    let llm_service = Arc::new(LlmService::from_config(config)?);
    let rag_service = Arc::new(RagService::new(retriever, llm_service, config.top_k()));

    Ok(AppState {
        rag_service,
        entries,
        metrics: Arc::new(Metrics::new()),
    })
}

/// Assemble the full router with middleware layers
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = Router::new()
        .merge(routes::health_routes())
        .nest("/api/v1", routes::api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    if enable_cors {
        info!("CORS enabled");
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app
}

/// Start the API server
pub async fn serve_api(config: &AppConfig) -> Result<()> {
    info!("Starting faqrag API server...");

    let state = build_state(config).await?;
    let app = build_router(state, config.server.enable_cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
