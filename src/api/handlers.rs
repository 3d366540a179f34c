//! API request handlers

use std::sync::Arc;

use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::metrics::Metrics;
use crate::api::types::AnswerResponse;
use crate::api::types::DetailResponse;
use crate::api::types::HealthResponse;
use crate::api::types::QuestionRequest;
use crate::models::FaqEntry;
use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<RagService>,
    pub entries: Arc<Vec<FaqEntry>>,
    pub metrics: Arc<Metrics>,
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Answer a question grounded in the FAQ
pub async fn get_answer(
    State(state): State<AppState>,
    Json(req): Json<QuestionRequest>,
) -> Result<Json<AnswerResponse>, (StatusCode, Json<DetailResponse>)> {
    info!("POST /api/v1/answer: {}", req.question);

    match state.rag_service.answer_question(&req.question).await {
        Ok(outcome) => {
            state.metrics.record_request("answer", 200);
            state
                .metrics
                .record_response_time("rag", outcome.latency_ms / 1000.0);
            state.metrics.record_confidence(f64::from(outcome.confidence));

            Ok(Json(AnswerResponse {
                answer: outcome.answer,
                confidence: outcome.confidence,
                sources: outcome.sources,
                latency_ms: outcome.latency_ms,
            }))
        }
        Err(e) => {
            error!("Error answering question: {}", e);
            state.metrics.record_request("answer", 500);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DetailResponse::new(e.to_string())),
            ))
        }
    }
}

/// List all FAQ entries
pub async fn list_faqs(State(state): State<AppState>) -> Json<Vec<FaqEntry>> {
    info!("GET /api/v1/faq");
    state.metrics.record_request("faq_list", 200);
    Json(state.entries.as_ref().clone())
}

/// Get one FAQ entry by id.
///
/// Absent id in a non-empty dataset and an empty dataset return distinct
/// literal detail messages; both are 404s.
pub async fn get_faq_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FaqEntry>, (StatusCode, Json<DetailResponse>)> {
    info!("GET /api/v1/faq/{}", id);

    if state.entries.is_empty() {
        state.metrics.record_request("faq_get", 404);
        return Err((
            StatusCode::NOT_FOUND,
            Json(DetailResponse::new("FAQ data not available.")),
        ));
    }

    match state.entries.iter().find(|e| e.id == id) {
        Some(entry) => {
            state.metrics.record_request("faq_get", 200);
            Ok(Json(entry.clone()))
        }
        None => {
            state.metrics.record_request("faq_get", 404);
            Err((
                StatusCode::NOT_FOUND,
                Json(DetailResponse::new(format!(
                    "FAQ with id '{id}' not found."
                ))),
            ))
        }
    }
}

/// Prometheus text exposition of the service metrics
pub async fn get_metrics(State(state): State<AppState>) -> ([(&'static str, &'static str); 1], String) {
    ([("content-type", "text/plain")], state.metrics.render())
}
