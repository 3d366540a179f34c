//! API request and response types

use serde::Deserialize;
use serde::Serialize;

/// Request body for asking a question
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
}

/// Response for an answered question
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub confidence: f32,
    pub sources: Vec<String>,
    pub latency_ms: f64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body carrying a human-readable detail message
#[derive(Debug, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
