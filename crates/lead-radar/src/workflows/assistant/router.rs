use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::engine::{AssistantEngine, AssistantRequest};
use super::intent::{answer_question, AssistantAnswer};
use super::report::AssistantPayload;
use super::snapshot::{LeadSnapshot, SnapshotRows};
use crate::error::AppError;

/// Raw rows plus run parameters, as posted by the assistant screen.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotRequest {
    #[serde(flatten)]
    pub rows: SnapshotRows,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub score_limit: Option<usize>,
}

impl SnapshotRequest {
    fn run_on(&self, engine: &AssistantEngine) -> Result<AssistantPayload, AppError> {
        let snapshot = LeadSnapshot::from_rows(&self.rows)?;
        let request = AssistantRequest {
            now: self.now.unwrap_or_else(Utc::now),
            timezone: self.timezone.clone(),
            score_limit: self.score_limit,
        };
        Ok(engine.run(&snapshot, &request)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
    #[serde(flatten)]
    pub snapshot: SnapshotRequest,
}

/// Router builder exposing the assistant snapshot and question endpoints.
pub fn assistant_router(engine: Arc<AssistantEngine>) -> Router {
    Router::new()
        .route("/api/v1/assistant/snapshot", post(snapshot_handler))
        .route("/api/v1/assistant/ask", post(ask_handler))
        .with_state(engine)
}

pub(crate) async fn snapshot_handler(
    State(engine): State<Arc<AssistantEngine>>,
    Json(request): Json<SnapshotRequest>,
) -> Result<Json<AssistantPayload>, AppError> {
    request.run_on(&engine).map(Json)
}

pub(crate) async fn ask_handler(
    State(engine): State<Arc<AssistantEngine>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AssistantAnswer>, AppError> {
    let payload = request.snapshot.run_on(&engine)?;
    Ok(Json(answer_question(&request.question, &payload)))
}
