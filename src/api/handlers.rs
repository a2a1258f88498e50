//! API request handlers

use serde_json::Value;
use std::sync::Arc;

use super::models::{AnswerResponse, AskRequest, LearnRequest};
use crate::answer::ContextAnswerer;
use crate::catalog::Catalog;
use crate::error::{LearnflowError, Result};
use crate::plan::{LearningPlan, PlanAssembler};

/// Topics offered by the random-topic endpoint.
const RANDOM_TOPICS: &[&str] = &[
    "Python programming",
    "Introduction to machine learning",
    "Basic guitar chords",
    "Cooking Italian pasta",
    "Digital marketing fundamentals",
    "Public speaking tips",
    "Photography basics",
    "Web accessibility",
    "React hooks overview",
    "Data visualization",
];

/// Handle health check requests
pub async fn health_check() -> Value {
    serde_json::json!({
        "status": "healthy",
        "service": "learnflow",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

/// Handle plan generation requests. A missing assembler means the catalog
/// credentials were never configured.
pub async fn generate_plan(
    assembler: &Option<Arc<PlanAssembler>>,
    request: LearnRequest,
) -> Result<LearningPlan> {
    let assembler = assembler.as_ref().ok_or(LearnflowError::MissingApiKey)?;
    let topic = request.topic.unwrap_or_default();
    assembler.generate(&topic).await
}

/// Handle playlist item listing for the lesson view.
pub async fn playlist_items(
    catalog: &Option<Arc<dyn Catalog>>,
    playlist_id: &str,
) -> Result<Value> {
    let catalog = catalog.as_ref().ok_or(LearnflowError::MissingApiKey)?;
    let items = catalog.playlist_items(playlist_id).await?;
    Ok(serde_json::json!({
        "total": items.len(),
        "items": items,
    }))
}

/// Handle question requests. Always succeeds; the answerer absorbs every
/// failure into its answer text.
pub async fn ask(answerer: &Arc<ContextAnswerer>, request: AskRequest) -> AnswerResponse {
    let answer = answerer
        .answer(
            request.question.as_deref().unwrap_or(""),
            request.topic.as_deref(),
            request.video_id.as_deref(),
        )
        .await;
    AnswerResponse { answer }
}

/// Pick a topic suggestion.
pub fn random_topic() -> &'static str {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    RANDOM_TOPICS[nanos % RANDOM_TOPICS.len()]
}
