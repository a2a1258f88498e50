//! API request and response models

use serde::{Deserialize, Serialize};

/// Plan generation request body.
#[derive(Debug, Deserialize)]
pub struct LearnRequest {
    pub topic: Option<String>,
}

/// Question request body.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
    pub topic: Option<String>,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

/// Answers always come back with status 200; failures are absorbed into
/// the answer text so a chat surface never renders a raw error.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct RandomTopicResponse {
    pub topic: String,
}
