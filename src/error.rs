//! Error taxonomy shared by the curation and answering pipelines.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LearnflowError {
    /// Credentials were never configured. Raised before any network call
    /// and never retried.
    #[error("catalog API key not configured")]
    MissingApiKey,

    /// The catalog returned a non-success response. Recoverable only where
    /// a specific fallback absorbs it.
    #[error("catalog request failed with status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Video search succeeded but produced nothing to curate from.
    #[error("no relevant videos found for this topic")]
    NoVideosFound,

    /// Missing or too-short topic in a plan request.
    #[error("missing or invalid topic")]
    InvalidTopic,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl LearnflowError {
    /// HTTP status the produced interface maps this error to.
    pub fn http_status(&self) -> u16 {
        match self {
            LearnflowError::InvalidTopic => 400,
            LearnflowError::NoVideosFound => 404,
            LearnflowError::MissingApiKey
            | LearnflowError::Upstream { .. }
            | LearnflowError::Http(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, LearnflowError>;
