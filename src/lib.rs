/// Learnflow - topic-to-lesson curation core
///
/// Turns a free-text topic into a curated video lesson plan and answers
/// follow-up questions grounded in the lesson's transcript, degrading
/// gracefully when the catalog or the generative service misbehaves.

pub mod answer;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod duration;
pub mod error;
pub mod llm;
pub mod plan;
pub mod relevance;
pub mod transcript;

#[cfg(feature = "api")]
pub mod api;

// Re-export main types for easy access
pub use crate::answer::ContextAnswerer;
pub use crate::catalog::{Catalog, CatalogClient, CatalogPlaylist, CatalogVideo};
pub use crate::classifier::ContentClassifier;
pub use crate::config::{Config, ConfigBuilder};
pub use crate::duration::parse_duration;
pub use crate::error::{LearnflowError, Result};
pub use crate::llm::{create_model, GenerativeConfig, GenerativeModel, GenerativeProvider};
pub use crate::plan::{LearningItem, LearningModule, LearningPlan, LearningTips, PlanAssembler};
pub use crate::transcript::{TimedTextClient, TranscriptRetriever, TranscriptSource};
