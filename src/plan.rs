//! Learning plan model and the assembly fallback ladder.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::{LearnflowError, Result};
use crate::llm::curation;
use crate::llm::tips;
use crate::llm::GenerativeModel;

/// Plans keep at most this many modules, whatever their source.
const MAX_MODULES: usize = 3;

/// One watchable unit inside a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningItem {
    #[serde(rename = "videoId")]
    pub video_id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "durationMinutes", skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningModule {
    pub title: String,
    #[serde(rename = "estimatedTimeMinutes", skip_serializing_if = "Option::is_none")]
    pub estimated_time_minutes: Option<u64>,
    pub items: Vec<LearningItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningTips {
    pub milestones: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercises: Option<Vec<String>>,
    #[serde(rename = "cheatSheet", skip_serializing_if = "Option::is_none")]
    pub cheat_sheet: Option<String>,
}

/// The finished plan. The mode tag fully determines which fields exist;
/// mixed plans are unrepresentable.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum LearningPlan {
    Playlist {
        topic: String,
        #[serde(rename = "playlistId")]
        playlist_id: String,
        #[serde(rename = "playlistTitle")]
        playlist_title: String,
        #[serde(rename = "playlistChannelTitle")]
        playlist_channel_title: String,
        tips: LearningTips,
    },
    Curated {
        topic: String,
        modules: Vec<LearningModule>,
        #[serde(
            rename = "totalEstimatedTimeMinutes",
            skip_serializing_if = "Option::is_none"
        )]
        total_estimated_time_minutes: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tips: Option<LearningTips>,
    },
}

/// Builds a learning plan for a topic, degrading through three rungs:
/// an existing playlist, a generative curation over searched videos, and a
/// deterministic minimal plan.
pub struct PlanAssembler {
    catalog: Arc<dyn Catalog>,
    model: Option<Arc<dyn GenerativeModel>>,
}

impl PlanAssembler {
    pub fn new(catalog: Arc<dyn Catalog>, model: Option<Arc<dyn GenerativeModel>>) -> Self {
        Self { catalog, model }
    }

    pub async fn generate(&self, topic: &str) -> Result<LearningPlan> {
        let topic = topic.trim();
        if topic.len() < 2 {
            return Err(LearnflowError::InvalidTopic);
        }

        // An existing playlist beats anything we could assemble ourselves.
        // A failed playlist search is not terminal; curation still can be.
        let playlists = match self.catalog.search_playlists(topic).await {
            Ok(playlists) => playlists,
            Err(e) => {
                warn!("Playlist search failed, curating from videos instead: {}", e);
                Vec::new()
            }
        };

        if let Some(playlist) = playlists.into_iter().next() {
            info!("Using playlist '{}' for topic '{}'", playlist.title, topic);
            let tips = tips::generate_tips(self.model.as_deref(), topic).await;
            return Ok(LearningPlan::Playlist {
                topic: topic.to_string(),
                playlist_id: playlist.id,
                playlist_title: playlist.title,
                playlist_channel_title: playlist.channel_title,
                tips,
            });
        }

        // With no playlist, videos are the raw material; failing to get any
        // is unrecoverable at this point.
        let videos = self.catalog.search_videos(topic).await?;
        if videos.is_empty() {
            return Err(LearnflowError::NoVideosFound);
        }

        let curated = match curation::curate_plan(self.model.as_deref(), topic, &videos).await {
            Ok(curated) => curated,
            Err(e) => {
                warn!("Plan curation unavailable ({}), using minimal plan", e);
                curation::fallback_plan(&videos)
            }
        };

        let modules: Vec<LearningModule> =
            curated.modules.into_iter().take(MAX_MODULES).collect();
        info!(
            "Curated plan for '{}' with {} module(s)",
            topic,
            modules.len()
        );

        Ok(LearningPlan::Curated {
            topic: topic.to_string(),
            modules,
            total_estimated_time_minutes: curated.total_estimated_time_minutes,
            tips: curated.tips,
        })
    }
}
