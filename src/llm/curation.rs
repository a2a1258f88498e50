//! Curated-plan generation through the generative text service.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::{clean_model_response, GenerativeModel};
use crate::catalog::CatalogVideo;
use crate::duration::seconds_to_minutes;
use crate::plan::{LearningItem, LearningModule, LearningTips};

/// At most this many candidate videos are shown to the model.
const CANDIDATE_LIMIT: usize = 20;

/// Candidate descriptions are truncated to this many characters.
const DESCRIPTION_LIMIT: usize = 500;

/// Videos used when the generative service cannot produce a plan.
const FALLBACK_ITEM_COUNT: usize = 3;

/// Flat estimate for the deterministic minimal plan, in minutes.
const FALLBACK_ESTIMATE_MINUTES: u64 = 30;

/// The mode-independent body of a curated plan.
#[derive(Debug, Clone)]
pub struct CuratedPlan {
    pub modules: Vec<LearningModule>,
    pub total_estimated_time_minutes: Option<u64>,
    pub tips: Option<LearningTips>,
}

/// Ask the generative service for a structured plan over the candidates.
/// Any unavailability, transport failure, or unparseable response is an
/// error; the caller substitutes the deterministic minimal plan.
pub async fn curate_plan(
    model: Option<&dyn GenerativeModel>,
    topic: &str,
    videos: &[CatalogVideo],
) -> Result<CuratedPlan> {
    let model = model.ok_or_else(|| anyhow!("generative service not configured"))?;
    let prompt = build_curation_prompt(topic, videos);
    let text = model.complete(&prompt).await?;
    debug!("Curation response received ({} chars)", text.len());
    parse_curated_draft(&text)
}

/// Single "Getting Started" module from the first few candidates, with a
/// flat time estimate and default tips.
pub fn fallback_plan(videos: &[CatalogVideo]) -> CuratedPlan {
    let items: Vec<LearningItem> = videos
        .iter()
        .take(FALLBACK_ITEM_COUNT)
        .map(|v| LearningItem {
            video_id: v.id.clone(),
            title: v.title.clone(),
            url: watch_url(&v.id),
            duration_minutes: v.duration_seconds.map(seconds_to_minutes),
        })
        .collect();

    CuratedPlan {
        modules: vec![LearningModule {
            title: "Getting Started".to_string(),
            estimated_time_minutes: Some(FALLBACK_ESTIMATE_MINUTES),
            items,
        }],
        total_estimated_time_minutes: Some(FALLBACK_ESTIMATE_MINUTES),
        tips: Some(super::tips::default_tips()),
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

fn build_curation_prompt(topic: &str, videos: &[CatalogVideo]) -> String {
    let candidates: Vec<serde_json::Value> = videos
        .iter()
        .take(CANDIDATE_LIMIT)
        .map(|v| {
            json!({
                "id": v.id,
                "title": v.title,
                "description": v.description.chars().take(DESCRIPTION_LIMIT).collect::<String>(),
                "durationSeconds": v.duration_seconds,
                "channelTitle": v.channel_title,
            })
        })
        .collect();

    let input = json!({ "topic": topic, "videos": candidates });

    format!(
        r#"You are an expert learning designer. Given a topic and a list of videos (title, description, durationSeconds), create a concise learning plan. Keep to <= 10 items total across modules. Prefer videos with clear titles and reasonable lengths. Output strict JSON with this shape:
{{
  "topic": string,
  "modules": [{{ "title": string, "estimatedTimeMinutes"?: number, "items": [{{"videoId": string, "title": string, "url": string, "durationMinutes"?: number}}] }}],
  "totalEstimatedTimeMinutes"?: number,
  "tips": {{ "milestones": string[], "exercises"?: string[], "cheatSheet"?: string }}
}}
No markdown. No commentary.
INPUT:
{}"#,
        input
    )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CuratedDraft {
    #[serde(default)]
    modules: Vec<ModuleDraft>,
    total_estimated_time_minutes: Option<u64>,
    tips: Option<LearningTips>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModuleDraft {
    #[serde(default)]
    title: String,
    estimated_time_minutes: Option<u64>,
    #[serde(default)]
    items: Vec<ItemDraft>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDraft {
    #[serde(default)]
    video_id: String,
    #[serde(default)]
    title: String,
    url: Option<String>,
    duration_minutes: Option<u64>,
}

/// Parse-then-validate. Items without a video id are dropped, modules
/// without surviving items are dropped, and a draft with no surviving
/// modules is malformed.
fn parse_curated_draft(text: &str) -> Result<CuratedPlan> {
    let cleaned = clean_model_response(text);
    let draft: CuratedDraft = serde_json::from_str(&cleaned)
        .map_err(|e| anyhow!("generative service returned malformed content: {}", e))?;

    let modules: Vec<LearningModule> = draft
        .modules
        .into_iter()
        .filter_map(|module| {
            let items: Vec<LearningItem> = module
                .items
                .into_iter()
                .filter(|item| !item.video_id.is_empty())
                .map(|item| {
                    let url = item
                        .url
                        .filter(|u| !u.is_empty())
                        .unwrap_or_else(|| watch_url(&item.video_id));
                    LearningItem {
                        video_id: item.video_id,
                        title: item.title,
                        url,
                        duration_minutes: item.duration_minutes,
                    }
                })
                .collect();
            if items.is_empty() {
                return None;
            }
            Some(LearningModule {
                title: if module.title.is_empty() {
                    "Module".to_string()
                } else {
                    module.title
                },
                estimated_time_minutes: module.estimated_time_minutes,
                items,
            })
        })
        .collect();

    if modules.is_empty() {
        return Err(anyhow!("generative service returned no usable modules"));
    }

    Ok(CuratedPlan {
        modules,
        total_estimated_time_minutes: draft.total_estimated_time_minutes,
        tips: draft.tips,
    })
}
