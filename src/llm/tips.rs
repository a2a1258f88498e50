//! Learning-tips generation with a fixed deterministic fallback.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::warn;

use super::{clean_model_response, GenerativeModel};
use crate::plan::LearningTips;

/// Milestones used whenever the generative service cannot provide tips.
pub const DEFAULT_MILESTONES: [&str; 3] = [
    "Start with fundamentals",
    "Practice regularly",
    "Review and iterate",
];

pub fn default_tips() -> LearningTips {
    LearningTips {
        milestones: DEFAULT_MILESTONES.iter().map(|m| m.to_string()).collect(),
        exercises: None,
        cheat_sheet: None,
    }
}

/// Generate tips for a topic. Never fails: any unavailability or malformed
/// response substitutes the default milestones.
pub async fn generate_tips(model: Option<&dyn GenerativeModel>, topic: &str) -> LearningTips {
    let Some(model) = model else {
        return default_tips();
    };

    let prompt = format!(
        "Generate concise learning tips for a topic. Output strict JSON with keys: \
         milestones (3-5 bullets), exercises (optional, array), cheatSheet (optional, \
         short string). No markdown.\nTOPIC: {}",
        topic
    );

    match model.complete(&prompt).await {
        Ok(text) => parse_tips(&text).unwrap_or_else(|e| {
            warn!("Tip generation returned unusable content: {}", e);
            default_tips()
        }),
        Err(e) => {
            warn!("Tip generation failed: {}", e);
            default_tips()
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TipsDraft {
    #[serde(default)]
    milestones: Vec<String>,
    exercises: Option<Vec<String>>,
    cheat_sheet: Option<String>,
}

fn parse_tips(text: &str) -> Result<LearningTips> {
    let cleaned = clean_model_response(text);
    let draft: TipsDraft = serde_json::from_str(&cleaned)
        .map_err(|e| anyhow!("tips response was not valid JSON: {}", e))?;

    if draft.milestones.is_empty() {
        return Err(anyhow!("tips response had no milestones"));
    }

    Ok(LearningTips {
        milestones: draft.milestones,
        exercises: draft.exercises.filter(|e| !e.is_empty()),
        cheat_sheet: draft.cheat_sheet.filter(|c| !c.is_empty()),
    })
}
