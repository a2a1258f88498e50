//! Context-grounded question answering.
//!
//! One question runs one waterfall: generative answer, summary shortcut,
//! transcript extraction, catalog suggestions, apology. Each stage either
//! answers or skips; the driver stops at the first answer. Nothing here
//! ever returns an error to the caller.

use std::sync::Arc;
use tracing::debug;

use crate::catalog::Catalog;
use crate::llm::GenerativeModel;
use crate::relevance::top_relevant_sentences;
use crate::transcript::TranscriptRetriever;

/// Characters of transcript passed along as context.
const TRANSCRIPT_CHAR_LIMIT: usize = 8000;

/// Phrases that mark a question as asking for a summary.
const SUMMARY_INTENTS: &[&str] = &[
    "summary",
    "summarize",
    "outline",
    "overview",
    "what is this video about",
];

/// Synthetic query used to pull introductory sentences for summaries.
const SUMMARY_QUERY: &str = "topic introduction overview basics";

const SUMMARY_SENTENCE_LIMIT: usize = 4;
const EXTRACTION_SENTENCE_LIMIT: usize = 5;
const SUGGESTION_LIMIT: usize = 2;

enum StageOutcome {
    Answered(String),
    Skip,
}

use StageOutcome::{Answered, Skip};

pub struct ContextAnswerer {
    transcripts: TranscriptRetriever,
    catalog: Option<Arc<dyn Catalog>>,
    model: Option<Arc<dyn GenerativeModel>>,
}

impl ContextAnswerer {
    pub fn new(
        transcripts: TranscriptRetriever,
        catalog: Option<Arc<dyn Catalog>>,
        model: Option<Arc<dyn GenerativeModel>>,
    ) -> Self {
        Self {
            transcripts,
            catalog,
            model,
        }
    }

    /// Answer a question about the current video/topic. Always produces a
    /// user-facing string.
    pub async fn answer(
        &self,
        question: &str,
        topic: Option<&str>,
        video_id: Option<&str>,
    ) -> String {
        let question = question.trim();
        if question.is_empty() {
            return "Please provide a question.".to_string();
        }

        let transcript = match video_id {
            Some(id) => truncate_chars(
                &self.transcripts.fetch_transcript(id).await,
                TRANSCRIPT_CHAR_LIMIT,
            ),
            None => String::new(),
        };
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());

        if let Answered(text) = self.generative_answer(question, topic, &transcript).await {
            return text;
        }
        if let Answered(text) = self.summary_shortcut(question, topic, &transcript) {
            return text;
        }
        if let Answered(text) = self.transcript_extraction(question, &transcript) {
            return text;
        }
        if let Answered(text) = self.catalog_suggestions(question, topic).await {
            return text;
        }
        self.apology(topic)
    }

    async fn generative_answer(
        &self,
        question: &str,
        topic: Option<&str>,
        transcript: &str,
    ) -> StageOutcome {
        let Some(model) = &self.model else {
            return Skip;
        };

        let prompt = format!(
            "You are a concise, helpful tutor. Answer strictly based on the given topic \
             and video transcript. If something falls outside them, say you don't know. \
             Provide clear, step-by-step guidance when appropriate.\n\n\
             TOPIC: {}\nTRANSCRIPT:\n{}\nQUESTION: {}",
            topic.unwrap_or("(unspecified)"),
            if transcript.is_empty() {
                "(no transcript available)"
            } else {
                transcript
            },
            question
        );

        match model.complete(&prompt).await {
            Ok(text) if !text.trim().is_empty() => Answered(text.trim().to_string()),
            Ok(_) => {
                debug!("Generative answer was empty, falling through");
                Skip
            }
            Err(e) => {
                debug!("Generative answer unavailable: {}", e);
                Skip
            }
        }
    }

    fn summary_shortcut(
        &self,
        question: &str,
        topic: Option<&str>,
        transcript: &str,
    ) -> StageOutcome {
        let lower = question.to_lowercase();
        if !SUMMARY_INTENTS.iter().any(|intent| lower.contains(intent)) {
            return Skip;
        }

        let highlights = top_relevant_sentences(transcript, SUMMARY_QUERY, SUMMARY_SENTENCE_LIMIT);
        if highlights.is_empty() {
            return Answered(format!(
                "This lesson covers {} from the ground up; play it through for a guided introduction.",
                topic.unwrap_or("the topic")
            ));
        }

        Answered(format!(
            "Key points from this video:\n{}",
            bulleted(&highlights)
        ))
    }

    fn transcript_extraction(&self, question: &str, transcript: &str) -> StageOutcome {
        let hits = top_relevant_sentences(transcript, question, EXTRACTION_SENTENCE_LIMIT);
        if hits.is_empty() {
            return Skip;
        }
        Answered(format!(
            "From the current video:\n{}",
            bulleted(&hits)
        ))
    }

    async fn catalog_suggestions(&self, question: &str, topic: Option<&str>) -> StageOutcome {
        let Some(catalog) = &self.catalog else {
            return Skip;
        };

        let query = match topic {
            Some(t) => format!("{} {}", t, question),
            None => question.to_string(),
        };

        let videos = match catalog.search_videos(&query).await {
            Ok(videos) => videos,
            Err(e) => {
                debug!("Suggestion search unavailable: {}", e);
                return Skip;
            }
        };
        if videos.is_empty() {
            return Skip;
        }

        let suggestions: Vec<String> = videos
            .iter()
            .take(SUGGESTION_LIMIT)
            .map(|v| format!("{} - {}", v.title, v.channel_title))
            .collect();

        Answered(format!(
            "I couldn't find that in this lesson, but these videos might help:\n{}",
            bulleted(&suggestions)
        ))
    }

    fn apology(&self, topic: Option<&str>) -> String {
        format!(
            "I can't reach the AI right now. Based on the topic {}, try asking a more \
             specific question or a step-by-step task to get a practical answer.",
            topic
                .map(|t| format!("\"{}\"", t))
                .unwrap_or_else(|| "(unspecified)".to_string())
        )
    }
}

fn bulleted(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| format!("- {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 4).chars().count(), 4);
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn test_bulleted() {
        let lines = vec!["one".to_string(), "two".to_string()];
        assert_eq!(bulleted(&lines), "- one\n- two");
    }
}
