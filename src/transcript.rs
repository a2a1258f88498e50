//! Spoken-text transcript retrieval with language fallback.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::config::TranscriptConfig;

/// External transcript capability. One call fetches the transcript of one
/// video, optionally constrained to a language.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str, language: Option<&str>) -> Result<String>;
}

/// Transcript client for the catalog's timed-text endpoint. The payload is
/// a flat XML document of `<text>` segments in temporal order.
pub struct TimedTextClient {
    client: reqwest::Client,
    base_url: String,
    segment_pattern: Regex,
}

impl TimedTextClient {
    pub fn new(config: &TranscriptConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.endpoint.clone(),
            segment_pattern: Regex::new(r"(?s)<text[^>]*>(.*?)</text>")?,
        })
    }

    fn flatten(&self, xml: &str) -> String {
        let segments: Vec<String> = self
            .segment_pattern
            .captures_iter(xml)
            .map(|cap| decode_entities(cap[1].trim()))
            .filter(|s| !s.is_empty())
            .collect();
        segments.join(" ")
    }
}

#[async_trait]
impl TranscriptSource for TimedTextClient {
    async fn fetch(&self, video_id: &str, language: Option<&str>) -> Result<String> {
        let mut params = vec![("v", video_id)];
        if let Some(lang) = language {
            params.push(("lang", lang));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "timed-text request for {} failed with status {}",
                video_id,
                response.status()
            ));
        }

        let body = response.text().await?;
        Ok(self.flatten(&body))
    }
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

/// Walks an ordered list of language hints and returns the first non-empty
/// transcript, then makes one final unhinted attempt. A video without any
/// retrievable transcript yields an empty string; that is an expected state
/// for every caller, not an error.
pub struct TranscriptRetriever {
    source: Arc<dyn TranscriptSource>,
    languages: Vec<String>,
}

impl TranscriptRetriever {
    pub fn new(source: Arc<dyn TranscriptSource>, languages: Vec<String>) -> Self {
        Self { source, languages }
    }

    pub async fn fetch_transcript(&self, video_id: &str) -> String {
        for lang in &self.languages {
            match self.source.fetch(video_id, Some(lang)).await {
                Ok(text) if !text.trim().is_empty() => {
                    debug!("Transcript for {} found with hint '{}'", video_id, lang);
                    return text;
                }
                Ok(_) => debug!("Empty transcript for {} with hint '{}'", video_id, lang),
                Err(e) => debug!("Transcript fetch for {} ({}) failed: {}", video_id, lang, e),
            }
        }

        match self.source.fetch(video_id, None).await {
            Ok(text) => text,
            Err(e) => {
                debug!("Unhinted transcript fetch for {} failed: {}", video_id, e);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedSource {
        by_language: HashMap<Option<String>, Result<String, String>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(entries: Vec<(Option<&str>, Result<&str, &str>)>) -> Self {
            let by_language = entries
                .into_iter()
                .map(|(lang, outcome)| {
                    (
                        lang.map(String::from),
                        outcome.map(String::from).map_err(String::from),
                    )
                })
                .collect();
            Self {
                by_language,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TranscriptSource for ScriptedSource {
        async fn fetch(&self, _video_id: &str, language: Option<&str>) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.by_language.get(&language.map(String::from)) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(msg)) => Err(anyhow!(msg.clone())),
                None => Err(anyhow!("no transcript")),
            }
        }
    }

    fn retriever(source: ScriptedSource) -> TranscriptRetriever {
        TranscriptRetriever::new(
            Arc::new(source),
            vec!["en".to_string(), "en-US".to_string()],
        )
    }

    #[tokio::test]
    async fn test_first_nonempty_hint_wins() {
        let source = ScriptedSource::new(vec![
            (Some("en"), Ok("hello world")),
            (Some("en-US"), Ok("should not be reached")),
        ]);
        let r = retriever(source);
        assert_eq!(r.fetch_transcript("abc").await, "hello world");
    }

    #[tokio::test]
    async fn test_empty_hint_falls_through() {
        let source = ScriptedSource::new(vec![
            (Some("en"), Ok("")),
            (Some("en-US"), Err("blocked")),
            (None, Ok("unhinted text")),
        ]);
        let r = retriever(source);
        assert_eq!(r.fetch_transcript("abc").await, "unhinted text");
    }

    #[tokio::test]
    async fn test_total_failure_yields_empty() {
        let source = ScriptedSource::new(vec![
            (Some("en"), Err("nope")),
            (Some("en-US"), Err("nope")),
            (None, Err("nope")),
        ]);
        let r = retriever(source);
        assert_eq!(r.fetch_transcript("abc").await, "");
    }

    #[test]
    fn test_entity_decoding() {
        assert_eq!(decode_entities("Tom &amp; Jerry&#39;s"), "Tom & Jerry's");
    }
}
