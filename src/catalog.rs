//! Video catalog gateway: search, detail enrichment, and the two-pass
//! educational filter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::classifier::ContentClassifier;
use crate::config::CatalogConfig;
use crate::duration::parse_duration;
use crate::error::{LearnflowError, Result};

const PLAYLIST_SEARCH_LIMIT: u32 = 5;
const VIDEO_SEARCH_LIMIT: u32 = 15;
const FALLBACK_SEARCH_LIMIT: u32 = 20;
const RELAXED_RESULT_CAP: usize = 10;
const PLAYLIST_ITEMS_LIMIT: u32 = 50;

/// A video candidate assembled from a search hit and, when available, the
/// batch details lookup. Never constructed with an empty id.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogVideo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub duration_seconds: Option<u64>,
    pub published_at: Option<String>,
}

/// A playlist candidate from search. No duration at this granularity.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPlaylist {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
}

/// Catalog capability consumed by the plan assembler and the answerer.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search_playlists(&self, topic: &str) -> Result<Vec<CatalogPlaylist>>;
    async fn search_videos(&self, topic: &str) -> Result<Vec<CatalogVideo>>;
    async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<CatalogVideo>>;
}

/// Client for the YouTube Data API v3.
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    classifier: ContentClassifier,
}

impl CatalogClient {
    /// Missing credentials are a configuration error, raised here before
    /// any network call is attempted.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(LearnflowError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            classifier: ContentClassifier::new(),
        })
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LearnflowError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    async fn search_raw(&self, kind: &str, query: &str, max_results: u32) -> Result<SearchResponse> {
        debug!("Catalog search ({}) for: {}", kind, query);
        self.get_json(
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", kind),
                ("maxResults", &max_results.to_string()),
            ],
        )
        .await
    }

    /// Batch details lookup (duration + publish date), keyed by id.
    async fn fetch_details(&self, ids: &[String]) -> Result<HashMap<String, VideoDetails>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let joined = ids.join(",");
        let response: DetailsResponse = self
            .get_json(
                "videos",
                &[("part", "contentDetails,snippet"), ("id", &joined)],
            )
            .await?;

        let mut by_id = HashMap::new();
        for item in response.items {
            let duration_seconds = item
                .content_details
                .and_then(|d| d.duration)
                .and_then(|code| parse_duration(&code));
            let published_at = item.snippet.and_then(|s| s.published_at);
            by_id.insert(
                item.id,
                VideoDetails {
                    duration_seconds,
                    published_at,
                },
            );
        }
        Ok(by_id)
    }

    async fn enrich(&self, mut videos: Vec<CatalogVideo>) -> Result<Vec<CatalogVideo>> {
        let ids: Vec<String> = videos.iter().map(|v| v.id.clone()).collect();
        let details = self.fetch_details(&ids).await?;
        for video in &mut videos {
            if let Some(detail) = details.get(&video.id) {
                video.duration_seconds = detail.duration_seconds;
                if detail.published_at.is_some() {
                    video.published_at = detail.published_at.clone();
                }
            }
        }
        Ok(videos)
    }

    fn strict_pass(&self, videos: Vec<CatalogVideo>) -> Vec<CatalogVideo> {
        videos
            .into_iter()
            .filter(|v| self.classifier.is_educational(&v.title, &v.description))
            .collect()
    }

    /// Relaxed second pass: keep anything without a disqualifying signal,
    /// dedupe by id, cap the result.
    fn relaxed_pass(&self, videos: Vec<CatalogVideo>) -> Vec<CatalogVideo> {
        let mut seen = HashSet::new();
        videos
            .into_iter()
            .filter(|v| !self.classifier.has_disqualifier(&v.title, &v.description))
            .filter(|v| seen.insert(v.id.clone()))
            .take(RELAXED_RESULT_CAP)
            .collect()
    }
}

#[async_trait]
impl Catalog for CatalogClient {
    async fn search_playlists(&self, topic: &str) -> Result<Vec<CatalogPlaylist>> {
        let query = format!("{} tutorial learn course guide playlist", topic);
        let response = self
            .search_raw("playlist", &query, PLAYLIST_SEARCH_LIMIT)
            .await?;
        Ok(map_playlists(response))
    }

    async fn search_videos(&self, topic: &str) -> Result<Vec<CatalogVideo>> {
        let query = format!(
            "{} tutorial learn course guide how to basics fundamentals",
            topic
        );
        let response = self.search_raw("video", &query, VIDEO_SEARCH_LIMIT).await?;
        let videos = self.enrich(map_videos(response)).await?;

        let strict = self.strict_pass(videos);
        if !strict.is_empty() {
            return Ok(strict);
        }

        // Recall pass: raw topic, wider net, negative signals only. Failures
        // here degrade to the (empty) strict result instead of erroring.
        info!("No educational videos for '{}', trying relaxed search", topic);
        let fallback = match self.search_raw("video", topic, FALLBACK_SEARCH_LIMIT).await {
            Ok(response) => map_videos(response),
            Err(e) => {
                warn!("Relaxed search failed: {}", e);
                return Ok(strict);
            }
        };
        let enriched = match self.enrich(fallback).await {
            Ok(videos) => videos,
            Err(e) => {
                warn!("Relaxed detail enrichment failed: {}", e);
                return Ok(strict);
            }
        };

        Ok(self.relaxed_pass(enriched))
    }

    async fn playlist_items(&self, playlist_id: &str) -> Result<Vec<CatalogVideo>> {
        let response: PlaylistItemsResponse = self
            .get_json(
                "playlistItems",
                &[
                    ("part", "snippet"),
                    ("playlistId", playlist_id),
                    ("maxResults", &PLAYLIST_ITEMS_LIMIT.to_string()),
                ],
            )
            .await?;
        let items = map_playlist_items(response);

        // Items of a curated playlist are trusted by construction; only the
        // duration enrichment is best-effort.
        match self.enrich(items.clone()).await {
            Ok(enriched) => Ok(enriched),
            Err(e) => {
                warn!("Playlist item enrichment failed: {}", e);
                Ok(items)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct VideoDetails {
    duration_seconds: Option<u64>,
    published_at: Option<String>,
}

// Wire format of the catalog API.

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: Option<SearchItemId>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
    #[serde(rename = "playlistId")]
    playlist_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    published_at: Option<String>,
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    items: Vec<DetailsItem>,
}

#[derive(Debug, Deserialize)]
struct DetailsItem {
    id: String,
    #[serde(rename = "contentDetails")]
    content_details: Option<ContentDetails>,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Option<Snippet>,
}

fn map_playlists(response: SearchResponse) -> Vec<CatalogPlaylist> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.and_then(|i| i.playlist_id).unwrap_or_default();
            if id.is_empty() {
                return None;
            }
            let snippet = item.snippet.unwrap_or_default();
            Some(CatalogPlaylist {
                id,
                title: snippet.title,
                description: snippet.description,
                channel_title: snippet.channel_title,
            })
        })
        .collect()
}

fn map_videos(response: SearchResponse) -> Vec<CatalogVideo> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let id = item.id.and_then(|i| i.video_id).unwrap_or_default();
            if id.is_empty() {
                return None;
            }
            let snippet = item.snippet.unwrap_or_default();
            Some(CatalogVideo {
                id,
                title: snippet.title,
                description: snippet.description,
                channel_title: snippet.channel_title,
                duration_seconds: None,
                published_at: None,
            })
        })
        .collect()
}

fn map_playlist_items(response: PlaylistItemsResponse) -> Vec<CatalogVideo> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let snippet = item.snippet?;
            let id = snippet
                .resource_id
                .as_ref()
                .and_then(|r| r.video_id.clone())
                .unwrap_or_default();
            if id.is_empty() {
                return None;
            }
            Some(CatalogVideo {
                id,
                title: snippet.title,
                description: snippet.description,
                channel_title: snippet.channel_title,
                duration_seconds: None,
                published_at: snippet.published_at,
            })
        })
        .collect()
}
