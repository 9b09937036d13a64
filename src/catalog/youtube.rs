use axum::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::catalog::dto::{VideoDetail, VideoSummary};
use crate::config::YoutubeConfig;

/// Fixed qualifier appended to every search so results stay in the
/// programming-tutorial niche.
const SEARCH_QUALIFIER: &str = "programming coding tutorial";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("video not found")]
    NotFound,

    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Boundary to the external video catalog. One best-effort pass-through per
/// call: no retries, no caching, no rate limiting.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<VideoSummary>, CatalogError>;
    async fn get_details(&self, video_id: &str) -> Result<VideoDetail, CatalogError>;
}

/// YouTube Data API v3 client.
pub struct YoutubeCatalog {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    max_results: u8,
}

impl YoutubeCatalog {
    pub fn new(config: &YoutubeConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        }
    }
}

#[async_trait]
impl CatalogClient for YoutubeCatalog {
    async fn search(&self, query: &str) -> Result<Vec<VideoSummary>, CatalogError> {
        let full_query = build_search_query(query);
        let max_results = self.max_results.to_string();
        debug!(query = %full_query, "searching video catalog");

        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("q", full_query.as_str()),
                ("type", "video"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::UpstreamStatus(response.status().as_u16()));
        }

        let body: SearchListResponse = response.json().await?;
        Ok(summarize(body.items))
    }

    async fn get_details(&self, video_id: &str) -> Result<VideoDetail, CatalogError> {
        debug!(video_id = %video_id, "fetching video details");

        let response = self
            .http
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "snippet,contentDetails"),
                ("id", video_id),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::UpstreamStatus(response.status().as_u16()));
        }

        let body: VideoListResponse = response.json().await?;
        let item = body.items.into_iter().next().ok_or(CatalogError::NotFound)?;
        Ok(detail_from_item(item))
    }
}

/// The empty query is legal: it collapses to the bare qualifier and yields a
/// general result set.
fn build_search_query(query: &str) -> String {
    format!("{query} {SEARCH_QUALIFIER}").trim().to_string()
}

fn summarize(items: Vec<SearchItem>) -> Vec<VideoSummary> {
    items
        .into_iter()
        .filter_map(|item| {
            // Results that are not playable videos carry no video id; skip them.
            let id = item.id.video_id?;
            Some(VideoSummary {
                id,
                title: item.snippet.title,
                channel: item.snippet.channel_title,
                thumbnail: item
                    .snippet
                    .thumbnails
                    .default
                    .map(|t| t.url)
                    .unwrap_or_default(),
                description: item.snippet.description,
            })
        })
        .collect()
}

fn detail_from_item(item: VideoItem) -> VideoDetail {
    VideoDetail {
        id: item.id,
        title: item.snippet.title,
        channel: item.snippet.channel_title,
        thumbnail: item
            .snippet
            .thumbnails
            .medium
            .map(|t| t.url)
            .unwrap_or_default(),
        description: item.snippet.description,
        duration: item.content_details.duration,
    }
}

// Upstream wire shapes, reduced to the fields the mapping reads.

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
    medium: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
struct ContentDetails {
    #[serde(default)]
    duration: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_keeps_the_tutorial_qualifier() {
        assert_eq!(
            build_search_query("rust axum"),
            "rust axum programming coding tutorial"
        );
    }

    #[test]
    fn empty_query_collapses_to_the_qualifier() {
        assert_eq!(build_search_query(""), "programming coding tutorial");
    }

    #[test]
    fn search_items_flatten_to_summaries() {
        let body: SearchListResponse = serde_json::from_str(
            r#"{
                "kind": "youtube#searchListResponse",
                "items": [
                    {
                        "id": { "kind": "youtube#video", "videoId": "abc123" },
                        "snippet": {
                            "title": "Rust in 100 Seconds",
                            "channelTitle": "Fireship",
                            "description": "Learn Rust fast",
                            "thumbnails": {
                                "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
                                "medium": { "url": "https://i.ytimg.com/vi/abc123/mqdefault.jpg" }
                            }
                        }
                    }
                ]
            }"#,
        )
        .expect("valid search payload");

        let videos = summarize(body.items);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "abc123");
        assert_eq!(videos[0].title, "Rust in 100 Seconds");
        assert_eq!(videos[0].channel, "Fireship");
        assert_eq!(
            videos[0].thumbnail,
            "https://i.ytimg.com/vi/abc123/default.jpg"
        );
        assert_eq!(videos[0].description, "Learn Rust fast");
    }

    #[test]
    fn results_without_a_video_id_are_skipped() {
        let body: SearchListResponse = serde_json::from_str(
            r#"{
                "items": [
                    { "id": { "kind": "youtube#channel", "channelId": "UC1" },
                      "snippet": { "title": "A channel", "channelTitle": "X", "description": "" } },
                    { "id": { "videoId": "keepme" },
                      "snippet": { "title": "T", "channelTitle": "C", "description": "D" } }
                ]
            }"#,
        )
        .expect("valid search payload");

        let videos = summarize(body.items);
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].id, "keepme");
    }

    #[test]
    fn missing_thumbnail_becomes_empty_string() {
        let body: SearchListResponse = serde_json::from_str(
            r#"{ "items": [ { "id": { "videoId": "v" }, "snippet": { "title": "T" } } ] }"#,
        )
        .expect("valid search payload");

        let videos = summarize(body.items);
        assert_eq!(videos[0].thumbnail, "");
        assert_eq!(videos[0].channel, "");
    }

    #[test]
    fn details_use_the_medium_thumbnail_and_raw_duration() {
        let body: VideoListResponse = serde_json::from_str(
            r#"{
                "items": [
                    {
                        "id": "abc123",
                        "snippet": {
                            "title": "Rust in 100 Seconds",
                            "channelTitle": "Fireship",
                            "description": "Learn Rust fast",
                            "thumbnails": {
                                "default": { "url": "https://i.ytimg.com/vi/abc123/default.jpg" },
                                "medium": { "url": "https://i.ytimg.com/vi/abc123/mqdefault.jpg" }
                            }
                        },
                        "contentDetails": { "duration": "PT2M18S", "definition": "hd" }
                    }
                ]
            }"#,
        )
        .expect("valid videos payload");

        let item = body.items.into_iter().next().expect("one item");
        let detail = detail_from_item(item);
        assert_eq!(detail.id, "abc123");
        assert_eq!(
            detail.thumbnail,
            "https://i.ytimg.com/vi/abc123/mqdefault.jpg"
        );
        assert_eq!(detail.duration, "PT2M18S");
    }
}
