use serde::{Deserialize, Serialize};

/// Request body for saving a video. Only the ids are required; the display
/// fields are whatever the client captured from a search result.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveVideoRequest {
    pub user_id: Option<i64>,
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    pub user_id: Option<i64>,
    pub video_id: Option<String>,
    #[serde(default)]
    pub progress: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveVideoRequest {
    pub user_id: Option<i64>,
    pub video_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveVideoResponse {
    pub id: i64,
    pub message: String,
    pub video_id: String,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub message: String,
    pub progress: i64,
}

#[derive(Debug, Serialize)]
pub struct RemoveVideoResponse {
    pub message: String,
    pub changes: u64,
}
