use serde::Serialize;

/// Flat search-result shape the client renders; normalized from the
/// upstream catalog's nested response.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub description: String,
}

/// Single-video shape with the upstream's ISO-8601 duration passed through.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetail {
    pub id: String,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub description: String,
    pub duration: String,
}
