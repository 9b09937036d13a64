use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::catalog::dto::{VideoDetail, VideoSummary};
use crate::catalog::youtube::CatalogError;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_videos))
        .route("/video/:id", get(video_details))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[instrument(skip(state))]
pub async fn search_videos(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<VideoSummary>>, ApiError> {
    let query = params.q.unwrap_or_default();
    let videos = state
        .catalog
        .search(&query)
        .await
        .map_err(|err| catalog_error(err, "Failed to fetch videos"))?;
    Ok(Json(videos))
}

#[instrument(skip(state))]
pub async fn video_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<VideoDetail>, ApiError> {
    let video = state
        .catalog
        .get_details(&id)
        .await
        .map_err(|err| catalog_error(err, "Failed to fetch video details"))?;
    Ok(Json(video))
}

fn catalog_error(err: CatalogError, message: &str) -> ApiError {
    match err {
        CatalogError::NotFound => ApiError::NotFound("Video not found".to_string()),
        CatalogError::UpstreamStatus(status) => {
            warn!(status, "catalog request rejected upstream");
            ApiError::Upstream {
                status: Some(status),
                message: message.to_string(),
            }
        }
        CatalogError::Transport(e) => {
            warn!(error = %e, "catalog request failed");
            ApiError::Upstream {
                status: None,
                message: message.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn not_found_maps_to_404_with_the_client_message() {
        let err = catalog_error(CatalogError::NotFound, "Failed to fetch video details");
        match err {
            ApiError::NotFound(msg) => assert_eq!(msg, "Video not found"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn upstream_status_is_proxied() {
        let err = catalog_error(CatalogError::UpstreamStatus(403), "Failed to fetch videos");
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }
}
