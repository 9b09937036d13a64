use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{is_unique_violation, ApiError};
use crate::state::AppState;
use crate::videos::dto::{
    ProgressResponse, RemoveVideoRequest, RemoveVideoResponse, SaveVideoRequest,
    SaveVideoResponse, UpdateProgressRequest,
};
use crate::videos::repo::SavedVideo;

pub fn read_routes() -> Router<AppState> {
    Router::new().route("/saved/:user_id", get(list_saved))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(save_video))
        .route("/progress", put(update_progress))
        .route("/saved", delete(remove_video))
}

fn require_id(value: Option<i64>, message: &str) -> Result<i64, ApiError> {
    match value {
        Some(v) if v > 0 => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

fn require_str<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

#[instrument(skip(state, payload))]
pub async fn save_video(
    State(state): State<AppState>,
    Json(payload): Json<SaveVideoRequest>,
) -> Result<Json<SaveVideoResponse>, ApiError> {
    let message = "User ID and Video ID are required";
    let user_id = require_id(payload.user_id, message)?;
    let video_id = require_str(&payload.video_id, message)?;

    let id = match SavedVideo::save(
        &state.db,
        user_id,
        video_id,
        payload.title.as_deref(),
        payload.channel.as_deref(),
        payload.thumbnail.as_deref(),
    )
    .await
    {
        Ok(id) => id,
        Err(err) if is_unique_violation(&err) => {
            warn!(user_id, video_id = %video_id, "video already saved");
            return Err(ApiError::Conflict("Video already saved".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    info!(user_id, video_id = %video_id, "video saved");
    Ok(Json(SaveVideoResponse {
        id,
        message: "Video saved successfully".to_string(),
        video_id: video_id.to_string(),
    }))
}

#[instrument(skip(state))]
pub async fn list_saved(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<SavedVideo>>, ApiError> {
    let videos = SavedVideo::list_by_user(&state.db, user_id).await?;
    Ok(Json(videos))
}

#[instrument(skip(state, payload))]
pub async fn update_progress(
    State(state): State<AppState>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let message = "User ID and Video ID are required";
    let user_id = require_id(payload.user_id, message)?;
    let video_id = require_str(&payload.video_id, message)?;

    // The client sends quarter steps; anything else is clamped into range.
    let progress = payload.progress.clamp(0, 100);

    let affected = SavedVideo::update_progress(&state.db, user_id, video_id, progress).await?;
    if affected == 0 {
        debug!(user_id, video_id = %video_id, "progress update matched no rows");
    }

    info!(user_id, video_id = %video_id, progress, "progress updated");
    Ok(Json(ProgressResponse {
        message: "Progress updated".to_string(),
        progress,
    }))
}

#[instrument(skip(state, payload))]
pub async fn remove_video(
    State(state): State<AppState>,
    Json(payload): Json<RemoveVideoRequest>,
) -> Result<Json<RemoveVideoResponse>, ApiError> {
    let message = "User ID and Video ID are required";
    let user_id = require_id(payload.user_id, message)?;
    let video_id = require_str(&payload.video_id, message)?;

    let changes = SavedVideo::remove(&state.db, user_id, video_id).await?;
    info!(user_id, video_id = %video_id, changes, "video removed");
    Ok(Json(RemoveVideoResponse {
        message: "Video removed".to_string(),
        changes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::User;

    fn save_body(user_id: i64, video_id: &str) -> SaveVideoRequest {
        SaveVideoRequest {
            user_id: Some(user_id),
            video_id: Some(video_id.to_string()),
            title: Some("Title".to_string()),
            channel: Some("Channel".to_string()),
            thumbnail: Some("https://example.com/t.jpg".to_string()),
        }
    }

    async fn state_with_user() -> (AppState, i64) {
        let state = AppState::fake().await;
        let user = User::get_or_create(&state.db, "tester")
            .await
            .expect("create user");
        (state, user.id)
    }

    #[tokio::test]
    async fn save_then_save_again_conflicts() {
        let (state, user_id) = state_with_user().await;

        let saved = save_video(State(state.clone()), Json(save_body(user_id, "v1")))
            .await
            .expect("first save")
            .0;
        assert_eq!(saved.video_id, "v1");
        assert_eq!(saved.message, "Video saved successfully");
        assert!(saved.id > 0);

        let err = save_video(State(state), Json(save_body(user_id, "v1")))
            .await
            .expect_err("duplicate save");
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn save_requires_both_ids() {
        let (state, user_id) = state_with_user().await;

        let err = save_video(
            State(state.clone()),
            Json(SaveVideoRequest {
                user_id: None,
                video_id: Some("v1".into()),
                title: None,
                channel: None,
                thumbnail: None,
            }),
        )
        .await
        .expect_err("missing user id");
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = save_video(
            State(state),
            Json(SaveVideoRequest {
                user_id: Some(user_id),
                video_id: Some(String::new()),
                title: None,
                channel: None,
                thumbnail: None,
            }),
        )
        .await
        .expect_err("empty video id");
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn progress_is_clamped_into_range() {
        let (state, user_id) = state_with_user().await;
        save_video(State(state.clone()), Json(save_body(user_id, "v1")))
            .await
            .expect("save");

        let response = update_progress(
            State(state.clone()),
            Json(UpdateProgressRequest {
                user_id: Some(user_id),
                video_id: Some("v1".into()),
                progress: 250,
            }),
        )
        .await
        .expect("update")
        .0;
        assert_eq!(response.progress, 100);

        let rows = SavedVideo::list_by_user(&state.db, user_id)
            .await
            .expect("list");
        assert_eq!(rows[0].progress, 100);
    }

    #[tokio::test]
    async fn progress_update_for_missing_pair_is_not_an_error() {
        let (state, user_id) = state_with_user().await;

        let response = update_progress(
            State(state),
            Json(UpdateProgressRequest {
                user_id: Some(user_id),
                video_id: Some("never-saved".into()),
                progress: 50,
            }),
        )
        .await
        .expect("update succeeds with zero rows")
        .0;
        assert_eq!(response.message, "Progress updated");
    }

    #[tokio::test]
    async fn remove_reports_changes_and_stays_idempotent() {
        let (state, user_id) = state_with_user().await;
        save_video(State(state.clone()), Json(save_body(user_id, "v1")))
            .await
            .expect("save");

        let body = RemoveVideoRequest {
            user_id: Some(user_id),
            video_id: Some("v1".into()),
        };
        let first = remove_video(State(state.clone()), Json(body))
            .await
            .expect("first remove")
            .0;
        assert_eq!(first.changes, 1);

        let body = RemoveVideoRequest {
            user_id: Some(user_id),
            video_id: Some("v1".into()),
        };
        let second = remove_video(State(state), Json(body))
            .await
            .expect("second remove")
            .0;
        assert_eq!(second.changes, 0);
        assert_eq!(second.message, "Video removed");
    }

    #[tokio::test]
    async fn list_serializes_snake_case_row_fields() {
        let (state, user_id) = state_with_user().await;
        save_video(State(state.clone()), Json(save_body(user_id, "v1")))
            .await
            .expect("save");

        let rows = list_saved(State(state), Path(user_id)).await.expect("list").0;
        let json = serde_json::to_value(&rows).expect("serialize");
        let row = &json[0];
        assert_eq!(row["video_id"], "v1");
        assert_eq!(row["progress"], 0);
        assert!(row["saved_at"].is_string());
        assert_eq!(row["user_id"], user_id);
    }
}
