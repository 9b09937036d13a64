use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

/// One saved-videos row, serialized in full for the client's list view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedVideo {
    pub id: i64,
    pub user_id: i64,
    pub video_id: String,
    pub title: Option<String>,
    pub channel: Option<String>,
    pub thumbnail: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub saved_at: OffsetDateTime,
    pub progress: i64,
}

impl SavedVideo {
    /// Insert a bookmark with progress 0. The UNIQUE(user_id, video_id)
    /// index is the duplicate-save guard, including under concurrent
    /// requests; callers translate a violation into a conflict.
    pub async fn save(
        db: &SqlitePool,
        user_id: i64,
        video_id: &str,
        title: Option<&str>,
        channel: Option<&str>,
        thumbnail: Option<&str>,
    ) -> sqlx::Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO saved_videos (user_id, video_id, title, channel, thumbnail)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .bind(title)
        .bind(channel)
        .bind(thumbnail)
        .execute(db)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Most recently saved first. The id tiebreak keeps the order
    /// deterministic for saves landing in the same timestamp granule.
    pub async fn list_by_user(db: &SqlitePool, user_id: i64) -> sqlx::Result<Vec<SavedVideo>> {
        sqlx::query_as::<_, SavedVideo>(
            r#"
            SELECT id, user_id, video_id, title, channel, thumbnail, saved_at, progress
            FROM saved_videos
            WHERE user_id = ?
            ORDER BY saved_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Unconditional overwrite; a missing pair reports zero affected rows
    /// rather than an error.
    pub async fn update_progress(
        db: &SqlitePool,
        user_id: i64,
        video_id: &str,
        progress: i64,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE saved_videos
            SET progress = ?
            WHERE user_id = ? AND video_id = ?
            "#,
        )
        .bind(progress)
        .bind(user_id)
        .bind(video_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Idempotent delete; reports the number of rows removed.
    pub async fn remove(db: &SqlitePool, user_id: i64, video_id: &str) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM saved_videos
            WHERE user_id = ? AND video_id = ?
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
