use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

use crate::error::is_unique_violation;

/// User record in the database. Users created through the username-only
/// entry point have neither email nor credential.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    /// Find a user by username.
    pub async fn find_by_username(db: &SqlitePool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    /// Create a new user with a hashed credential. Uniqueness of username
    /// and email is the column constraints' job; callers translate a
    /// violation into a conflict.
    pub async fn create(
        db: &SqlitePool,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES (?, ?, ?)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Return the user with this username, creating a bare row if none
    /// exists. Losing an insert race to a concurrent request is absorbed by
    /// re-reading, which keeps the helper idempotent.
    pub async fn get_or_create(db: &SqlitePool, username: &str) -> sqlx::Result<User> {
        if let Some(user) = Self::find_by_username(db, username).await? {
            return Ok(user);
        }

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username)
            VALUES (?)
            RETURNING id, username, email, password_hash, created_at
            "#,
        )
        .bind(username)
        .fetch_one(db)
        .await;

        match inserted {
            Ok(user) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                Self::find_by_username(db, username).await?.ok_or(err)
            }
            Err(err) => Err(err),
        }
    }
}
