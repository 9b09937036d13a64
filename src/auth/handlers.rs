use axum::{extract::State, routing::post, Json, Router};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::auth::dto::{LoginRequest, PublicUser, RegisterRequest, UserSummary, UsernameRequest};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::User;
use crate::error::{is_unique_violation, ApiError};
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user", post(get_or_create_user))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Blank form fields arrive as empty strings; both count as missing.
fn require<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::BadRequest(message.to_string())),
    }
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let message = "Username, email, and password are required";
    let username = require(&payload.username, message)?;
    let email = require(&payload.email, message)?;
    let password = require(&payload.password, message)?;

    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email".to_string()));
    }

    let hash = hash_password(password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal("Error hashing password".to_string())
    })?;

    let user = match User::create(&state.db, username, email, &hash).await {
        Ok(user) => user,
        Err(err) if is_unique_violation(&err) => {
            warn!(username = %username, "username or email already registered");
            return Err(ApiError::Conflict(
                "Username or email already exists".to_string(),
            ));
        }
        Err(err) => return Err(err.into()),
    };

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let message = "Username and password are required";
    let username = require(&payload.username, message)?;
    let password = require(&payload.password, message)?;

    let user = User::find_by_username(&state.db, username)
        .await?
        .ok_or_else(|| {
            warn!(username = %username, "login unknown username");
            ApiError::NotFound("User not found".to_string())
        })?;

    // Username-only users carry no credential and cannot log in.
    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = user.id, "login attempt against user without credential");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    };

    let ok = verify_password(password, hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Internal("Error checking password".to_string())
    })?;

    if !ok {
        warn!(user_id = user.id, username = %user.username, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid password".to_string()));
    }

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(PublicUser {
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

#[instrument(skip(state, payload))]
pub async fn get_or_create_user(
    State(state): State<AppState>,
    Json(payload): Json<UsernameRequest>,
) -> Result<Json<UserSummary>, ApiError> {
    let username = require(&payload.username, "Username is required")?;

    let user = User::get_or_create(&state.db, username).await?;
    info!(user_id = user.id, username = %user.username, "user fetched or created");
    Ok(Json(UserSummary {
        id: user.id,
        username: user.username,
    }))
}
