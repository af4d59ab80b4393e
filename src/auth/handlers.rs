//! Signup, login, and token verification handlers.

use axum::Json;
use axum::extract::State;
use rusqlite::ErrorCode;
use serde::{Deserialize, Serialize};

use super::db as auth_db;
use super::middleware::AuthContext;
use super::password;
use crate::db::{self, stats};
use crate::domain::{Role, UserProfile, UserStats};
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserProfile,
    pub stats: UserStats,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub user: UserProfile,
    pub stats: UserStats,
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<TokenResponse>> {
    if !is_valid_username(&req.username) {
        return Err(ApiError::Validation(
            "username must be 3-32 alphanumeric characters or underscores".into(),
        ));
    }
    if !is_valid_email(&req.email) {
        return Err(ApiError::Validation("invalid email address".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".into()));
    }

    // Hash outside the database lock; argon2 is deliberately slow
    let password_hash = password::hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;

    let conn = db::try_lock(&state.db)?;

    if auth_db::username_exists(&conn, &req.username)? || auth_db::email_exists(&conn, &req.email)?
    {
        return Err(ApiError::Conflict("user already exists".into()));
    }

    let role = Role::for_new_user(&req.username);
    let user_id =
        auth_db::create_user(&conn, &req.username, &req.email, &password_hash, role).map_err(
            |e| match e {
                // Unique constraint can still fire between the check and the insert
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    ApiError::Conflict("user already exists".into())
                }
                other => ApiError::from(other),
            },
        )?;

    let user = auth_db::get_user_by_id(&conn, user_id)?
        .ok_or_else(|| ApiError::Internal("user missing after insert".into()))?;
    let user_stats = stats::get_user_stats(&conn, user_id)?;
    drop(conn);

    tracing::info!("new user registered: {} (id {})", user.username, user_id);

    let access_token = state
        .jwt
        .sign(user_id)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user: UserProfile::new(&user, &user_stats),
        stats: user_stats,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    let conn = db::try_lock(&state.db)?;

    let user = auth_db::get_user_by_email(&conn, &req.email)?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;

    if !password::verify_password(&req.password, &user.password_hash) {
        tracing::debug!("failed login attempt for {}", req.email);
        return Err(ApiError::Unauthorized("invalid credentials".into()));
    }

    // Log but don't fail on a missed timestamp update
    if let Err(e) = auth_db::update_last_login(&conn, user.id) {
        tracing::warn!("Failed to update last login for user {}: {}", user.id, e);
    }
    let user = auth_db::get_user_by_id(&conn, user.id)?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".into()))?;

    let user_stats = stats::get_user_stats(&conn, user.id)?;
    drop(conn);

    let access_token = state
        .jwt
        .sign(user.id)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
        user: UserProfile::new(&user, &user_stats),
        stats: user_stats,
    }))
}

/// GET /api/auth/verify
pub async fn verify(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<VerifyResponse>> {
    let conn = db::try_lock(&state.db)?;
    let user_stats = stats::get_user_stats(&conn, auth.user.id)?;
    drop(conn);

    Ok(Json(VerifyResponse {
        user: UserProfile::new(&auth.user, &user_stats),
        stats: user_stats,
    }))
}

/// Validate username: 3-32 chars, alphanumeric or underscore
fn is_valid_username(username: &str) -> bool {
    username.len() >= 3
        && username.len() <= 32
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Minimal shape check; real validation happens when mail is sent
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.len() >= 3
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("abc"));
        assert!(is_valid_username("user123"));
        assert!(is_valid_username("my_user"));
        assert!(is_valid_username("a".repeat(32).as_str()));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab")); // too short
        assert!(!is_valid_username(&"a".repeat(33))); // too long
        assert!(!is_valid_username("user name")); // space
        assert!(!is_valid_username("user-name")); // hyphen
        assert!(!is_valid_username("")); // empty
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@.com"));
        assert!(!is_valid_email("ada@com."));
    }
}
