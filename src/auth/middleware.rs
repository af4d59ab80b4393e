//! Authentication extractors.
//!
//! Add `AuthContext` as a handler parameter to require a valid bearer token,
//! `AdminContext` to additionally require the admin role.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::{Authorization, authorization::Bearer};

use super::db as auth_db;
use crate::db;
use crate::domain::{Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated request context
#[derive(Clone)]
pub struct AuthContext {
    pub user: User,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized("missing bearer token".into()))?;

        let claims = state
            .jwt
            .verify(bearer.token())
            .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))?;

        let conn = db::try_lock(&state.db)?;
        let user = auth_db::get_user_by_id(&conn, claims.sub)?
            .ok_or_else(|| ApiError::Unauthorized("user not found".into()))?;

        if !user.is_active {
            return Err(ApiError::Unauthorized("account disabled".into()));
        }

        Ok(AuthContext { user })
    }
}

/// Authenticated admin context. Authorization reads the stored role only.
#[derive(Clone)]
pub struct AdminContext {
    pub user: User,
}

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        if auth.user.role != Role::Admin {
            return Err(ApiError::Forbidden("admin access required".into()));
        }
        Ok(AdminContext { user: auth.user })
    }
}
