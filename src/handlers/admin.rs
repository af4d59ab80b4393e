//! Admin console: feedback moderation, user management, level creation,
//! badge catalog, and the partially-mocked billing dashboard.

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::auth::AdminContext;
use crate::auth::db as auth_db;
use crate::db::feedback::FeedbackFilter;
use crate::db::stats::FeedbackStatistics;
use crate::db::{self, feedback, levels, progress, stats};
use crate::domain::level::LevelSpec;
use crate::domain::user::{BADGES, BadgeSpec};
use crate::domain::{Feedback, FeedbackStatus, Role, Subscription};
use crate::error::{ApiError, Result};
use crate::state::AppState;

// ============================================================
// Feedback moderation
// ============================================================

#[derive(Deserialize)]
pub struct AdminFeedbackQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub level_number: Option<i64>,
    pub user_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_feedback_limit")]
    pub limit: i64,
}

fn default_feedback_limit() -> i64 {
    50
}

#[derive(Serialize)]
pub struct AdminFeedbackResponse {
    pub feedback: Vec<Feedback>,
    /// Count matching the applied filters
    pub total: i64,
    /// Always global, regardless of filters
    pub statistics: StatusCounts,
    pub pagination: Pagination,
}

#[derive(Serialize)]
pub struct StatusCounts {
    pub pending: i64,
    pub reviewed: i64,
    pub resolved: i64,
    pub total_all: i64,
}

#[derive(Serialize)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
    pub has_more: bool,
}

/// GET /api/admin/feedback
pub async fn admin_list_feedback(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<AdminFeedbackQuery>,
) -> Result<Json<AdminFeedbackResponse>> {
    let filter = FeedbackFilter {
        status: query.status,
        category: query.category,
        level_number: query.level_number,
        user_id: query.user_id,
    };
    let skip = query.skip.max(0);
    let limit = query.limit.clamp(0, 200);

    let conn = db::try_lock(&state.db)?;
    let (items, total) = feedback::list_feedback(&conn, &filter, skip, limit)?;
    let (pending, reviewed, resolved) = feedback::status_counts(&conn)?;
    drop(conn);

    Ok(Json(AdminFeedbackResponse {
        feedback: items,
        total,
        statistics: StatusCounts {
            pending,
            reviewed,
            resolved,
            total_all: pending + reviewed + resolved,
        },
        pagination: Pagination {
            skip,
            limit,
            has_more: total > skip + limit,
        },
    }))
}

#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// PATCH /api/admin/feedback/{id}/status
pub async fn admin_update_feedback_status(
    State(state): State<AppState>,
    Path(feedback_id): Path<i64>,
    admin: AdminContext,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<Value>> {
    let status = FeedbackStatus::from_str(&req.status).ok_or_else(|| {
        ApiError::BadRequest(
            "invalid status; must be one of: pending, reviewed, resolved".into(),
        )
    })?;

    let conn = db::try_lock(&state.db)?;
    let matched = feedback::update_status(&conn, feedback_id, status, admin.user.id)?;
    drop(conn);

    if !matched {
        return Err(ApiError::NotFound("feedback not found".into()));
    }

    Ok(Json(json!({
        "success": true,
        "message": format!("Feedback status updated to {}", status.as_str()),
    })))
}

/// GET /api/admin/feedback/statistics
pub async fn admin_feedback_statistics(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<FeedbackStatistics>> {
    let conn = db::try_lock(&state.db)?;
    let statistics = stats::feedback_statistics(&conn)?;
    Ok(Json(statistics))
}

// ============================================================
// User management
// ============================================================

#[derive(Deserialize)]
pub struct AdminUserQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_user_limit")]
    pub limit: i64,
}

fn default_user_limit() -> i64 {
    50
}

/// User row plus a stats summary, as the admin console displays it
#[derive(Serialize)]
pub struct AdminUserView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub subscription: Subscription,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub current_level: i64,
    pub total_xp: i64,
    pub completed_levels: i64,
}

/// GET /api/admin/users
pub async fn admin_list_users(
    State(state): State<AppState>,
    _admin: AdminContext,
    Query(query): Query<AdminUserQuery>,
) -> Result<Json<Value>> {
    let conn = db::try_lock(&state.db)?;
    let users = auth_db::list_users(&conn, query.skip.max(0), query.limit.clamp(0, 200))?;
    let total = auth_db::count_users(&conn)?;

    let mut views = Vec::with_capacity(users.len());
    for user in users {
        let user_stats = stats::get_user_stats(&conn, user.id)?;
        views.push(AdminUserView {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            subscription: user.subscription,
            is_active: user.is_active,
            created_at: user.created_at,
            last_login_at: user.last_login_at,
            current_level: user_stats.current_level,
            total_xp: user_stats.total_xp,
            completed_levels: user_stats.completed_levels,
        });
    }
    drop(conn);

    Ok(Json(json!({ "users": views, "total": total })))
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub subscription: Option<String>,
    pub is_active: Option<bool>,
}

/// PATCH /api/admin/users/{id}
pub async fn admin_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    _admin: AdminContext,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Value>> {
    let subscription = match req.subscription.as_deref() {
        Some(s) => Some(Subscription::from_str(s).ok_or_else(|| {
            ApiError::Validation(
                "invalid subscription; must be one of: free, pro, enterprise".into(),
            )
        })?),
        None => None,
    };

    let conn = db::try_lock(&state.db)?;
    let matched = auth_db::update_user(&conn, user_id, subscription, req.is_active)?;
    drop(conn);

    if !matched {
        return Err(ApiError::NotFound("user not found".into()));
    }

    Ok(Json(json!({ "success": true, "message": "User updated" })))
}

/// DELETE /api/admin/users/{id}/progress
///
/// The one operation that removes progress rows: a full reset for the user.
pub async fn admin_reset_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    admin: AdminContext,
) -> Result<Json<Value>> {
    let conn = db::try_lock(&state.db)?;
    if auth_db::get_user_by_id(&conn, user_id)?.is_none() {
        return Err(ApiError::NotFound("user not found".into()));
    }
    let deleted = progress::delete_user_progress(&conn, user_id)?;
    drop(conn);

    tracing::info!(
        "admin {} reset progress for user {} ({} records)",
        admin.user.username,
        user_id,
        deleted
    );

    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

// ============================================================
// Content management
// ============================================================

/// POST /api/admin/levels
pub async fn admin_create_level(
    State(state): State<AppState>,
    _admin: AdminContext,
    Json(spec): Json<LevelSpec>,
) -> Result<Json<Value>> {
    if spec.level_number <= 0 {
        return Err(ApiError::Validation("level_number must be positive".into()));
    }
    if spec.xp_reward <= 0 {
        return Err(ApiError::Validation("xp_reward must be positive".into()));
    }

    let conn = db::try_lock(&state.db)?;
    if levels::level_number_exists(&conn, spec.level_number)? {
        return Err(ApiError::Conflict(format!(
            "level {} already exists",
            spec.level_number
        )));
    }
    let id = levels::create_level(&conn, &spec)?;
    drop(conn);

    tracing::info!("created level {} (row {})", spec.level_number, id);

    Ok(Json(json!({
        "success": true,
        "message": "Level created",
        "level_number": spec.level_number,
    })))
}

/// GET /api/admin/badges
pub async fn admin_badges(_admin: AdminContext) -> Json<&'static [BadgeSpec]> {
    Json(BADGES.as_slice())
}

// ============================================================
// Mock billing / analytics
// ============================================================

/// GET /api/admin/analytics/dashboard
///
/// Billing figures are fixed mock values; the totals are live counts.
pub async fn admin_analytics_dashboard(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<Value>> {
    let conn = db::try_lock(&state.db)?;
    let (users, completions, feedback_count, level_count) = stats::platform_totals(&conn)?;
    drop(conn);

    Ok(Json(json!({
        "revenue": {
            "mrr": 4500,
            "arr": 54000,
            "churn_rate": 5.2,
            "trial_conversion": 68.5,
        },
        "totals": {
            "users": users,
            "completions": completions,
            "feedback": feedback_count,
            "levels": level_count,
        },
    })))
}
