//! Level catalog and submission grading handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::db::{self, levels, progress, stats};
use crate::domain::{Level, UserStats, grade_output};
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LevelListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_level_limit")]
    pub limit: i64,
}

fn default_level_limit() -> i64 {
    20
}

/// GET /api/levels
pub async fn list_levels(
    State(state): State<AppState>,
    Query(query): Query<LevelListQuery>,
) -> Result<Json<Vec<Level>>> {
    let conn = db::try_lock(&state.db)?;
    let levels = levels::get_active_levels(&conn, query.skip.max(0), query.limit.clamp(0, 100))?;
    Ok(Json(levels))
}

/// GET /api/levels/{number}
pub async fn get_level(
    State(state): State<AppState>,
    Path(level_number): Path<i64>,
) -> Result<Json<Level>> {
    let conn = db::try_lock(&state.db)?;
    let level = levels::get_level(&conn, level_number)?
        .ok_or_else(|| ApiError::NotFound("level not found".into()))?;
    Ok(Json(level))
}

#[derive(Deserialize)]
pub struct SubmissionRequest {
    /// The student's program. Kept for the record; grading never executes
    /// or inspects it.
    #[serde(default)]
    pub code: String,
    pub output: String,
}

#[derive(Serialize)]
pub struct SubmissionResponse {
    pub success: bool,
    pub message: &'static str,
    pub xp_earned: i64,
    pub stars: i64,
    pub attempts: i64,
    pub stats: UserStats,
}

/// POST /api/levels/{number}/submit
pub async fn submit_level(
    State(state): State<AppState>,
    Path(level_number): Path<i64>,
    auth: AuthContext,
    Json(req): Json<SubmissionRequest>,
) -> Result<Json<SubmissionResponse>> {
    let conn = db::try_lock(&state.db)?;

    let level = levels::get_level(&conn, level_number)?
        .ok_or_else(|| ApiError::NotFound("level not found".into()))?;

    let correct = grade_output(&req.output, &level.expected_output);
    let record =
        progress::record_submission(&conn, auth.user.id, level_number, correct, level.xp_reward)?;
    let user_stats = stats::get_user_stats(&conn, auth.user.id)?;
    drop(conn);

    if correct {
        tracing::info!(
            "user {} completed level {} (attempt {})",
            auth.user.username,
            level_number,
            record.attempts
        );
    }

    Ok(Json(SubmissionResponse {
        success: correct,
        message: if correct {
            "Congratulations! Level completed!"
        } else {
            "Keep trying! Check your output."
        },
        xp_earned: record.xp_awarded,
        stars: record.stars,
        attempts: record.attempts,
        stats: user_stats,
    }))
}
