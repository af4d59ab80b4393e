//! Level feedback submission handler.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::db::{self, feedback};
use crate::error::{ApiError, Result};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct FeedbackRequest {
    pub rating: i64,
    pub category: String,
    pub comment: String,
}

#[derive(Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: &'static str,
    pub feedback_id: i64,
}

/// POST /api/levels/{number}/feedback
pub async fn submit_feedback(
    State(state): State<AppState>,
    Path(level_number): Path<i64>,
    auth: AuthContext,
    Json(req): Json<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>> {
    if !(1..=5).contains(&req.rating) {
        return Err(ApiError::Validation("rating must be between 1 and 5".into()));
    }

    let conn = db::try_lock(&state.db)?;
    let feedback_id = feedback::insert_feedback(
        &conn,
        level_number,
        auth.user.id,
        &auth.user.username,
        req.rating,
        &req.category,
        &req.comment,
    )?;
    drop(conn);

    tracing::debug!(
        "feedback {} from {} on level {}",
        feedback_id,
        auth.user.username,
        level_number
    );

    Ok(Json(FeedbackResponse {
        success: true,
        message: "Feedback submitted successfully",
        feedback_id,
    }))
}
