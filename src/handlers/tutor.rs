//! AI tutor endpoint.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::auth::AuthContext;
use crate::db::{self, levels};
use crate::error::{ApiError, Result};
use crate::state::AppState;
use crate::tutor;

#[derive(Deserialize)]
pub struct TutorRequest {
    pub question: String,
}

#[derive(Serialize)]
pub struct TutorResponse {
    pub explanation: String,
    /// True when the fallback text was served instead of a model reply
    pub degraded: bool,
}

/// POST /api/levels/{number}/ai-tutor
///
/// Unknown levels are a NotFound; everything past that point succeeds,
/// degrading to the static fallback when the external service cannot answer.
pub async fn ai_tutor(
    State(state): State<AppState>,
    Path(level_number): Path<i64>,
    _auth: AuthContext,
    Json(req): Json<TutorRequest>,
) -> Result<Json<TutorResponse>> {
    // Release the lock before awaiting the external call
    let level = {
        let conn = db::try_lock(&state.db)?;
        levels::get_level(&conn, level_number)?
            .ok_or_else(|| ApiError::NotFound("level not found".into()))?
    };

    let reply = tutor::ask(state.tutor.as_ref(), &level, &req.question).await;

    Ok(Json(TutorResponse {
        explanation: reply.text().to_string(),
        degraded: reply.is_degraded(),
    }))
}
