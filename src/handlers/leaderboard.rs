//! Public leaderboard handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use crate::db::{self, stats};
use crate::db::stats::LeaderboardEntry;
use crate::error::Result;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}

/// GET /api/leaderboard
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    let conn = db::try_lock(&state.db)?;
    let entries = stats::leaderboard(&conn, query.limit.clamp(0, 100))?;
    Ok(Json(entries))
}
