//! Per-user progress map handler.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::State;

use crate::auth::AuthContext;
use crate::db::{self, progress};
use crate::domain::Progress;
use crate::error::Result;
use crate::state::AppState;

/// GET /api/user/progress
///
/// Keys are level numbers; levels never attempted are simply absent.
pub async fn user_progress(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<BTreeMap<i64, Progress>>> {
    let conn = db::try_lock(&state.db)?;
    let rows = progress::get_user_progress(&conn, auth.user.id)?;
    drop(conn);

    let map = rows.into_iter().map(|p| (p.level_number, p)).collect();
    Ok(Json(map))
}
