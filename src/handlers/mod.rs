pub mod admin;
pub mod feedback;
pub mod leaderboard;
pub mod levels;
pub mod progress;
pub mod tutor;

use axum::Json;
use chrono::Utc;
use serde_json::{Value, json};

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
    }))
}

pub use admin::{
    admin_analytics_dashboard, admin_badges, admin_create_level, admin_feedback_statistics,
    admin_list_feedback, admin_list_users, admin_reset_progress, admin_update_feedback_status,
    admin_update_user,
};
pub use feedback::submit_feedback;
pub use leaderboard::leaderboard;
pub use levels::{get_level, list_levels, submit_level};
pub use progress::user_progress;
pub use tutor::ai_tutor;
