//! Route table and middleware layers.

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        // Identity & session
        .route("/api/auth/signup", post(auth::handlers::signup))
        .route("/api/auth/login", post(auth::handlers::login))
        .route("/api/auth/verify", get(auth::handlers::verify))
        // Catalog & grading
        .route("/api/levels", get(handlers::list_levels))
        .route("/api/levels/{number}", get(handlers::get_level))
        .route("/api/levels/{number}/submit", post(handlers::submit_level))
        .route("/api/levels/{number}/feedback", post(handlers::submit_feedback))
        .route("/api/levels/{number}/ai-tutor", post(handlers::ai_tutor))
        // Progress & leaderboard
        .route("/api/user/progress", get(handlers::user_progress))
        .route("/api/leaderboard", get(handlers::leaderboard))
        // Admin console
        .route("/api/admin/feedback", get(handlers::admin_list_feedback))
        .route(
            "/api/admin/feedback/statistics",
            get(handlers::admin_feedback_statistics),
        )
        .route(
            "/api/admin/feedback/{id}/status",
            patch(handlers::admin_update_feedback_status),
        )
        .route("/api/admin/users", get(handlers::admin_list_users))
        .route("/api/admin/users/{id}", patch(handlers::admin_update_user))
        .route(
            "/api/admin/users/{id}/progress",
            delete(handlers::admin_reset_progress),
        )
        .route("/api/admin/levels", post(handlers::admin_create_level))
        .route("/api/admin/badges", get(handlers::admin_badges))
        .route(
            "/api/admin/analytics/dashboard",
            get(handlers::admin_analytics_dashboard),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
