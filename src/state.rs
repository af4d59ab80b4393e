//! Application state passed to all handlers.
//!
//! Constructed once at startup and cloned into each handler via axum's
//! `State` — there are no ambient singletons.

use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::db::DbPool;
use crate::tutor::TutorClient;

#[derive(Clone)]
pub struct AppState {
    /// Shared database handle
    pub db: DbPool,
    /// Token signing/verification keys
    pub jwt: Arc<JwtKeys>,
    /// AI tutor client; None runs the tutor in degraded mode
    pub tutor: Option<TutorClient>,
}

impl AppState {
    pub fn new(db: DbPool, jwt: JwtKeys, tutor: Option<TutorClient>) -> Self {
        Self {
            db,
            jwt: Arc::new(jwt),
            tutor,
        }
    }
}
