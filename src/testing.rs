//! Test utilities.
//!
//! Provides a fully migrated in-memory database and an `AppState` wired with
//! a fixed signing secret and no tutor client, reusing the authoritative
//! schema and seed paths so tests never duplicate setup logic.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::auth::JwtKeys;
use crate::content;
use crate::db::{DbPool, levels, run_migrations};
use crate::state::AppState;

/// Signing secret used by every test environment
pub const TEST_SECRET: &str = "test-secret";

/// Test environment with a seeded in-memory database.
pub struct TestEnv {
    pub state: AppState,
}

impl TestEnv {
    /// Full schema plus the shipped level set.
    pub fn new() -> Self {
        let conn = Connection::open_in_memory().expect("in-memory database");
        run_migrations(&conn).expect("migrations");
        levels::upsert_seed_levels(&conn, &content::seed_levels()).expect("seed levels");

        let pool: DbPool = Arc::new(Mutex::new(conn));
        let state = AppState::new(pool, JwtKeys::new(TEST_SECRET), None);
        Self { state }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
