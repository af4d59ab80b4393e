//! Progress record operations.
//!
//! One row per (user, level_number), enforced by a unique constraint. The
//! submission write is a single conditional upsert: attempts always grow,
//! completion fields are written only on the first success and never again.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, params};

use crate::domain::Progress;

/// Outcome of recording one submission
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub attempts: i64,
    pub stars: i64,
    /// XP granted by this call: the level reward on the first successful
    /// submission, zero on everything else (including repeat successes)
    pub xp_awarded: i64,
}

/// Record one graded submission for (user, level).
pub fn record_submission(
    conn: &Connection,
    user_id: i64,
    level_number: i64,
    correct: bool,
    xp_reward: i64,
) -> Result<SubmissionRecord> {
    let was_completed: bool = conn
        .query_row(
            "SELECT is_completed FROM user_progress WHERE user_id = ?1 AND level_number = ?2",
            params![user_id, level_number],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(false);

    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"INSERT INTO user_progress
           (user_id, level_number, attempts, is_completed, completed_at, stars, xp_earned)
           VALUES (?1, ?2, 1, ?3,
                   CASE WHEN ?3 THEN ?4 ELSE NULL END,
                   CASE WHEN ?3 THEN 3 ELSE 0 END,
                   CASE WHEN ?3 THEN ?5 ELSE 0 END)
           ON CONFLICT(user_id, level_number) DO UPDATE SET
               attempts = attempts + 1,
               completed_at = CASE WHEN ?3 AND NOT user_progress.is_completed
                                   THEN ?4 ELSE user_progress.completed_at END,
               stars = CASE WHEN ?3 AND NOT user_progress.is_completed
                            THEN 3 ELSE user_progress.stars END,
               xp_earned = CASE WHEN ?3 AND NOT user_progress.is_completed
                                THEN ?5 ELSE user_progress.xp_earned END,
               is_completed = user_progress.is_completed OR ?3"#,
        params![user_id, level_number, correct, now, xp_reward],
    )?;

    let (attempts, stars) = conn.query_row(
        "SELECT attempts, stars FROM user_progress WHERE user_id = ?1 AND level_number = ?2",
        params![user_id, level_number],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let xp_awarded = if correct && !was_completed { xp_reward } else { 0 };

    Ok(SubmissionRecord {
        attempts,
        stars,
        xp_awarded,
    })
}

/// Every progress row a user has touched, ascending by level number
pub fn get_user_progress(conn: &Connection, user_id: i64) -> Result<Vec<Progress>> {
    let mut stmt = conn.prepare(
        r#"SELECT level_number, is_completed, stars, attempts, completed_at, xp_earned
           FROM user_progress WHERE user_id = ?1 ORDER BY level_number"#,
    )?;
    let rows = stmt
        .query_map(params![user_id], |row| {
            Ok(Progress {
                level_number: row.get(0)?,
                is_completed: row.get(1)?,
                stars: row.get(2)?,
                attempts: row.get(3)?,
                completed_at: crate::db::parse_opt_ts(row.get(4)?),
                xp_earned: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(rows)
}

/// Admin reset: remove every progress row for a user. Returns the count.
pub fn delete_user_progress(conn: &Connection, user_id: i64) -> Result<usize> {
    conn.execute(
        "DELETE FROM user_progress WHERE user_id = ?1",
        params![user_id],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        // Match SQLite's documented default (FK enforcement off) so these
        // progress-logic tests run without seeding referenced users/levels.
        // The bundled build defaults this pragma on; production enables it
        // explicitly in init_db.
        conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    #[test]
    fn attempts_grow_and_completion_is_one_way() {
        let conn = test_conn();

        let r = record_submission(&conn, 1, 100, false, 50).unwrap();
        assert_eq!((r.attempts, r.stars, r.xp_awarded), (1, 0, 0));

        let r = record_submission(&conn, 1, 100, true, 50).unwrap();
        assert_eq!((r.attempts, r.stars, r.xp_awarded), (2, 3, 50));

        // Repeat success: attempts grow, nothing is re-awarded
        let r = record_submission(&conn, 1, 100, true, 50).unwrap();
        assert_eq!((r.attempts, r.stars, r.xp_awarded), (3, 3, 0));

        // Failing after completion does not revert it
        let r = record_submission(&conn, 1, 100, false, 50).unwrap();
        assert_eq!((r.attempts, r.stars), (4, 3));
        let progress = get_user_progress(&conn, 1).unwrap();
        assert_eq!(progress.len(), 1);
        assert!(progress[0].is_completed);
        assert_eq!(progress[0].xp_earned, 50);
    }

    #[test]
    fn completed_at_is_set_once() {
        let conn = test_conn();
        record_submission(&conn, 1, 100, true, 50).unwrap();
        let first = get_user_progress(&conn, 1).unwrap()[0].completed_at;
        assert!(first.is_some());

        record_submission(&conn, 1, 100, true, 50).unwrap();
        let second = get_user_progress(&conn, 1).unwrap()[0].completed_at;
        assert_eq!(first, second);
    }

    #[test]
    fn one_row_per_user_level_pair() {
        let conn = test_conn();
        record_submission(&conn, 1, 100, false, 50).unwrap();
        record_submission(&conn, 1, 100, false, 50).unwrap();
        record_submission(&conn, 1, 101, false, 75).unwrap();
        record_submission(&conn, 2, 100, false, 50).unwrap();

        assert_eq!(get_user_progress(&conn, 1).unwrap().len(), 2);
        assert_eq!(get_user_progress(&conn, 2).unwrap().len(), 1);
    }

    #[test]
    fn reset_removes_all_rows() {
        let conn = test_conn();
        record_submission(&conn, 1, 100, true, 50).unwrap();
        record_submission(&conn, 1, 101, false, 75).unwrap();
        assert_eq!(delete_user_progress(&conn, 1).unwrap(), 2);
        assert!(get_user_progress(&conn, 1).unwrap().is_empty());
    }
}
