//! Feedback record operations.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{Connection, Result, Row, params, params_from_iter};

use crate::domain::{Feedback, FeedbackStatus};

fn feedback_from_row(row: &Row) -> Result<Feedback> {
    let status: String = row.get(8)?;
    Ok(Feedback {
        id: row.get(0)?,
        level_number: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        rating: row.get(4)?,
        category: row.get(5)?,
        comment: row.get(6)?,
        submitted_at: crate::db::parse_ts(&row.get::<_, String>(7)?),
        status: FeedbackStatus::from_str(&status).unwrap_or(FeedbackStatus::Pending),
        updated_at: crate::db::parse_opt_ts(row.get(9)?),
        updated_by: row.get(10)?,
    })
}

const FEEDBACK_COLUMNS: &str = "id, level_number, user_id, username, rating, category, comment, \
     submitted_at, status, updated_at, updated_by";

/// Create a new pending feedback record, returning its id
pub fn insert_feedback(
    conn: &Connection,
    level_number: i64,
    user_id: i64,
    username: &str,
    rating: i64,
    category: &str,
    comment: &str,
) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"INSERT INTO feedback
           (level_number, user_id, username, rating, category, comment, submitted_at, status)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'pending')"#,
        params![level_number, user_id, username, rating, category, comment, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Exact-match filters; a None field leaves that column unconstrained
#[derive(Debug, Default, Clone)]
pub struct FeedbackFilter {
    pub status: Option<String>,
    pub category: Option<String>,
    pub level_number: Option<i64>,
    pub user_id: Option<i64>,
}

impl FeedbackFilter {
    fn where_clause(&self) -> (String, Vec<Value>) {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(status) = &self.status {
            clauses.push(format!("status = ?{}", values.len() + 1));
            values.push(Value::from(status.clone()));
        }
        if let Some(category) = &self.category {
            clauses.push(format!("category = ?{}", values.len() + 1));
            values.push(Value::from(category.clone()));
        }
        if let Some(level_number) = self.level_number {
            clauses.push(format!("level_number = ?{}", values.len() + 1));
            values.push(Value::from(level_number));
        }
        if let Some(user_id) = self.user_id {
            clauses.push(format!("user_id = ?{}", values.len() + 1));
            values.push(Value::from(user_id));
        }

        if clauses.is_empty() {
            (String::new(), values)
        } else {
            (format!(" WHERE {}", clauses.join(" AND ")), values)
        }
    }
}

/// Filtered listing, newest first, plus the filtered total count
pub fn list_feedback(
    conn: &Connection,
    filter: &FeedbackFilter,
    skip: i64,
    limit: i64,
) -> Result<(Vec<Feedback>, i64)> {
    let (where_sql, values) = filter.where_clause();

    let total: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM feedback{where_sql}"),
        params_from_iter(values.iter()),
        |row| row.get(0),
    )?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {FEEDBACK_COLUMNS} FROM feedback{where_sql} \
         ORDER BY submitted_at DESC LIMIT {limit} OFFSET {skip}"
    ))?;
    let items = stmt
        .query_map(params_from_iter(values.iter()), feedback_from_row)?
        .collect::<Result<Vec<_>>>()?;

    Ok((items, total))
}

/// Global per-status counts (never affected by listing filters)
pub fn status_counts(conn: &Connection) -> Result<(i64, i64, i64)> {
    let count = |status: &str| -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM feedback WHERE status = ?1",
            params![status],
            |row| row.get(0),
        )
    };
    Ok((count("pending")?, count("reviewed")?, count("resolved")?))
}

/// Set status/updated_at/updated_by. Returns false when the id is unknown.
pub fn update_status(
    conn: &Connection,
    feedback_id: i64,
    status: FeedbackStatus,
    admin_id: i64,
) -> Result<bool> {
    let now = Utc::now().to_rfc3339();
    let changed = conn.execute(
        "UPDATE feedback SET status = ?1, updated_at = ?2, updated_by = ?3 WHERE id = ?4",
        params![status.as_str(), now, admin_id, feedback_id],
    )?;
    Ok(changed > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn seed(conn: &Connection) {
        insert_feedback(conn, 100, 1, "ada", 5, "general", "fun").unwrap();
        insert_feedback(conn, 100, 2, "bob", 2, "bug", "broken hint").unwrap();
        insert_feedback(conn, 101, 1, "ada", 4, "difficulty", "too easy").unwrap();
    }

    #[test]
    fn filters_compose_and_total_reflects_them() {
        let conn = test_conn();
        seed(&conn);

        let (all, total) = list_feedback(&conn, &FeedbackFilter::default(), 0, 50).unwrap();
        assert_eq!((all.len(), total), (3, 3));

        let filter = FeedbackFilter {
            level_number: Some(100),
            ..Default::default()
        };
        let (items, total) = list_feedback(&conn, &filter, 0, 50).unwrap();
        assert_eq!((items.len(), total), (2, 2));

        let filter = FeedbackFilter {
            level_number: Some(100),
            category: Some("bug".into()),
            ..Default::default()
        };
        let (items, total) = list_feedback(&conn, &filter, 0, 50).unwrap();
        assert_eq!((items.len(), total), (1, 1));
        assert_eq!(items[0].username, "bob");
    }

    #[test]
    fn status_counts_are_global() {
        let conn = test_conn();
        seed(&conn);
        let id = conn
            .query_row("SELECT id FROM feedback WHERE username = 'bob'", [], |r| {
                r.get(0)
            })
            .unwrap();
        update_status(&conn, id, FeedbackStatus::Reviewed, 99).unwrap();

        // Counts ignore whatever filter a listing used
        assert_eq!(status_counts(&conn).unwrap(), (2, 1, 0));
    }

    #[test]
    fn update_unknown_id_reports_missing() {
        let conn = test_conn();
        assert!(!update_status(&conn, 12345, FeedbackStatus::Resolved, 1).unwrap());
    }

    #[test]
    fn update_records_auditing_fields() {
        let conn = test_conn();
        seed(&conn);
        update_status(&conn, 1, FeedbackStatus::Resolved, 42).unwrap();
        let (items, _) = list_feedback(&conn, &FeedbackFilter::default(), 0, 50).unwrap();
        let item = items.iter().find(|f| f.id == 1).unwrap();
        assert_eq!(item.status, FeedbackStatus::Resolved);
        assert_eq!(item.updated_by, Some(42));
        assert!(item.updated_at.is_some());

        // Backward transition is permitted
        update_status(&conn, 1, FeedbackStatus::Pending, 42).unwrap();
        let (items, _) = list_feedback(&conn, &FeedbackFilter::default(), 0, 50).unwrap();
        assert_eq!(
            items.iter().find(|f| f.id == 1).unwrap().status,
            FeedbackStatus::Pending
        );
    }
}
