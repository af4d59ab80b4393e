//! User table operations.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

use crate::domain::{Role, Subscription, User};

fn user_from_row(row: &Row) -> Result<User> {
    let role: String = row.get(4)?;
    let subscription: String = row.get(5)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::from_str(&role),
        subscription: Subscription::from_str(&subscription).unwrap_or(Subscription::Free),
        is_active: row.get(6)?,
        created_at: crate::db::parse_ts(&row.get::<_, String>(7)?),
        last_login_at: crate::db::parse_opt_ts(row.get(8)?),
    })
}

const USER_COLUMNS: &str = "id, username, email, password_hash, role, subscription, is_active, \
     created_at, last_login_at";

/// Create a new user, returns the user id
pub fn create_user(
    conn: &Connection,
    username: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<i64> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        r#"INSERT INTO users (username, email, password_hash, role, subscription, created_at)
           VALUES (?1, ?2, ?3, ?4, 'free', ?5)"#,
        params![username, email, password_hash, role.as_str(), now],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        params![email],
        user_from_row,
    )
    .optional()
}

pub fn get_user_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
        params![user_id],
        user_from_row,
    )
    .optional()
}

pub fn username_exists(conn: &Connection, username: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE username = ?1",
        params![username],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Update user's last login timestamp
pub fn update_last_login(conn: &Connection, user_id: i64) -> Result<()> {
    let now = Utc::now().to_rfc3339();
    conn.execute(
        "UPDATE users SET last_login_at = ?1 WHERE id = ?2",
        params![now, user_id],
    )?;
    Ok(())
}

/// Users for the admin console, newest first
pub fn list_users(conn: &Connection, skip: i64, limit: i64) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let users = stmt
        .query_map(params![limit, skip], user_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(users)
}

pub fn count_users(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))
}

/// Admin update of subscription tier and/or active flag.
/// Returns false when the user id is unknown.
pub fn update_user(
    conn: &Connection,
    user_id: i64,
    subscription: Option<Subscription>,
    is_active: Option<bool>,
) -> Result<bool> {
    if subscription.is_none() && is_active.is_none() {
        return Ok(get_user_by_id(conn, user_id)?.is_some());
    }

    let mut sets = Vec::new();
    if let Some(tier) = subscription {
        sets.push(format!("subscription = '{}'", tier.as_str()));
    }
    if let Some(active) = is_active {
        sets.push(format!("is_active = {}", if active { 1 } else { 0 }));
    }

    let changed = conn.execute(
        &format!("UPDATE users SET {} WHERE id = ?1", sets.join(", ")),
        params![user_id],
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

    #[test]
    fn create_and_look_up() {
        let conn = test_conn();
        let id = create_user(&conn, "ada", "ada@example.com", "hash", Role::User).unwrap();

        let user = get_user_by_email(&conn, "ada@example.com").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username, "ada");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.subscription, Subscription::Free);
        assert!(user.is_active);
        assert!(user.last_login_at.is_none());

        assert!(get_user_by_email(&conn, "nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn uniqueness_is_enforced_case_insensitively() {
        let conn = test_conn();
        create_user(&conn, "ada", "ada@example.com", "h", Role::User).unwrap();
        assert!(username_exists(&conn, "ada").unwrap());
        assert!(username_exists(&conn, "ADA").unwrap());
        assert!(email_exists(&conn, "Ada@Example.com").unwrap());
        assert!(create_user(&conn, "ada", "other@example.com", "h", Role::User).is_err());
        assert!(create_user(&conn, "other", "ada@example.com", "h", Role::User).is_err());
    }

    #[test]
    fn last_login_updates() {
        let conn = test_conn();
        let id = create_user(&conn, "ada", "ada@example.com", "h", Role::User).unwrap();
        update_last_login(&conn, id).unwrap();
        let user = get_user_by_id(&conn, id).unwrap().unwrap();
        assert!(user.last_login_at.is_some());
    }

    #[test]
    fn admin_update_changes_tier_and_flag() {
        let conn = test_conn();
        let id = create_user(&conn, "ada", "ada@example.com", "h", Role::User).unwrap();

        assert!(update_user(&conn, id, Some(Subscription::Pro), Some(false)).unwrap());
        let user = get_user_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(user.subscription, Subscription::Pro);
        assert!(!user.is_active);

        assert!(!update_user(&conn, 9999, Some(Subscription::Pro), None).unwrap());
    }
}
