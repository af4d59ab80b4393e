//! Level catalog operations.

use rusqlite::{Connection, OptionalExtension, Result, Row, params};

use crate::domain::Difficulty;
use crate::domain::level::{Level, LevelSpec};

fn level_from_row(row: &Row) -> Result<Level> {
    let difficulty: String = row.get(5)?;
    let hints: String = row.get(9)?;
    let prerequisites: String = row.get(10)?;
    Ok(Level {
        id: row.get(0)?,
        level_number: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category: row.get(4)?,
        difficulty: Difficulty::from_str(&difficulty).unwrap_or(Difficulty::Easy),
        xp_reward: row.get(6)?,
        starter_code: row.get(7)?,
        expected_output: row.get(8)?,
        hints: serde_json::from_str(&hints).unwrap_or_default(),
        prerequisites: serde_json::from_str(&prerequisites).unwrap_or_default(),
        is_active: row.get(11)?,
    })
}

const LEVEL_COLUMNS: &str = "id, level_number, title, description, category, difficulty, \
     xp_reward, starter_code, expected_output, hints, prerequisites, is_active";

/// Active levels in catalog order (ascending level number)
pub fn get_active_levels(conn: &Connection, skip: i64, limit: i64) -> Result<Vec<Level>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LEVEL_COLUMNS} FROM levels WHERE is_active = 1 \
         ORDER BY level_number ASC LIMIT ?1 OFFSET ?2"
    ))?;
    let levels = stmt
        .query_map(params![limit, skip], level_from_row)?
        .collect::<Result<Vec<_>>>()?;
    Ok(levels)
}

/// Look up an active level by its external number
pub fn get_level(conn: &Connection, level_number: i64) -> Result<Option<Level>> {
    conn.query_row(
        &format!("SELECT {LEVEL_COLUMNS} FROM levels WHERE level_number = ?1 AND is_active = 1"),
        params![level_number],
        level_from_row,
    )
    .optional()
}

pub fn level_number_exists(conn: &Connection, level_number: i64) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM levels WHERE level_number = ?1",
        params![level_number],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Insert a new level, returning its row id
pub fn create_level(conn: &Connection, spec: &LevelSpec) -> Result<i64> {
    conn.execute(
        r#"INSERT INTO levels
           (level_number, title, description, category, difficulty, xp_reward,
            starter_code, expected_output, hints, prerequisites, is_active)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"#,
        params![
            spec.level_number,
            spec.title,
            spec.description,
            spec.category,
            spec.difficulty.as_str(),
            spec.xp_reward,
            spec.starter_code,
            spec.expected_output,
            serde_json::to_string(&spec.hints).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&spec.prerequisites).unwrap_or_else(|_| "[]".into()),
            spec.is_active,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Apply the built-in level set idempotently, keyed on level_number.
///
/// Seed rows are inserted or refreshed in place; levels added through the
/// admin API keep their own numbers and are never touched.
pub fn upsert_seed_levels(conn: &Connection, specs: &[LevelSpec]) -> Result<usize> {
    let mut stmt = conn.prepare(
        r#"INSERT INTO levels
           (level_number, title, description, category, difficulty, xp_reward,
            starter_code, expected_output, hints, prerequisites, is_active)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
           ON CONFLICT(level_number) DO UPDATE SET
               title = excluded.title,
               description = excluded.description,
               category = excluded.category,
               difficulty = excluded.difficulty,
               xp_reward = excluded.xp_reward,
               starter_code = excluded.starter_code,
               expected_output = excluded.expected_output,
               hints = excluded.hints,
               prerequisites = excluded.prerequisites,
               is_active = excluded.is_active"#,
    )?;

    for spec in specs {
        stmt.execute(params![
            spec.level_number,
            spec.title,
            spec.description,
            spec.category,
            spec.difficulty.as_str(),
            spec.xp_reward,
            spec.starter_code,
            spec.expected_output,
            serde_json::to_string(&spec.hints).unwrap_or_else(|_| "[]".into()),
            serde_json::to_string(&spec.prerequisites).unwrap_or_else(|_| "[]".into()),
            spec.is_active,
        ])?;
    }
    Ok(specs.len())
}

pub fn count_levels(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM levels", [], |row| row.get(0))
}
