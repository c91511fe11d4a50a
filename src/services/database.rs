//! Database introspection used by `taxa doctor`.

use crate::Database;
use anyhow::Result;

#[derive(Debug)]
pub struct IndexInfo {
    pub name: String,
    pub table_name: String,
    pub is_unique: bool,
}

pub fn run_integrity_check(db: &Database) -> Result<Vec<String>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare("PRAGMA integrity_check")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let results: Vec<String> = rows.filter_map(|r| r.ok()).collect();
    Ok(results)
}

pub fn list_indexes(db: &Database) -> Result<Vec<IndexInfo>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(
        "SELECT name, tbl_name, sql FROM sqlite_master
         WHERE type='index' AND name NOT LIKE 'sqlite_%'
         ORDER BY tbl_name, name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    })?;

    let mut indexes = Vec::new();
    for row in rows.flatten() {
        let (name, table_name, sql) = row;
        let is_unique = sql
            .as_ref()
            .map(|s| s.to_uppercase().contains("UNIQUE"))
            .unwrap_or(false);
        indexes.push(IndexInfo {
            name,
            table_name,
            is_unique,
        });
    }
    Ok(indexes)
}

pub fn current_migration_version(db: &Database) -> Result<i32> {
    let conn = db.get()?;
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}
