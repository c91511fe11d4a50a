//! Generic CRUD over taxonomy terms. One component serves both entity
//! kinds; callers pick the kind per request.
//!
//! Uniqueness of `name` and `slug` is enforced by the store's unique
//! indexes, never by a check-then-act read here, so concurrent creates
//! with colliding values cannot both succeed.

use crate::models::{CreateTerm, TaxonomyKind, Term, UpdateTerm};
use crate::services::slug::validate_slug;
use crate::Database;
use chrono::{SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension, Row};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("{kind} not found")]
    NotFound { kind: &'static str },
    #[error("a {kind} with that {field} already exists")]
    Conflict {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

// Column order shared by every query so one row mapper serves both kinds.
// Tags have no description column; NULL keeps the positions aligned.
fn select_columns(kind: TaxonomyKind) -> &'static str {
    if kind.has_description() {
        "id, name, slug, description, post_count, created_at, updated_at"
    } else {
        "id, name, slug, NULL, post_count, created_at, updated_at"
    }
}

fn term_from_row(row: &Row) -> rusqlite::Result<Term> {
    Ok(Term {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        description: row.get(3)?,
        post_count: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn now() -> String {
    // Microsecond precision so an update within the creation second still
    // advances updated_at.
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite reports unique-index violations as constraint failures whose
/// message names the offending column ("UNIQUE constraint failed:
/// tags.slug"). Translate those into conflicts; everything else is a
/// store failure.
fn map_unique_violation(kind: TaxonomyKind, err: rusqlite::Error) -> TaxonomyError {
    if let rusqlite::Error::SqliteFailure(code, Some(ref msg)) = err {
        if code.code == rusqlite::ErrorCode::ConstraintViolation {
            if msg.contains(".name") {
                return TaxonomyError::Conflict {
                    kind: kind.label(),
                    field: "name",
                };
            }
            if msg.contains(".slug") {
                return TaxonomyError::Conflict {
                    kind: kind.label(),
                    field: "slug",
                };
            }
        }
    }
    TaxonomyError::Store(err)
}

pub fn list_terms(db: &Database, kind: TaxonomyKind) -> TaxonomyResult<Vec<Term>> {
    let conn = db.get()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM {} ORDER BY name",
        select_columns(kind),
        kind.table()
    ))?;
    let terms = stmt
        .query_map([], term_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(terms)
}

pub fn get_term_by_slug(db: &Database, kind: TaxonomyKind, slug: &str) -> TaxonomyResult<Term> {
    let conn = db.get()?;
    conn.query_row(
        &format!(
            "SELECT {} FROM {} WHERE slug = ?",
            select_columns(kind),
            kind.table()
        ),
        [slug],
        term_from_row,
    )
    .optional()?
    .ok_or(TaxonomyError::NotFound { kind: kind.label() })
}

pub fn create_term(db: &Database, kind: TaxonomyKind, input: CreateTerm) -> TaxonomyResult<Term> {
    let name = match input.name.as_deref().map(str::trim) {
        Some("") => {
            return Err(TaxonomyError::Invalid {
                field: "name",
                reason: "must not be blank",
            })
        }
        Some(name) => name.to_string(),
        None => {
            return Err(TaxonomyError::Invalid {
                field: "name",
                reason: "is required",
            })
        }
    };
    let slug = match input.slug.as_deref() {
        Some(slug) if validate_slug(slug) => slug.to_string(),
        Some(_) => {
            return Err(TaxonomyError::Invalid {
                field: "slug",
                reason: "must contain only lowercase letters, digits and hyphens",
            })
        }
        None => {
            return Err(TaxonomyError::Invalid {
                field: "slug",
                reason: "is required",
            })
        }
    };

    let created_at = now();
    let conn = db.get()?;
    let term = if kind.has_description() {
        conn.query_row(
            "INSERT INTO categories (name, slug, description, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             RETURNING id, name, slug, description, post_count, created_at, updated_at",
            params![name, slug, input.description, created_at],
            term_from_row,
        )
    } else {
        conn.query_row(
            "INSERT INTO tags (name, slug, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             RETURNING id, name, slug, NULL, post_count, created_at, updated_at",
            params![name, slug, created_at],
            term_from_row,
        )
    }
    .map_err(|e| map_unique_violation(kind, e))?;
    Ok(term)
}

pub fn update_term(
    db: &Database,
    kind: TaxonomyKind,
    id: i64,
    patch: UpdateTerm,
) -> TaxonomyResult<Term> {
    let name = match patch.name.as_deref().map(str::trim) {
        Some("") => {
            return Err(TaxonomyError::Invalid {
                field: "name",
                reason: "must not be blank",
            })
        }
        other => other.map(String::from),
    };
    let slug = match patch.slug.as_deref() {
        Some(slug) if !validate_slug(slug) => {
            return Err(TaxonomyError::Invalid {
                field: "slug",
                reason: "must contain only lowercase letters, digits and hyphens",
            })
        }
        other => other.map(String::from),
    };

    // Absent fields fall back to the stored value; created_at is never
    // touched. The merge, validation against the unique indexes, and the
    // not-found check all happen in this one statement.
    let updated_at = now();
    let conn = db.get()?;
    let term = if kind.has_description() {
        conn.query_row(
            "UPDATE categories SET
                 name = COALESCE(?1, name),
                 slug = COALESCE(?2, slug),
                 description = COALESCE(?3, description),
                 updated_at = ?4
             WHERE id = ?5
             RETURNING id, name, slug, description, post_count, created_at, updated_at",
            params![name, slug, patch.description, updated_at, id],
            term_from_row,
        )
    } else {
        conn.query_row(
            "UPDATE tags SET
                 name = COALESCE(?1, name),
                 slug = COALESCE(?2, slug),
                 updated_at = ?3
             WHERE id = ?4
             RETURNING id, name, slug, NULL, post_count, created_at, updated_at",
            params![name, slug, updated_at, id],
            term_from_row,
        )
    }
    .optional()
    .map_err(|e| map_unique_violation(kind, e))?
    .ok_or(TaxonomyError::NotFound { kind: kind.label() })?;
    Ok(term)
}

pub fn delete_term(db: &Database, kind: TaxonomyKind, id: i64) -> TaxonomyResult<()> {
    let conn = db.get()?;
    let deleted = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?", kind.table()),
        [id],
    )?;
    if deleted == 0 {
        return Err(TaxonomyError::NotFound { kind: kind.label() });
    }
    Ok(())
}
