use serde::{Deserialize, Serialize};

/// A taxonomy term — one row in the `categories` or `tags` table.
///
/// `id` is the internal addressing key for update/delete; `slug` is the
/// public addressing key for reads. The two are never interchangeable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: i64,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub post_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Create payload. Required fields are `Option` so that a missing field
/// surfaces as a 400 validation error rather than a deserialization
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub struct CreateTerm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Partial update payload. Absent fields keep their stored value. A JSON
/// `null` deserializes to `None` and is indistinguishable from an absent
/// field, so an update can replace a description but never clear it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTerm {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// The two taxonomy entity kinds. Categories and tags share the same CRUD
/// surface; the only structural difference is that tags carry no
/// description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxonomyKind {
    Category,
    Tag,
}

impl TaxonomyKind {
    pub fn table(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "categories",
            TaxonomyKind::Tag => "tags",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Tag => "tag",
        }
    }

    pub fn has_description(self) -> bool {
        matches!(self, TaxonomyKind::Category)
    }
}
