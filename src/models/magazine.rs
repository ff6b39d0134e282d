use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for magazines (SQLite rowid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MagazineId(pub i64);

impl fmt::Display for MagazineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a publication that carries articles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Magazine {
    /// Unique identifier, populated by the database on insert
    pub id: MagazineId,
    /// Magazine name, unique across all magazines
    pub name: String,
    /// Editorial category (e.g. "Science", "Fashion")
    pub category: String,
    /// Time when the magazine row was created
    pub created_at: DateTime<Utc>,
}
