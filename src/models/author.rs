use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for authors (SQLite rowid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorId(pub i64);

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a writer who publishes articles in magazines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Unique identifier, populated by the database on insert
    pub id: AuthorId,
    /// Display name, unique across all authors
    pub name: String,
    /// Time when the author row was created
    pub created_at: DateTime<Utc>,
}
