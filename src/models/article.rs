use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::author::AuthorId;
use super::magazine::MagazineId;

/// Unique identifier for articles (SQLite rowid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArticleId(pub i64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents a single article written by an author for a magazine
///
/// Both foreign keys are required: an article cannot exist without its
/// author and magazine, and deleting either parent removes the article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier, populated by the database on insert
    pub id: ArticleId,
    /// Title of the article, never empty
    pub title: String,
    /// Full body text
    pub content: String,
    /// ID of the author who wrote this article
    pub author_id: AuthorId,
    /// ID of the magazine this article appeared in
    pub magazine_id: MagazineId,
    /// Publication time
    pub published_at: DateTime<Utc>,
}
