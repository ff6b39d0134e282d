use chrono::{DateTime, Utc};
use log::debug;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use crate::base::repository::AuthorRepository;
use crate::data::error::{require_non_empty, Result, StoreError};
use crate::models::article::{Article, ArticleId};
use crate::models::author::{Author, AuthorId};
use crate::models::magazine::{Magazine, MagazineId};

/// SQLite-backed author repository
pub struct SqliteAuthorRepository {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl SqliteAuthorRepository {
    pub fn new(pool: Arc<Pool<SqliteConnectionManager>>) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row) -> rusqlite::Result<Author> {
        let created_at: i64 = row.get(2)?;
        Ok(Author {
            id: AuthorId(row.get(0)?),
            name: row.get(1)?,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
        })
    }

    fn map_article_row(row: &Row) -> rusqlite::Result<Article> {
        let published_at: i64 = row.get(5)?;
        Ok(Article {
            id: ArticleId(row.get(0)?),
            title: row.get(1)?,
            content: row.get(2)?,
            author_id: AuthorId(row.get(3)?),
            magazine_id: MagazineId(row.get(4)?),
            published_at: DateTime::from_timestamp(published_at, 0).unwrap_or_default(),
        })
    }

    fn map_magazine_row(row: &Row) -> rusqlite::Result<Magazine> {
        let created_at: i64 = row.get(3)?;
        Ok(Magazine {
            id: MagazineId(row.get(0)?),
            name: row.get(1)?,
            category: row.get(2)?,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
        })
    }
}

impl AuthorRepository for SqliteAuthorRepository {
    fn create(&self, name: &str) -> Result<Author> {
        require_non_empty("author", "name", name)?;

        let created_at = Utc::now();
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO authors (name, created_at) VALUES (?1, ?2)",
            params![name, created_at.timestamp()],
        )
        .map_err(|e| StoreError::from_insert("author", "name", e))?;

        let id = AuthorId(conn.last_insert_rowid());
        debug!("Created author '{}' with id {}", name, id);

        Ok(Author {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>> {
        let conn = self.pool.get()?;
        let author = conn
            .query_row(
                "SELECT id, name, created_at FROM authors WHERE id = ?1",
                [id.0],
                Self::map_row,
            )
            .optional()?;
        Ok(author)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Author>> {
        let conn = self.pool.get()?;
        let author = conn
            .query_row(
                "SELECT id, name, created_at FROM authors WHERE name = ?1",
                [name],
                Self::map_row,
            )
            .optional()?;
        Ok(author)
    }

    fn all(&self) -> Result<Vec<Author>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM authors ORDER BY id")?;
        let authors = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
    }

    fn articles(&self, author_id: AuthorId) -> Result<Vec<Article>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, author_id, magazine_id, published_at
             FROM articles WHERE author_id = ?1 ORDER BY id",
        )?;
        let articles = stmt
            .query_map([author_id.0], Self::map_article_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(articles)
    }

    fn magazines(&self, author_id: AuthorId) -> Result<Vec<Magazine>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT m.id, m.name, m.category, m.created_at
             FROM magazines m
             JOIN articles a ON a.magazine_id = m.id
             WHERE a.author_id = ?1
             ORDER BY m.id",
        )?;
        let magazines = stmt
            .query_map([author_id.0], Self::map_magazine_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(magazines)
    }

    fn topic_areas(&self, author_id: AuthorId) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT m.category
             FROM magazines m
             JOIN articles a ON a.magazine_id = m.id
             WHERE a.author_id = ?1
             ORDER BY m.category",
        )?;
        let categories = stmt
            .query_map([author_id.0], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(categories)
    }

    fn delete(&self, id: AuthorId) -> Result<bool> {
        let conn = self.pool.get()?;
        let affected = conn.execute("DELETE FROM authors WHERE id = ?1", [id.0])?;
        if affected > 0 {
            debug!("Deleted author {} (articles cascade)", id);
        }
        Ok(affected > 0)
    }
}
