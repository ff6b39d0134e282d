use chrono::{DateTime, Utc};
use log::debug;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::Arc;

use crate::base::repository::ArticleRepository;
use crate::data::error::{require_non_empty, Result, StoreError};
use crate::models::article::{Article, ArticleId};
use crate::models::author::{Author, AuthorId};
use crate::models::magazine::{Magazine, MagazineId};

/// SQLite-backed article repository
pub struct SqliteArticleRepository {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl SqliteArticleRepository {
    pub fn new(pool: Arc<Pool<SqliteConnectionManager>>) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row) -> rusqlite::Result<Article> {
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

    fn map_author_row(row: &Row) -> rusqlite::Result<Author> {
        let created_at: i64 = row.get(2)?;
        Ok(Author {
            id: AuthorId(row.get(0)?),
            name: row.get(1)?,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
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

    fn parent_exists(conn: &Connection, table: &str, id: i64) -> Result<bool> {
        // Table name comes from a fixed set, never from input
        let exists: bool = conn.query_row(
            &format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1)", table),
            [id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

impl ArticleRepository for SqliteArticleRepository {
    fn create(
        &self,
        title: &str,
        content: &str,
        author_id: AuthorId,
        magazine_id: MagazineId,
    ) -> Result<Article> {
        require_non_empty("article", "title", title)?;
        require_non_empty("article", "content", content)?;

        let conn = self.pool.get()?;
        if !Self::parent_exists(&conn, "authors", author_id.0)? {
            return Err(StoreError::ReferentialIntegrity {
                entity: "author",
                id: author_id.0,
            });
        }
        if !Self::parent_exists(&conn, "magazines", magazine_id.0)? {
            return Err(StoreError::ReferentialIntegrity {
                entity: "magazine",
                id: magazine_id.0,
            });
        }

        let published_at = Utc::now();
        conn.execute(
            "INSERT INTO articles (title, content, author_id, magazine_id, published_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                title,
                content,
                author_id.0,
                magazine_id.0,
                published_at.timestamp()
            ],
        )?;

        let id = ArticleId(conn.last_insert_rowid());
        debug!(
            "Created article '{}' with id {} (author {}, magazine {})",
            title, id, author_id, magazine_id
        );

        Ok(Article {
            id,
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            magazine_id,
            published_at,
        })
    }

    fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>> {
        let conn = self.pool.get()?;
        let article = conn
            .query_row(
                "SELECT id, title, content, author_id, magazine_id, published_at
                 FROM articles WHERE id = ?1",
                [id.0],
                Self::map_row,
            )
            .optional()?;
        Ok(article)
    }

    fn find_by_title(&self, title: &str) -> Result<Vec<Article>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, author_id, magazine_id, published_at
             FROM articles WHERE title = ?1 ORDER BY id",
        )?;
        let articles = stmt
            .query_map([title], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(articles)
    }

    fn author_of(&self, article: &Article) -> Result<Option<Author>> {
        let conn = self.pool.get()?;
        let author = conn
            .query_row(
                "SELECT id, name, created_at FROM authors WHERE id = ?1",
                [article.author_id.0],
                Self::map_author_row,
            )
            .optional()?;
        Ok(author)
    }

    fn magazine_of(&self, article: &Article) -> Result<Option<Magazine>> {
        let conn = self.pool.get()?;
        let magazine = conn
            .query_row(
                "SELECT id, name, category, created_at FROM magazines WHERE id = ?1",
                [article.magazine_id.0],
                Self::map_magazine_row,
            )
            .optional()?;
        Ok(magazine)
    }
}
