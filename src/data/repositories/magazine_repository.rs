use chrono::{DateTime, Utc};
use log::debug;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row};
use std::sync::Arc;

use crate::base::repository::MagazineRepository;
use crate::data::error::{require_non_empty, Result, StoreError};
use crate::models::article::{Article, ArticleId};
use crate::models::author::{Author, AuthorId};
use crate::models::magazine::{Magazine, MagazineId};

/// SQLite-backed magazine repository
///
/// Also hosts the one aggregate in the crate, `top_publisher`, which leans
/// on the composite `idx_article_counts` index over (magazine_id, id).
pub struct SqliteMagazineRepository {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl SqliteMagazineRepository {
    pub fn new(pool: Arc<Pool<SqliteConnectionManager>>) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row) -> rusqlite::Result<Magazine> {
        let created_at: i64 = row.get(3)?;
        Ok(Magazine {
            id: MagazineId(row.get(0)?),
            name: row.get(1)?,
            category: row.get(2)?,
            created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
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
}

impl MagazineRepository for SqliteMagazineRepository {
    fn create(&self, name: &str, category: &str) -> Result<Magazine> {
        require_non_empty("magazine", "name", name)?;
        require_non_empty("magazine", "category", category)?;

        let created_at = Utc::now();
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO magazines (name, category, created_at) VALUES (?1, ?2, ?3)",
            params![name, category, created_at.timestamp()],
        )
        .map_err(|e| StoreError::from_insert("magazine", "name", e))?;

        let id = MagazineId(conn.last_insert_rowid());
        debug!("Created magazine '{}' ({}) with id {}", name, category, id);

        Ok(Magazine {
            id,
            name: name.to_string(),
            category: category.to_string(),
            created_at,
        })
    }

    fn find_by_id(&self, id: MagazineId) -> Result<Option<Magazine>> {
        let conn = self.pool.get()?;
        let magazine = conn
            .query_row(
                "SELECT id, name, category, created_at FROM magazines WHERE id = ?1",
                [id.0],
                Self::map_row,
            )
            .optional()?;
        Ok(magazine)
    }

    fn find_by_name(&self, name: &str) -> Result<Option<Magazine>> {
        let conn = self.pool.get()?;
        let magazine = conn
            .query_row(
                "SELECT id, name, category, created_at FROM magazines WHERE name = ?1",
                [name],
                Self::map_row,
            )
            .optional()?;
        Ok(magazine)
    }

    fn all(&self) -> Result<Vec<Magazine>> {
        let conn = self.pool.get()?;
        let mut stmt =
            conn.prepare("SELECT id, name, category, created_at FROM magazines ORDER BY id")?;
        let magazines = stmt
            .query_map([], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(magazines)
    }

    fn find_by_category(&self, category: &str) -> Result<Vec<Magazine>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, category, created_at FROM magazines
             WHERE category = ?1 ORDER BY id",
        )?;
        let magazines = stmt
            .query_map([category], Self::map_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(magazines)
    }

    fn articles(&self, magazine_id: MagazineId) -> Result<Vec<Article>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, content, author_id, magazine_id, published_at
             FROM articles WHERE magazine_id = ?1 ORDER BY id",
        )?;
        let articles = stmt
            .query_map([magazine_id.0], Self::map_article_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(articles)
    }

    fn contributors(&self, magazine_id: MagazineId) -> Result<Vec<Author>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT au.id, au.name, au.created_at
             FROM authors au
             JOIN articles a ON a.author_id = au.id
             WHERE a.magazine_id = ?1
             ORDER BY au.id",
        )?;
        let authors = stmt
            .query_map([magazine_id.0], Self::map_author_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
    }

    fn article_titles(&self, magazine_id: MagazineId) -> Result<Vec<String>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT title FROM articles WHERE magazine_id = ?1 ORDER BY id",
        )?;
        let titles = stmt
            .query_map([magazine_id.0], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(titles)
    }

    fn contributing_authors(&self, magazine_id: MagazineId) -> Result<Vec<Author>> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare(
            "SELECT au.id, au.name, au.created_at
             FROM authors au
             JOIN articles a ON a.author_id = au.id
             WHERE a.magazine_id = ?1
             GROUP BY au.id
             HAVING COUNT(a.id) > 2
             ORDER BY au.id",
        )?;
        let authors = stmt
            .query_map([magazine_id.0], Self::map_author_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(authors)
    }

    fn top_publisher(&self) -> Result<Option<Magazine>> {
        let conn = self.pool.get()?;
        let magazine = conn
            .query_row(
                "SELECT m.id, m.name, m.category, m.created_at
                 FROM magazines m
                 JOIN articles a ON a.magazine_id = m.id
                 GROUP BY m.id
                 ORDER BY COUNT(a.id) DESC, m.id ASC
                 LIMIT 1",
                [],
                Self::map_row,
            )
            .optional()?;
        Ok(magazine)
    }

    fn delete(&self, id: MagazineId) -> Result<bool> {
        let conn = self.pool.get()?;
        let affected = conn.execute("DELETE FROM magazines WHERE id = ?1", [id.0])?;
        if affected > 0 {
            debug!("Deleted magazine {} (articles cascade)", id);
        }
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::repository::{ArticleRepository, AuthorRepository};
    use crate::data::database::Database;
    use tempfile::tempdir;

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    /// Inserts `count` throwaway articles by `author` into `magazine`
    fn write_articles(
        db: &Database,
        author: AuthorId,
        magazine: MagazineId,
        count: usize,
        prefix: &str,
    ) {
        let articles = db.article_repository();
        for n in 0..count {
            articles
                .create(&format!("{} #{}", prefix, n), "body", author, magazine)
                .unwrap();
        }
    }

    #[test]
    fn test_create_validates_both_fields() {
        let (_dir, db) = test_db();
        let magazines = db.magazine_repository();

        assert!(matches!(
            magazines.create("", "Science").unwrap_err(),
            StoreError::Validation(_)
        ));
        assert!(matches!(
            magazines.create("Nature", "").unwrap_err(),
            StoreError::Validation(_)
        ));
    }

    #[test]
    fn test_duplicate_name_is_unique_constraint() {
        let (_dir, db) = test_db();
        let magazines = db.magazine_repository();

        magazines.create("Nature", "Science").unwrap();
        assert!(matches!(
            magazines.create("Nature", "News").unwrap_err(),
            StoreError::UniqueConstraint { .. }
        ));
    }

    #[test]
    fn test_find_by_category() {
        let (_dir, db) = test_db();
        let magazines = db.magazine_repository();

        magazines.create("Nature", "Science").unwrap();
        magazines.create("Scientific American", "Science").unwrap();
        magazines.create("Vogue", "Fashion").unwrap();

        let science = magazines.find_by_category("Science").unwrap();
        assert_eq!(science.len(), 2);
        assert!(magazines.find_by_category("Sports").unwrap().is_empty());
    }

    #[test]
    fn test_contributors_are_distinct() {
        let (_dir, db) = test_db();
        let authors = db.author_repository();
        let magazines = db.magazine_repository();

        let alice = authors.create("Alice Walker").unwrap();
        let mark = authors.create("Mark Twain").unwrap();
        let mag = magazines.create("Time", "News").unwrap();

        write_articles(&db, alice.id, mag.id, 2, "Alice");
        write_articles(&db, mark.id, mag.id, 1, "Mark");

        let contributors = magazines.contributors(mag.id).unwrap();
        assert_eq!(contributors.len(), 2);
        assert_eq!(contributors[0].name, "Alice Walker");

        let titles = magazines.article_titles(mag.id).unwrap();
        assert_eq!(titles.len(), 3);
        assert_eq!(titles[0], "Alice #0");
    }

    #[test]
    fn test_contributing_authors_threshold() {
        let (_dir, db) = test_db();
        let authors = db.author_repository();
        let magazines = db.magazine_repository();

        let prolific = authors.create("Alice Walker").unwrap();
        let casual = authors.create("Mark Twain").unwrap();
        let mag = magazines.create("Nature", "Science").unwrap();

        write_articles(&db, prolific.id, mag.id, 3, "Alice");
        write_articles(&db, casual.id, mag.id, 2, "Mark");

        let frequent = magazines.contributing_authors(mag.id).unwrap();
        assert_eq!(frequent.len(), 1);
        assert_eq!(frequent[0].name, "Alice Walker");
    }

    #[test]
    fn test_top_publisher_picks_highest_count() {
        let (_dir, db) = test_db();
        let authors = db.author_repository();
        let magazines = db.magazine_repository();

        let author = authors.create("Jane Austen").unwrap();
        let a = magazines.create("Magazine A", "News").unwrap();
        let b = magazines.create("Magazine B", "News").unwrap();

        write_articles(&db, author.id, a.id, 5, "A");
        write_articles(&db, author.id, b.id, 3, "B");

        let top = magazines.top_publisher().unwrap().unwrap();
        assert_eq!(top.id, a.id);
    }

    #[test]
    fn test_top_publisher_empty_is_none() {
        let (_dir, db) = test_db();
        let magazines = db.magazine_repository();

        magazines.create("Nature", "Science").unwrap();
        assert!(magazines.top_publisher().unwrap().is_none());
    }

    #[test]
    fn test_top_publisher_tie_breaks_on_lowest_id() {
        let (_dir, db) = test_db();
        let authors = db.author_repository();
        let magazines = db.magazine_repository();

        let author = authors.create("Mark Twain").unwrap();
        let first = magazines.create("First", "News").unwrap();
        let second = magazines.create("Second", "News").unwrap();

        write_articles(&db, author.id, first.id, 2, "F");
        write_articles(&db, author.id, second.id, 2, "S");

        let top = magazines.top_publisher().unwrap().unwrap();
        assert_eq!(top.id, first.id);
    }

    #[test]
    fn test_delete_cascades_to_articles() {
        let (_dir, db) = test_db();
        let authors = db.author_repository();
        let magazines = db.magazine_repository();

        let author = authors.create("Alice Walker").unwrap();
        let mag = magazines.create("Vogue", "Fashion").unwrap();
        write_articles(&db, author.id, mag.id, 2, "V");

        assert!(magazines.delete(mag.id).unwrap());
        assert!(magazines.articles(mag.id).unwrap().is_empty());
        assert!(authors.articles(author.id).unwrap().is_empty());
    }
}
