use log::info;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::path::Path;
use std::sync::Arc;

use crate::data::error::Result;
use crate::data::repositories::{
    SqliteArticleRepository, SqliteAuthorRepository, SqliteMagazineRepository,
};

/// Owns the SQLite connection pool and hands out repositories.
///
/// Opening the database applies `data/schema.sql` idempotently, so a fresh
/// file is usable immediately. Foreign keys are switched on for every pooled
/// connection; SQLite leaves them off by default and the cascade deletes
/// depend on them.
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Opens (or creates) the database file and applies the schema
    pub fn open(db_path: &Path) -> Result<Self> {
        let manager = SqliteConnectionManager::file(db_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

        let pool = Pool::new(manager)?;

        let conn = pool.get()?;
        conn.execute_batch(include_str!("../../data/schema.sql"))?;
        info!("Database schema applied at {}", db_path.display());

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn author_repository(&self) -> SqliteAuthorRepository {
        SqliteAuthorRepository::new(self.pool.clone())
    }

    pub fn magazine_repository(&self) -> SqliteMagazineRepository {
        SqliteMagazineRepository::new(self.pool.clone())
    }

    pub fn article_repository(&self) -> SqliteArticleRepository {
        SqliteArticleRepository::new(self.pool.clone())
    }

    /// Raw pool handle, used by the seed routine to clear tables
    pub fn pool(&self) -> Arc<Pool<SqliteConnectionManager>> {
        self.pool.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::repository::AuthorRepository;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_tables() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();

        let conn = db.pool().get().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('authors', 'magazines', 'articles')",
                [],
                |row| row.get(0),
            )
            .unwrap();

        assert_eq!(count, 3, "All three tables should exist");
    }

    #[test]
    fn test_open_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open(&path).unwrap();
        db.author_repository().create("Alice Walker").unwrap();
        drop(db);

        // Reopening must not wipe existing rows
        let db = Database::open(&path).unwrap();
        let found = db
            .author_repository()
            .find_by_name("Alice Walker")
            .unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();

        let conn = db.pool().get().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
