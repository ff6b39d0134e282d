use thiserror::Error;

/// Errors surfaced by the store layer
///
/// Lookups that simply find nothing are `Ok(None)` or an empty `Vec`,
/// never an error variant.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was empty or missing; rejected before any write
    #[error("validation failed: {0}")]
    Validation(String),

    /// A unique column already holds this value
    #[error("{entity} {field} is already taken")]
    UniqueConstraint {
        entity: &'static str,
        field: &'static str,
    },

    /// An insert referenced a parent row that does not exist
    #[error("{entity} with id {id} does not exist")]
    ReferentialIntegrity { entity: &'static str, id: i64 },

    #[error("connection pool error")]
    Pool(#[from] r2d2::Error),

    #[error("database error")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Classifies an insert failure, turning SQLite's unique-constraint
    /// extended code into a typed error and passing everything else through.
    pub(crate) fn from_insert(
        entity: &'static str,
        field: &'static str,
        err: rusqlite::Error,
    ) -> StoreError {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::UniqueConstraint { entity, field }
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Rejects empty or whitespace-only required fields before anything is written.
pub(crate) fn require_non_empty(entity: &str, field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation(format!(
            "{entity} {field} cannot be empty"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_non_empty_accepts_text() {
        assert!(require_non_empty("author", "name", "Alice Walker").is_ok());
    }

    #[test]
    fn test_require_non_empty_rejects_blank() {
        assert!(matches!(
            require_non_empty("author", "name", ""),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            require_non_empty("article", "title", "   "),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_unique_constraint_mapping() {
        let sqlite_err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
            },
            Some("UNIQUE constraint failed: authors.name".into()),
        );
        let mapped = StoreError::from_insert("author", "name", sqlite_err);
        assert!(matches!(
            mapped,
            StoreError::UniqueConstraint {
                entity: "author",
                field: "name"
            }
        ));
    }
}
