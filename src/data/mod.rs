pub mod database;
pub mod error;
pub mod repositories;
pub mod seed;

pub use database::Database;
pub use error::{Result, StoreError};
pub use repositories::{
    SqliteArticleRepository, SqliteAuthorRepository, SqliteMagazineRepository,
};
