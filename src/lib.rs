pub mod base;
pub mod data;
pub mod models;
pub mod repl;
pub mod utils;

// Re-export repository traits
pub use base::repository::{ArticleRepository, AuthorRepository, MagazineRepository};

// Re-export models
pub use models::{
    article::{Article, ArticleId},
    author::{Author, AuthorId},
    magazine::{Magazine, MagazineId},
};

// Re-export the database handle and typed errors
pub use data::{Database, Result, StoreError};
