mod article_repository;
mod author_repository;
mod magazine_repository;

pub use article_repository::SqliteArticleRepository;
pub use author_repository::SqliteAuthorRepository;
pub use magazine_repository::SqliteMagazineRepository;
