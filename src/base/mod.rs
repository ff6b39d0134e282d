pub mod repository;

pub use repository::{ArticleRepository, AuthorRepository, MagazineRepository};
