pub mod article;
pub mod author;
pub mod magazine;

pub use article::{Article, ArticleId};
pub use author::{Author, AuthorId};
pub use magazine::{Magazine, MagazineId};
