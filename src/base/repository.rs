use crate::data::error::Result;
use crate::models::{
    article::{Article, ArticleId},
    author::{Author, AuthorId},
    magazine::{Magazine, MagazineId},
};

/// Access to author rows and their relationships
pub trait AuthorRepository: Send + Sync {
    /// Validates and inserts a new author, returning it with its generated id
    fn create(&self, name: &str) -> Result<Author>;

    fn find_by_id(&self, id: AuthorId) -> Result<Option<Author>>;

    fn find_by_name(&self, name: &str) -> Result<Option<Author>>;

    /// Every author, id ascending
    fn all(&self) -> Result<Vec<Author>>;

    /// All articles written by this author, oldest first
    fn articles(&self, author_id: AuthorId) -> Result<Vec<Article>>;

    /// Distinct magazines this author has published in
    fn magazines(&self, author_id: AuthorId) -> Result<Vec<Magazine>>;

    /// Distinct magazine categories this author has written for
    fn topic_areas(&self, author_id: AuthorId) -> Result<Vec<String>>;

    /// Deletes the author; the schema cascades the delete to their articles.
    /// Returns false when no such author existed.
    fn delete(&self, id: AuthorId) -> Result<bool>;
}

/// Access to magazine rows, their relationships, and the publishing aggregate
pub trait MagazineRepository: Send + Sync {
    /// Validates and inserts a new magazine, returning it with its generated id
    fn create(&self, name: &str, category: &str) -> Result<Magazine>;

    fn find_by_id(&self, id: MagazineId) -> Result<Option<Magazine>>;

    fn find_by_name(&self, name: &str) -> Result<Option<Magazine>>;

    /// Every magazine, id ascending
    fn all(&self) -> Result<Vec<Magazine>>;

    fn find_by_category(&self, category: &str) -> Result<Vec<Magazine>>;

    /// All articles published in this magazine, oldest first
    fn articles(&self, magazine_id: MagazineId) -> Result<Vec<Article>>;

    /// Distinct authors with at least one article in this magazine
    fn contributors(&self, magazine_id: MagazineId) -> Result<Vec<Author>>;

    /// Titles of this magazine's articles, oldest first
    fn article_titles(&self, magazine_id: MagazineId) -> Result<Vec<String>>;

    /// Authors with more than two articles in this magazine
    fn contributing_authors(&self, magazine_id: MagazineId) -> Result<Vec<Author>>;

    /// The magazine with the most articles overall, ties broken by lowest id.
    /// None when no articles exist at all.
    fn top_publisher(&self) -> Result<Option<Magazine>>;

    /// Deletes the magazine; the schema cascades the delete to its articles.
    /// Returns false when no such magazine existed.
    fn delete(&self, id: MagazineId) -> Result<bool>;
}

/// Access to article rows and navigation to their parents
pub trait ArticleRepository: Send + Sync {
    /// Validates and inserts a new article, returning it with its generated id.
    /// Both parents must exist; nothing is written otherwise.
    fn create(
        &self,
        title: &str,
        content: &str,
        author_id: AuthorId,
        magazine_id: MagazineId,
    ) -> Result<Article>;

    fn find_by_id(&self, id: ArticleId) -> Result<Option<Article>>;

    /// Titles are not unique, so this returns every match
    fn find_by_title(&self, title: &str) -> Result<Vec<Article>>;

    /// The owning author; None only if the parent vanished after this
    /// article was loaded
    fn author_of(&self, article: &Article) -> Result<Option<Author>>;

    /// The owning magazine; None only if the parent vanished after this
    /// article was loaded
    fn magazine_of(&self, article: &Article) -> Result<Option<Magazine>>;
}
