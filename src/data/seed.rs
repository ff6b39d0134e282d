use log::info;

use crate::base::repository::{ArticleRepository, AuthorRepository, MagazineRepository};
use crate::data::database::Database;
use crate::data::error::Result;

/// Clears all tables and inserts the sample data set.
///
/// Rows go through the repository create operations so the same validation
/// and id generation applies as for any other caller. Articles are cleared
/// implicitly by the cascading parent deletes, but are deleted first anyway
/// so the statement order does not depend on pragma state.
pub fn seed(db: &Database) -> Result<()> {
    let conn = db.pool().get()?;
    conn.execute_batch(
        "DELETE FROM articles;
         DELETE FROM authors;
         DELETE FROM magazines;",
    )?;

    let authors = db.author_repository();
    let magazines = db.magazine_repository();
    let articles = db.article_repository();

    let alice = authors.create("Alice Walker")?;
    let mark = authors.create("Mark Twain")?;
    let jane = authors.create("Jane Austen")?;

    let nature = magazines.create("Nature", "Science")?;
    let time = magazines.create("Time", "News")?;
    let vogue = magazines.create("Vogue", "Fashion")?;

    articles.create(
        "The Color Purple",
        "An epistolary portrait of resilience in the rural South.",
        alice.id,
        vogue.id,
    )?;
    articles.create(
        "Adventures of Huckleberry Finn",
        "A raft, a river, and a conscience finding its own course.",
        mark.id,
        time.id,
    )?;
    articles.create(
        "Pride and Prejudice",
        "First impressions revised over a long country season.",
        jane.id,
        nature.id,
    )?;
    articles.create(
        "Science Fiction Today",
        "Where speculative writing is heading this decade.",
        alice.id,
        nature.id,
    )?;
    articles.create(
        "Fashion Through the Ages",
        "Four centuries of silhouettes in fast forward.",
        jane.id,
        vogue.id,
    )?;

    info!("Seeded 3 authors, 3 magazines, 5 articles");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuthorId;
    use tempfile::tempdir;

    #[test]
    fn test_seed_populates_all_tables() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();

        seed(&db).unwrap();

        let authors = db.author_repository();
        let magazines = db.magazine_repository();

        assert_eq!(authors.all().unwrap().len(), 3);
        assert_eq!(magazines.all().unwrap().len(), 3);

        let alice = authors.find_by_name("Alice Walker").unwrap().unwrap();
        assert_eq!(authors.articles(alice.id).unwrap().len(), 2);

        let nature = magazines.find_by_name("Nature").unwrap().unwrap();
        assert_eq!(magazines.contributors(nature.id).unwrap().len(), 2);
    }

    #[test]
    fn test_seed_is_rerunnable() {
        let dir = tempdir().unwrap();
        let db = Database::open(&dir.path().join("test.db")).unwrap();

        seed(&db).unwrap();
        seed(&db).unwrap();

        // Second run replaces the first, it does not duplicate
        let magazines = db.magazine_repository();
        assert_eq!(magazines.find_by_category("Science").unwrap().len(), 1);

        // Ids keep advancing across reseeds, stale handles stay dangling
        let authors = db.author_repository();
        assert!(authors.find_by_id(AuthorId(1)).unwrap().is_none());
    }
}
