use anyhow::{bail, Result};
use log::info;
use std::path::Path;

use newsroom::data::seed::seed;
use newsroom::{repl, utils};
use newsroom::{AuthorRepository, Database, MagazineRepository};

const DB_PATH: &str = "data/newsroom.db";

fn main() -> Result<()> {
    env_logger::init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "repl".to_string());

    utils::ensure_directory_exists(DB_PATH)?;
    info!("Opening database at {}", DB_PATH);
    let db = Database::open(Path::new(DB_PATH))?;

    match command.as_str() {
        // Database::open already applied the schema
        "setup" => println!("Database ready at {DB_PATH}"),
        "seed" => {
            seed(&db)?;
            println!("Seeded sample authors, magazines and articles");
        }
        "report" => report(&db)?,
        "repl" => repl::run(&db)?,
        other => bail!("unknown command '{other}' (expected setup, seed, report or repl)"),
    }

    Ok(())
}

/// Prints the standing overview: who writes where, and who publishes most
fn report(db: &Database) -> Result<()> {
    let authors = db.author_repository();
    let magazines = db.magazine_repository();

    println!("=== Authors and their articles ===");
    for author in authors.all()? {
        let titles: Vec<String> = authors
            .articles(author.id)?
            .into_iter()
            .map(|a| a.title)
            .collect();
        println!("- {}: {}", author.name, titles.join(", "));
    }

    println!("\n=== Magazines and their contributors ===");
    for magazine in magazines.all()? {
        let names: Vec<String> = magazines
            .contributors(magazine.id)?
            .into_iter()
            .map(|a| a.name)
            .collect();
        println!(
            "- {} ({}): {}",
            magazine.name,
            magazine.category,
            names.join(", ")
        );
    }

    println!("\n=== Top publisher ===");
    match magazines.top_publisher()? {
        Some(magazine) => {
            let count = magazines.article_titles(magazine.id)?.len();
            println!("{} with {} articles", magazine.name, count);
        }
        None => println!("No articles published yet"),
    }

    Ok(())
}
