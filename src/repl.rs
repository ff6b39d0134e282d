use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, BasicHistory, Input};
use log::info;

use crate::base::repository::{ArticleRepository, AuthorRepository, MagazineRepository};
use crate::data::Database;
use crate::models::{ArticleId, AuthorId, MagazineId};
use crate::utils::format_datetime;

const HELP: &str = "\
commands:
  top-publisher            magazine with the most articles
  find-author <name>       look up an author by exact name
  author-stats <id>        articles, magazines and topic areas for an author
  magazine-articles <id>   article titles published in a magazine
  json <article-id>        dump an article as JSON
  help                     show this message
  quit                     leave the shell";

/// Line-oriented shell over the repositories for ad hoc exploration
pub fn run(db: &Database) -> Result<()> {
    let authors = db.author_repository();
    let magazines = db.magazine_repository();
    let articles = db.article_repository();

    info!("Starting interactive shell");
    println!("newsroom shell; type 'help' for commands");

    let mut history = BasicHistory::new().max_entries(50).no_duplicates(true);
    loop {
        let line: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("newsroom")
            .history_with(&mut history)
            .interact_text()?;

        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => continue,
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,

            "top-publisher" => match magazines.top_publisher()? {
                Some(magazine) => {
                    let count = magazines.article_titles(magazine.id)?.len();
                    println!(
                        "Top publisher: {} ({}) with {} articles",
                        magazine.name, magazine.category, count
                    );
                }
                None => println!("No articles published yet"),
            },

            "find-author" => {
                if arg.is_empty() {
                    println!("usage: find-author <name>");
                    continue;
                }
                match authors.find_by_name(arg)? {
                    Some(author) => println!(
                        "{} (id {}, since {})",
                        author.name,
                        author.id,
                        format_datetime(author.created_at)
                    ),
                    None => println!("No author named '{arg}'"),
                }
            }

            "author-stats" => {
                let Ok(id) = arg.parse::<i64>() else {
                    println!("usage: author-stats <id>");
                    continue;
                };
                let Some(author) = authors.find_by_id(AuthorId(id))? else {
                    println!("No author with id {id}");
                    continue;
                };
                println!("Author: {} (id {})", author.name, author.id);
                println!("  articles written: {}", authors.articles(author.id)?.len());
                println!(
                    "  magazines contributed to: {}",
                    authors.magazines(author.id)?.len()
                );
                println!(
                    "  topic areas: {}",
                    authors.topic_areas(author.id)?.join(", ")
                );
            }

            "magazine-articles" => {
                let Ok(id) = arg.parse::<i64>() else {
                    println!("usage: magazine-articles <id>");
                    continue;
                };
                let Some(magazine) = magazines.find_by_id(MagazineId(id))? else {
                    println!("No magazine with id {id}");
                    continue;
                };
                println!("{} ({})", magazine.name, magazine.category);
                let titles = magazines.article_titles(magazine.id)?;
                if titles.is_empty() {
                    println!("  no articles yet");
                }
                for title in titles {
                    println!("  - {title}");
                }
            }

            "json" => {
                let Ok(id) = arg.parse::<i64>() else {
                    println!("usage: json <article-id>");
                    continue;
                };
                match articles.find_by_id(ArticleId(id))? {
                    Some(article) => println!("{}", serde_json::to_string_pretty(&article)?),
                    None => println!("No article with id {id}"),
                }
            }

            other => println!("Unknown command '{other}'; type 'help'"),
        }
    }

    Ok(())
}
