use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::{Parser, Subcommand};

use stanza_core::{
    AnnotationPatch, AnnotationStore, AppConfig, Book, BookId, Catalog, ExitCode, FilterCriteria,
    SortKey, StatusFilter, compute_stats, filter_and_sort, recommend,
};
use stanza_tui::app::App;

mod logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "stanza", about = "Terminal poetry bookshelf", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output JSON envelopes (also enabled by STANZA_JSON=1).
    #[arg(long, global = true)]
    json: bool,

    /// Dataset file, overriding the configured location.
    #[arg(long, global = true, value_name = "FILE")]
    books: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List shelf books with optional filters.
    List {
        /// Case-insensitive substring matched against title or author.
        #[arg(long, default_value = "")]
        search: String,
        /// Exact genre label.
        #[arg(long)]
        genre: Option<String>,
        /// Exact theme label.
        #[arg(long)]
        theme: Option<String>,
        /// Read status: any, read or unread.
        #[arg(long, default_value = "any")]
        status: String,
        /// Sort order: title, author, year-asc, year-desc or rating-desc.
        /// Anything else keeps catalog order.
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one book with its annotation.
    Show { id: BookId },
    /// Mark a book read or unread.
    Mark { id: BookId, status: String },
    /// Rate a book 1-5; 0 clears the rating.
    Rate { id: BookId, rating: u8 },
    /// Shelf statistics.
    Stats,
    /// Tag-affinity picks based on your 4-5 star books.
    Recommend,
    /// Distinct genres and themes with book counts.
    Facets,
    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Show all config values.
    List,
    /// Get a specific config key.
    Get { key: String },
}

// ─── Main ────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let start = Instant::now();
    let cli = Cli::parse();

    let json_output = cli.json || std::env::var("STANZA_JSON").as_deref() == Ok("1");
    let timing = std::env::var("STANZA_TIMING").as_deref() == Ok("1");

    let mut config = AppConfig::load()?;
    if let Some(books) = cli.books {
        config.core.books_path = Some(books);
    }

    if timing {
        eprintln!("[timing] config loaded in {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    }

    match cli.command {
        None => {
            logging::init_tui(&config);
            let catalog = load_catalog(&config);
            let store = AnnotationStore::load(config.annotations_path());
            let mut app = App::new(catalog, store, &config);
            stanza_tui::run_tui(&mut app, Duration::from_millis(config.ui.tick_ms))?;
        }
        Some(command) => {
            logging::init_cli(&config);
            run_command(command, &config, json_output, start)?;
        }
    }

    if timing {
        eprintln!("[timing] total {:.1}ms", start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok(())
}

fn run_command(command: Commands, config: &AppConfig, json_output: bool, start: Instant) -> Result<()> {
    match command {
        // ── Reading the shelf ──────────────────────────────────────────

        Commands::List { search, genre, theme, status, sort } => {
            let catalog = load_catalog(config);
            let store = AnnotationStore::load(config.annotations_path());
            let criteria = FilterCriteria {
                search,
                genre,
                theme,
                status: StatusFilter::parse(&status),
            };
            let sort = sort.as_deref().and_then(SortKey::parse);
            let books = filter_and_sort(catalog.books(), &store, &criteria, sort);
            let dur = start.elapsed().as_millis();

            if json_output {
                let items: Vec<serde_json::Value> = books
                    .iter()
                    .map(|b| shelf_item(b, &store))
                    .collect::<serde_json::Result<_>>()?;
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": items, "total": catalog.len() },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if books.is_empty() {
                println!("No books match.");
            } else {
                for book in &books {
                    let ann = store.get(book.id);
                    let read_mark = if ann.read { "✓" } else { " " };
                    let stars = "★".repeat(ann.rating as usize);
                    println!(
                        "{id:>3} {read_mark} {title:<34}  {author:<22}  {year:>5}  {stars}",
                        id = book.id,
                        title = book.title,
                        author = book.author,
                        year = book.year,
                    );
                }
            }
        }

        Commands::Show { id } => {
            let catalog = load_catalog(config);
            let store = AnnotationStore::load(config.annotations_path());
            let dur = start.elapsed().as_millis();
            match catalog.get(id) {
                None => book_not_found(id, json_output, dur)?,
                Some(book) => {
                    let ann = store.get(id);
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": shelf_item(book, &store)?,
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else {
                        println!("{} ({})", book.title, book.year);
                        println!("by {}", book.author);
                        if !book.haiku.is_empty() {
                            println!();
                            for verse in book.haiku.lines() {
                                println!("  {verse}");
                            }
                        }
                        println!();
                        println!("Genres: {}", join_or_dash(&book.genres));
                        println!("Themes: {}", join_or_dash(&book.themes));
                        println!("Status: {}", if ann.read { "read" } else { "unread" });
                        match ann.rating {
                            0 => println!("Rating: -"),
                            r => println!("Rating: {}", "★".repeat(r as usize)),
                        }
                    }
                }
            }
        }

        // ── Annotating ─────────────────────────────────────────────────

        Commands::Mark { id, status } => {
            let read = match status.as_str() {
                "read" => true,
                "unread" => false,
                other => {
                    eprintln!("Invalid status '{other}': expected read or unread");
                    std::process::exit(ExitCode::InvalidArgs as i32);
                }
            };
            let catalog = load_catalog(config);
            let mut store = AnnotationStore::load(config.annotations_path());
            match catalog.get(id) {
                None => book_not_found(id, json_output, start.elapsed().as_millis())?,
                Some(book) => {
                    store.set(id, AnnotationPatch::read(read))?;
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": { "id": id, "read": read },
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else if read {
                        println!("Marked read: {}", book.title);
                    } else {
                        println!("Marked unread: {}", book.title);
                    }
                }
            }
        }

        Commands::Rate { id, rating } => {
            if rating > 5 {
                eprintln!("Rating must be 0-5 (0 clears it)");
                std::process::exit(ExitCode::InvalidArgs as i32);
            }
            let catalog = load_catalog(config);
            let mut store = AnnotationStore::load(config.annotations_path());
            match catalog.get(id) {
                None => book_not_found(id, json_output, start.elapsed().as_millis())?,
                Some(book) => {
                    store.set(id, AnnotationPatch::rating(rating))?;
                    let dur = start.elapsed().as_millis();
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": { "id": id, "rating": rating },
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else if rating == 0 {
                        println!("Cleared rating: {}", book.title);
                    } else {
                        println!("Rated {}: {}", "★".repeat(rating as usize), book.title);
                    }
                }
            }
        }

        // ── Aggregates ─────────────────────────────────────────────────

        Commands::Stats => {
            let catalog = load_catalog(config);
            let store = AnnotationStore::load(config.annotations_path());
            let stats = compute_stats(catalog.books(), &store);
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": stats,
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("Shelf statistics:");
                println!("  Books:          {}", stats.total);
                println!("  Read:           {}", stats.read_count);
                println!("  Average rating: {}", stats.average_display());
            }
        }

        Commands::Recommend => {
            let catalog = load_catalog(config);
            let store = AnnotationStore::load(config.annotations_path());
            let recs = recommend(catalog.books(), &store);
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": recs },
                    "meta": { "duration_ms": dur }
                }))?;
            } else if recs.is_empty() {
                println!("No recommendations yet. Rate a few books 4 or 5 stars first.");
            } else {
                for rec in &recs {
                    println!("{:>4}% match  {}  ({})", rec.score, rec.book.title, rec.book.author);
                }
            }
        }

        Commands::Facets => {
            let catalog = load_catalog(config);
            let genres = catalog.genre_facets();
            let themes = catalog.theme_facets();
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "genres": genres, "themes": themes },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                println!("Genres:");
                for facet in &genres {
                    println!("  {} ({})", facet.name, facet.count);
                }
                println!("Themes:");
                for facet in &themes {
                    println!("  {} ({})", facet.name, facet.count);
                }
            }
        }

        // ── Config ─────────────────────────────────────────────────────

        Commands::Config { action } => {
            let dur = start.elapsed().as_millis();
            match action {
                ConfigAction::Path => {
                    let path = AppConfig::config_path();
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": { "path": path },
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else {
                        println!("{}", path.display());
                    }
                }
                ConfigAction::List => {
                    let kv = config_key_values(config);
                    if json_output {
                        print_json(&serde_json::json!({
                            "status": "ok",
                            "data": kv,
                            "meta": { "duration_ms": dur }
                        }))?;
                    } else {
                        for (k, v) in &kv {
                            println!("{k} = {v}");
                        }
                    }
                }
                ConfigAction::Get { key } => {
                    let kv = config_key_values(config);
                    match kv.get(key.as_str()) {
                        Some(val) => {
                            if json_output {
                                print_json(&serde_json::json!({
                                    "status": "ok",
                                    "data": { "key": key, "value": val },
                                    "meta": { "duration_ms": dur }
                                }))?;
                            } else {
                                println!("{val}");
                            }
                        }
                        None => {
                            eprintln!("Unknown config key: {key}");
                            std::process::exit(ExitCode::NotFound as i32);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// The dataset is required for everything; bail with a pointer at where
/// it was expected instead of surfacing a bare I/O error.
fn load_catalog(config: &AppConfig) -> Catalog {
    match Catalog::load(&config.books_path()) {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Cannot load the book dataset: {e}");
            eprintln!(
                "Expected it at {}; set core.books_path or pass --books.",
                config.books_path().display()
            );
            std::process::exit(ExitCode::FileSystemError as i32);
        }
    }
}

fn book_not_found(id: BookId, json_output: bool, dur: u128) -> Result<()> {
    if json_output {
        print_json(&serde_json::json!({
            "status": "error",
            "error": "not_found",
            "message": format!("Book {id} not found"),
            "meta": { "duration_ms": dur }
        }))?;
    } else {
        eprintln!("Book {id} not found");
    }
    std::process::exit(ExitCode::NotFound as i32);
}

/// A book plus its annotation, flattened into one JSON object.
fn shelf_item(book: &Book, store: &AnnotationStore) -> serde_json::Result<serde_json::Value> {
    let ann = store.get(book.id);
    let mut value = serde_json::to_value(book)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("read".to_string(), serde_json::Value::Bool(ann.read));
        map.insert("rating".to_string(), serde_json::Value::from(ann.rating));
    }
    Ok(value)
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}

fn join_or_dash(values: &[String]) -> String {
    if values.is_empty() { "-".to_string() } else { values.join(", ") }
}

fn config_key_values(config: &AppConfig) -> std::collections::BTreeMap<&'static str, String> {
    let mut map = std::collections::BTreeMap::new();
    map.insert("core.data_dir", config.core.data_dir.to_string_lossy().to_string());
    map.insert("core.books_path", config.books_path().to_string_lossy().to_string());
    map.insert("core.annotations_path", config.annotations_path().to_string_lossy().to_string());
    map.insert("ui.default_sort", config.ui.default_sort.clone());
    map.insert("ui.tick_ms", config.ui.tick_ms.to_string());
    map.insert("log.file", config.log_path().to_string_lossy().to_string());
    map.insert("log.level", config.log.level.clone());
    map
}
