use crate::api::server as api_server;
use crate::cli::opts::*;

use anyhow::{anyhow, Result};
use cardclip_core::{
    daily_streak,
    filters::{filter_by_tag, filter_by_text},
    scheduler::{due_flashcards, next_interval_days, next_review_batch},
    summarize, Difficulty, Flashcard, Store,
};
use cardclip_json::paths::data_root;
use cardclip_json::JsonStore;
use cardclip_sqlite::SqliteStore;
use chrono::Utc;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

pub async fn run_cli(args: Cli) -> Result<()> {
    match &args.cmd {
        Command::Tui => {
            // (kept for completeness but main routes TUI directly)
            let store = open_store(&args.store, args.db_path.clone()).await?;
            let rt = Arc::new(tokio::runtime::Runtime::new()?);
            let mut app = crate::tui::app::TuiApp::new(store, rt);
            app.run()?;
            Ok(())
        }
        Command::Api(api) => {
            let store = open_store(&args.store, args.db_path.clone()).await?;
            let addr: std::net::SocketAddr = api.addr.parse()?;
            api_server::run(store, addr).await
        }
        _ => {
            let store = open_store(&args.store, args.db_path.clone()).await?;
            match args.cmd.clone() {
                Command::Card(cmd) => card_cmd(store, cmd).await,
                Command::Review(cmd) => review_cmd(store, cmd).await,
                Command::Due => due_cmd(store).await,
                Command::Stats => stats_cmd(store).await,
                Command::Export(cmd) => export_cmd(store, cmd).await,
                Command::Import(cmd) => import_cmd(store, cmd).await,
                _ => unreachable!(),
            }
        }
    }
}

pub async fn open_store(store: &StoreKind, db_path: Option<PathBuf>) -> Result<Arc<dyn Store>> {
    match store {
        StoreKind::Json => {
            let s = JsonStore::open_default().await?;
            Ok(Arc::new(s))
        }
        StoreKind::Sqlite => {
            let p = db_path.unwrap_or_else(|| data_root().join("cardclip.sqlite3"));
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent).ok();
            }
            let s = SqliteStore::open_file(&p).await?;
            Ok(Arc::new(s))
        }
    }
}

async fn card_cmd(store: Arc<dyn Store>, cmd: CardCmd) -> Result<()> {
    match cmd {
        CardCmd::Add(a) => {
            let c = store.save_flashcard(&a.front, &a.back, &a.tags).await?;
            println!("{}", c.id);
        }
        CardCmd::List { tag, text } => {
            let mut cards = store.list_flashcards().await;
            if let Some(t) = tag {
                cards = filter_by_tag(&cards, &t);
            }
            if let Some(q) = text {
                cards = filter_by_text(&cards, &q);
            }
            cards.sort_by_key(|c| c.created_at);
            for c in cards {
                let tags = if c.tags.is_empty() {
                    "-".to_string()
                } else {
                    c.tags.join(";")
                };
                let reviewed = c
                    .last_reviewed
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "never".to_string());
                println!(
                    "{}\t{}\t{}\ttags={}\tlast_reviewed={}",
                    c.id, c.front, c.back, tags, reviewed
                );
            }
        }
        CardCmd::Rm { card_id } => {
            let id = parse_uuid(&card_id)?;
            if store.delete_flashcard(id).await? {
                println!("ok");
            } else {
                println!("not found");
            }
        }
        CardCmd::Edit(e) => {
            let id = parse_uuid(&e.card_id)?;
            let Some(mut card) = store.get_flashcard(id).await else {
                anyhow::bail!("card not found: {}", e.card_id);
            };

            if let Some(f) = e.front {
                card.front = f;
            }
            if let Some(b) = e.back {
                card.back = b;
            }

            if !e.add_tags.is_empty() || !e.rm_tags.is_empty() {
                let mut tags = card.tags.clone();
                for t in e.add_tags {
                    if !tags.iter().any(|x| x.eq_ignore_ascii_case(&t)) {
                        tags.push(t);
                    }
                }
                if !e.rm_tags.is_empty() {
                    tags.retain(|x| !e.rm_tags.iter().any(|r| x.eq_ignore_ascii_case(r)));
                }
                card.tags = tags;
            }

            let _ = store.update_flashcard(&card).await?;
            println!("ok");
        }
    }
    Ok(())
}

async fn review_cmd(store: Arc<dyn Store>, cmd: ReviewCmd) -> Result<()> {
    let now = Utc::now();
    let batch = next_review_batch(&*store, now, cmd.max).await;

    if batch.is_empty() {
        println!("no cards due");
        return Ok(());
    }

    let total = batch.len();
    let mut count = 0usize;
    for card in batch {
        count += 1;
        println!("\n[{}/{}] {}", count, total, card.id);
        println!("Q: {}", card.front);
        prompt_enter("[enter=show]")?;
        println!("A: {}", card.back);
        println!("[1=Hard, 2=Medium, 3=Easy, s=skip, q=quit]");
        let d = loop {
            let line = read_line("grade> ")?;
            match line.trim().to_lowercase().as_str() {
                "1" | "h" | "hard" => break Some(Difficulty::Hard),
                "2" | "m" | "med" | "medium" => break Some(Difficulty::Medium),
                "3" | "e" | "easy" => break Some(Difficulty::Easy),
                "s" | "skip" => break None,
                "q" | "quit" => return Ok(()),
                _ => {
                    println!("enter 1/2/3, s, or q");
                }
            }
        };

        if let Some(difficulty) = d {
            store.save_review(card.id, difficulty).await?;
            let reviews = store.reviews_for(card.id).await;
            println!("→ next due in {} day(s)", next_interval_days(&reviews));
        }
    }

    println!("\nreviewed {}", count);
    Ok(())
}

async fn due_cmd(store: Arc<dyn Store>) -> Result<()> {
    let mut due = due_flashcards(&*store, Utc::now()).await;
    due.sort_by_key(|c| c.created_at);
    if due.is_empty() {
        println!("no cards due");
        return Ok(());
    }
    for c in due {
        println!("{}\t{}", c.id, c.front);
    }
    Ok(())
}

async fn stats_cmd(store: Arc<dyn Store>) -> Result<()> {
    let reviews = store.list_reviews().await;
    let s = summarize(&reviews);
    println!(
        "reviews: {} (easy {}, medium {}, hard {})",
        s.totals.total, s.totals.easy, s.totals.medium, s.totals.hard
    );
    println!("accuracy: {:.0}%", s.totals.accuracy() * 100.0);
    println!(
        "daily streak: {}",
        daily_streak(&reviews, Utc::now().date_naive())
    );
    Ok(())
}

async fn export_cmd(store: Arc<dyn Store>, cmd: ExportCmd) -> Result<()> {
    match cmd {
        ExportCmd::Json { path } => {
            let mut cards = store.list_flashcards().await;
            cards.sort_by_key(|c| c.created_at);
            let bundle = ExportBundle {
                version: 1,
                flashcards: cards,
            };
            let s = serde_json::to_string_pretty(&bundle)?;
            std::fs::write(&path, s)?;
            println!("wrote {}", path.display());
        }
        ExportCmd::Csv { path } => {
            let mut cards = store.list_flashcards().await;
            cards.sort_by_key(|c| c.created_at);

            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record(["front", "back", "tags"])?;
            for c in cards {
                let tags = if c.tags.is_empty() {
                    "".to_string()
                } else {
                    c.tags.join(";")
                };
                wtr.write_record([c.front, c.back, tags])?;
            }
            wtr.flush()?;
            println!("wrote {}", path.display());
        }
    }
    Ok(())
}

async fn import_cmd(store: Arc<dyn Store>, cmd: ImportCmd) -> Result<()> {
    match cmd {
        ImportCmd::Json { path } => {
            let data = std::fs::read_to_string(&path)?;
            let bundle: ExportBundle = serde_json::from_str(&data)?;
            let mut n = 0usize;
            for c in bundle.flashcards {
                store.save_flashcard(&c.front, &c.back, &c.tags).await?;
                n += 1;
            }
            println!("imported {n}");
        }
        ImportCmd::Csv { path } => {
            let mut rdr = csv::Reader::from_path(&path)?;
            let mut n = 0usize;
            for rec in rdr.records() {
                let rec = rec?;
                let front = rec.get(0).unwrap_or("").to_string();
                let back = rec.get(1).unwrap_or("").to_string();
                let tags = rec
                    .get(2)
                    .unwrap_or("")
                    .split(';')
                    .filter(|s| !s.is_empty())
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>();
                store.save_flashcard(&front, &back, &tags).await?;
                n += 1;
            }
            println!("imported {n}");
        }
    }
    Ok(())
}

// ===== Helpers =====
fn parse_uuid(s: &str) -> Result<uuid::Uuid> {
    Uuid::parse_str(s).map_err(|_| anyhow!("invalid uuid"))
}

fn prompt_enter(label: &str) -> Result<()> {
    print!("{label}");
    stdout().flush().ok();
    let mut s = String::new();
    stdin().read_line(&mut s)?;
    Ok(())
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    stdout().flush().ok();
    let mut s = String::new();
    stdin().read_line(&mut s)?;
    Ok(s)
}

#[derive(serde::Serialize, serde::Deserialize)]
struct ExportBundle {
    version: u32,
    flashcards: Vec<Flashcard>,
}
