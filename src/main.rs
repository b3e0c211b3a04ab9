mod config;
mod db;
mod error;
mod fetcher;
mod parser;
mod pipeline;

use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::config::{Settings, ShortfallPolicy};

#[derive(Parser)]
#[command(name = "beer_styles", about = "Scrape top beers per style into a local document store")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every configured style, store the beers, build the index (default)
    Run {
        /// Only these style ids (repeatable; default: all configured styles)
        #[arg(short, long = "style")]
        styles: Vec<i64>,
        /// Keep the rows a short listing has instead of skipping the style
        #[arg(long)]
        partial: bool,
    },
    /// Create the (brew_id, beer_id) index only
    Index,
    /// Show stored beers per style
    Stats {
        /// List the beers stored for this style id
        #[arg(short, long)]
        style: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load()?;
    info!(db = %settings.db_path, base_url = %settings.base_url, "settings loaded");

    let conn = db::connect(&settings.db_path)?;
    db::init_schema(&conn)?;

    match cli.command.unwrap_or(Commands::Run {
        styles: Vec::new(),
        partial: false,
    }) {
        Commands::Run { styles, partial } => {
            let selected = settings.selected_styles(&styles);
            let mut window = settings.row_window();
            if partial {
                window.shortfall = ShortfallPolicy::Truncate;
            }

            if selected.is_empty() {
                println!("No configured style matches {:?}.", styles);
            } else {
                println!("Extracting top beers for {} styles...", selected.len());
            }
            // The index is built even when nothing was selected.
            let source = fetcher::HttpSource::new(settings.request_timeout_secs)?;
            let summary =
                pipeline::run(&source, &conn, &settings.base_url, &selected, &window).await?;
            summary.print();
        }
        Commands::Index => {
            db::create_style_index(&conn)?;
            println!("Index {} ready.", db::STYLE_INDEX);
        }
        Commands::Stats { style: Some(style_id) } => {
            let beers = db::load_beers(&conn, style_id)?;
            for (i, b) in beers.iter().enumerate() {
                println!(
                    "{:>3} | {:<32} | {:<32} | {:>6} | {:>6}",
                    i + 1,
                    b.beer_name,
                    b.brew_name,
                    b.brew_id,
                    b.beer_id
                );
            }
            println!("\n{} beers stored for style {}", beers.len(), style_id);
        }
        Commands::Stats { style: None } => {
            let counts = db::style_counts(&conn)?;
            if counts.is_empty() {
                println!("No beers stored. Run 'run' first.");
            }
            for c in &counts {
                println!("{:>4} | {:<24} | {:>3}", c.style_id, c.style_name, c.beers);
            }
            println!(
                "\n{} beers | index {}",
                db::count_beers(&conn)?,
                if db::has_style_index(&conn)? { "present" } else { "missing" }
            );
        }
    }

    db::close(conn)?;
    info!("Done in {:.1}s", t0.elapsed().as_secs_f64());
    Ok(())
}
