use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::config::{RowWindow, StyleRef};
use crate::db;
use crate::error::StyleError;
use crate::fetcher::{self, PageSource};
use crate::parser;

/// How one style's pass ended.
#[derive(Debug)]
pub enum StyleOutcome {
    Written { style: StyleRef, records: usize },
    Skipped { style: StyleRef, reason: StyleError },
}

impl StyleOutcome {
    pub fn style(&self) -> &StyleRef {
        match self {
            StyleOutcome::Written { style, .. } | StyleOutcome::Skipped { style, .. } => style,
        }
    }
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<StyleOutcome>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, StyleOutcome::Written { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    pub fn records(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                StyleOutcome::Written { records, .. } => *records,
                StyleOutcome::Skipped { .. } => 0,
            })
            .sum()
    }

    pub fn print(&self) {
        for o in &self.outcomes {
            let style = o.style();
            match o {
                StyleOutcome::Written { records, .. } => {
                    println!("  {:>4}  {:<24} {} beers", style.style_id, style.style_name, records)
                }
                StyleOutcome::Skipped { reason, .. } => {
                    println!("  {:>4}  {:<24} skipped: {}", style.style_id, style.style_name, reason)
                }
            }
        }
        println!(
            "{} styles written, {} skipped, {} beers stored.",
            self.written(),
            self.skipped(),
            self.records()
        );
    }
}

/// Fetch → extract → assemble → write for a single style.
/// Nothing is written unless every row made it through.
pub async fn process_style<S: PageSource>(
    source: &S,
    conn: &Connection,
    base_url: &str,
    style: &StyleRef,
    window: &RowWindow,
) -> Result<usize, StyleError> {
    let url = fetcher::style_url(base_url, style.style_id);
    debug!(style_id = style.style_id, "fetching {}", url);
    let html = source.fetch(&url).await?;

    debug!(style_id = style.style_id, bytes = html.len(), "extracting");
    let beers = parser::parse_style_page(&html, style, window)?;

    debug!(style_id = style.style_id, beers = beers.len(), "writing");
    Ok(db::insert_beers(conn, &beers)?)
}

/// Process every style in order, then build the compound index.
/// A failed style is skipped; a failed index build fails the run.
pub async fn run<S: PageSource>(
    source: &S,
    conn: &Connection,
    base_url: &str,
    styles: &[StyleRef],
    window: &RowWindow,
) -> Result<RunSummary> {
    db::init_schema(conn)?;

    let pb = ProgressBar::new(styles.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );

    let mut summary = RunSummary::default();
    for style in styles {
        pb.set_message(style.style_name.clone());
        info!("Extracting style {} ({})", style.style_id, style.style_name);

        let outcome = match process_style(source, conn, base_url, style, window).await {
            Ok(records) => {
                info!("Stored {} beers for {}", records, style.style_name);
                StyleOutcome::Written {
                    style: style.clone(),
                    records,
                }
            }
            Err(reason) => {
                warn!("Skipping style {} ({}): {}", style.style_id, style.style_name, reason);
                StyleOutcome::Skipped {
                    style: style.clone(),
                    reason,
                }
            }
        };
        summary.outcomes.push(outcome);
        pb.inc(1);
    }
    pb.finish_and_clear();

    db::create_style_index(conn).context("Failed to create style index")?;
    info!("Index {} ready", db::STYLE_INDEX);

    Ok(summary)
}
