use scraper::{ElementRef, Html, Selector};

use crate::config::{RowWindow, ShortfallPolicy};
use crate::error::RowExtractionError;

pub const CONTAINER_ID: &str = "ba-content";

/// Index-aligned columns pulled out of the listing table, in page order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RawRows {
    pub beer_names: Vec<String>,
    pub brew_names: Vec<String>,
    pub links: Vec<String>,
}

impl RawRows {
    pub fn len(&self) -> usize {
        self.links.len()
    }
}

/// Walk the row window of the listing table.
///
/// Each row yields its first two non-blank text nodes (beer, then brewery) and
/// the href of its first link. A short table is handled per `window.shortfall`;
/// any other bad row fails the whole page.
pub fn extract_rows(doc: &Html, window: &RowWindow) -> Result<RawRows, RowExtractionError> {
    let table_sel = Selector::parse(&format!("#{} > table", CONTAINER_ID)).unwrap();
    let link_sel = Selector::parse("a[href]").unwrap();

    let table = doc
        .select(&table_sel)
        .next()
        .ok_or(RowExtractionError::MissingTable {
            container: CONTAINER_ID,
        })?;

    let data_rows: Vec<ElementRef> = table_rows(table)
        .into_iter()
        .skip(window.header_rows)
        .take(window.max_rows)
        .collect();

    if data_rows.len() < window.max_rows && window.shortfall == ShortfallPolicy::Abort {
        return Err(RowExtractionError::Shortfall {
            expected: window.max_rows,
            found: data_rows.len(),
        });
    }

    let mut out = RawRows::default();
    for (i, row) in data_rows.into_iter().enumerate() {
        let position = window.header_rows + i + 1;

        let mut texts = row.text().map(str::trim).filter(|t| !t.is_empty());
        let (beer, brewery) = match (texts.next(), texts.next()) {
            (Some(beer), Some(brewery)) => (beer, brewery),
            (first, _) => {
                return Err(RowExtractionError::MissingText {
                    row: position,
                    found: usize::from(first.is_some()),
                })
            }
        };

        let link = row
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or(RowExtractionError::MissingLink { row: position })?;

        out.beer_names.push(beer.to_string());
        out.brew_names.push(brewery.to_string());
        out.links.push(link.to_string());
    }

    Ok(out)
}

/// `tr` children of the table in order, looking through row groups the HTML
/// parser may have inserted (`tbody`).
fn table_rows(table: ElementRef) -> Vec<ElementRef> {
    let mut rows = Vec::new();
    for child in table.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|el| el.value().name() == "tr"),
            ),
            _ => {}
        }
    }
    rows
}
