pub mod links;
pub mod rows;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{RowWindow, StyleRef};
use crate::error::{MalformedLinkError, StyleError};
use rows::RawRows;

/// One beer listed under a style. Stored as-is as a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeerRecord {
    pub beer_id: i64,
    pub brew_id: i64,
    pub style_id: i64,
    pub beer_name: String,
    pub brew_name: String,
    pub style_name: String,
}

/// Two-step pipeline: listing HTML → raw rows → records for `style`.
pub fn parse_style_page(
    html: &str,
    style: &StyleRef,
    window: &RowWindow,
) -> Result<Vec<BeerRecord>, StyleError> {
    let doc = Html::parse_document(html);
    let raw = rows::extract_rows(&doc, window)?;
    debug!(style_id = style.style_id, rows = raw.len(), "rows extracted");
    Ok(assemble(&raw, style)?)
}

/// Zip the raw columns into records. One bad link fails the batch.
pub fn assemble(
    raw: &RawRows,
    style: &StyleRef,
) -> Result<Vec<BeerRecord>, MalformedLinkError> {
    raw.links
        .iter()
        .zip(&raw.beer_names)
        .zip(&raw.brew_names)
        .map(|((link, beer_name), brew_name)| {
            let (brew_id, beer_id) = links::parse_ids(link)?;
            Ok(BeerRecord {
                beer_id,
                brew_id,
                style_id: style.style_id,
                beer_name: beer_name.clone(),
                brew_name: brew_name.clone(),
                style_name: style.style_name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShortfallPolicy;
    use crate::error::RowExtractionError;

    fn lager() -> StyleRef {
        StyleRef::new(155, "American Pale Lager")
    }

    fn page(name: &str) -> String {
        std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap()
    }

    #[test]
    fn fifty_records_tagged_with_style() {
        let records = parse_style_page(&page("style_155"), &lager(), &RowWindow::default()).unwrap();
        assert_eq!(records.len(), 50);
        assert!(records.iter().all(|r| r.style_id == 155));
        assert!(records.iter().all(|r| r.style_name == "American Pale Lager"));
        assert!(records
            .iter()
            .all(|r| !r.beer_name.is_empty() && !r.brew_name.is_empty()));

        let first = &records[0];
        assert_eq!(first.beer_id, 65);
        assert_eq!(first.brew_id, 29);
        assert_eq!(first.beer_name, "Budweiser");
        assert_eq!(first.brew_name, "Anheuser-Busch");

        assert_eq!(records[1].brew_id, 1002);
        assert_eq!(records[1].beer_id, 5002);
    }

    #[test]
    fn short_page_is_a_shortfall() {
        let err = parse_style_page(&page("style_short"), &lager(), &RowWindow::default()).unwrap_err();
        assert!(matches!(
            err,
            StyleError::Rows(RowExtractionError::Shortfall { found: 12, .. })
        ));
    }

    #[test]
    fn short_page_truncated() {
        let window = RowWindow {
            shortfall: ShortfallPolicy::Truncate,
            ..RowWindow::default()
        };
        let records = parse_style_page(&page("style_short"), &lager(), &window).unwrap();
        assert_eq!(records.len(), 12);
        assert_eq!(records[11].beer_id, 7012);
    }

    #[test]
    fn one_bad_link_fails_batch() {
        let raw = RawRows {
            beer_names: vec!["Good".into(), "Bad".into()],
            brew_names: vec!["Brewery A".into(), "Brewery B".into()],
            links: vec!["/beer/profile/1/2/".into(), "/beer/3/".into()],
        };
        let err = assemble(&raw, &lager()).unwrap_err();
        assert_eq!(err.link, "/beer/3/");
    }

    #[test]
    fn record_serializes_flat() {
        let rec = BeerRecord {
            beer_id: 65,
            brew_id: 29,
            style_id: 155,
            beer_name: "Budweiser".into(),
            brew_name: "Anheuser-Busch".into(),
            style_name: "American Pale Lager".into(),
        };
        let v = serde_json::to_value(&rec).unwrap();
        assert_eq!(v["brew_id"], 29);
        assert_eq!(v["beer_id"], 65);
        assert_eq!(v["style_name"], "American Pale Lager");
    }
}
