use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RowExtractionError {
    #[error("no listing table under #{container}")]
    MissingTable { container: &'static str },
    #[error("expected {expected} rows, page has {found}")]
    Shortfall { expected: usize, found: usize },
    #[error("row {row} has {found} text nodes, need 2")]
    MissingText { row: usize, found: usize },
    #[error("row {row} has no link")]
    MissingLink { row: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed beer link {link:?}: {reason}")]
pub struct MalformedLinkError {
    pub link: String,
    pub reason: &'static str,
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Anything that can sink a single style pass.
#[derive(Debug, Error)]
pub enum StyleError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Rows(#[from] RowExtractionError),
    #[error(transparent)]
    Link(#[from] MalformedLinkError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
