use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Optional settings file (TOML) read from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "beers.toml";
pub const DEFAULT_DB_PATH: &str = "data/breweries.sqlite";
pub const DEFAULT_BASE_URL: &str = "https://www.beeradvocate.com/beer/style/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header rows at the top of the listing table (1-based data rows start after them).
pub const HEADER_ROWS: usize = 3;
/// Data rows taken per style. The listing is sorted by review count.
pub const MAX_ROWS: usize = 50;

/// A beer style to scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRef {
    pub style_id: i64,
    pub style_name: String,
}

impl StyleRef {
    pub fn new(style_id: i64, style_name: &str) -> Self {
        Self {
            style_id,
            style_name: style_name.to_string(),
        }
    }
}

/// What to do when a listing has fewer rows than the window expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortfallPolicy {
    /// Skip the whole style.
    #[default]
    Abort,
    /// Keep the rows that exist.
    Truncate,
}

/// Contiguous range of table rows holding beer listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowWindow {
    pub header_rows: usize,
    pub max_rows: usize,
    pub shortfall: ShortfallPolicy,
}

impl Default for RowWindow {
    fn default() -> Self {
        Self {
            header_rows: HEADER_ROWS,
            max_rows: MAX_ROWS,
            shortfall: ShortfallPolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub base_url: String,
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub partial_rows: bool,
    #[serde(default = "default_styles")]
    pub styles: Vec<StyleRef>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Defaults, then the settings file at `path` if present (`[[styles]]`
    /// tables replace the built-in list), then `BEERS_*` environment variables.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let settings: Settings = ::config::Config::builder()
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("request_timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("partial_rows", false)?
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(::config::Environment::with_prefix("BEERS"))
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        ensure!(
            settings.request_timeout_secs > 0,
            "Invalid settings: request_timeout_secs must be at least 1"
        );
        Ok(settings)
    }

    pub fn row_window(&self) -> RowWindow {
        RowWindow {
            shortfall: if self.partial_rows {
                ShortfallPolicy::Truncate
            } else {
                ShortfallPolicy::Abort
            },
            ..RowWindow::default()
        }
    }

    /// Configured styles, restricted to `only` when it is non-empty.
    pub fn selected_styles(&self, only: &[i64]) -> Vec<StyleRef> {
        self.styles
            .iter()
            .filter(|s| only.is_empty() || only.contains(&s.style_id))
            .cloned()
            .collect()
    }
}

pub fn default_styles() -> Vec<StyleRef> {
    vec![
        StyleRef::new(155, "American Pale Lager"),
        StyleRef::new(159, "American Porter"),
        StyleRef::new(73, "American Brown Ale"),
        StyleRef::new(175, "American Black Ale"),
        StyleRef::new(40, "Czech Pilsener"),
    ]
}
