//! Run configuration, read once at startup and passed explicitly to each component.

use std::fmt;
use std::time::Duration;

/// Environment variable consulted when no API key is given on the command line.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Default pause after each row that made a network call.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Enrichment settings: credentials, query shaping and throttling.
#[derive(Clone, PartialEq)]
pub struct EnrichConfig {
    /// Places API key.
    pub api_key: String,
    /// Region bias (country code such as `de` or `us`) passed to the text search.
    pub region: Option<String>,
    /// Extra columns appended to the company name to build the search query, in order.
    pub context_columns: Vec<String>,
    /// Pause applied after every row that attempted a lookup.
    pub delay: Duration,
}

impl EnrichConfig {
    /// Create a config with the given key and defaults for everything else.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            region: None,
            context_columns: Vec::new(),
            delay: DEFAULT_DELAY,
        }
    }

    /// Parse a comma-separated column list (`"City, Country"`), dropping blank entries.
    pub fn parse_context_list(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Debug for EnrichConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichConfig")
            .field("api_key_set", &!self.api_key.is_empty())
            .field("region", &self.region)
            .field("context_columns", &self.context_columns)
            .field("delay", &self.delay)
            .finish()
    }
}
