//! Blocking Google Places client.

use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Candidate, LookupError, PlaceDetails, PlacesClient};

/// Text Search endpoint.
pub const TEXT_SEARCH_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
/// Place Details endpoint.
pub const DETAILS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/details/json";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DETAILS_FIELDS: &str =
    "international_phone_number,formatted_phone_number,website,address_components";

const STATUS_OK: &str = "OK";
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<Candidate>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    #[serde(default)]
    result: Option<PlaceDetails>,
    #[serde(default)]
    error_message: Option<String>,
}

/// Google Places API client over a blocking HTTP agent.
pub struct GooglePlacesClient {
    agent: ureq::Agent,
    api_key: String,
    text_search_url: String,
    details_url: String,
}

impl GooglePlacesClient {
    /// Create a client for the public Google endpoints.
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            api_key: api_key.into(),
            text_search_url: TEXT_SEARCH_ENDPOINT.to_string(),
            details_url: DETAILS_ENDPOINT.to_string(),
        }
    }

    /// Point the client at different endpoints (a proxy or a local stub server).
    pub fn with_endpoints(
        mut self,
        text_search_url: impl Into<String>,
        details_url: impl Into<String>,
    ) -> Self {
        self.text_search_url = text_search_url.into();
        self.details_url = details_url.into();
        self
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, LookupError> {
        let mut request = self.agent.get(url).query("key", &self.api_key);
        for (k, v) in params {
            request = request.query(*k, *v);
        }

        let mut response = request.call().map_err(map_ureq_error)?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        serde_json::from_str(&body).map_err(|e| LookupError::Decode(e.to_string()))
    }
}

impl PlacesClient for GooglePlacesClient {
    fn text_search(&self, query: &str, region: Option<&str>) -> Result<Vec<Candidate>, LookupError> {
        let mut params = vec![("query", query)];
        if let Some(region) = region {
            params.push(("region", region));
        }

        debug!(query, region, "text search");
        let resp: TextSearchResponse = self.get_json(&self.text_search_url, &params)?;
        match resp.status.as_str() {
            STATUS_OK => Ok(resp.results),
            STATUS_ZERO_RESULTS => Ok(Vec::new()),
            _ => Err(LookupError::Api {
                status: resp.status,
                message: resp.error_message,
            }),
        }
    }

    fn place_details(&self, place_id: &str) -> Result<PlaceDetails, LookupError> {
        debug!(place_id, "place details");
        let resp: DetailsResponse = self.get_json(
            &self.details_url,
            &[("place_id", place_id), ("fields", DETAILS_FIELDS)],
        )?;
        if resp.status != STATUS_OK {
            return Err(LookupError::Api {
                status: resp.status,
                message: resp.error_message,
            });
        }
        Ok(resp.result.unwrap_or_default())
    }
}

fn map_ureq_error(err: ureq::Error) -> LookupError {
    match err {
        ureq::Error::StatusCode(code) => LookupError::HttpStatus(code),
        other => LookupError::Transport(other.to_string()),
    }
}
