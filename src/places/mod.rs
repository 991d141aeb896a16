//! Places lookup: the client seam used by the enricher, plus the Google Places implementation.
//!
//! The enricher only talks to [`PlacesClient`]. Payload types mirror the subset of the Google
//! Places "Text Search" and "Place Details" responses this crate reads.

mod google;

use serde::Deserialize;
use thiserror::Error;

pub use google::{DETAILS_ENDPOINT, GooglePlacesClient, TEXT_SEARCH_ENDPOINT};

/// Failure of a single lookup call. Never aborts a batch; the enricher turns it into a row status.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Connection, DNS, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success HTTP status.
    #[error("http status {0}")]
    HttpStatus(u16),

    /// The API answered but reported a failure (`REQUEST_DENIED`, `OVER_QUERY_LIMIT`, ...).
    #[error("api status {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Api {
        status: String,
        message: Option<String>,
    },

    /// The response body was not the expected JSON.
    #[error("malformed response: {0}")]
    Decode(String),
}

/// A place record returned by a text search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    /// Opaque place identifier, used for the details call.
    pub place_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

/// One structured address part, e.g. `{"long_name": "Berlin", "types": ["locality", ...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    /// Whether this component carries the given type tag.
    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }
}

/// Fields returned by a details call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceDetails {
    #[serde(default)]
    pub international_phone_number: Option<String>,
    #[serde(default)]
    pub formatted_phone_number: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

/// Text search and details lookups against a places provider.
pub trait PlacesClient {
    /// Search for places matching a free-text `query`, optionally biased towards `region`.
    ///
    /// An empty vector means no match; that is not an error.
    fn text_search(&self, query: &str, region: Option<&str>) -> Result<Vec<Candidate>, LookupError>;

    /// Fetch phone, website and address for a candidate.
    fn place_details(&self, place_id: &str) -> Result<PlaceDetails, LookupError>;
}

impl<C: PlacesClient + ?Sized> PlacesClient for &C {
    fn text_search(&self, query: &str, region: Option<&str>) -> Result<Vec<Candidate>, LookupError> {
        (**self).text_search(query, region)
    }

    fn place_details(&self, place_id: &str) -> Result<PlaceDetails, LookupError> {
        (**self).place_details(place_id)
    }
}
