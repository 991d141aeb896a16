//! Per-row enrichment: query building, the two lookup calls, field mapping and the status policy.

use tracing::{debug, warn};

use crate::config::EnrichConfig;
use crate::places::{AddressComponent, PlaceDetails, PlacesClient};
use crate::types::{EnrichedRow, EnrichmentFields, Header, InputRow, Status};

/// Enriches rows of one table through a [`PlacesClient`].
///
/// Context columns are resolved against the header once, when the enricher is built.
pub struct Enricher<C> {
    client: C,
    config: EnrichConfig,
    company_idx: usize,
    context_idxs: Vec<usize>,
}

impl<C: PlacesClient> Enricher<C> {
    /// Create an enricher for tables with the given header.
    ///
    /// Configured context columns that are not in the header are skipped with a warning.
    pub fn new(client: C, config: EnrichConfig, header: &Header) -> Self {
        let context_idxs = config
            .context_columns
            .iter()
            .filter_map(|name| {
                let idx = header.index_of(name);
                if idx.is_none() {
                    warn!(column = %name, "context column not found in input, ignoring");
                }
                idx
            })
            .collect();

        Self {
            client,
            config,
            company_idx: header.company_idx,
            context_idxs,
        }
    }

    /// Configuration this enricher was built with.
    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Build the free-text search query for `row`, or `None` if the company name is blank.
    pub fn build_query(&self, row: &InputRow) -> Option<String> {
        let company = row.get(self.company_idx).trim();
        if company.is_empty() {
            return None;
        }

        let mut parts = vec![company];
        parts.extend(
            self.context_idxs
                .iter()
                .map(|&idx| row.get(idx).trim())
                .filter(|v| !v.is_empty()),
        );
        Some(parts.join(", "))
    }

    /// Enrich a single row. Never fails: every outcome is recorded in the returned status.
    pub fn enrich(&self, row: InputRow) -> EnrichedRow {
        let Some(query) = self.build_query(&row) else {
            return EnrichedRow::unresolved(row, Status::EmptyName);
        };

        let candidates = match self
            .client
            .text_search(&query, self.config.region.as_deref())
        {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(%query, error = %e, "text search failed");
                return EnrichedRow::unresolved(row, Status::error(e));
            }
        };

        let Some(top) = candidates.into_iter().next() else {
            debug!(%query, "no candidates");
            return EnrichedRow::unresolved(row, Status::NotFound);
        };
        debug!(
            %query,
            place_id = %top.place_id,
            name = top.name.as_deref().unwrap_or(""),
            address = top.formatted_address.as_deref().unwrap_or(""),
            "top candidate"
        );

        match self.client.place_details(&top.place_id) {
            Ok(details) => {
                let fields = map_details(&details);
                let status = Status::from_filled(fields.filled_count());
                debug!(%query, place_id = %top.place_id, status = status.label(), "resolved");
                EnrichedRow {
                    input: row,
                    fields,
                    status,
                }
            }
            Err(e) => {
                warn!(%query, place_id = %top.place_id, error = %e, "details lookup failed");
                EnrichedRow::unresolved(row, Status::Partial)
            }
        }
    }
}

/// Map a details payload onto the six enrichment fields.
pub fn map_details(details: &PlaceDetails) -> EnrichmentFields {
    let phone_number = details
        .international_phone_number
        .as_deref()
        .or(details.formatted_phone_number.as_deref())
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    let domain = details
        .website
        .as_deref()
        .and_then(extract_domain)
        .unwrap_or_default();

    let address = split_address(&details.address_components);

    EnrichmentFields {
        phone_number,
        domain,
        street: address.street,
        city: address.city,
        zip_code: address.zip_code,
        country: address.country,
    }
}

/// Host part of a website URL, lowercased, without `www.`.
///
/// `https://www.tesla.com/de_de?x=1` → `tesla.com`. Scheme-less input (`tesla.com/about`) is
/// accepted. Returns `None` if no host can be found.
pub fn extract_domain(website: &str) -> Option<String> {
    let website = website.trim();
    if website.is_empty() {
        return None;
    }

    let parsed = url::Url::parse(website)
        .ok()
        .filter(|u| u.has_host())
        .or_else(|| url::Url::parse(&format!("http://{website}")).ok())?;

    let host = parsed.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
struct AddressParts {
    street: String,
    city: String,
    zip_code: String,
    country: String,
}

fn split_address(components: &[AddressComponent]) -> AddressParts {
    let find = |ty: &str| {
        components
            .iter()
            .find(|c| c.has_type(ty))
            .map(|c| c.long_name.trim())
            .filter(|v| !v.is_empty())
    };

    let street = [find("street_number"), find("route")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    AddressParts {
        street,
        city: find("locality")
            .or_else(|| find("postal_town"))
            .unwrap_or("")
            .to_string(),
        zip_code: find("postal_code").unwrap_or("").to_string(),
        country: find("country").unwrap_or("").to_string(),
    }
}
