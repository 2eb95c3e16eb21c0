use super::place::{PlaceCandidate, PlaceOracle};
use crate::{
    error::{PlannerError, Result},
    services::places_client::PlacesHttpClient,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const DETAIL_FIELDS: &str = "name,formatted_address,rating,type,photo";
const PHOTO_MAX_WIDTH: u32 = 400;
const MISSING: &str = "N/A";

/// Place lookups backed by the Google Places web service (Text Search and
/// Details endpoints).
#[derive(Debug, Clone)]
pub struct GooglePlacesOracle {
    client: PlacesHttpClient,
}

impl GooglePlacesOracle {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: PlacesHttpClient::new(api_key.into()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client.set_base_url(base_url);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client.set_timeout(timeout);
        self
    }

    /// Build the oracle from `GOOGLE_PLACES_API_KEY` and optionally
    /// `GOOGLE_PLACES_BASE_URL`
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GOOGLE_PLACES_API_KEY").map_err(|_| {
            PlannerError::Config("Missing GOOGLE_PLACES_API_KEY env var".to_string())
        })?;
        let mut oracle = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GOOGLE_PLACES_BASE_URL") {
            oracle.client.set_base_url(base_url);
        }
        Ok(oracle)
    }

    /// URL serving the photo behind a `photo_reference`
    pub fn photo_url(&self, photo_ref: &str) -> String {
        format!(
            "{}?maxwidth={}&photoreference={}&key={}",
            self.client.endpoint_url("photo"),
            PHOTO_MAX_WIDTH,
            photo_ref,
            self.client.api_key()
        )
    }

    /// Look up a single place by its Places id
    pub async fn place_details(&self, place_id: &str) -> Result<PlaceCandidate> {
        let body = self
            .client
            .get_json(
                "details/json",
                &[("place_id", place_id), ("fields", DETAIL_FIELDS)],
            )
            .await?;

        check_status(&body, false)?;

        let result = body.get("result").ok_or_else(|| {
            PlannerError::PlaceLookup(format!("No details returned for place {place_id}"))
        })?;

        parse_place_node(result).ok_or_else(|| {
            PlannerError::PlaceLookup(format!("Malformed details for place {place_id}"))
        })
    }
}

#[async_trait]
impl PlaceOracle for GooglePlacesOracle {
    fn name(&self) -> &'static str {
        "google_places"
    }

    async fn search(
        &self,
        query: &str,
        type_hint: &str,
        destination: &str,
    ) -> Result<Vec<PlaceCandidate>> {
        let full_query = format!("{} {}", query, destination);
        debug!(target: "tripbudget::places", query = %full_query, type_hint, "text search");

        let body = self
            .client
            .get_json(
                "textsearch/json",
                &[("query", full_query.as_str()), ("type", type_hint)],
            )
            .await?;

        parse_search_response(&body)
    }
}

/// Fail on any `status` other than `OK` (and `ZERO_RESULTS` when allowed)
fn check_status(body: &Value, allow_zero_results: bool) -> Result<()> {
    match body.get("status").and_then(|value| value.as_str()) {
        None | Some("OK") => Ok(()),
        Some("ZERO_RESULTS") if allow_zero_results => Ok(()),
        Some(status) => {
            let detail = body
                .get("error_message")
                .and_then(|value| value.as_str())
                .unwrap_or("no error message");
            Err(PlannerError::PlaceLookup(format!(
                "Places API returned status {status}: {detail}"
            )))
        }
    }
}

pub(crate) fn parse_search_response(body: &Value) -> Result<Vec<PlaceCandidate>> {
    check_status(body, true)?;

    let Some(results) = body.get("results").and_then(|value| value.as_array()) else {
        return Ok(Vec::new());
    };

    let places = results
        .iter()
        .filter_map(|node| {
            let parsed = parse_place_node(node);
            if parsed.is_none() {
                warn!(target: "tripbudget::places", "skipping malformed place entry");
            }
            parsed
        })
        .collect();

    Ok(places)
}

fn parse_place_node(node: &Value) -> Option<PlaceCandidate> {
    let object = node.as_object()?;

    let text = |field: &str| {
        object
            .get(field)
            .and_then(|value| value.as_str())
            .unwrap_or(MISSING)
            .to_string()
    };

    let rating = object
        .get("rating")
        .and_then(|value| value.as_f64())
        .unwrap_or(0.0);

    let photo_ref = object
        .get("photos")
        .and_then(|photos| photos.as_array())
        .and_then(|photos| photos.first())
        .and_then(|photo| photo.get("photo_reference"))
        .and_then(|value| value.as_str())
        .map(|s| s.to_string());

    Some(PlaceCandidate {
        name: text("name"),
        description: text("formatted_address"),
        rating,
        photo_ref,
    })
}
