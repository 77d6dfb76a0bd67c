use crate::models::SourceRecord;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the stores API
#[derive(Debug, Error)]
pub enum StoresError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Query for `GET /stores/search`
///
/// Unset parameters are left out of the query string. `minRating` is only
/// sent when positive and `q` only when non-empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSearchParams {
    pub q: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius_km: Option<f64>,
    pub min_rating: Option<f64>,
    pub services: Option<String>,
}

impl StoreSearchParams {
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Some(q) = self.q.as_deref().filter(|q| !q.is_empty()) {
            pairs.push(("q", q.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(sort) = self.sort.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("sort", sort.to_string()));
        }
        if let Some(direction) = self.direction.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("direction", direction.to_string()));
        }
        if let Some(lat) = self.lat {
            pairs.push(("lat", lat.to_string()));
        }
        if let Some(lng) = self.lng {
            pairs.push(("lng", lng.to_string()));
        }
        if let Some(radius_km) = self.radius_km {
            pairs.push(("radiusKm", radius_km.to_string()));
        }
        if let Some(min_rating) = self.min_rating.filter(|r| *r > 0.0) {
            pairs.push(("minRating", min_rating.to_string()));
        }
        if let Some(services) = self.services.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("services", services.to_string()));
        }

        pairs
            .into_iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(&value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// One page of `GET /stores/search`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreSearchPage {
    pub items: Vec<Value>,
    pub limit: u32,
    pub offset: u32,
    pub total: u64,
}

impl StoreSearchPage {
    /// Classify the raw items into known source shapes
    pub fn into_records(self) -> Vec<SourceRecord> {
        self.items.into_iter().map(SourceRecord::from_json).collect()
    }
}

/// Response of `GET /stores/compare`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreComparison {
    pub stores: Vec<Value>,
}

impl StoreComparison {
    pub fn into_records(self) -> Vec<SourceRecord> {
        self.stores.into_iter().map(SourceRecord::from_json).collect()
    }
}

/// Query string for `GET /stores/compare`: one `ids` pair per id, then the optional sort
pub fn compare_query_string(ids: &[String], sort: Option<&str>, direction: Option<&str>) -> String {
    let mut pairs: Vec<(&str, &str)> = ids.iter().map(|id| ("ids", id.as_str())).collect();

    if let Some(sort) = sort.filter(|s| !s.is_empty()) {
        pairs.push(("sort", sort));
    }
    if let Some(direction) = direction.filter(|s| !s.is_empty()) {
        pairs.push(("direction", direction));
    }

    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Stores REST API client
///
/// Handles communication with the upstream stores service:
/// - Searching stores
/// - Fetching a single store
/// - Comparing a set of stores
pub struct StoresClient {
    base_url: String,
    client: Client,
}

impl StoresClient {
    /// Create a new stores client; `base_url` is the API root, e.g. `http://api:8080/api`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, StoresError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    /// Search stores
    pub async fn search(&self, params: &StoreSearchParams) -> Result<StoreSearchPage, StoresError> {
        let qs = params.to_query_string();
        let url = if qs.is_empty() {
            self.url("stores/search")
        } else {
            format!("{}?{}", self.url("stores/search"), qs)
        };

        tracing::debug!("Searching stores: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(StoresError::ApiError(format!(
                "Store search failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        if !json.is_object() {
            return Err(StoresError::InvalidResponse("Expected a search page object".into()));
        }

        serde_json::from_value(json)
            .map_err(|e| StoresError::InvalidResponse(format!("Malformed search page: {}", e)))
    }

    /// Fetch a single store by id
    pub async fn get_store(&self, id: &str) -> Result<SourceRecord, StoresError> {
        let url = self.url(&format!("stores/{}", urlencoding::encode(id)));

        tracing::debug!("Fetching store from: {}", url);

        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoresError::NotFound(format!("Store {} not found", id)));
        }
        if !response.status().is_success() {
            return Err(StoresError::ApiError(format!(
                "Failed to fetch store: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        if !json.is_object() {
            return Err(StoresError::InvalidResponse("Expected a store object".into()));
        }

        Ok(SourceRecord::from_json(json))
    }

    /// Compare stores side by side; the API returns them in its own sort order
    pub async fn compare(
        &self,
        ids: &[String],
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<StoreComparison, StoresError> {
        let url = format!(
            "{}?{}",
            self.url("stores/compare"),
            compare_query_string(ids, sort, direction)
        );

        tracing::debug!("Comparing {} stores: {}", ids.len(), url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(StoresError::ApiError(format!(
                "Store comparison failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        if !json.is_object() {
            return Err(StoresError::InvalidResponse("Expected a comparison object".into()));
        }

        serde_json::from_value(json)
            .map_err(|e| StoresError::InvalidResponse(format!("Malformed comparison: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_skips_empty_values() {
        let params = StoreSearchParams {
            q: Some(String::new()),
            limit: Some(25),
            offset: Some(0),
            min_rating: Some(0.0),
            ..Default::default()
        };
        assert_eq!(params.to_query_string(), "limit=25&offset=0");
    }

    #[test]
    fn test_query_string_encodes_values() {
        let params = StoreSearchParams {
            q: Some("brake & tire".to_string()),
            lat: Some(34.05),
            lng: Some(-118.25),
            radius_km: Some(16.0934),
            min_rating: Some(4.5),
            services: Some("oil change".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.to_query_string(),
            "q=brake%20%26%20tire&lat=34.05&lng=-118.25&radiusKm=16.0934&minRating=4.5&services=oil%20change"
        );
    }

    #[test]
    fn test_page_into_records() {
        let page: StoreSearchPage = serde_json::from_value(serde_json::json!({
            "items": [{"name": "A"}, {"name": "B", "services": ["Oil Change"]}],
            "total": 2
        }))
        .unwrap();

        let records = page.into_records();
        assert!(matches!(records[0], SourceRecord::Api(_)));
        assert!(matches!(records[1], SourceRecord::Catalog(_)));
    }

    #[test]
    fn test_compare_query_string_repeats_ids() {
        let ids = vec!["a1".to_string(), "b 2".to_string()];

        assert_eq!(
            compare_query_string(&ids, Some("RATING"), Some("DESC")),
            "ids=a1&ids=b%202&sort=RATING&direction=DESC"
        );
        assert_eq!(compare_query_string(&ids[..1], None, Some("")), "ids=a1");
    }
}
