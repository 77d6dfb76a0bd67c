use serde::{Deserialize, Serialize};

use crate::models::domain::{GeoPoint, RankedShop, Shop};
use crate::services::maps::LoadState;

/// Response for the shop search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_id: String,
    pub shops: Vec<RankedShop>,
    /// Records received from the stores API
    pub total_candidates: usize,
    /// Records left after filtering, before the limit
    pub total_matched: usize,
    /// Total reported by the stores API
    pub upstream_total: u64,
    pub reference_point: Option<GeoPoint>,
}

/// Response for the shop comparison endpoint, in upstream order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub shops: Vec<Shop>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Map script availability
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapsStatusResponse {
    #[serde(flatten)]
    pub state: LoadState,
    pub script_url: Option<String>,
}
