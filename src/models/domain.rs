use serde::{Deserialize, Serialize};

use crate::core::distance::km_to_miles;

/// A point on the globe in decimal degrees (WGS-84)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(point: GeoPoint) -> Self {
        geo::Point::new(point.lng, point.lat)
    }
}

/// Price tier shown as dollar signs in listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "$")]
    Budget,
    #[default]
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Premium,
}

impl PriceTier {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "$" => Some(Self::Budget),
            "$$" => Some(Self::Moderate),
            "$$$" => Some(Self::Premium),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Premium => "$$$",
        }
    }
}

/// Price selection in the filter panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceFilter {
    #[default]
    All,
    Tier(PriceTier),
}

impl PriceFilter {
    /// Parse `"all"`, `"$"`, `"$$"` or `"$$$"`. Anything else selects all tiers.
    pub fn parse(value: &str) -> Self {
        PriceTier::parse(value).map_or(Self::All, Self::Tier)
    }
}

/// Service category selection, e.g. `brake-repair`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Token(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        let token = value.trim();
        if token.is_empty() || token.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Token(token.to_string())
        }
    }

    /// The category as a service phrase: dashes become spaces.
    pub fn phrase(&self) -> Option<String> {
        match self {
            Self::All => None,
            Self::Token(token) => Some(token.replace('-', " ")),
        }
    }
}

/// Result ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Rating descending, then review count descending
    #[default]
    Best,
    Rating,
    Reviews,
    #[serde(alias = "closest")]
    Distance,
}

impl SortKey {
    /// Unknown keys fall back to best match.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "rating" => Self::Rating,
            "reviews" | "review_count" | "reviewcount" => Self::Reviews,
            "distance" | "closest" => Self::Distance,
            _ => Self::Best,
        }
    }
}

/// Canonical shop record produced by the normalizer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    /// Human readable location line
    pub location: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: f64,
    pub review_count: u32,
    pub price_range: PriceTier,
    pub services: Vec<String>,
}

impl Shop {
    /// Coordinate of the shop, present only when both halves are known
    pub fn coordinate(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

/// Shop with its distance from the searcher, if known
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedShop {
    #[serde(flatten)]
    pub shop: Shop,
    pub distance_km: Option<f64>,
    pub distance_miles: Option<f64>,
}

impl RankedShop {
    pub fn new(shop: Shop, distance_km: Option<f64>) -> Self {
        Self {
            shop,
            distance_km,
            distance_miles: distance_km.map(km_to_miles),
        }
    }
}

/// Filter panel state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Free text matched against name and services
    pub query: String,
    pub min_rating: f64,
    pub price: PriceFilter,
    pub category: CategoryFilter,
    /// Search radius; ignored unless positive and a reference point is known
    pub max_distance_km: Option<f64>,
    pub sort: SortKey,
    pub limit: Option<usize>,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}
