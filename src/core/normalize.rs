//! Normalization from the known source shapes into [`Shop`].
//!
//! Nothing here fails: missing or malformed fields fall back to defaults
//! (empty strings, zero rating and review count, no coordinate, `$$`).

use crate::models::{ApiStore, CatalogShop, PriceTier, Shop, SourceRecord};

/// Location line used when a record carries no address at all
pub const LOCATION_UNAVAILABLE: &str = "Location unavailable";

/// Normalize one record of any known shape
pub fn normalize(record: SourceRecord) -> Shop {
    match record {
        SourceRecord::Api(store) => from_api_store(store),
        SourceRecord::Catalog(shop) => from_catalog_shop(shop),
    }
}

pub fn normalize_all<I>(records: I) -> Vec<Shop>
where
    I: IntoIterator<Item = SourceRecord>,
{
    records.into_iter().map(normalize).collect()
}

/// Adapter for stores from the REST API
///
/// Services come from the comma separated `servicesText`; the review count
/// prefers `reviewCount` and falls back to `ratingCount`.
pub fn from_api_store(store: ApiStore) -> Shop {
    let location = build_location(
        store.location.as_deref(),
        &[
            store.address.as_deref(),
            store.city.as_deref(),
            store.state.as_deref(),
        ],
    );
    let (lat, lng) = coordinate_pair(store.lat, store.lng);

    Shop {
        id: store.id.or(store.google_place_id).unwrap_or_default(),
        name: store.name.unwrap_or_default(),
        address: non_blank(store.address),
        city: non_blank(store.city),
        state: non_blank(store.state),
        postal_code: non_blank(store.postal_code),
        location,
        lat,
        lng,
        rating: store.rating.unwrap_or(0.0),
        review_count: store.review_count.or(store.rating_count).unwrap_or(0),
        price_range: price_tier(store.price_range.as_deref()),
        services: store
            .services_text
            .as_deref()
            .map(split_services)
            .unwrap_or_default(),
    }
}

/// Adapter for curated catalogue shops
///
/// Like the API adapter, the location line joins street, city and state
/// only; the postal code stays in its own field.
pub fn from_catalog_shop(shop: CatalogShop) -> Shop {
    let location = build_location(
        shop.location.as_deref(),
        &[
            shop.address.as_deref(),
            shop.city.as_deref(),
            shop.state.as_deref(),
        ],
    );
    let (lat, lng) = coordinate_pair(shop.lat, shop.lng);

    Shop {
        id: shop.id.unwrap_or_default(),
        name: shop.name.unwrap_or_default(),
        address: non_blank(shop.address),
        city: non_blank(shop.city),
        state: non_blank(shop.state),
        postal_code: non_blank(shop.postal_code),
        location,
        lat,
        lng,
        rating: shop.rating.unwrap_or(0.0),
        review_count: shop.review_count.unwrap_or(0),
        price_range: price_tier(shop.price_range.as_deref()),
        services: shop
            .services
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

/// Build the location line
///
/// An explicit, non-blank location wins. Otherwise the non-empty address
/// parts are joined with `", "`, falling back to [`LOCATION_UNAVAILABLE`].
pub fn build_location(explicit: Option<&str>, parts: &[Option<&str>]) -> String {
    if let Some(location) = explicit.map(str::trim).filter(|s| !s.is_empty()) {
        return location.to_string();
    }

    let joined = parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        LOCATION_UNAVAILABLE.to_string()
    } else {
        joined
    }
}

/// Split a comma separated service list, trimming and dropping empty tokens
pub fn split_services(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

// A half-known coordinate is no coordinate.
fn coordinate_pair(lat: Option<f64>, lng: Option<f64>) -> (Option<f64>, Option<f64>) {
    match (lat, lng) {
        (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => (Some(lat), Some(lng)),
        _ => (None, None),
    }
}

fn price_tier(value: Option<&str>) -> PriceTier {
    value.and_then(PriceTier::parse).unwrap_or_default()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
