//! WrenchIt Search - shop search and geo-aware ranking for the WrenchIt auto shop directory
//!
//! The core is a pure pipeline: normalize raw store records, filter them by
//! text, rating, price tier and service category, attach distances from the
//! searcher and sort. A small actix-web service runs the same pipeline over
//! stores fetched from the upstream stores API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{ShopSearch, SearchResult, filter_and_rank, distance::haversine_distance, normalize::normalize};
pub use crate::models::{FilterCriteria, GeoPoint, RankedShop, Shop, SortKey, SourceRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let point = GeoPoint::new(34.0522, -118.2437);
        assert_eq!(haversine_distance(point, point), 0.0);
        assert_eq!(SortKey::default(), SortKey::Best);
    }
}
