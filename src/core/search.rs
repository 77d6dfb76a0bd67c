use crate::core::{
    distance::{calculate_bounding_box, distance_to, is_within_bounding_box},
    filters::matches_criteria,
    normalize::normalize_all,
    ranking::sort_shops,
};
use crate::models::{FilterCriteria, GeoPoint, RankedShop, Shop, SourceRecord};

/// Result of one search pass
#[derive(Debug)]
pub struct SearchResult {
    pub shops: Vec<RankedShop>,
    /// Records fed into the pipeline
    pub total_candidates: usize,
    /// Records that survived filtering, before the limit was applied
    pub total_matched: usize,
}

/// Search orchestrator: filter, attach distance, radius cut, sort, limit
///
/// # Pipeline Stages
/// 1. Text, rating, price tier and category filters
/// 2. Distance from the reference point, when both points are known
/// 3. Radius cut (bounding box first, then haversine); unknown distances stay
/// 4. Sort by the selected key
/// 5. Truncate to the limit
#[derive(Debug, Clone)]
pub struct ShopSearch {
    max_limit: usize,
}

impl ShopSearch {
    pub fn new(max_limit: usize) -> Self {
        Self { max_limit }
    }

    /// Normalize raw records, then search them
    pub fn search_records(
        &self,
        records: Vec<SourceRecord>,
        criteria: &FilterCriteria,
        reference: Option<GeoPoint>,
    ) -> SearchResult {
        self.search(normalize_all(records), criteria, reference)
    }

    /// Run the pipeline over already normalized shops
    pub fn search(
        &self,
        shops: Vec<Shop>,
        criteria: &FilterCriteria,
        reference: Option<GeoPoint>,
    ) -> SearchResult {
        let total_candidates = shops.len();

        let mut ranked = filter_and_rank(shops, criteria, reference);
        let total_matched = ranked.len();

        let limit = criteria
            .limit
            .unwrap_or(self.max_limit)
            .min(self.max_limit);
        ranked.truncate(limit);

        tracing::debug!(
            "Search kept {} of {} shops ({} after limit {})",
            total_matched,
            total_candidates,
            ranked.len(),
            limit
        );

        SearchResult {
            shops: ranked,
            total_candidates,
            total_matched,
        }
    }
}

impl Default for ShopSearch {
    fn default() -> Self {
        Self::new(100)
    }
}

/// Filter, attach distances and sort; never fails and never truncates
pub fn filter_and_rank(
    shops: Vec<Shop>,
    criteria: &FilterCriteria,
    reference: Option<GeoPoint>,
) -> Vec<RankedShop> {
    let radius = criteria
        .max_distance_km
        .filter(|r| r.is_finite() && *r > 0.0);
    let radius_cut = reference.zip(radius).map(|(center, radius_km)| {
        (calculate_bounding_box(center, radius_km), radius_km)
    });

    let mut ranked: Vec<RankedShop> = shops
        .into_iter()
        .filter(|shop| matches_criteria(shop, criteria))
        .filter(|shop| match (&radius_cut, shop.coordinate()) {
            (Some((bbox, _)), Some(point)) => is_within_bounding_box(point, bbox),
            _ => true,
        })
        .filter_map(|shop| {
            let distance_km = distance_to(reference, shop.coordinate());
            match (&radius_cut, distance_km) {
                (Some((_, radius_km)), Some(d)) if d > *radius_km => None,
                _ => Some(RankedShop::new(shop, distance_km)),
            }
        })
        .collect();

    tracing::trace!("{} shops passed filters", ranked.len());

    sort_shops(&mut ranked, criteria.sort);
    ranked
}
