use std::cmp::Ordering;

use crate::models::{RankedShop, SortKey};

/// Order two shops under the given sort key
///
/// - `Best`: rating descending, then review count descending
/// - `Rating`: rating descending
/// - `Reviews`: review count descending
/// - `Distance`: distance ascending, unknown distances last
pub fn compare(a: &RankedShop, b: &RankedShop, key: SortKey) -> Ordering {
    match key {
        SortKey::Best => by_rating_desc(a, b).then_with(|| by_reviews_desc(a, b)),
        SortKey::Rating => by_rating_desc(a, b),
        SortKey::Reviews => by_reviews_desc(a, b),
        SortKey::Distance => by_distance_asc(a, b),
    }
}

/// Sort in place; ties beyond the stated tie-break keep no particular order
pub fn sort_shops(shops: &mut [RankedShop], key: SortKey) {
    shops.sort_unstable_by(|a, b| compare(a, b, key));
}

#[inline]
fn by_rating_desc(a: &RankedShop, b: &RankedShop) -> Ordering {
    b.shop.rating.total_cmp(&a.shop.rating)
}

#[inline]
fn by_reviews_desc(a: &RankedShop, b: &RankedShop) -> Ordering {
    b.shop.review_count.cmp(&a.shop.review_count)
}

#[inline]
fn by_distance_asc(a: &RankedShop, b: &RankedShop) -> Ordering {
    let ad = a.distance_km.unwrap_or(f64::INFINITY);
    let bd = b.distance_km.unwrap_or(f64::INFINITY);
    ad.total_cmp(&bd)
}
