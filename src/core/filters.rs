use crate::models::{CategoryFilter, FilterCriteria, PriceFilter, Shop};

/// Case-insensitive substring match against the shop name and its services
///
/// A blank query matches every shop. A non-blank query is matched as typed,
/// surrounding spaces included.
#[inline]
pub fn matches_text(shop: &Shop, query: &str) -> bool {
    if query.trim().is_empty() {
        return true;
    }
    let needle = query.to_lowercase();

    shop.name.to_lowercase().contains(&needle)
        || shop
            .services
            .iter()
            .any(|service| service.to_lowercase().contains(&needle))
}

/// Rating must be at least `min_rating`; missing ratings were normalized to 0
#[inline]
pub fn meets_min_rating(shop: &Shop, min_rating: f64) -> bool {
    shop.rating >= min_rating
}

#[inline]
pub fn matches_price(shop: &Shop, price: &PriceFilter) -> bool {
    match price {
        PriceFilter::All => true,
        PriceFilter::Tier(tier) => shop.price_range == *tier,
    }
}

/// Category token against the services list, e.g. `brake-repair` hits "Brake Repair Plus"
#[inline]
pub fn matches_category(shop: &Shop, category: &CategoryFilter) -> bool {
    let Some(phrase) = category.phrase() else {
        return true;
    };
    let needle = phrase.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    shop.services
        .iter()
        .any(|service| service.to_lowercase().contains(&needle))
}

/// Text, rating, price tier and category filters, in that order
#[inline]
pub fn matches_criteria(shop: &Shop, criteria: &FilterCriteria) -> bool {
    matches_text(shop, &criteria.query)
        && meets_min_rating(shop, criteria.min_rating)
        && matches_price(shop, &criteria.price)
        && matches_category(shop, &criteria.category)
}
