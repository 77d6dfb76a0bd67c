// Core pipeline exports
pub mod distance;
pub mod filters;
pub mod normalize;
pub mod ranking;
pub mod search;

pub use distance::{haversine_distance, calculate_bounding_box, is_within_bounding_box, km_to_miles, miles_to_km};
pub use filters::{matches_text, meets_min_rating, matches_price, matches_category, matches_criteria};
pub use normalize::{normalize, normalize_all};
pub use ranking::{compare, sort_shops};
pub use search::{filter_and_rank, SearchResult, ShopSearch};
