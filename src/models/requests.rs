use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::distance::miles_to_km;
use crate::models::domain::{CategoryFilter, FilterCriteria, GeoPoint, PriceFilter, SortKey};

/// Query parameters of `GET /api/v1/shops/search`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[validate(length(max = 200))]
    pub q: Option<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    pub min_rating: Option<f64>,
    /// `all`, `$`, `$$` or `$$$`
    pub price: Option<String>,
    /// `all` or a category token such as `brake-repair`
    pub category: Option<String>,
    /// `best`, `rating`, `reviews` or `distance`
    pub sort: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: Option<f64>,
    #[validate(range(min = 0.1, max = 300.0))]
    pub radius_miles: Option<f64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u16>,
}

impl SearchRequest {
    /// The searcher's position, when both coordinates were sent
    pub fn reference_point(&self) -> Option<GeoPoint> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }

    /// True when only one half of the coordinate pair was sent
    pub fn has_partial_coordinate(&self) -> bool {
        self.lat.is_some() != self.lng.is_some()
    }

    pub fn trimmed_query(&self) -> &str {
        self.q.as_deref().map(str::trim).unwrap_or_default()
    }

    /// Build the filter criteria; `default_limit` applies when no limit was sent
    pub fn to_criteria(&self, default_limit: usize) -> FilterCriteria {
        FilterCriteria {
            query: self.q.clone().unwrap_or_default(),
            min_rating: self.min_rating.unwrap_or(0.0),
            price: self.price.as_deref().map(PriceFilter::parse).unwrap_or_default(),
            category: self
                .category
                .as_deref()
                .map(CategoryFilter::parse)
                .unwrap_or_default(),
            max_distance_km: self.radius_miles.map(miles_to_km),
            sort: self.sort.as_deref().map(SortKey::parse).unwrap_or_default(),
            limit: Some(self.limit.map_or(default_limit, usize::from)),
        }
    }
}

/// Query parameters of `GET /api/v1/shops/compare`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CompareRequest {
    /// Comma separated store ids
    #[validate(length(min = 1, max = 1000))]
    pub ids: String,
    /// Passed through to the stores API, e.g. `RATING`
    pub sort: Option<String>,
    /// `ASC` or `DESC`
    pub direction: Option<String>,
}

impl CompareRequest {
    /// Distinct, non-blank ids in the order they were sent
    pub fn id_list(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for id in self.ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            if !ids.iter().any(|seen| seen == id) {
                ids.push(id.to_string());
            }
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::PriceTier;

    #[test]
    fn test_to_criteria_defaults() {
        let criteria = SearchRequest::default().to_criteria(25);

        assert_eq!(criteria.query, "");
        assert_eq!(criteria.min_rating, 0.0);
        assert_eq!(criteria.price, PriceFilter::All);
        assert_eq!(criteria.category, CategoryFilter::All);
        assert_eq!(criteria.sort, SortKey::Best);
        assert_eq!(criteria.max_distance_km, None);
        assert_eq!(criteria.limit, Some(25));
    }

    #[test]
    fn test_to_criteria_parses_selections() {
        let request = SearchRequest {
            q: Some("  brake ".to_string()),
            min_rating: Some(4.0),
            price: Some("$$$".to_string()),
            category: Some("oil-change".to_string()),
            sort: Some("closest".to_string()),
            radius_miles: Some(10.0),
            limit: Some(5),
            ..Default::default()
        };
        let criteria = request.to_criteria(25);

        // Kept verbatim; the text filter only trims to detect a blank query
        assert_eq!(criteria.query, "  brake ");
        assert_eq!(criteria.price, PriceFilter::Tier(PriceTier::Premium));
        assert_eq!(criteria.category, CategoryFilter::Token("oil-change".to_string()));
        assert_eq!(criteria.sort, SortKey::Distance);
        assert!((criteria.max_distance_km.unwrap() - 16.0934).abs() < 1e-9);
        assert_eq!(criteria.limit, Some(5));
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let request = SearchRequest {
            min_rating: Some(7.0),
            lat: Some(123.0),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_partial_coordinate() {
        let request = SearchRequest {
            lat: Some(34.0),
            ..Default::default()
        };
        assert!(request.has_partial_coordinate());
        assert!(request.reference_point().is_none());
    }

    #[test]
    fn test_compare_id_list_dedupes_in_order() {
        let request = CompareRequest {
            ids: "b, a,,b ,c".to_string(),
            ..Default::default()
        };
        assert_eq!(request.id_list(), vec!["b", "a", "c"]);

        let blank = CompareRequest {
            ids: " , ".to_string(),
            ..Default::default()
        };
        assert!(blank.id_list().is_empty());
    }
}
