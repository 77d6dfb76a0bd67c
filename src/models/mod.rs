// Model exports
pub mod domain;
pub mod requests;
pub mod responses;
pub mod source;

pub use domain::{BoundingBox, CategoryFilter, FilterCriteria, GeoPoint, PriceFilter, PriceTier, RankedShop, Shop, SortKey};
pub use requests::{CompareRequest, SearchRequest};
pub use responses::{CompareResponse, ErrorResponse, HealthResponse, MapsStatusResponse, SearchResponse};
pub use source::{ApiStore, CatalogShop, SourceRecord};
