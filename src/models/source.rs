//! Raw record shapes delivered by the known data sources.
//!
//! Every field is optional and deserialized leniently: a value of the wrong
//! type becomes `None` instead of failing the whole record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Store as returned by `GET /api/stores/search` and `GET /api/stores/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiStore {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub google_place_id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "lenient_count")]
    pub rating_count: Option<u32>,
    #[serde(deserialize_with = "lenient_count")]
    pub review_count: Option<u32>,
    #[serde(deserialize_with = "lenient_string")]
    pub price_range: Option<String>,
    /// Comma separated service names
    #[serde(deserialize_with = "lenient_string")]
    pub services_text: Option<String>,
}

/// Shop from the curated catalogue: services already a list, location preformatted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogShop {
    #[serde(deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lng: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rating: Option<f64>,
    #[serde(deserialize_with = "lenient_count")]
    pub review_count: Option<u32>,
    #[serde(deserialize_with = "lenient_string")]
    pub price_range: Option<String>,
    #[serde(deserialize_with = "lenient_string_list")]
    pub services: Vec<String>,
}

/// One record of a known source shape
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Api(ApiStore),
    Catalog(CatalogShop),
}

impl SourceRecord {
    /// Classify a loose JSON object.
    ///
    /// Objects carrying a `services` array are catalogue shops, everything
    /// else is read as an API store. Non-objects become an empty API store.
    pub fn from_json(value: Value) -> Self {
        let is_catalog = value
            .get("services")
            .is_some_and(Value::is_array);

        if is_catalog {
            Self::Catalog(serde_json::from_value(value).unwrap_or_default())
        } else {
            Self::Api(serde_json::from_value(value).unwrap_or_default())
        }
    }
}

impl From<ApiStore> for SourceRecord {
    fn from(store: ApiStore) -> Self {
        Self::Api(store)
    }
}

impl From<CatalogShop> for SourceRecord {
    fn from(shop: CatalogShop) -> Self {
        Self::Catalog(shop)
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.min(f64::from(u32::MAX)) as u32))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classifies_catalog_by_services_array() {
        let record = SourceRecord::from_json(json!({
            "id": "shop-1",
            "name": "Premium Auto Care",
            "services": ["Oil Change"]
        }));
        assert!(matches!(record, SourceRecord::Catalog(_)));
    }

    #[test]
    fn test_classifies_api_store_otherwise() {
        let record = SourceRecord::from_json(json!({
            "id": "1f0c",
            "name": "Metro Garage",
            "servicesText": "Oil Change, Brakes"
        }));
        assert!(matches!(record, SourceRecord::Api(_)));
    }

    #[test]
    fn test_wrong_types_degrade_to_none() {
        let record = SourceRecord::from_json(json!({
            "name": 42,
            "lat": "34.05",
            "lng": {"bad": true},
            "rating": "n/a",
            "ratingCount": -3
        }));
        let SourceRecord::Api(store) = record else {
            panic!("expected api store");
        };
        assert_eq!(store.name.as_deref(), Some("42"));
        assert_eq!(store.lat, Some(34.05));
        assert_eq!(store.lng, None);
        assert_eq!(store.rating, None);
        assert_eq!(store.rating_count, None);
    }

    #[test]
    fn test_non_object_becomes_empty_store() {
        let record = SourceRecord::from_json(json!("garbage"));
        assert_eq!(record, SourceRecord::Api(ApiStore::default()));
    }
}
