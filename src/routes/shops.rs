use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::SearchSettings;
use crate::core::{
    distance::miles_to_km,
    normalize::{normalize, normalize_all},
    ShopSearch,
};
use crate::models::{
    CategoryFilter, CompareRequest, CompareResponse, ErrorResponse, HealthResponse,
    MapsStatusResponse, SearchRequest, SearchResponse,
};
use crate::services::{HttpScriptSource, LoadState, MapsLoader, StoreSearchParams, StoresClient, StoresError};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub stores: Arc<StoresClient>,
    pub maps: Arc<MapsLoader<HttpScriptSource>>,
    pub search: ShopSearch,
    pub search_settings: SearchSettings,
    /// Stores requested from the upstream API per search
    pub fetch_limit: u32,
}

/// Configure all shop routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/shops/search", web::get().to(search_shops))
        .route("/shops/compare", web::get().to(compare_shops))
        .route("/shops/{id}", web::get().to(get_shop))
        .route("/maps/status", web::get().to(maps_status));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Build the upstream query the same way the browser client does
pub fn upstream_params(
    req: &SearchRequest,
    fetch_limit: u32,
    default_radius_miles: f64,
) -> StoreSearchParams {
    let category = req
        .category
        .as_deref()
        .map(CategoryFilter::parse)
        .unwrap_or_default();

    let mut params = StoreSearchParams {
        q: Some(req.trimmed_query().to_string()),
        limit: Some(fetch_limit),
        offset: Some(0),
        min_rating: req.min_rating,
        services: category.phrase(),
        ..Default::default()
    };

    if let Some(point) = req.reference_point() {
        params.lat = Some(point.lat);
        params.lng = Some(point.lng);
        params.radius_km = Some(miles_to_km(req.radius_miles.unwrap_or(default_radius_miles)));
    }

    params
}

/// Search shops endpoint
///
/// GET /api/v1/shops/search?q=brake&minRating=4&price=$$&category=brake-repair&sort=distance&lat=34.05&lng=-118.25&radiusMiles=10&limit=20
async fn search_shops(
    state: web::Data<AppState>,
    query: web::Query<SearchRequest>,
) -> impl Responder {
    let req = query.into_inner();

    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }
    if req.has_partial_coordinate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "lat and lng must be sent together".to_string(),
            status_code: 400,
        });
    }

    let reference = req.reference_point();
    let mut criteria = req.to_criteria(state.search_settings.default_limit);
    if reference.is_some() && criteria.max_distance_km.is_none() {
        criteria.max_distance_km = Some(miles_to_km(state.search_settings.default_radius_miles));
    }

    let params = upstream_params(&req, state.fetch_limit, state.search_settings.default_radius_miles);

    tracing::info!(
        "Searching shops: q={:?}, sort={:?}, located={}",
        criteria.query,
        criteria.sort,
        reference.is_some()
    );

    let page = match state.stores.search(&params).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to fetch stores: {}", e);
            return HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch stores".to_string(),
                message: e.to_string(),
                status_code: 502,
            });
        }
    };

    let upstream_total = page.total;
    let records = page.into_records();

    tracing::debug!("Fetched {} stores (upstream total {})", records.len(), upstream_total);

    let result = state.search.search_records(records, &criteria, reference);

    let response = SearchResponse {
        search_id: uuid::Uuid::new_v4().to_string(),
        shops: result.shops,
        total_candidates: result.total_candidates,
        total_matched: result.total_matched,
        upstream_total,
        reference_point: reference,
    };

    tracing::info!(
        "Returning {} shops (from {} candidates)",
        response.shops.len(),
        response.total_candidates
    );

    HttpResponse::Ok().json(response)
}

fn upstream_error(context: &str, e: &StoresError) -> HttpResponse {
    match e {
        StoresError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: "Not found".to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        _ => {
            tracing::error!("{}: {}", context, e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: context.to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}

/// Shop details endpoint
///
/// GET /api/v1/shops/{id}
async fn get_shop(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    tracing::info!("Fetching shop {}", id);

    match state.stores.get_store(&id).await {
        Ok(record) => HttpResponse::Ok().json(normalize(record)),
        Err(e) => upstream_error("Failed to fetch store", &e),
    }
}

/// Shop comparison endpoint
///
/// GET /api/v1/shops/compare?ids=a,b,c&sort=RATING&direction=DESC
async fn compare_shops(
    state: web::Data<AppState>,
    query: web::Query<CompareRequest>,
) -> impl Responder {
    let req = query.into_inner();
    let ids = req.id_list();

    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }
    if ids.is_empty() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: "at least one store id is required".to_string(),
            status_code: 400,
        });
    }

    tracing::info!("Comparing {} shops", ids.len());

    match state
        .stores
        .compare(&ids, req.sort.as_deref(), req.direction.as_deref())
        .await
    {
        Ok(comparison) => HttpResponse::Ok().json(CompareResponse {
            shops: normalize_all(comparison.into_records()),
        }),
        Err(e) => upstream_error("Failed to compare stores", &e),
    }
}

/// Map script status endpoint
///
/// GET /api/v1/maps/status
///
/// Triggers the one-time load on first use; later calls report the outcome.
async fn maps_status(state: web::Data<AppState>) -> impl Responder {
    if let Err(e) = state.maps.ensure_loaded().await {
        tracing::debug!("Map script unavailable: {}", e);
    }

    let loaded = state.maps.state().await;
    let script_url = match loaded {
        LoadState::Ready => state.maps.script_url(),
        _ => None,
    };

    HttpResponse::Ok().json(MapsStatusResponse {
        state: loaded,
        script_url,
    })
}
