use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;
use wrenchit_search::config::Settings;
use wrenchit_search::core::ShopSearch;
use wrenchit_search::routes::{self, shops::AppState};
use wrenchit_search::services::{maps, HttpScriptSource, MapsLoader, StoresClient};

/// JSON body for rejected query strings
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

fn io_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io_error(e)
    })?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }

    info!("Starting WrenchIt search service...");

    let stores = StoresClient::new(
        settings.stores.base_url.clone(),
        Duration::from_secs(settings.stores.timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to create stores client: {}", e);
        io_error(e)
    })?;

    info!("Stores client initialized ({})", settings.stores.base_url);

    let api_key = maps::resolve_api_key(settings.maps.api_key.as_deref());
    if api_key.is_none() {
        error!("Google Maps API key is missing; map status will report failure");
    }
    let script_source = HttpScriptSource::new(
        settings.maps.script_url.clone(),
        api_key,
        Duration::from_secs(settings.maps.timeout_secs),
    )
    .map_err(|e| {
        error!("Failed to create map script source: {}", e);
        io_error(e)
    })?;

    let search = ShopSearch::new(settings.search.max_limit);

    info!(
        "Search initialized (default limit {}, max limit {}, default radius {} mi)",
        settings.search.default_limit,
        settings.search.max_limit,
        settings.search.default_radius_miles
    );

    let app_state = AppState {
        stores: Arc::new(stores),
        maps: Arc::new(MapsLoader::new(script_source)),
        search,
        search_settings: settings.search.clone(),
        fetch_limit: settings.stores.fetch_limit,
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
