// Tour Dashboard - Web Server
// JSON dashboard API + CSV download with Axum

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tour_dashboard::{
    age_bounds, apply, date_bounds, destinations, to_csv_string, AgeRange, CriteriaParams,
    DashboardConfig, DashboardView, DatasetCache, DateRange, FilterCriteria, Record, ViewOptions,
    EXPORT_FILE_NAME,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    cache: Arc<DatasetCache>,
    options: ViewOptions,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Widget extents for the filter controls
#[derive(Serialize)]
struct DestinationsResponse {
    destinations: Vec<String>,
    age_bounds: Option<AgeRange>,
    date_bounds: Option<DateRange>,
}

fn load_error<T: Serialize>(e: anyhow::Error) -> Response {
    eprintln!("Error loading dataset: {:#}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::<T>::err(format!("{:#}", e))),
    )
        .into_response()
}

/// Turn the query string into criteria; bad values become a 400 in the usual envelope
fn parse_criteria(
    query: Result<Query<CriteriaParams>, QueryRejection>,
) -> Result<FilterCriteria, Response> {
    match query {
        Ok(Query(params)) => Ok(FilterCriteria::from(params)),
        Err(rejection) => Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<()>::err(rejection.body_text())),
        )
            .into_response()),
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/destinations - Distinct destinations and slider bounds
async fn get_destinations(State(state): State<AppState>) -> impl IntoResponse {
    match state.cache.get() {
        Ok(records) => {
            let response = DestinationsResponse {
                destinations: destinations(&records),
                age_bounds: age_bounds(&records),
                date_bounds: date_bounds(&records),
            };

            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => load_error::<DestinationsResponse>(e),
    }
}

/// GET /api/dashboard - Every chart's data for the given filters
async fn get_dashboard(
    State(state): State<AppState>,
    query: Result<Query<CriteriaParams>, QueryRejection>,
) -> impl IntoResponse {
    let criteria = match parse_criteria(query) {
        Ok(criteria) => criteria,
        Err(response) => return response,
    };

    match state.cache.get() {
        Ok(records) => {
            let view = DashboardView::build(&records, &criteria, &state.options);
            (StatusCode::OK, Json(ApiResponse::ok(view))).into_response()
        }
        Err(e) => load_error::<DashboardView>(e),
    }
}

/// GET /api/records - Filtered records
async fn get_records(
    State(state): State<AppState>,
    query: Result<Query<CriteriaParams>, QueryRejection>,
) -> impl IntoResponse {
    let criteria = match parse_criteria(query) {
        Ok(criteria) => criteria,
        Err(response) => return response,
    };

    match state.cache.get() {
        Ok(records) => {
            let filtered = apply(&records, &criteria);
            (StatusCode::OK, Json(ApiResponse::ok(filtered))).into_response()
        }
        Err(e) => load_error::<Vec<Record>>(e),
    }
}

/// GET /api/export.csv - Filtered records as a CSV download
async fn export_csv(
    State(state): State<AppState>,
    query: Result<Query<CriteriaParams>, QueryRejection>,
) -> impl IntoResponse {
    let criteria = match parse_criteria(query) {
        Ok(criteria) => criteria,
        Err(response) => return response,
    };

    let records = match state.cache.get() {
        Ok(records) => records,
        Err(e) => return load_error::<()>(e),
    };

    match to_csv_string(&apply(&records, &criteria)) {
        Ok(body) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => {
            eprintln!("Error exporting CSV: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err(format!("{:#}", e))),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("🌐 Tour Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Optional config path as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => match DashboardConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ {:#}", e);
                std::process::exit(1);
            }
        },
        None => DashboardConfig::default(),
    };

    let cache = Arc::new(DatasetCache::new(config.source.clone()));

    // Load before serving so no request waits on the fetch
    println!("📂 Loading dataset from {}...", cache.source());
    let warm = Arc::clone(&cache);
    match tokio::task::spawn_blocking(move || warm.get()).await {
        Ok(Ok(records)) => println!("✓ Loaded {} records", records.len()),
        Ok(Err(e)) => {
            eprintln!("❌ Failed to load dataset: {:#}", e);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("❌ Dataset loader panicked: {}", e);
            std::process::exit(1);
        }
    }

    // Create shared state
    let state = AppState {
        cache,
        options: config.view_options(),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/destinations", get(get_destinations))
        .route("/dashboard", get(get_dashboard))
        .route("/records", get(get_records))
        .route("/export.csv", get(export_csv))
        .with_state(state);

    // Build main router
    let app = Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive());

    // Start server
    let addr = config.server_addr.as_str();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/dashboard?min_age=20&max_age=50", addr);
    println!("   CSV: http://{}/api/export.csv", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    fn query(uri: &str) -> Result<Query<CriteriaParams>, QueryRejection> {
        let uri: Uri = uri.parse().unwrap();
        Query::try_from_uri(&uri)
    }

    #[test]
    fn test_valid_query_becomes_criteria() {
        let criteria = parse_criteria(query("/api/dashboard?destinations=Goa,Agra&min_age=25"))
            .unwrap();

        assert_eq!(criteria.destinations.len(), 2);
        assert_eq!(criteria.age_range, AgeRange::new(25, u32::MAX));
    }

    #[tokio::test]
    async fn test_invalid_query_is_a_bad_request_envelope() {
        let response = match parse_criteria(query("/api/dashboard?min_age=old")) {
            Ok(_) => panic!("min_age=old should be rejected"),
            Err(response) => response,
        };

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(!json["error"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_bad_date_is_rejected() {
        assert!(parse_criteria(query("/api/records?start=yesterday")).is_err());
    }
}
