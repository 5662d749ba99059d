// Axum API Server Module
//
// Purpose: form page + JSON API over the shared PredictionService
// Model and city ranking are loaded once in AppState and never mutated

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use moka::future::Cache;

use serde_json::Value;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::context::AdvisoryContext;
use crate::reading::permitted_ranges;
use crate::response::PollutionResponse;
use crate::service::{PredictionError, PredictionService, UNEXPECTED_ERROR_MESSAGE};
use crate::validation::{validate_inputs, RawInputs, ValidationResult};
use crate::web::handlers::pages::home_page;

/// Hard cap on `/api/cities/top?limit=`
const MAX_CITY_LIMIT: usize = 50;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    /// Successful responses keyed by validated reading (the model is deterministic)
    pub cache: Cache<String, PollutionResponse>,
    pub top_cities: usize,
}

impl AppState {
    /// Load model + dataset from the configured paths
    pub fn new(settings: &Settings) -> Self {
        let context = AdvisoryContext::load(settings);
        Self::with_context(context, settings)
    }

    /// Build around an already-constructed context
    pub fn with_context(context: AdvisoryContext, settings: &Settings) -> Self {
        tracing::info!("Initializing Moka cache...");
        let cache = Cache::builder()
            .max_capacity(settings.cache_capacity)
            .time_to_live(Duration::from_secs(settings.cache_ttl_secs))
            .build();

        Self {
            service: Arc::new(PredictionService::new(context)),
            cache,
            top_cities: settings.top_cities,
        }
    }

    pub fn context(&self) -> &AdvisoryContext {
        self.service.context()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Form page
        .route("/", get(home_page))

        // Health check
        .route("/health", get(health_check))

        // JSON API
        .route("/api/ranges", get(get_ranges))
        .route("/api/pollution", post(predict_pollution))
        .route("/api/cities/top", get(get_top_cities))

        // Middleware (applied in reverse order)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "modelLoaded": state.context().model_available(),
        "citiesRanked": state.context().ranking().len(),
    }))
}

/// Permitted ranges keyed by field, for client-side validation
async fn get_ranges() -> impl IntoResponse {
    let ranges: serde_json::Map<String, Value> = permitted_ranges()
        .iter()
        .map(|r| {
            (
                r.key.to_string(),
                serde_json::json!({ "label": r.label, "min": r.min, "max": r.max }),
            )
        })
        .collect();
    Json(Value::Object(ranges))
}

/// Validate, predict, attach the city ranking.
/// Accepts a JSON object or a urlencoded form body.
async fn predict_pollution(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<PollutionResponse>, AppError> {
    let raw = parse_payload(&headers, &body);

    let reading = match validate_inputs(&raw) {
        ValidationResult::Valid(reading) => reading,
        ValidationResult::Invalid(errors) => {
            return Err(AppError::Prediction(PredictionError::Validation(errors)))
        }
    };

    let cache_key = format!("predict:{:?}", reading);
    if let Some(cached) = state.cache.get(&cache_key).await {
        tracing::debug!("Cache hit for prediction");
        return Ok(Json(cached));
    }

    // Inference is CPU-bound; keep it off the async workers
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.predict_reading(reading))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    let prediction = result.map_err(AppError::Prediction)?;
    let response = PollutionResponse::success(
        prediction,
        state.context().ranking().top_polluted(state.top_cities),
    );

    state.cache.insert(cache_key, response.clone()).await;

    Ok(Json(response))
}

#[derive(Debug, serde::Deserialize)]
struct TopCitiesQuery {
    limit: Option<usize>,
}

async fn get_top_cities(
    State(state): State<AppState>,
    Query(params): Query<TopCitiesQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(state.top_cities).min(MAX_CITY_LIMIT);
    let cities = state.context().ranking().top_polluted(limit);
    Json(serde_json::json!({
        "rows": cities.len(),
        "cities": cities,
    }))
}

// ============================================================================
// Request decoding
// ============================================================================

/// JSON bodies are decoded as an object; anything else is treated as a
/// urlencoded form. Malformed bodies decode to no inputs, which then fail
/// validation field by field.
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> RawInputs {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        serde_json::from_slice(body).unwrap_or_default()
    } else {
        parse_form(body)
    }
}

/// Urlencoded pairs; a repeated key keeps its first value
fn parse_form(body: &[u8]) -> RawInputs {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body).unwrap_or_default();

    let mut raw = RawInputs::new();
    for (key, value) in pairs {
        raw.entry(key).or_insert(Value::String(value));
    }
    raw
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Prediction(PredictionError),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            AppError::Prediction(e) => {
                let status = match e {
                    PredictionError::Validation(_) => StatusCode::BAD_REQUEST,
                    PredictionError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
                    PredictionError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, PollutionResponse::failure(&e))
            }
            AppError::Internal(msg) => {
                tracing::error!("Request failed: {}", msg);
                let body = PollutionResponse {
                    success: false,
                    message: Some(UNEXPECTED_ERROR_MESSAGE.to_string()),
                    errors: None,
                    prediction: None,
                    most_polluted: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}
