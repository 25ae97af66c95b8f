use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{Method, StatusCode, header};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use ootd_core::model::StudyMaterialUpdate;
use ootd_core::{Coordinate, Recommendation, StudyMaterial};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const DELETED_MESSAGE: &str = "삭제되었습니다.";

/// Upper bound on one request. The recommendation pipeline makes four
/// upstream calls in sequence, each bounded by its own client timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the application router. Wide-open CORS: the API serves browser
/// frontends hosted elsewhere, and exposes nothing that cookies guard.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/test-weather", get(test_weather))
        .route("/recommend", post(recommend))
        .route("/api/study-materials", get(list_study_materials).post(create_study_material))
        .route("/api/study-materials/search", get(search_study_materials))
        .route(
            "/api/study-materials/{id}",
            put(update_study_material).delete(delete_study_material),
        )
        .layer(TimeoutLayer::with_status_code(StatusCode::GATEWAY_TIMEOUT, REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    lat: Option<String>,
    lon: Option<String>,
}

/// Probe endpoint: weather plus resolved address for a coordinate passed in
/// the query string. Invalid input echoes back what was received.
async fn test_weather(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WeatherQuery>,
) -> ApiResult<Json<Value>> {
    let (Some(lat), Some(lon)) = (query.lat.as_deref(), query.lon.as_deref()) else {
        return Err(ApiError::bad_request("both lat and lon query parameters are required")
            .with_received(query.lat.as_deref(), query.lon.as_deref()));
    };

    let coord = Coordinate::parse(lat, lon)
        .map_err(|err| ApiError::from(err).with_received(Some(lat), Some(lon)))?;

    let weather = state.recommender.current_weather(coord).await?;
    Ok(Json(json!({ "weather": weather })))
}

/// The main endpoint: coordinates in, weather plus outfit sets out.
async fn recommend(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Recommendation>> {
    let Json(body) = payload.map_err(|rejection| ApiError::bad_request(rejection_message(&rejection)))?;

    if !body.is_object() {
        return Err(ApiError::bad_request("the request body must be a JSON object"));
    }
    let (Some(lat), Some(lon)) = (body.get("lat"), body.get("lon")) else {
        return Err(ApiError::bad_request("both lat and lon are required"));
    };

    let coord = Coordinate::from_json(lat, lon)?;
    info!(lat = coord.lat(), lon = coord.lon(), "recommendation requested");

    let recommendation = state.recommender.recommend(coord).await?;
    Ok(Json(recommendation))
}

async fn list_study_materials(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<StudyMaterial>>> {
    Ok(Json(state.study.list().await?))
}

async fn create_study_material(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<StudyMaterial>> {
    let Json(body) = payload.map_err(|rejection| ApiError::bad_request(rejection_message(&rejection)))?;
    Ok(Json(state.study.create(&body).await?))
}

async fn update_study_material(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    payload: Result<Json<StudyMaterialUpdate>, JsonRejection>,
) -> ApiResult<Json<StudyMaterial>> {
    let Json(update) = payload.map_err(|rejection| ApiError::bad_request(rejection_message(&rejection)))?;
    Ok(Json(state.study.update(id, update).await?))
}

async fn delete_study_material(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    state.study.delete(id).await?;
    Ok(Json(json!({ "message": DELETED_MESSAGE })))
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    category: Option<String>,
}

async fn search_study_materials(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<StudyMaterial>>> {
    Ok(Json(state.study.search(query.q.as_deref(), query.category.as_deref()).await?))
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "the Content-Type header must be application/json".to_string()
        }
        other => format!("invalid JSON body: {}", other.body_text()),
    }
}
