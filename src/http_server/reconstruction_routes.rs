//! Reconstruction HTTP Routes
//!
//! Endpoints for intake, checklist mutation, station and deployment
//! matching, and outbound records requests.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::ServiceProfile;
use crate::records_request::{RecordsRequest, RequestStatus};
use crate::service::{
    AssignmentResult, EngineError, InitializeResult, ItemUpdate, ItemUpdateResult,
    NewAssignment, ReconstructionService, ReconstructionStatistics, ReconstructionTree,
    RecordsRequestInput,
};

// ==================
// Shared State
// ==================

/// State shared across handlers
pub struct ApiState {
    pub service: Arc<ReconstructionService>,
    /// Dataset file re-read by `POST /reference/reload`; `None` reloads the
    /// compiled-in dataset
    pub reference_path: Option<PathBuf>,
}

impl ApiState {
    pub fn new(service: Arc<ReconstructionService>, reference_path: Option<PathBuf>) -> Self {
        Self {
            service,
            reference_path,
        }
    }
}

// ==================
// Request/Response Types
// ==================

#[derive(Debug, Deserialize)]
pub struct InitializeRequest {
    pub profile: ServiceProfile,
    #[serde(default)]
    pub veteran_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RequestStatusUpdate {
    pub status: RequestStatus,
}

#[derive(Debug, Serialize)]
pub struct ReconstructionListResponse {
    pub reconstructions: Vec<Uuid>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub retryable: bool,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<T, ApiError>;

pub(crate) fn error_response(err: EngineError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
            code: err.code().to_string(),
            retryable: err.is_retryable(),
        }),
    )
}

fn parse_id(kind: &str, raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        error_response(EngineError::InvalidInput(format!(
            "{} id is not a valid UUID: {}",
            kind, raw
        )))
    })
}

// ==================
// Routes
// ==================

/// Create reconstruction routes
pub fn reconstruction_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route(
            "/reconstructions",
            post(initialize_handler).get(list_reconstructions_handler),
        )
        .route("/reconstructions/:id", get(get_reconstruction_handler))
        .route("/reconstructions/:id/profile", put(correct_profile_handler))
        .route("/reconstructions/:id/statistics", get(statistics_handler))
        .route(
            "/reconstructions/:id/duty-stations",
            post(add_duty_station_handler),
        )
        .route(
            "/reconstructions/:id/deployments",
            post(add_deployment_handler),
        )
        .route(
            "/reconstructions/:id/records-requests",
            post(request_records_handler),
        )
        .route(
            "/reconstructions/:id/records-requests/missing",
            post(request_missing_records_handler),
        )
        .route("/items/:id", patch(update_item_handler))
        .route("/assignments/:id/rematch", post(rematch_handler))
        .route("/records-requests/:id", patch(update_request_status_handler))
        .route(
            "/records-requests/:id/regenerate",
            post(regenerate_request_handler),
        )
        .with_state(state)
}

// ==================
// Reconstruction Handlers
// ==================

async fn initialize_handler(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<InitializeRequest>,
) -> ApiResult<(StatusCode, Json<InitializeResult>)> {
    let result = state
        .service
        .initialize_reconstruction(&request.profile, request.veteran_name)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn list_reconstructions_handler(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<ReconstructionListResponse>> {
    let reconstructions = state
        .service
        .list_reconstructions()
        .map_err(error_response)?;
    Ok(Json(ReconstructionListResponse {
        total: reconstructions.len(),
        reconstructions,
    }))
}

async fn get_reconstruction_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReconstructionTree>> {
    let id = parse_id("reconstruction", &id)?;
    state
        .service
        .get_reconstruction(id)
        .map(Json)
        .map_err(error_response)
}

async fn correct_profile_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(profile): Json<ServiceProfile>,
) -> ApiResult<Json<InitializeResult>> {
    let id = parse_id("reconstruction", &id)?;
    state
        .service
        .correct_profile(id, &profile)
        .map(Json)
        .map_err(error_response)
}

async fn statistics_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ReconstructionStatistics>> {
    let id = parse_id("reconstruction", &id)?;
    state
        .service
        .get_statistics(id)
        .map(Json)
        .map_err(error_response)
}

// ==================
// Station / Deployment Handlers
// ==================

async fn add_duty_station_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(station): Json<NewAssignment>,
) -> ApiResult<(StatusCode, Json<AssignmentResult>)> {
    let id = parse_id("reconstruction", &id)?;
    let result = state
        .service
        .add_duty_station(id, station)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn add_deployment_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(deployment): Json<NewAssignment>,
) -> ApiResult<(StatusCode, Json<AssignmentResult>)> {
    let id = parse_id("reconstruction", &id)?;
    let result = state
        .service
        .add_deployment(id, deployment)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn rematch_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<AssignmentResult>> {
    let id = parse_id("assignment", &id)?;
    state
        .service
        .rematch_assignment(id)
        .map(Json)
        .map_err(error_response)
}

// ==================
// Item Handlers
// ==================

async fn update_item_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(update): Json<ItemUpdate>,
) -> ApiResult<Json<ItemUpdateResult>> {
    let id = parse_id("item", &id)?;
    state
        .service
        .update_checklist_item(id, update)
        .map(Json)
        .map_err(error_response)
}

// ==================
// Records Request Handlers
// ==================

async fn request_records_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(input): Json<RecordsRequestInput>,
) -> ApiResult<(StatusCode, Json<RecordsRequest>)> {
    let id = parse_id("reconstruction", &id)?;
    let request = state
        .service
        .request_records(id, input)
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn request_missing_records_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<RecordsRequest>>> {
    let id = parse_id("reconstruction", &id)?;
    state
        .service
        .request_missing_records(id)
        .map(Json)
        .map_err(error_response)
}

async fn regenerate_request_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<RecordsRequest>> {
    let id = parse_id("records request", &id)?;
    state
        .service
        .regenerate_request(id)
        .map(Json)
        .map_err(error_response)
}

async fn update_request_status_handler(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    Json(update): Json<RequestStatusUpdate>,
) -> ApiResult<Json<RecordsRequest>> {
    let id = parse_id("records request", &id)?;
    state
        .service
        .update_request_status(id, update.status)
        .map(Json)
        .map_err(error_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_mapping() {
        let (status, Json(body)) = error_response(EngineError::NotFound {
            kind: "item",
            id: "x".into(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.code, "VREC_NOT_FOUND");
        assert!(!body.retryable);
    }

    #[test]
    fn test_parse_id_rejects_garbage() {
        let (status, Json(body)) = parse_id("item", "not-a-uuid").unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, "VREC_INVALID_INPUT");
    }
}
