use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::extractors::ApiPath;
use crate::error::CatalogError;
use crate::logic::HierarchyService;
use crate::model::{ClientHierarchy, ClientSummary, Id};
use crate::store::traits::Store;

pub type AppState<S> = Arc<S>;

/// Envelope shared by every endpoint: `{ success, data?, message? }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn ok_with_message(data: T, message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Map a logic-layer error onto a status code and envelope.
///
/// Store failures are logged with `failure_message` as context and reported
/// to the caller as that message only.
pub fn error_response(err: CatalogError, failure_message: &str) -> ApiError {
    let status = match &err {
        CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::Validation(_) | CatalogError::Conflict(_) => StatusCode::BAD_REQUEST,
        CatalogError::ReferenceDataMissing(_) => {
            log::error!("{}: {}", failure_message, err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        CatalogError::StoreUnavailable(_) | CatalogError::InvalidReference { .. } => {
            log::error!("{}: {}", failure_message, err);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::failure(failure_message)),
            );
        }
    };

    (status, Json(ApiResponse::failure(&err.to_string())))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "Structra API is running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn route_not_found() -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::failure("Route not found")),
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClientsPayload {
    pub clients: Vec<ClientSummary>,
}

pub async fn get_client_hierarchy<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(client_id): ApiPath<Id>,
) -> Result<Json<ApiResponse<ClientHierarchy>>, ApiError> {
    HierarchyService::get_client_hierarchy(&*store, client_id)
        .await
        .map(|tree| Json(ApiResponse::ok(tree)))
        .map_err(|e| error_response(e, "Error fetching hierarchy"))
}

pub async fn get_all_clients_with_companies<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<ApiResponse<ClientsPayload>>, ApiError> {
    HierarchyService::get_all_clients_with_companies(&*store)
        .await
        .map(|clients| Json(ApiResponse::ok(ClientsPayload { clients })))
        .map_err(|e| error_response(e, "Error fetching clients"))
}
