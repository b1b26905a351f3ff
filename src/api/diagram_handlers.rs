use axum::{extract::State, http::StatusCode, response::Json};

use crate::api::extractors::{ApiJson, ApiPath};
use crate::api::handlers::{error_response, ApiError, ApiResponse, AppState};
use crate::logic::DiagramOperations;
use crate::model::{
    Artifact, ArtifactDetail, ArtifactUpdate, DiagramContent, Id, NewDiagram, UserContext,
};
use crate::store::traits::Store;

pub async fn list_function_diagrams<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(function_id): ApiPath<Id>,
) -> Result<Json<ApiResponse<Vec<Artifact>>>, ApiError> {
    DiagramOperations::list_for_function(&*store, function_id)
        .await
        .map(|diagrams| Json(ApiResponse::ok(diagrams)))
        .map_err(|e| error_response(e, "Error fetching diagrams"))
}

pub async fn get_diagram<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<ApiResponse<ArtifactDetail>>, ApiError> {
    DiagramOperations::get(&*store, id)
        .await
        .map(|diagram| Json(ApiResponse::ok(diagram)))
        .map_err(|e| error_response(e, "Error fetching diagram"))
}

pub async fn create_diagram<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(function_id): ApiPath<Id>,
    user: UserContext,
    ApiJson(diagram): ApiJson<NewDiagram>,
) -> Result<(StatusCode, Json<ApiResponse<Artifact>>), ApiError> {
    let diagram = DiagramOperations::create(&*store, function_id, diagram, &user)
        .await
        .map_err(|e| error_response(e, "Error creating diagram"))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(diagram, "Diagram created successfully")),
    ))
}

pub async fn update_diagram<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(update): ApiJson<ArtifactUpdate>,
) -> Result<Json<ApiResponse<Artifact>>, ApiError> {
    DiagramOperations::update(&*store, id, update)
        .await
        .map(|diagram| Json(ApiResponse::ok_with_message(diagram, "Diagram updated successfully")))
        .map_err(|e| error_response(e, "Error updating diagram"))
}

pub async fn delete_diagram<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    DiagramOperations::delete(&*store, id)
        .await
        .map(|()| Json(ApiResponse::message("Diagram deleted successfully")))
        .map_err(|e| error_response(e, "Error deleting diagram"))
}

pub async fn save_diagram_content<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(content): ApiJson<DiagramContent>,
) -> Result<Json<ApiResponse<Artifact>>, ApiError> {
    DiagramOperations::save_content(&*store, id, content)
        .await
        .map(|diagram| {
            Json(ApiResponse::ok_with_message(
                diagram,
                "Diagram content saved successfully",
            ))
        })
        .map_err(|e| error_response(e, "Error saving diagram content"))
}
