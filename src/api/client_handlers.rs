use axum::{extract::State, http::StatusCode, response::Json};

use crate::api::extractors::{ApiJson, ApiPath};
use crate::api::handlers::{error_response, ApiError, ApiResponse, AppState};
use crate::logic::ClientOperations;
use crate::model::{Client, ClientDetail, ClientListing, Id, NewClient, UserContext};
use crate::store::traits::Store;

pub async fn list_clients<S: Store>(
    State(store): State<AppState<S>>,
) -> Result<Json<ApiResponse<Vec<ClientListing>>>, ApiError> {
    ClientOperations::list(&*store)
        .await
        .map(|clients| Json(ApiResponse::ok(clients)))
        .map_err(|e| error_response(e, "Error fetching clients"))
}

pub async fn get_client<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<ApiResponse<ClientDetail>>, ApiError> {
    ClientOperations::get(&*store, id)
        .await
        .map(|client| Json(ApiResponse::ok(client)))
        .map_err(|e| error_response(e, "Error fetching client"))
}

pub async fn create_client<S: Store>(
    State(store): State<AppState<S>>,
    user: UserContext,
    ApiJson(new_client): ApiJson<NewClient>,
) -> Result<(StatusCode, Json<ApiResponse<Client>>), ApiError> {
    let client = ClientOperations::create(&*store, new_client, &user)
        .await
        .map_err(|e| error_response(e, "Error creating client"))?;

    log::info!("Created client {} ({})", client.id, client.code);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(client, "Client created successfully")),
    ))
}

pub async fn update_client<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
    ApiJson(new_client): ApiJson<NewClient>,
) -> Result<Json<ApiResponse<Client>>, ApiError> {
    ClientOperations::update(&*store, id, new_client)
        .await
        .map(|client| Json(ApiResponse::ok_with_message(client, "Client updated successfully")))
        .map_err(|e| error_response(e, "Error updating client"))
}

pub async fn delete_client<S: Store>(
    State(store): State<AppState<S>>,
    ApiPath(id): ApiPath<Id>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    ClientOperations::delete(&*store, id)
        .await
        .map_err(|e| error_response(e, "Error deleting client"))?;

    log::info!("Deleted client {} and its hierarchy", id);
    Ok(Json(ApiResponse::message("Client deleted successfully")))
}
