use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::api::{client_handlers, diagram_handlers, handlers};
use crate::store::traits::Store;

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        // Hierarchy read model
        .route(
            "/api/hierarchy/clients",
            get(handlers::get_all_clients_with_companies::<S>),
        )
        .route(
            "/api/hierarchy/clients/:client_id",
            get(handlers::get_client_hierarchy::<S>),
        )
        // Client maintenance
        .route(
            "/api/clients",
            get(client_handlers::list_clients::<S>).post(client_handlers::create_client::<S>),
        )
        .route(
            "/api/clients/:id",
            get(client_handlers::get_client::<S>)
                .put(client_handlers::update_client::<S>)
                .delete(client_handlers::delete_client::<S>),
        )
        // Diagram artifacts
        .route(
            "/api/diagrams/function/:function_id",
            get(diagram_handlers::list_function_diagrams::<S>)
                .post(diagram_handlers::create_diagram::<S>),
        )
        .route(
            "/api/diagrams/:id",
            get(diagram_handlers::get_diagram::<S>)
                .put(diagram_handlers::update_diagram::<S>)
                .delete(diagram_handlers::delete_diagram::<S>),
        )
        .route(
            "/api/diagrams/:id/content",
            put(diagram_handlers::save_diagram_content::<S>),
        )
        .fallback(handlers::route_not_found)
}
