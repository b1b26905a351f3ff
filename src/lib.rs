pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

pub use error::{CatalogError, CatalogResult};

pub use logic::{
    ArtifactCountAggregator, ClientOperations, DiagramOperations, HierarchyMaterializer,
    HierarchyService,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use axum::http::HeaderValue;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

/// CORS policy for the configured client origin.
///
/// A configured origin is allowed with credentials; otherwise any origin is
/// allowed without them.
pub fn cors_layer(config: &config::AppConfig) -> anyhow::Result<CorsLayer> {
    match &config.cors.client_url {
        Some(origin) => Ok(CorsLayer::new()
            .allow_origin(HeaderValue::from_str(origin)?)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)),
        None => Ok(CorsLayer::permissive()),
    }
}

/// Router over any store, with CORS applied
pub fn build_app<S: Store + 'static>(
    store: Arc<S>,
    config: &config::AppConfig,
) -> anyhow::Result<axum::Router> {
    Ok(routes::create_router::<S>()
        .with_state(store)
        .layer(cors_layer(config)?))
}
