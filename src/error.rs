use crate::model::Id;
use thiserror::Error;

/// Failures surfaced by the catalog's logic layer.
///
/// The store layer works in `anyhow`; a store that needs a typed outcome
/// (a unique-code conflict, say) wraps a `CatalogError` in the `anyhow::Error`
/// and the `From` impl below recovers it. Anything else is a store failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Requested entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// The store call failed or timed out
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// A row points at a parent (or artifact type) that no longer resolves.
    /// Recovered locally by skipping the row; never returned to callers.
    #[error("{entity} {id} references missing {parent} {parent_id}")]
    InvalidReference {
        entity: &'static str,
        id: Id,
        parent: &'static str,
        parent_id: Id,
    },

    /// A unique code is already taken
    #[error("{0}")]
    Conflict(String),

    /// Request input is missing or malformed
    #[error("{0}")]
    Validation(String),

    /// Seeded reference rows the operation depends on are absent
    #[error("{0}")]
    ReferenceDataMissing(String),
}

impl CatalogError {
    pub fn not_found(what: &str) -> Self {
        CatalogError::NotFound(what.to_string())
    }

    pub fn duplicate_client_code() -> Self {
        CatalogError::Conflict("Client with this code already exists".to_string())
    }
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<CatalogError>() {
            Ok(catalog_err) => catalog_err,
            Err(err) => CatalogError::StoreUnavailable(format!("{:#}", err)),
        }
    }
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
