use crate::model::common::impl_named;
use crate::model::{Company, Id, Timestamp};
use serde::{Deserialize, Serialize};

/// Top of the hierarchy. `code` is unique across all clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Client {
    pub id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Id>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_named!(Client);

/// Client row as shown in the client listing, with the number of companies it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientListing {
    #[serde(flatten)]
    pub client: Client,
    pub company_count: i64,
}

/// Single client with the companies it owns, ordered by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientDetail {
    #[serde(flatten)]
    pub client: Client,
    pub companies: Vec<Company>,
}

/// Input model for creating or replacing a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClient {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Validated client fields ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ClientFields {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl NewClient {
    /// Both `code` and `name` must be present and non-blank
    pub fn validate(self) -> Option<ClientFields> {
        let code = self.code.filter(|c| !c.trim().is_empty())?;
        let name = self.name.filter(|n| !n.trim().is_empty())?;

        Some(ClientFields {
            code,
            name,
            description: self.description,
        })
    }
}
