use crate::model::common::impl_named;
use crate::model::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// A company owned by a client; `(client_id, code)` is unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Id,
    pub client_id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub created_by: Option<Id>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_named!(Company);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCompany {
    pub client_id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
}
