use crate::model::common::impl_named;
use crate::model::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// An ERP installation inside a company; `(company_id, code)` is unique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ErpSystem {
    pub id: Id,
    pub company_id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub environment: Option<String>,
    pub created_by: Option<Id>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_named!(ErpSystem);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewErpSystem {
    pub company_id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub vendor: Option<String>,
    pub version: Option<String>,
    pub environment: Option<String>,
}
