use crate::model::common::impl_named;
use crate::model::{Id, Timestamp};
use serde::{Deserialize, Serialize};

/// A business area (Finance, Procurement, ...) of an ERP system; artifacts hang off it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BusinessFunction {
    pub id: Id,
    pub erp_id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_by: Option<Id>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl_named!(BusinessFunction);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBusinessFunction {
    pub erp_id: Id,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}
