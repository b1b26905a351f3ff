use crate::model::Id;
use serde::{Deserialize, Serialize};

/// Acting user for audit columns, taken from request headers.
///
/// Authentication happens upstream; an absent or unparsable header leaves
/// `created_by` empty rather than rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: Option<Id>,
}

impl UserContext {
    pub fn new(user_id: Id) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }
}
