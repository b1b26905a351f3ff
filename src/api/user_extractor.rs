use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, StatusCode},
};

use crate::model::{Id, UserContext};

const USER_ID_HEADER: &str = "x-user-id";

/// Axum extractor for the acting user.
///
/// Reads the numeric `X-User-Id` header set by the authenticating proxy.
/// Requests without a usable header run anonymously.
#[async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = extract_header_value(&parts.headers, USER_ID_HEADER) else {
            return Ok(UserContext::default());
        };

        match parse_user_id(&raw) {
            Some(user_id) => Ok(UserContext::new(user_id)),
            None => {
                log::debug!("Ignoring malformed {} header: {:?}", USER_ID_HEADER, raw);
                Ok(UserContext::default())
            }
        }
    }
}

fn extract_header_value(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|value| value.to_str().ok())
        .map(|s| s.trim().to_string())
}

fn parse_user_id(raw: &str) -> Option<Id> {
    raw.parse::<Id>().ok().filter(|id| *id > 0)
}
