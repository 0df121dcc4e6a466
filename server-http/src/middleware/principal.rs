use crate::api::responses::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};
use catalog::CatalogError;

/// Header carrying the id of the already-authenticated caller.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// Authenticated caller, as asserted by the upstream token gateway.
#[derive(Debug, Clone)]
pub struct Principal(pub String);

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                ApiError(CatalogError::Authentication(
                    "Missing authentication".to_string(),
                ))
            })?;

        Ok(Principal(id.to_string()))
    }
}
