use axum::{
    Json,
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use catalog::{CatalogError, Fetched, Origin};
use serde::Serialize;
use tracing::error;

pub const DATA_SOURCE_HEADER: HeaderName = HeaderName::from_static("x-data-source");

/// Conflicts and store outages may succeed on retry.
const RETRY_AFTER_SECS: &str = "1";

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: String,
}

/// Success envelope: `{"status":"success","message":..,"data":..}`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            status: "success",
            message: None,
            data: Some(data),
        }
    }

    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data: Some(data),
        }
    }
}

impl SuccessResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: Some(message.into()),
            data: None,
        }
    }
}

// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub message: String,
}

/// Catalog failure rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::Conflict(_) => StatusCode::CONFLICT,
            CatalogError::Authorization(_) => StatusCode::FORBIDDEN,
            CatalogError::Authentication(_) => StatusCode::UNAUTHORIZED,
            CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CatalogError::Transient(_)
            | CatalogError::Serialization(_)
            | CatalogError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let retryable = self.0.is_retryable();
        let body = if status.is_server_error() {
            error!("request failed: {}", self.0);
            ErrorResponse {
                status: "error",
                message: "Internal server error".to_string(),
            }
        } else {
            ErrorResponse {
                status: "fail",
                message: self.0.to_string(),
            }
        };

        let mut response = (status, Json(body)).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Wrap a fetched value, marking responses served from cache.
pub fn fetched_response<T, U, F>(fetched: Fetched<T>, wrap: F) -> Response
where
    U: Serialize,
    F: FnOnce(T) -> U,
{
    let mut response = Json(SuccessResponse::data(wrap(fetched.value))).into_response();
    if fetched.origin == Origin::Cache {
        response.headers_mut().insert(
            DATA_SOURCE_HEADER,
            HeaderValue::from_static(Origin::Cache.as_str()),
        );
    }
    response
}

pub fn created<T: Serialize>(message: &str, data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(SuccessResponse::with_message(message, data)),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CatalogError::not_found("x"), StatusCode::NOT_FOUND),
            (CatalogError::Conflict("x".into()), StatusCode::CONFLICT),
            (CatalogError::Authorization("x".into()), StatusCode::FORBIDDEN),
            (CatalogError::Authentication("x".into()), StatusCode::UNAUTHORIZED),
            (CatalogError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (CatalogError::Transient("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status_code(), status);
        }
    }

    #[test]
    fn test_retryable_errors_carry_retry_after() {
        let conflict = ApiError(CatalogError::Conflict("Album already liked".into())).into_response();
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.headers()[header::RETRY_AFTER], RETRY_AFTER_SECS);

        let missing = ApiError(CatalogError::not_found("Album not found")).into_response();
        assert!(missing.headers().get(header::RETRY_AFTER).is_none());
    }
}
