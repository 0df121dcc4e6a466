use crate::api::requests::{LoginRequest, RefreshTokenRequest, ValidJson};
use crate::api::responses::{ApiResult, SuccessResponse, created, fetched_response};
use crate::state::AppState;
use crate::validation::require;
use axum::{Json, extract::State, response::Response};
use catalog::repositories::generate_refresh_token;
use serde_json::json;
use tracing::info;

/// POST /authentications
///
/// Issues a refresh token for a valid username/password pair. Access
/// tokens are minted by the gateway in front of this service.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> ApiResult<Response> {
    require("username", &req.username)?;
    require("password", &req.password)?;

    let user_id = state
        .users
        .verify_credential(&req.username, &req.password)
        .await?
        .value;

    let refresh_token = generate_refresh_token();
    state.refresh_tokens.add(&refresh_token).await?;
    info!("LOGIN: user={}", user_id);

    Ok(created(
        "Authentication succeeded",
        json!({ "userId": user_id, "refreshToken": refresh_token }),
    ))
}

/// PUT /authentications
pub async fn verify_refresh_token(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RefreshTokenRequest>,
) -> ApiResult<Response> {
    require("refreshToken", &req.refresh_token)?;

    let verified = state.refresh_tokens.verify(&req.refresh_token).await?;
    Ok(fetched_response(verified, |_| json!({ "valid": true })))
}

/// DELETE /authentications
pub async fn delete_refresh_token(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RefreshTokenRequest>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    require("refreshToken", &req.refresh_token)?;

    state.refresh_tokens.delete(&req.refresh_token).await?;
    Ok(Json(SuccessResponse::message("Refresh token deleted")))
}
