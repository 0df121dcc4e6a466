use crate::api::requests::{CollaborationRequest, ValidJson};
use crate::api::responses::{ApiResult, SuccessResponse, created};
use crate::middleware::Principal;
use crate::state::AppState;
use crate::validation::require;
use axum::{Json, extract::State, response::Response};
use serde_json::json;
use tracing::info;

/// POST /collaborations
pub async fn add_collaboration(
    State(state): State<AppState>,
    Principal(principal): Principal,
    ValidJson(req): ValidJson<CollaborationRequest>,
) -> ApiResult<Response> {
    require("playlistId", &req.playlist_id)?;
    require("userId", &req.user_id)?;
    info!(
        "ADD_COLLABORATION: playlist={}, user={}, requested_by={}",
        req.playlist_id, req.user_id, principal
    );

    state
        .collaborations
        .add_collaborator(&req.playlist_id, &req.user_id, &principal)
        .await?;
    Ok(created(
        "Collaboration added",
        json!({ "playlistId": req.playlist_id, "userId": req.user_id }),
    ))
}

/// DELETE /collaborations
pub async fn delete_collaboration(
    State(state): State<AppState>,
    Principal(principal): Principal,
    ValidJson(req): ValidJson<CollaborationRequest>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    require("playlistId", &req.playlist_id)?;
    require("userId", &req.user_id)?;
    info!(
        "DELETE_COLLABORATION: playlist={}, user={}, requested_by={}",
        req.playlist_id, req.user_id, principal
    );

    state
        .collaborations
        .remove_collaborator(&req.playlist_id, &req.user_id, &principal)
        .await?;
    Ok(Json(SuccessResponse::message("Collaboration deleted")))
}
