use crate::api::requests::{CreateUserRequest, UpdateFullnameRequest, ValidJson};
use crate::api::responses::{ApiResult, SuccessResponse, created, fetched_response};
use crate::middleware::Principal;
use crate::state::AppState;
use crate::validation::require;
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use catalog::CatalogError;
use serde_json::json;
use tracing::info;

/// POST /users
pub async fn add_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> ApiResult<Response> {
    require("username", &req.username)?;
    require("password", &req.password)?;
    require("fullname", &req.fullname)?;
    info!("ADD_USER: username={}", req.username);

    let user_id = state
        .users
        .add_user(req.username, req.password, req.fullname)
        .await?;
    Ok(created("User added", json!({ "userId": user_id })))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let user = state.users.get_user(&id).await?;
    Ok(fetched_response(user, |user| json!({ "user": user })))
}

/// PUT /users/{id}; callers may only rename themselves.
pub async fn update_fullname(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<UpdateFullnameRequest>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    require("fullname", &req.fullname)?;
    if principal != id {
        return Err(CatalogError::Authorization(
            "You are not allowed to update this user".to_string(),
        )
        .into());
    }

    state.users.update_fullname(&id, &req.fullname).await?;
    Ok(Json(SuccessResponse::message("User updated")))
}
