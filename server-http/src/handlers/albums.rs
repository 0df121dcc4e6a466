use crate::api::requests::{AlbumRequest, CoverRequest, ValidJson};
use crate::api::responses::{ApiResult, SuccessResponse, created, fetched_response};
use crate::middleware::Principal;
use crate::state::AppState;
use crate::validation::{require, validate_album};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::info;

/// POST /albums
pub async fn add_album(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<AlbumRequest>,
) -> ApiResult<Response> {
    validate_album(&req.name)?;
    info!("ADD_ALBUM: name={}", req.name);

    let album_id = state.albums.add_album(req.name, req.year).await?;
    Ok(created("Album added", json!({ "albumId": album_id })))
}

/// GET /albums
pub async fn list_albums(State(state): State<AppState>) -> ApiResult<Response> {
    let albums = state.albums.list_albums().await?;
    Ok(fetched_response(albums, |albums| json!({ "albums": albums })))
}

/// GET /albums/{id}
pub async fn get_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let album = state.albums.get_album(&id).await?;
    Ok(fetched_response(album, |album| json!({ "album": album })))
}

/// PUT /albums/{id}
pub async fn edit_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<AlbumRequest>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    validate_album(&req.name)?;
    info!("EDIT_ALBUM: id={}", id);

    state.albums.edit_album(&id, req.name, req.year).await?;
    Ok(Json(SuccessResponse::message("Album updated")))
}

/// DELETE /albums/{id}
pub async fn delete_album(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    info!("DELETE_ALBUM: id={}", id);

    state.albums.delete_album(&id).await?;
    Ok(Json(SuccessResponse::message("Album deleted")))
}

/// POST /albums/{id}/covers
pub async fn upload_cover(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<CoverRequest>,
) -> ApiResult<Response> {
    require("coverUrl", &req.cover_url)?;
    info!("UPLOAD_COVER: album={}", id);

    state.albums.set_cover_url(&id, req.cover_url).await?;
    Ok((
        StatusCode::CREATED,
        Json(SuccessResponse::message("Cover uploaded")),
    )
        .into_response())
}

/// POST /albums/{id}/likes
pub async fn toggle_album_like(
    State(state): State<AppState>,
    Principal(user_id): Principal,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let result = state.likes.toggle(&id, &user_id).await?;
    let message = if result.liked {
        "Album liked"
    } else {
        "Album unliked"
    };
    Ok(created(message, result))
}

/// GET /albums/{id}/likes
pub async fn get_album_likes(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let likes = state.likes.like_count(&id).await?;
    Ok(fetched_response(likes, |likes| json!({ "likes": likes })))
}
