use crate::api::requests::{PlaylistRequest, PlaylistSongRequest, ValidJson};
use crate::api::responses::{ApiResult, SuccessResponse, created};
use crate::middleware::Principal;
use crate::state::AppState;
use crate::validation::require;
use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use catalog::domain::{PlaylistActivities, PlaylistDetail};
use serde_json::json;
use tracing::info;

/// POST /playlists
pub async fn add_playlist(
    State(state): State<AppState>,
    Principal(owner): Principal,
    ValidJson(req): ValidJson<PlaylistRequest>,
) -> ApiResult<Response> {
    require("name", &req.name)?;

    let playlist_id = state.playlists.add_playlist(req.name, &owner).await?;
    Ok(created("Playlist added", json!({ "playlistId": playlist_id })))
}

/// GET /playlists
pub async fn list_playlists(
    State(state): State<AppState>,
    Principal(principal): Principal,
) -> ApiResult<Json<SuccessResponse<serde_json::Value>>> {
    let playlists = state.playlists.list_playlists(&principal).await?;
    Ok(Json(SuccessResponse::data(json!({ "playlists": playlists }))))
}

/// DELETE /playlists/{id}
pub async fn delete_playlist(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    info!("DELETE_PLAYLIST: id={}, requested_by={}", id, principal);

    state.playlists.delete_playlist(&id, &principal).await?;
    Ok(Json(SuccessResponse::message("Playlist deleted")))
}

/// POST /playlists/{id}/songs
pub async fn add_playlist_song(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<PlaylistSongRequest>,
) -> ApiResult<Response> {
    require("songId", &req.song_id)?;

    state
        .playlists
        .add_song(&id, &req.song_id, &principal)
        .await?;
    Ok(created("Song added to playlist", json!({})))
}

/// GET /playlists/{id}/songs
pub async fn get_playlist_songs(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<PlaylistResponse>>> {
    let playlist = state.playlists.playlist_with_songs(&id, &principal).await?;
    Ok(Json(SuccessResponse::data(PlaylistResponse { playlist })))
}

/// DELETE /playlists/{id}/songs
pub async fn delete_playlist_song(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<PlaylistSongRequest>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    require("songId", &req.song_id)?;

    state
        .playlists
        .remove_song(&id, &req.song_id, &principal)
        .await?;
    Ok(Json(SuccessResponse::message("Song removed from playlist")))
}

/// GET /playlists/{id}/activities
pub async fn get_playlist_activities(
    State(state): State<AppState>,
    Principal(principal): Principal,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<PlaylistActivities>>> {
    let activities = state.playlists.activities(&id, &principal).await?;
    Ok(Json(SuccessResponse::data(activities)))
}

#[derive(Debug, serde::Serialize)]
pub struct PlaylistResponse {
    pub playlist: PlaylistDetail,
}
