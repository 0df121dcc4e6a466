use crate::api::requests::ValidJson;
use crate::api::responses::{ApiResult, SuccessResponse, created};
use crate::state::AppState;
use crate::validation::validate_song;
use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use catalog::domain::{NewSong, SongFilter, SongResponse};
use serde_json::json;
use tracing::info;

/// POST /songs
pub async fn add_song(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<NewSong>,
) -> ApiResult<Response> {
    validate_song(&req)?;
    info!("ADD_SONG: title={}", req.title);

    let song_id = state.songs.add_song(req).await?;
    Ok(created("Song added", json!({ "songId": song_id })))
}

/// GET /songs?title=..&performer=..
pub async fn list_songs(
    State(state): State<AppState>,
    Query(filter): Query<SongFilter>,
) -> ApiResult<Json<SuccessResponse<serde_json::Value>>> {
    let songs = state.songs.list_songs(&filter).await?;
    Ok(Json(SuccessResponse::data(json!({ "songs": songs }))))
}

/// GET /songs/{id}
pub async fn get_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<serde_json::Value>>> {
    let song = state.songs.get_song(&id).await?;
    Ok(Json(SuccessResponse::data(
        json!({ "song": SongResponse::from(song) }),
    )))
}

/// PUT /songs/{id}
pub async fn edit_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<NewSong>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    validate_song(&req)?;
    info!("EDIT_SONG: id={}", id);

    state.songs.edit_song(&id, req).await?;
    Ok(Json(SuccessResponse::message("Song updated")))
}

/// DELETE /songs/{id}
pub async fn delete_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SuccessResponse<()>>> {
    info!("DELETE_SONG: id={}", id);

    state.songs.delete_song(&id).await?;
    Ok(Json(SuccessResponse::message("Song deleted")))
}
