use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use shared::config::Config;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::normalize_path::NormalizePath;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Router wrapped so trailing slashes are trimmed before route matching.
pub type App = NormalizePath<Router>;

/// Build and configure the application router
pub fn build_router(state: AppState, config: &Config) -> App {
    let router = Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Albums
        .route(
            "/albums",
            post(handlers::add_album).get(handlers::list_albums),
        )
        .route(
            "/albums/{id}",
            get(handlers::get_album)
                .put(handlers::edit_album)
                .delete(handlers::delete_album),
        )
        .route("/albums/{id}/covers", post(handlers::upload_cover))
        .route(
            "/albums/{id}/likes",
            post(handlers::toggle_album_like).get(handlers::get_album_likes),
        )
        // Songs
        .route("/songs", post(handlers::add_song).get(handlers::list_songs))
        .route(
            "/songs/{id}",
            get(handlers::get_song)
                .put(handlers::edit_song)
                .delete(handlers::delete_song),
        )
        // Users and authentication
        .route("/users", post(handlers::add_user))
        .route(
            "/users/{id}",
            get(handlers::get_user).put(handlers::update_fullname),
        )
        .route(
            "/authentications",
            post(handlers::login)
                .put(handlers::verify_refresh_token)
                .delete(handlers::delete_refresh_token),
        )
        // Playlists
        .route(
            "/playlists",
            post(handlers::add_playlist).get(handlers::list_playlists),
        )
        .route(
            "/playlists/{id}",
            delete(handlers::delete_playlist),
        )
        .route(
            "/playlists/{id}/songs",
            post(handlers::add_playlist_song)
                .get(handlers::get_playlist_songs)
                .delete(handlers::delete_playlist_song),
        )
        .route(
            "/playlists/{id}/activities",
            get(handlers::get_playlist_activities),
        )
        .route(
            "/collaborations",
            post(handlers::add_collaboration).delete(handlers::delete_collaboration),
        )
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state);

    // Normalize before routing.
    NormalizePath::trim_trailing_slash(router)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}
