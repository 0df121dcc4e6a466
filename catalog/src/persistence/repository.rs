//! Backing-store ports, one per entity table.

use crate::domain::{ActivityEntry, Album, AlbumPatch, Playlist, Song, User};
use crate::error::CatalogError;
use async_trait::async_trait;

#[async_trait]
pub trait AlbumStore: Send + Sync {
    async fn insert_album(&self, album: Album) -> Result<Album, CatalogError>;

    async fn find_album(&self, id: &str) -> Result<Option<Album>, CatalogError>;

    async fn list_albums(&self) -> Result<Vec<Album>, CatalogError>;

    /// Apply `patch`, returning the updated album or `None` if absent.
    async fn update_album(&self, id: &str, patch: AlbumPatch)
    -> Result<Option<Album>, CatalogError>;

    /// Delete an album together with its songs and likes.
    async fn delete_album(&self, id: &str) -> Result<bool, CatalogError>;
}

#[async_trait]
pub trait SongStore: Send + Sync {
    async fn insert_song(&self, song: Song) -> Result<Song, CatalogError>;

    async fn find_song(&self, id: &str) -> Result<Option<Song>, CatalogError>;

    async fn list_songs(&self) -> Result<Vec<Song>, CatalogError>;

    async fn songs_in_album(&self, album_id: &str) -> Result<Vec<Song>, CatalogError>;

    /// Replace a song, returning the previous version or `None` if absent.
    async fn replace_song(&self, song: Song) -> Result<Option<Song>, CatalogError>;

    /// Remove a song, returning it or `None` if absent.
    async fn delete_song(&self, id: &str) -> Result<Option<Song>, CatalogError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user; a taken username is a `Conflict`.
    async fn insert_user(&self, user: User) -> Result<User, CatalogError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, CatalogError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CatalogError>;

    async fn update_fullname(&self, id: &str, fullname: &str)
    -> Result<Option<User>, CatalogError>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn insert_token(&self, token: &str) -> Result<(), CatalogError>;

    async fn token_exists(&self, token: &str) -> Result<bool, CatalogError>;

    async fn delete_token(&self, token: &str) -> Result<bool, CatalogError>;
}

#[async_trait]
pub trait LikeStore: Send + Sync {
    async fn like_exists(&self, album_id: &str, user_id: &str) -> Result<bool, CatalogError>;

    /// Insert the pair; an existing pair is a `Conflict`.
    async fn insert_like(&self, album_id: &str, user_id: &str) -> Result<(), CatalogError>;

    async fn delete_like(&self, album_id: &str, user_id: &str) -> Result<bool, CatalogError>;

    async fn count_likes(&self, album_id: &str) -> Result<u64, CatalogError>;
}

#[async_trait]
pub trait PlaylistStore: Send + Sync {
    async fn insert_playlist(&self, playlist: Playlist) -> Result<Playlist, CatalogError>;

    async fn find_playlist(&self, id: &str) -> Result<Option<Playlist>, CatalogError>;

    /// Playlists the user owns or collaborates on.
    async fn playlists_for_user(&self, user_id: &str) -> Result<Vec<Playlist>, CatalogError>;

    /// Delete a playlist together with its song entries and collaborations.
    async fn delete_playlist(&self, id: &str) -> Result<bool, CatalogError>;

    async fn insert_playlist_song(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<(), CatalogError>;

    async fn delete_playlist_song(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<bool, CatalogError>;

    async fn playlist_song_ids(&self, playlist_id: &str) -> Result<Vec<String>, CatalogError>;
}

#[async_trait]
pub trait CollaborationStore: Send + Sync {
    /// Grant access; an existing grant is a `Conflict`.
    async fn insert_collaboration(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<(), CatalogError>;

    async fn collaboration_exists(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<bool, CatalogError>;

    async fn delete_collaboration(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<bool, CatalogError>;
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn append_activity(&self, entry: ActivityEntry) -> Result<(), CatalogError>;

    /// Entries for a playlist, ascending by time, ties in insertion order.
    async fn activities_for(&self, playlist_id: &str) -> Result<Vec<ActivityEntry>, CatalogError>;
}
