use crate::cache_aside::CacheAside;
use crate::domain::{NewSong, Song, SongFilter, SongSummary};
use crate::error::CatalogError;
use crate::keys;
use crate::persistence::{AlbumStore, SongStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Songs are read straight from the store; their mutations invalidate the
/// snapshot of every album they belong to.
pub struct SongRepository {
    songs: Arc<dyn SongStore>,
    albums: Arc<dyn AlbumStore>,
    cache: CacheAside,
}

impl SongRepository {
    pub fn new(songs: Arc<dyn SongStore>, albums: Arc<dyn AlbumStore>, cache: CacheAside) -> Self {
        Self {
            songs,
            albums,
            cache,
        }
    }

    pub async fn add_song(&self, input: NewSong) -> Result<String, CatalogError> {
        self.ensure_album(input.album_id.as_deref()).await?;

        let song = self.songs.insert_song(Song::new(input)).await?;
        info!("song {} created", song.id);

        self.invalidate_albums([song.album_id.as_deref()]).await;
        Ok(song.id)
    }

    pub async fn get_song(&self, id: &str) -> Result<Song, CatalogError> {
        self.songs
            .find_song(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Song not found"))
    }

    pub async fn list_songs(&self, filter: &SongFilter) -> Result<Vec<SongSummary>, CatalogError> {
        let songs = self.songs.list_songs().await?;
        Ok(songs
            .iter()
            .filter(|song| filter.matches(song))
            .map(SongSummary::from)
            .collect())
    }

    pub async fn edit_song(&self, id: &str, input: NewSong) -> Result<(), CatalogError> {
        self.ensure_album(input.album_id.as_deref()).await?;

        let current = self.get_song(id).await?;
        let replacement = Song {
            id: current.id,
            title: input.title,
            year: input.year,
            performer: input.performer,
            genre: input.genre,
            duration: input.duration,
            album_id: input.album_id,
            created_at: current.created_at,
            updated_at: Utc::now(),
        };
        let new_album = replacement.album_id.clone();

        let previous = self
            .songs
            .replace_song(replacement)
            .await?
            .ok_or_else(|| CatalogError::not_found("Failed to update song. Id not found"))?;

        self.invalidate_albums([previous.album_id.as_deref(), new_album.as_deref()])
            .await;
        Ok(())
    }

    pub async fn delete_song(&self, id: &str) -> Result<(), CatalogError> {
        let removed = self
            .songs
            .delete_song(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Failed to delete song. Id not found"))?;
        info!("song {} deleted", id);

        self.invalidate_albums([removed.album_id.as_deref()]).await;
        Ok(())
    }

    async fn ensure_album(&self, album_id: Option<&str>) -> Result<(), CatalogError> {
        if let Some(id) = album_id {
            if self.albums.find_album(id).await?.is_none() {
                return Err(CatalogError::not_found("Album not found"));
            }
        }
        Ok(())
    }

    async fn invalidate_albums<const N: usize>(&self, album_ids: [Option<&str>; N]) {
        let stale: Vec<String> = album_ids.into_iter().flatten().map(keys::album).collect();
        self.cache.invalidate(stale).await;
    }
}
