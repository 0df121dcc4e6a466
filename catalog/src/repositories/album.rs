use crate::cache_aside::CacheAside;
use crate::domain::{Album, AlbumDetail, AlbumPatch, AlbumSummary, Fetched, SongSummary};
use crate::error::CatalogError;
use crate::keys;
use crate::persistence::{AlbumStore, SongStore};
use std::sync::Arc;
use tracing::info;

/// Albums with their songs, read through `album:{id}` and `albums`.
pub struct AlbumRepository {
    albums: Arc<dyn AlbumStore>,
    songs: Arc<dyn SongStore>,
    cache: CacheAside,
}

impl AlbumRepository {
    pub fn new(albums: Arc<dyn AlbumStore>, songs: Arc<dyn SongStore>, cache: CacheAside) -> Self {
        Self {
            albums,
            songs,
            cache,
        }
    }

    /// Create an album and return its id.
    pub async fn add_album(&self, name: String, year: i32) -> Result<String, CatalogError> {
        let album = self.albums.insert_album(Album::new(name, year)).await?;
        info!("album {} created", album.id);

        self.cache.invalidate([keys::albums()]).await;
        Ok(album.id)
    }

    pub async fn list_albums(&self) -> Result<Fetched<Vec<AlbumSummary>>, CatalogError> {
        self.cache
            .read_through(&keys::albums(), keys::ALBUM_TTL, move || {
                self.load_summaries()
            })
            .await
    }

    pub async fn get_album(&self, id: &str) -> Result<Fetched<AlbumDetail>, CatalogError> {
        self.cache
            .read_through(&keys::album(id), keys::ALBUM_TTL, move || {
                self.load_detail(id)
            })
            .await
    }

    pub async fn edit_album(&self, id: &str, name: String, year: i32) -> Result<(), CatalogError> {
        self.apply(id, AlbumPatch::Details { name, year }, "Failed to update album. Id not found")
            .await
    }

    pub async fn set_cover_url(&self, id: &str, cover_url: String) -> Result<(), CatalogError> {
        self.apply(id, AlbumPatch::Cover(cover_url), "Failed to update album cover. Id not found")
            .await
    }

    /// Delete an album along with its songs and likes.
    pub async fn delete_album(&self, id: &str) -> Result<(), CatalogError> {
        if !self.albums.delete_album(id).await? {
            return Err(CatalogError::not_found("Failed to delete album. Id not found"));
        }
        info!("album {} deleted", id);

        self.cache
            .invalidate([keys::album(id), keys::albums(), keys::album_likes(id)])
            .await;
        Ok(())
    }

    async fn apply(
        &self,
        id: &str,
        patch: AlbumPatch,
        missing: &str,
    ) -> Result<(), CatalogError> {
        if self.albums.update_album(id, patch).await?.is_none() {
            return Err(CatalogError::not_found(missing));
        }

        self.cache.invalidate([keys::album(id), keys::albums()]).await;
        Ok(())
    }

    async fn load_summaries(&self) -> Result<Vec<AlbumSummary>, CatalogError> {
        let albums = self.albums.list_albums().await?;
        Ok(albums.iter().map(AlbumSummary::from).collect())
    }

    async fn load_detail(&self, id: &str) -> Result<AlbumDetail, CatalogError> {
        let album = self
            .albums
            .find_album(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Album not found"))?;
        let songs = self.songs.songs_in_album(id).await?;

        Ok(AlbumDetail {
            id: album.id,
            name: album.name,
            year: album.year,
            cover_url: album.cover_url,
            songs: songs.iter().map(SongSummary::from).collect(),
        })
    }
}
