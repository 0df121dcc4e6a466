use crate::cache_aside::CacheAside;
use crate::domain::{Fetched, LikeResult};
use crate::error::CatalogError;
use crate::keys;
use crate::persistence::{AlbumStore, LikeStore};
use std::sync::Arc;
use tracing::info;

/// Per-(album, user) like toggle and the cached like count.
///
/// The count is never adjusted in place: every transition deletes
/// `album-likes:{id}` and the next read recounts the relation.
pub struct LikeToggle {
    albums: Arc<dyn AlbumStore>,
    likes: Arc<dyn LikeStore>,
    cache: CacheAside,
}

impl LikeToggle {
    pub fn new(albums: Arc<dyn AlbumStore>, likes: Arc<dyn LikeStore>, cache: CacheAside) -> Self {
        Self {
            albums,
            likes,
            cache,
        }
    }

    /// Flip the like state of `album_id` for `user_id`.
    ///
    /// Two racing toggles from the same user can both see "not liked"; the
    /// loser gets a retryable `Conflict` from the store's unique pair.
    pub async fn toggle(&self, album_id: &str, user_id: &str) -> Result<LikeResult, CatalogError> {
        self.ensure_album(album_id).await?;

        let liked = if self.likes.like_exists(album_id, user_id).await? {
            self.likes.delete_like(album_id, user_id).await?;
            false
        } else {
            self.likes.insert_like(album_id, user_id).await?;
            true
        };
        info!("user {} liked={} album {}", user_id, liked, album_id);

        self.cache.invalidate([keys::album_likes(album_id)]).await;
        Ok(LikeResult { liked })
    }

    pub async fn like_count(&self, album_id: &str) -> Result<Fetched<u64>, CatalogError> {
        self.cache
            .read_through(&keys::album_likes(album_id), keys::ALBUM_LIKES_TTL, move || {
                self.count(album_id)
            })
            .await
    }

    async fn count(&self, album_id: &str) -> Result<u64, CatalogError> {
        self.ensure_album(album_id).await?;
        self.likes.count_likes(album_id).await
    }

    async fn ensure_album(&self, album_id: &str) -> Result<(), CatalogError> {
        match self.albums.find_album(album_id).await? {
            Some(_) => Ok(()),
            None => Err(CatalogError::not_found("Album not found")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Album, Origin};
    use crate::persistence::SledStore;
    use crate::test_support::{MemoryCache, temp_store};

    async fn seeded() -> (tempfile::TempDir, Arc<SledStore>, Arc<MemoryCache>, LikeToggle, String) {
        let (dir, store) = temp_store();
        let cache = Arc::new(MemoryCache::new());
        let album = store
            .insert_album(Album::new("Viva la Vida".to_string(), 2008))
            .await
            .unwrap();
        let toggle = LikeToggle::new(store.clone(), store.clone(), CacheAside::new(cache.clone()));
        (dir, store, cache, toggle, album.id)
    }

    #[tokio::test]
    async fn test_toggle_flips_state() {
        let (_dir, _store, _cache, toggle, album) = seeded().await;

        assert_eq!(toggle.toggle(&album, "user-A").await.unwrap(), LikeResult { liked: true });
        assert_eq!(toggle.toggle(&album, "user-A").await.unwrap(), LikeResult { liked: false });
        assert_eq!(toggle.toggle(&album, "user-A").await.unwrap(), LikeResult { liked: true });
    }

    #[tokio::test]
    async fn test_count_is_recomputed_after_each_toggle() {
        let (_dir, _store, cache, toggle, album) = seeded().await;

        let zero = toggle.like_count(&album).await.unwrap();
        assert_eq!((zero.value, zero.origin), (0, Origin::Store));
        assert!(toggle.like_count(&album).await.unwrap().is_cached());

        toggle.toggle(&album, "user-A").await.unwrap();
        assert!(!cache.contains(&keys::album_likes(&album)).await);

        let one = toggle.like_count(&album).await.unwrap();
        assert_eq!((one.value, one.origin), (1, Origin::Store));

        toggle.toggle(&album, "user-A").await.unwrap();
        let back = toggle.like_count(&album).await.unwrap();
        assert_eq!((back.value, back.origin), (0, Origin::Store));
    }

    #[tokio::test]
    async fn test_counts_distinct_users() {
        let (_dir, _store, _cache, toggle, album) = seeded().await;

        for user in ["user-A", "user-B", "user-C"] {
            toggle.toggle(&album, user).await.unwrap();
        }
        assert_eq!(toggle.like_count(&album).await.unwrap().value, 3);
    }

    /// Another request always wins the insert between our check and our write.
    struct LostRace;

    #[async_trait::async_trait]
    impl LikeStore for LostRace {
        async fn like_exists(&self, _album_id: &str, _user_id: &str) -> Result<bool, CatalogError> {
            Ok(false)
        }

        async fn insert_like(&self, _album_id: &str, _user_id: &str) -> Result<(), CatalogError> {
            Err(CatalogError::Conflict("Album already liked".to_string()))
        }

        async fn delete_like(&self, _album_id: &str, _user_id: &str) -> Result<bool, CatalogError> {
            Ok(false)
        }

        async fn count_likes(&self, _album_id: &str) -> Result<u64, CatalogError> {
            Ok(1)
        }
    }

    #[tokio::test]
    async fn test_lost_race_is_retryable_conflict() {
        let (_dir, store, cache, _toggle, album) = seeded().await;
        let toggle = LikeToggle::new(store, Arc::new(LostRace), CacheAside::new(cache.clone()));

        toggle.like_count(&album).await.unwrap();

        let err = toggle.toggle(&album, "user-A").await.unwrap_err();
        assert!(matches!(err, CatalogError::Conflict(_)));
        assert!(err.is_retryable());

        // Nothing changed, so the cached count stays.
        assert!(cache.contains(&keys::album_likes(&album)).await);
        assert!(toggle.like_count(&album).await.unwrap().is_cached());
    }

    #[tokio::test]
    async fn test_unknown_album() {
        let (_dir, _store, cache, toggle, _album) = seeded().await;

        assert!(matches!(
            toggle.toggle("album-missing", "user-A").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            toggle.like_count("album-missing").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(!cache.contains(&keys::album_likes("album-missing")).await);
    }
}
