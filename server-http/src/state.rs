use catalog::{
    ActivityLog, AlbumRepository, AuthorizationResolver, CacheAside, CacheStore,
    CollaborationService, LikeToggle, PlaylistService, RefreshTokenRepository, SledStore,
    SongRepository, UserRepository,
};
use std::sync::Arc;

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub albums: Arc<AlbumRepository>,
    pub songs: Arc<SongRepository>,
    pub users: Arc<UserRepository>,
    pub refresh_tokens: Arc<RefreshTokenRepository>,
    pub likes: Arc<LikeToggle>,
    pub playlists: Arc<PlaylistService>,
    pub collaborations: Arc<CollaborationService>,
}

impl AppState {
    /// Wire every repository and service over one store and one cache.
    pub fn new(store: Arc<SledStore>, cache: Arc<dyn CacheStore>) -> Self {
        let cache = CacheAside::new(cache);

        let resolver = Arc::new(AuthorizationResolver::new(store.clone(), store.clone()));
        let activity = Arc::new(ActivityLog::new(store.clone(), store.clone(), store.clone()));

        Self {
            albums: Arc::new(AlbumRepository::new(
                store.clone(),
                store.clone(),
                cache.clone(),
            )),
            songs: Arc::new(SongRepository::new(
                store.clone(),
                store.clone(),
                cache.clone(),
            )),
            users: Arc::new(UserRepository::new(store.clone(), cache.clone())),
            refresh_tokens: Arc::new(RefreshTokenRepository::new(store.clone(), cache.clone())),
            likes: Arc::new(LikeToggle::new(store.clone(), store.clone(), cache)),
            playlists: Arc::new(PlaylistService::new(
                store.clone(),
                store.clone(),
                store.clone(),
                resolver.clone(),
                activity,
            )),
            collaborations: Arc::new(CollaborationService::new(
                store.clone(),
                store,
                resolver,
            )),
        }
    }
}
