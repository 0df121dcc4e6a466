use crate::activity::ActivityLog;
use crate::authz::AuthorizationResolver;
use crate::domain::{
    ActivityAction, Playlist, PlaylistActivities, PlaylistDetail, PlaylistSummary, SongSummary,
};
use crate::error::CatalogError;
use crate::persistence::{CollaborationStore, PlaylistStore, SongStore, UserStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Playlist operations gated by the authorization chain.
pub struct PlaylistService {
    playlists: Arc<dyn PlaylistStore>,
    songs: Arc<dyn SongStore>,
    users: Arc<dyn UserStore>,
    resolver: Arc<AuthorizationResolver>,
    activity: Arc<ActivityLog>,
}

impl PlaylistService {
    pub fn new(
        playlists: Arc<dyn PlaylistStore>,
        songs: Arc<dyn SongStore>,
        users: Arc<dyn UserStore>,
        resolver: Arc<AuthorizationResolver>,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            playlists,
            songs,
            users,
            resolver,
            activity,
        }
    }

    pub async fn add_playlist(&self, name: String, owner: &str) -> Result<String, CatalogError> {
        let playlist = self
            .playlists
            .insert_playlist(Playlist::new(name, owner.to_string()))
            .await?;
        info!("playlist {} created by {}", playlist.id, owner);
        Ok(playlist.id)
    }

    /// Playlists the principal owns or collaborates on.
    pub async fn list_playlists(
        &self,
        principal_id: &str,
    ) -> Result<Vec<PlaylistSummary>, CatalogError> {
        let playlists = self.playlists.playlists_for_user(principal_id).await?;

        let mut summaries = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            summaries.push(PlaylistSummary {
                username: self.username_of(&playlist.owner).await?,
                id: playlist.id,
                name: playlist.name,
            });
        }
        Ok(summaries)
    }

    pub async fn delete_playlist(&self, id: &str, principal_id: &str) -> Result<(), CatalogError> {
        self.resolver.verify_owner_exact(id, principal_id).await?;

        if !self.playlists.delete_playlist(id).await? {
            return Err(CatalogError::not_found("Failed to delete playlist. Id not found"));
        }
        info!("playlist {} deleted by {}", id, principal_id);
        Ok(())
    }

    pub async fn add_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        principal_id: &str,
    ) -> Result<(), CatalogError> {
        self.resolver
            .verify_owner_or_collaborator(playlist_id, principal_id)
            .await?;

        if self.songs.find_song(song_id).await?.is_none() {
            return Err(CatalogError::not_found("Song not found"));
        }

        self.playlists
            .insert_playlist_song(playlist_id, song_id)
            .await?;
        self.activity
            .append(playlist_id, song_id, principal_id, ActivityAction::Add, Utc::now())
            .await?;
        Ok(())
    }

    pub async fn playlist_with_songs(
        &self,
        playlist_id: &str,
        principal_id: &str,
    ) -> Result<PlaylistDetail, CatalogError> {
        self.resolver
            .verify_owner_or_collaborator(playlist_id, principal_id)
            .await?;

        let playlist = self
            .playlists
            .find_playlist(playlist_id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Playlist not found"))?;

        let mut songs = Vec::new();
        for song_id in self.playlists.playlist_song_ids(playlist_id).await? {
            if let Some(song) = self.songs.find_song(&song_id).await? {
                songs.push(SongSummary::from(&song));
            }
        }

        Ok(PlaylistDetail {
            username: self.username_of(&playlist.owner).await?,
            id: playlist.id,
            name: playlist.name,
            songs,
        })
    }

    pub async fn remove_song(
        &self,
        playlist_id: &str,
        song_id: &str,
        principal_id: &str,
    ) -> Result<(), CatalogError> {
        self.resolver
            .verify_owner_or_collaborator(playlist_id, principal_id)
            .await?;

        if !self
            .playlists
            .delete_playlist_song(playlist_id, song_id)
            .await?
        {
            return Err(CatalogError::not_found(
                "Failed to remove song from playlist. Song id not found",
            ));
        }

        self.activity
            .append(playlist_id, song_id, principal_id, ActivityAction::Delete, Utc::now())
            .await?;
        Ok(())
    }

    pub async fn activities(
        &self,
        playlist_id: &str,
        principal_id: &str,
    ) -> Result<PlaylistActivities, CatalogError> {
        self.resolver
            .verify_owner_or_collaborator(playlist_id, principal_id)
            .await?;
        self.activity.list(playlist_id).await
    }

    async fn username_of(&self, user_id: &str) -> Result<Option<String>, CatalogError> {
        Ok(self.users.find_user(user_id).await?.map(|u| u.username))
    }
}

/// Grants and revokes collaborator access. Only the owner may do either.
pub struct CollaborationService {
    collaborations: Arc<dyn CollaborationStore>,
    users: Arc<dyn UserStore>,
    resolver: Arc<AuthorizationResolver>,
}

impl CollaborationService {
    pub fn new(
        collaborations: Arc<dyn CollaborationStore>,
        users: Arc<dyn UserStore>,
        resolver: Arc<AuthorizationResolver>,
    ) -> Self {
        Self {
            collaborations,
            users,
            resolver,
        }
    }

    pub async fn add_collaborator(
        &self,
        playlist_id: &str,
        user_id: &str,
        principal_id: &str,
    ) -> Result<(), CatalogError> {
        self.resolver
            .verify_owner_exact(playlist_id, principal_id)
            .await?;

        if self.users.find_user(user_id).await?.is_none() {
            return Err(CatalogError::not_found("User not found"));
        }

        self.collaborations
            .insert_collaboration(playlist_id, user_id)
            .await?;
        info!("user {} now collaborates on {}", user_id, playlist_id);
        Ok(())
    }

    pub async fn remove_collaborator(
        &self,
        playlist_id: &str,
        user_id: &str,
        principal_id: &str,
    ) -> Result<(), CatalogError> {
        self.resolver
            .verify_owner_exact(playlist_id, principal_id)
            .await?;

        if !self
            .collaborations
            .delete_collaboration(playlist_id, user_id)
            .await?
        {
            return Err(CatalogError::not_found("Collaboration not found"));
        }
        info!("user {} no longer collaborates on {}", user_id, playlist_id);
        Ok(())
    }
}
