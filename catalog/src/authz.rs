use crate::error::CatalogError;
use crate::persistence::{CollaborationStore, PlaylistStore};
use std::sync::Arc;
use tracing::debug;

const ACCESS_DENIED: &str = "You are not entitled to access this resource";
const PLAYLIST_NOT_FOUND: &str = "Playlist not found";

/// How a principal was granted access to a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Owner,
    Collaborator,
}

/// Resolves playlist access: ownership first, then collaboration.
///
/// A missing playlist is always `NotFound`. Any denial is reported as the
/// ownership `Authorization` failure, whatever the collaboration check said.
pub struct AuthorizationResolver {
    playlists: Arc<dyn PlaylistStore>,
    collaborations: Arc<dyn CollaborationStore>,
}

impl AuthorizationResolver {
    pub fn new(
        playlists: Arc<dyn PlaylistStore>,
        collaborations: Arc<dyn CollaborationStore>,
    ) -> Self {
        Self {
            playlists,
            collaborations,
        }
    }

    pub async fn verify_owner_or_collaborator(
        &self,
        playlist_id: &str,
        principal_id: &str,
    ) -> Result<Access, CatalogError> {
        let owner = self.owner_of(playlist_id).await?;
        if owner == principal_id {
            return Ok(Access::Owner);
        }

        match self
            .collaborations
            .collaboration_exists(playlist_id, principal_id)
            .await
        {
            Ok(true) => Ok(Access::Collaborator),
            Ok(false) => Err(denied()),
            Err(e) => {
                debug!(
                    "collaboration check for {} on {} failed: {}",
                    principal_id, playlist_id, e
                );
                Err(denied())
            }
        }
    }

    /// Passes only for the owner; collaborators are rejected.
    pub async fn verify_owner_exact(
        &self,
        playlist_id: &str,
        principal_id: &str,
    ) -> Result<(), CatalogError> {
        if self.owner_of(playlist_id).await? == principal_id {
            Ok(())
        } else {
            Err(denied())
        }
    }

    async fn owner_of(&self, playlist_id: &str) -> Result<String, CatalogError> {
        self.playlists
            .find_playlist(playlist_id)
            .await?
            .map(|playlist| playlist.owner)
            .ok_or_else(|| CatalogError::not_found(PLAYLIST_NOT_FOUND))
    }
}

fn denied() -> CatalogError {
    CatalogError::Authorization(ACCESS_DENIED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Playlist;
    use crate::persistence::SledStore;
    use crate::test_support::temp_store;
    use async_trait::async_trait;

    /// Collaboration store whose every call fails.
    struct BrokenCollaborations;

    #[async_trait]
    impl CollaborationStore for BrokenCollaborations {
        async fn insert_collaboration(&self, _: &str, _: &str) -> Result<(), CatalogError> {
            Err(CatalogError::Transient("collaborations offline".to_string()))
        }

        async fn collaboration_exists(&self, _: &str, _: &str) -> Result<bool, CatalogError> {
            Err(CatalogError::Transient("collaborations offline".to_string()))
        }

        async fn delete_collaboration(&self, _: &str, _: &str) -> Result<bool, CatalogError> {
            Err(CatalogError::Transient("collaborations offline".to_string()))
        }
    }

    async fn seeded() -> (tempfile::TempDir, Arc<SledStore>, String) {
        let (dir, store) = temp_store();
        let playlist = store
            .insert_playlist(Playlist::new("Road Trip".to_string(), "user-1".to_string()))
            .await
            .unwrap();
        store
            .insert_collaboration(&playlist.id, "user-2")
            .await
            .unwrap();
        (dir, store, playlist.id)
    }

    #[tokio::test]
    async fn test_owner_collaborator_and_stranger() {
        let (_dir, store, playlist) = seeded().await;
        let resolver = AuthorizationResolver::new(store.clone(), store.clone());

        assert_eq!(
            resolver.verify_owner_or_collaborator(&playlist, "user-1").await.unwrap(),
            Access::Owner
        );
        assert_eq!(
            resolver.verify_owner_or_collaborator(&playlist, "user-2").await.unwrap(),
            Access::Collaborator
        );
        assert!(matches!(
            resolver.verify_owner_or_collaborator(&playlist, "user-3").await,
            Err(CatalogError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_exact_owner_rejects_collaborators() {
        let (_dir, store, playlist) = seeded().await;
        let resolver = AuthorizationResolver::new(store.clone(), store.clone());

        assert!(resolver.verify_owner_exact(&playlist, "user-1").await.is_ok());
        assert!(matches!(
            resolver.verify_owner_exact(&playlist, "user-2").await,
            Err(CatalogError::Authorization(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_playlist_is_not_found() {
        let (_dir, store, _playlist) = seeded().await;
        let resolver = AuthorizationResolver::new(store.clone(), store.clone());

        assert!(matches!(
            resolver.verify_owner_or_collaborator("missing-id", "user-1").await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            resolver.verify_owner_exact("missing-id", "user-1").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_collaboration_failure_reports_ownership_denial() {
        let (_dir, store, playlist) = seeded().await;
        let resolver = AuthorizationResolver::new(store.clone(), Arc::new(BrokenCollaborations));

        assert!(matches!(
            resolver.verify_owner_or_collaborator(&playlist, "user-2").await,
            Err(CatalogError::Authorization(_))
        ));
        // The owner never reaches the collaboration check.
        assert_eq!(
            resolver.verify_owner_or_collaborator(&playlist, "user-1").await.unwrap(),
            Access::Owner
        );
    }
}
