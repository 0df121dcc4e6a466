use crate::domain::{
    ActivityAction, ActivityEntry, ActivityRecord, PlaylistActivities, generate_id,
};
use crate::error::CatalogError;
use crate::persistence::{ActivityStore, SongStore, UserStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Append-only audit trail of playlist song additions and removals.
///
/// Never cached: every `list` reads the store so a fresh append is visible.
pub struct ActivityLog {
    activities: Arc<dyn ActivityStore>,
    users: Arc<dyn UserStore>,
    songs: Arc<dyn SongStore>,
}

impl ActivityLog {
    pub fn new(
        activities: Arc<dyn ActivityStore>,
        users: Arc<dyn UserStore>,
        songs: Arc<dyn SongStore>,
    ) -> Self {
        Self {
            activities,
            users,
            songs,
        }
    }

    /// Record one action. Identical repeated actions are all kept.
    pub async fn append(
        &self,
        playlist_id: &str,
        song_id: &str,
        user_id: &str,
        action: ActivityAction,
        time: DateTime<Utc>,
    ) -> Result<String, CatalogError> {
        let entry = ActivityEntry {
            id: generate_id("activity"),
            playlist_id: playlist_id.to_string(),
            song_id: song_id.to_string(),
            user_id: user_id.to_string(),
            action,
            time,
        };
        let id = entry.id.clone();

        self.activities.append_activity(entry).await?;
        Ok(id)
    }

    /// All actions on a playlist in ascending time order.
    pub async fn list(&self, playlist_id: &str) -> Result<PlaylistActivities, CatalogError> {
        let mut entries = self.activities.activities_for(playlist_id).await?;
        // Stable, so equal timestamps keep insertion order.
        entries.sort_by_key(|entry| entry.time);

        let mut activities = Vec::with_capacity(entries.len());
        for entry in entries {
            let username = self.users.find_user(&entry.user_id).await?.map(|u| u.username);
            let title = self.songs.find_song(&entry.song_id).await?.map(|s| s.title);
            activities.push(ActivityRecord {
                username,
                title,
                action: entry.action,
                time: entry.time,
            });
        }

        Ok(PlaylistActivities {
            playlist_id: playlist_id.to_string(),
            activities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSong, Song, User};
    use crate::test_support::temp_store;
    use chrono::Duration;

    #[tokio::test]
    async fn test_list_orders_by_time_regardless_of_append_order() {
        let (_dir, store) = temp_store();
        let log = ActivityLog::new(store.clone(), store.clone(), store.clone());

        let user = store
            .insert_user(User::new("dicoding".into(), "hash".into(), "Dicoding".into()))
            .await
            .unwrap();
        let song = store
            .insert_song(Song::new(NewSong {
                title: "Life in Technicolor".to_string(),
                year: 2008,
                performer: "Coldplay".to_string(),
                genre: "Indie".to_string(),
                duration: None,
                album_id: None,
            }))
            .await
            .unwrap();

        let t1 = Utc::now();
        let t2 = t1 + Duration::seconds(1);
        let t3 = t1 + Duration::seconds(2);

        log.append("playlist-1", &song.id, &user.id, ActivityAction::Delete, t3)
            .await
            .unwrap();
        log.append("playlist-1", &song.id, &user.id, ActivityAction::Add, t1)
            .await
            .unwrap();
        log.append("playlist-1", &song.id, &user.id, ActivityAction::Add, t2)
            .await
            .unwrap();

        let listed = log.list("playlist-1").await.unwrap();
        assert_eq!(listed.playlist_id, "playlist-1");
        let times: Vec<_> = listed.activities.iter().map(|a| a.time).collect();
        assert_eq!(times, vec![t1, t2, t3]);
        assert_eq!(listed.activities[0].username.as_deref(), Some("dicoding"));
        assert_eq!(listed.activities[0].title.as_deref(), Some("Life in Technicolor"));
        assert_eq!(listed.activities[2].action, ActivityAction::Delete);
    }

    #[tokio::test]
    async fn test_repeated_actions_are_kept_and_unknowns_resolve_to_none() {
        let (_dir, store) = temp_store();
        let log = ActivityLog::new(store.clone(), store.clone(), store.clone());
        let now = Utc::now();

        for _ in 0..3 {
            log.append("playlist-1", "song-gone", "user-gone", ActivityAction::Add, now)
                .await
                .unwrap();
        }

        let listed = log.list("playlist-1").await.unwrap();
        assert_eq!(listed.activities.len(), 3);
        assert!(listed.activities.iter().all(|a| a.username.is_none() && a.title.is_none()));
        assert!(log.list("playlist-2").await.unwrap().activities.is_empty());
    }
}
