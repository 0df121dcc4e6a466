use super::repository::{
    ActivityStore, AlbumStore, CollaborationStore, LikeStore, PlaylistStore, SongStore,
    TokenStore, UserStore,
};
use crate::domain::{ActivityEntry, Album, AlbumPatch, Playlist, Song, User};
use crate::error::CatalogError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use sled::Db;
use std::path::Path;

const ALBUMS_TREE: &str = "albums";
const SONGS_TREE: &str = "songs";
const USERS_TREE: &str = "users";
const USERS_BY_USERNAME_TREE: &str = "users_by_username";
const AUTHENTICATIONS_TREE: &str = "authentications";
const ALBUM_LIKES_TREE: &str = "user_album_likes";
const PLAYLISTS_TREE: &str = "playlists";
const PLAYLIST_SONGS_TREE: &str = "playlist_songs";
const COLLABORATIONS_TREE: &str = "collaborations";
const ACTIVITIES_TREE: &str = "playlist_song_activities";

const SEPARATOR: u8 = 0;

/// Composite key `a ‖ 0x00 ‖ b`.
fn pair_key(a: &str, b: &str) -> Vec<u8> {
    let mut key = prefix_of(a);
    key.extend_from_slice(b.as_bytes());
    key
}

fn prefix_of(a: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(a.len() + 1);
    key.extend_from_slice(a.as_bytes());
    key.push(SEPARATOR);
    key
}

/// Order-preserving encoding of a signed timestamp.
fn time_key(micros: i64) -> [u8; 8] {
    ((micros as u64) ^ (1 << 63)).to_be_bytes()
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CatalogError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Sled-backed store for every catalog table.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open (or create) the database at `path`, creating the parent directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CatalogError::Transient(format!("Failed to create directory: {}", e))
            })?;
        }

        let db = sled::open(path)?;
        Ok(Self { db })
    }

    pub async fn flush(&self) -> Result<(), CatalogError> {
        self.db.flush_async().await?;
        Ok(())
    }

    fn tree(&self, name: &str) -> Result<sled::Tree, CatalogError> {
        Ok(self.db.open_tree(name)?)
    }

    /// Insert `value` under `key` only if the key is vacant.
    fn insert_unique(
        &self,
        tree: &str,
        key: &[u8],
        value: Vec<u8>,
        conflict: &str,
    ) -> Result<(), CatalogError> {
        let swapped = self
            .tree(tree)?
            .compare_and_swap(key, None as Option<&[u8]>, Some(value))?;
        swapped.map_err(|_| CatalogError::Conflict(conflict.to_string()))
    }

    fn remove_prefix(&self, tree: &str, prefix: &[u8]) -> Result<usize, CatalogError> {
        let tree = self.tree(tree)?;
        let mut removed = 0;
        for item in tree.scan_prefix(prefix).keys() {
            tree.remove(item?)?;
            removed += 1;
        }
        Ok(removed)
    }
}

#[async_trait]
impl AlbumStore for SledStore {
    async fn insert_album(&self, album: Album) -> Result<Album, CatalogError> {
        let album_json = serde_json::to_vec(&album)?;
        self.insert_unique(
            ALBUMS_TREE,
            album.id.as_bytes(),
            album_json,
            "Album id already exists",
        )?;
        Ok(album)
    }

    async fn find_album(&self, id: &str) -> Result<Option<Album>, CatalogError> {
        match self.tree(ALBUMS_TREE)?.get(id.as_bytes())? {
            Some(data) => Ok(Some(decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_albums(&self) -> Result<Vec<Album>, CatalogError> {
        let mut albums = Vec::new();
        for item in self.tree(ALBUMS_TREE)?.iter() {
            let (_, data) = item?;
            albums.push(decode(&data)?);
        }
        Ok(albums)
    }

    async fn update_album(
        &self,
        id: &str,
        patch: AlbumPatch,
    ) -> Result<Option<Album>, CatalogError> {
        let albums = self.tree(ALBUMS_TREE)?;

        let Some(data) = albums.get(id.as_bytes())? else {
            return Ok(None);
        };

        let mut album: Album = decode(&data)?;
        patch.apply(&mut album);
        albums.insert(id.as_bytes(), serde_json::to_vec(&album)?)?;

        Ok(Some(album))
    }

    async fn delete_album(&self, id: &str) -> Result<bool, CatalogError> {
        if self.tree(ALBUMS_TREE)?.remove(id.as_bytes())?.is_none() {
            return Ok(false);
        }

        let songs = self.tree(SONGS_TREE)?;
        for item in songs.iter() {
            let (key, data) = item?;
            let song: Song = decode(&data)?;
            if song.album_id.as_deref() == Some(id) {
                songs.remove(key)?;
            }
        }

        self.remove_prefix(ALBUM_LIKES_TREE, &prefix_of(id))?;

        Ok(true)
    }
}

#[async_trait]
impl SongStore for SledStore {
    async fn insert_song(&self, song: Song) -> Result<Song, CatalogError> {
        let song_json = serde_json::to_vec(&song)?;
        self.insert_unique(
            SONGS_TREE,
            song.id.as_bytes(),
            song_json,
            "Song id already exists",
        )?;
        Ok(song)
    }

    async fn find_song(&self, id: &str) -> Result<Option<Song>, CatalogError> {
        match self.tree(SONGS_TREE)?.get(id.as_bytes())? {
            Some(data) => Ok(Some(decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn list_songs(&self) -> Result<Vec<Song>, CatalogError> {
        let mut songs = Vec::new();
        for item in self.tree(SONGS_TREE)?.iter() {
            let (_, data) = item?;
            songs.push(decode(&data)?);
        }
        Ok(songs)
    }

    async fn songs_in_album(&self, album_id: &str) -> Result<Vec<Song>, CatalogError> {
        let songs = self.list_songs().await?;
        Ok(songs
            .into_iter()
            .filter(|s| s.album_id.as_deref() == Some(album_id))
            .collect())
    }

    async fn replace_song(&self, song: Song) -> Result<Option<Song>, CatalogError> {
        let songs = self.tree(SONGS_TREE)?;

        if !songs.contains_key(song.id.as_bytes())? {
            return Ok(None);
        }

        let previous = songs.insert(song.id.as_bytes(), serde_json::to_vec(&song)?)?;
        previous.map(|data| decode(&data)).transpose()
    }

    async fn delete_song(&self, id: &str) -> Result<Option<Song>, CatalogError> {
        let removed = self.tree(SONGS_TREE)?.remove(id.as_bytes())?;
        removed.map(|data| decode(&data)).transpose()
    }
}

#[async_trait]
impl UserStore for SledStore {
    async fn insert_user(&self, user: User) -> Result<User, CatalogError> {
        // Claim the username first so two concurrent sign-ups cannot both win.
        self.insert_unique(
            USERS_BY_USERNAME_TREE,
            user.username.as_bytes(),
            user.id.as_bytes().to_vec(),
            "Username is already taken",
        )?;

        let user_json = serde_json::to_vec(&user)?;
        self.tree(USERS_TREE)?.insert(user.id.as_bytes(), user_json)?;

        Ok(user)
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, CatalogError> {
        match self.tree(USERS_TREE)?.get(id.as_bytes())? {
            Some(data) => Ok(Some(decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, CatalogError> {
        match self.tree(USERS_BY_USERNAME_TREE)?.get(username.as_bytes())? {
            Some(user_id) => match self.tree(USERS_TREE)?.get(&user_id)? {
                Some(data) => Ok(Some(decode(&data)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn update_fullname(
        &self,
        id: &str,
        fullname: &str,
    ) -> Result<Option<User>, CatalogError> {
        let users = self.tree(USERS_TREE)?;

        let Some(data) = users.get(id.as_bytes())? else {
            return Ok(None);
        };

        let mut user: User = decode(&data)?;
        user.fullname = fullname.to_string();
        users.insert(id.as_bytes(), serde_json::to_vec(&user)?)?;

        Ok(Some(user))
    }
}

#[async_trait]
impl TokenStore for SledStore {
    async fn insert_token(&self, token: &str) -> Result<(), CatalogError> {
        self.insert_unique(
            AUTHENTICATIONS_TREE,
            token.as_bytes(),
            Vec::new(),
            "Refresh token already stored",
        )
    }

    async fn token_exists(&self, token: &str) -> Result<bool, CatalogError> {
        Ok(self.tree(AUTHENTICATIONS_TREE)?.contains_key(token.as_bytes())?)
    }

    async fn delete_token(&self, token: &str) -> Result<bool, CatalogError> {
        Ok(self
            .tree(AUTHENTICATIONS_TREE)?
            .remove(token.as_bytes())?
            .is_some())
    }
}

#[async_trait]
impl LikeStore for SledStore {
    async fn like_exists(&self, album_id: &str, user_id: &str) -> Result<bool, CatalogError> {
        Ok(self
            .tree(ALBUM_LIKES_TREE)?
            .contains_key(pair_key(album_id, user_id))?)
    }

    async fn insert_like(&self, album_id: &str, user_id: &str) -> Result<(), CatalogError> {
        self.insert_unique(
            ALBUM_LIKES_TREE,
            &pair_key(album_id, user_id),
            user_id.as_bytes().to_vec(),
            "Album is already liked by this user",
        )
    }

    async fn delete_like(&self, album_id: &str, user_id: &str) -> Result<bool, CatalogError> {
        Ok(self
            .tree(ALBUM_LIKES_TREE)?
            .remove(pair_key(album_id, user_id))?
            .is_some())
    }

    async fn count_likes(&self, album_id: &str) -> Result<u64, CatalogError> {
        let mut count = 0;
        for item in self.tree(ALBUM_LIKES_TREE)?.scan_prefix(prefix_of(album_id)).keys() {
            item?;
            count += 1;
        }
        Ok(count)
    }
}

#[async_trait]
impl PlaylistStore for SledStore {
    async fn insert_playlist(&self, playlist: Playlist) -> Result<Playlist, CatalogError> {
        let playlist_json = serde_json::to_vec(&playlist)?;
        self.insert_unique(
            PLAYLISTS_TREE,
            playlist.id.as_bytes(),
            playlist_json,
            "Playlist id already exists",
        )?;
        Ok(playlist)
    }

    async fn find_playlist(&self, id: &str) -> Result<Option<Playlist>, CatalogError> {
        match self.tree(PLAYLISTS_TREE)?.get(id.as_bytes())? {
            Some(data) => Ok(Some(decode(&data)?)),
            None => Ok(None),
        }
    }

    async fn playlists_for_user(&self, user_id: &str) -> Result<Vec<Playlist>, CatalogError> {
        let collaborations = self.tree(COLLABORATIONS_TREE)?;
        let mut playlists = Vec::new();

        for item in self.tree(PLAYLISTS_TREE)?.iter() {
            let (_, data) = item?;
            let playlist: Playlist = decode(&data)?;
            if playlist.owner == user_id
                || collaborations.contains_key(pair_key(&playlist.id, user_id))?
            {
                playlists.push(playlist);
            }
        }

        Ok(playlists)
    }

    async fn delete_playlist(&self, id: &str) -> Result<bool, CatalogError> {
        if self.tree(PLAYLISTS_TREE)?.remove(id.as_bytes())?.is_none() {
            return Ok(false);
        }

        let prefix = prefix_of(id);
        self.remove_prefix(PLAYLIST_SONGS_TREE, &prefix)?;
        self.remove_prefix(COLLABORATIONS_TREE, &prefix)?;

        Ok(true)
    }

    async fn insert_playlist_song(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<(), CatalogError> {
        self.insert_unique(
            PLAYLIST_SONGS_TREE,
            &pair_key(playlist_id, song_id),
            song_id.as_bytes().to_vec(),
            "Song is already in the playlist",
        )
    }

    async fn delete_playlist_song(
        &self,
        playlist_id: &str,
        song_id: &str,
    ) -> Result<bool, CatalogError> {
        Ok(self
            .tree(PLAYLIST_SONGS_TREE)?
            .remove(pair_key(playlist_id, song_id))?
            .is_some())
    }

    async fn playlist_song_ids(&self, playlist_id: &str) -> Result<Vec<String>, CatalogError> {
        let mut ids = Vec::new();
        for item in self
            .tree(PLAYLIST_SONGS_TREE)?
            .scan_prefix(prefix_of(playlist_id))
            .values()
        {
            ids.push(String::from_utf8_lossy(&item?).into_owned());
        }
        Ok(ids)
    }
}

#[async_trait]
impl CollaborationStore for SledStore {
    async fn insert_collaboration(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<(), CatalogError> {
        self.insert_unique(
            COLLABORATIONS_TREE,
            &pair_key(playlist_id, user_id),
            user_id.as_bytes().to_vec(),
            "User is already a collaborator",
        )
    }

    async fn collaboration_exists(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<bool, CatalogError> {
        Ok(self
            .tree(COLLABORATIONS_TREE)?
            .contains_key(pair_key(playlist_id, user_id))?)
    }

    async fn delete_collaboration(
        &self,
        playlist_id: &str,
        user_id: &str,
    ) -> Result<bool, CatalogError> {
        Ok(self
            .tree(COLLABORATIONS_TREE)?
            .remove(pair_key(playlist_id, user_id))?
            .is_some())
    }
}

#[async_trait]
impl ActivityStore for SledStore {
    async fn append_activity(&self, entry: ActivityEntry) -> Result<(), CatalogError> {
        let sequence = self.db.generate_id()?;

        let mut key = prefix_of(&entry.playlist_id);
        key.extend_from_slice(&time_key(entry.time.timestamp_micros()));
        key.extend_from_slice(&sequence.to_be_bytes());

        self.tree(ACTIVITIES_TREE)?
            .insert(key, serde_json::to_vec(&entry)?)?;
        Ok(())
    }

    async fn activities_for(&self, playlist_id: &str) -> Result<Vec<ActivityEntry>, CatalogError> {
        let mut entries = Vec::new();
        for item in self
            .tree(ACTIVITIES_TREE)?
            .scan_prefix(prefix_of(playlist_id))
            .values()
        {
            entries.push(decode(&item?)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityAction, NewSong, generate_id};
    use crate::test_support::temp_store;
    use chrono::{Duration, Utc};

    fn song_for(album_id: Option<&str>) -> Song {
        Song::new(NewSong {
            title: "Yellow".to_string(),
            year: 2000,
            performer: "Coldplay".to_string(),
            genre: "Rock".to_string(),
            duration: Some(266),
            album_id: album_id.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn test_album_lifecycle_cascades() {
        let (_dir, store) = temp_store();

        let album = store
            .insert_album(Album::new("Parachutes".to_string(), 2000))
            .await
            .unwrap();
        let song = store.insert_song(song_for(Some(&album.id))).await.unwrap();
        store.insert_like(&album.id, "user-1").await.unwrap();

        let updated = store
            .update_album(&album.id, AlbumPatch::Cover("http://cdn/cover.png".to_string()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.cover_url.as_deref(), Some("http://cdn/cover.png"));
        assert_eq!(updated.name, "Parachutes");

        assert!(store.delete_album(&album.id).await.unwrap());
        assert!(store.find_album(&album.id).await.unwrap().is_none());
        assert!(store.find_song(&song.id).await.unwrap().is_none());
        assert_eq!(store.count_likes(&album.id).await.unwrap(), 0);

        assert!(!store.delete_album(&album.id).await.unwrap());
        assert!(
            store
                .update_album(&album.id, AlbumPatch::Cover("x".to_string()))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_like_is_conflict() {
        let (_dir, store) = temp_store();

        store.insert_like("album-1", "user-1").await.unwrap();
        let second = store.insert_like("album-1", "user-1").await;
        assert!(matches!(second, Err(CatalogError::Conflict(_))));

        store.insert_like("album-1", "user-2").await.unwrap();
        store.insert_like("album-10", "user-1").await.unwrap();
        assert_eq!(store.count_likes("album-1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let (_dir, store) = temp_store();

        let user = User::new("dicoding".to_string(), "hash".to_string(), "Dicoding".to_string());
        store.insert_user(user.clone()).await.unwrap();

        let clash = User::new("dicoding".to_string(), "hash".to_string(), "Other".to_string());
        assert!(matches!(
            store.insert_user(clash).await,
            Err(CatalogError::Conflict(_))
        ));

        let found = store.find_user_by_username("dicoding").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
    }

    #[tokio::test]
    async fn test_replace_song_returns_previous() {
        let (_dir, store) = temp_store();

        let song = store.insert_song(song_for(Some("album-a"))).await.unwrap();
        let mut moved = song.clone();
        moved.album_id = Some("album-b".to_string());

        let previous = store.replace_song(moved).await.unwrap().unwrap();
        assert_eq!(previous.album_id.as_deref(), Some("album-a"));
        assert_eq!(store.songs_in_album("album-b").await.unwrap().len(), 1);
        assert!(store.songs_in_album("album-a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_playlists_for_user_includes_collaborations() {
        let (_dir, store) = temp_store();

        let owned = store
            .insert_playlist(Playlist::new("Mine".to_string(), "user-1".to_string()))
            .await
            .unwrap();
        let shared = store
            .insert_playlist(Playlist::new("Shared".to_string(), "user-2".to_string()))
            .await
            .unwrap();
        store
            .insert_playlist(Playlist::new("Other".to_string(), "user-3".to_string()))
            .await
            .unwrap();
        store.insert_collaboration(&shared.id, "user-1").await.unwrap();

        let mut ids: Vec<String> = store
            .playlists_for_user("user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        ids.sort();
        let mut expected = vec![owned.id.clone(), shared.id.clone()];
        expected.sort();
        assert_eq!(ids, expected);

        assert!(store.delete_playlist(&shared.id).await.unwrap());
        assert!(!store.collaboration_exists(&shared.id, "user-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_activities_sorted_by_time_then_insertion() {
        let (_dir, store) = temp_store();
        let base = Utc::now();

        let entry = |offset: i64, song: &str| ActivityEntry {
            id: generate_id("activity"),
            playlist_id: "playlist-1".to_string(),
            song_id: song.to_string(),
            user_id: "user-1".to_string(),
            action: ActivityAction::Add,
            time: base + Duration::seconds(offset),
        };

        store.append_activity(entry(3, "song-c")).await.unwrap();
        store.append_activity(entry(1, "song-a")).await.unwrap();
        store.append_activity(entry(2, "song-b1")).await.unwrap();
        store.append_activity(entry(2, "song-b2")).await.unwrap();
        store
            .append_activity(ActivityEntry {
                playlist_id: "playlist-2".to_string(),
                ..entry(0, "song-x")
            })
            .await
            .unwrap();

        let songs: Vec<String> = store
            .activities_for("playlist-1")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.song_id)
            .collect();
        assert_eq!(songs, vec!["song-a", "song-b1", "song-b2", "song-c"]);
    }

    #[test]
    fn test_time_key_orders_negative_before_positive() {
        assert!(time_key(-5) < time_key(0));
        assert!(time_key(0) < time_key(7));
    }
}
