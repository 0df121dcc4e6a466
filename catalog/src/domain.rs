use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod response {
    #[derive(Clone, Debug)]
    pub struct DeleteResponse {
        pub deleted: bool,
    }

    impl DeleteResponse {
        pub fn new(deleted: bool) -> Self {
            Self { deleted }
        }
    }
}

/// Build an entity id such as `album-3f9c0a1b7d2e4c55`.
pub fn generate_id(prefix: &str) -> String {
    let raw = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &raw[..16])
}

/// Where a read result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Store,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Cache => "cache",
            Origin::Store => "store",
        }
    }
}

/// A read result annotated with its origin.
#[derive(Clone, Debug)]
pub struct Fetched<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    pub fn cached(value: T) -> Self {
        Self {
            value,
            origin: Origin::Cache,
        }
    }

    pub fn stored(value: T) -> Self {
        Self {
            value,
            origin: Origin::Store,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.origin == Origin::Cache
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Fetched<U> {
        Fetched {
            value: f(self.value),
            origin: self.origin,
        }
    }
}

// === Albums and songs ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Album {
    pub fn new(name: String, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("album"),
            name,
            year,
            cover_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changes an album update may apply.
#[derive(Debug, Clone)]
pub enum AlbumPatch {
    Details { name: String, year: i32 },
    Cover(String),
}

impl AlbumPatch {
    pub fn apply(self, album: &mut Album) {
        match self {
            AlbumPatch::Details { name, year } => {
                album.name = name;
                album.year = year;
            }
            AlbumPatch::Cover(url) => album.cover_url = Some(url),
        }
        album.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub cover_url: Option<String>,
}

impl From<&Album> for AlbumSummary {
    fn from(album: &Album) -> Self {
        Self {
            id: album.id.clone(),
            name: album.name.clone(),
            year: album.year,
            cover_url: album.cover_url.clone(),
        }
    }
}

/// Denormalized album snapshot, the shape cached under `album:{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    pub id: String,
    pub name: String,
    pub year: i32,
    pub cover_url: Option<String>,
    pub songs: Vec<SongSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: String,
    pub duration: Option<u32>,
    pub album_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSong {
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: String,
    pub duration: Option<u32>,
    pub album_id: Option<String>,
}

impl Song {
    pub fn new(input: NewSong) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id("song"),
            title: input.title,
            year: input.year,
            performer: input.performer,
            genre: input.genre,
            duration: input.duration,
            album_id: input.album_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub performer: String,
}

impl From<&Song> for SongSummary {
    fn from(song: &Song) -> Self {
        Self {
            id: song.id.clone(),
            title: song.title.clone(),
            performer: song.performer.clone(),
        }
    }
}

/// Song as returned to API clients, without storage timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: String,
    pub duration: Option<u32>,
    pub album_id: Option<String>,
}

impl From<Song> for SongResponse {
    fn from(song: Song) -> Self {
        Self {
            id: song.id,
            title: song.title,
            year: song.year,
            performer: song.performer,
            genre: song.genre,
            duration: song.duration,
            album_id: song.album_id,
        }
    }
}

/// Case-insensitive substring filter for song listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongFilter {
    pub title: Option<String>,
    pub performer: Option<String>,
}

impl SongFilter {
    pub fn matches(&self, song: &Song) -> bool {
        fn contains(field: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| field.to_lowercase().contains(&n.to_lowercase()))
        }
        contains(&song.title, &self.title) && contains(&song.performer, &self.performer)
    }
}

// === Users ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub fullname: String,
}

impl User {
    pub fn new(username: String, password_hash: String, fullname: String) -> Self {
        Self {
            id: generate_id("user"),
            username,
            password_hash,
            fullname,
        }
    }
}

/// Public profile, cached under `user:id:{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub fullname: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            fullname: user.fullname.clone(),
        }
    }
}

/// Credential lookup entry, cached under `user:username:{username}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCredential {
    pub id: String,
    pub password_hash: String,
}

// === Likes ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResult {
    pub liked: bool,
}

// === Playlists ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
}

impl Playlist {
    pub fn new(name: String, owner: String) -> Self {
        Self {
            id: generate_id("playlist"),
            name,
            owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistDetail {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub songs: Vec<SongSummary>,
}

// === Activities ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Add,
    Delete,
}

/// Raw log row as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: String,
    pub playlist_id: String,
    pub song_id: String,
    pub user_id: String,
    pub action: ActivityAction,
    pub time: DateTime<Utc>,
}

/// Log row with user and song resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub username: Option<String>,
    pub title: Option<String>,
    pub action: ActivityAction,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistActivities {
    pub playlist_id: String,
    pub activities: Vec<ActivityRecord>,
}
