//! Cache-aside data layer for the music catalog.
//!
//! Reads consult a [`ports::CacheStore`] first and fall back to the durable
//! backing store on a miss. Mutations commit to the backing store and then
//! delete every cache key that may have gone stale.

pub mod activity;
pub mod authz;
pub mod cache_aside;
pub mod domain;
pub mod error;
pub mod keys;
pub mod likes;
pub mod password;
pub mod persistence;
pub mod playlists;
pub mod ports;
pub mod repositories;

#[cfg(test)]
pub(crate) mod test_support;

pub use activity::ActivityLog;
pub use authz::{Access, AuthorizationResolver};
pub use cache_aside::CacheAside;
pub use domain::{Fetched, Origin};
pub use error::CatalogError;
pub use likes::LikeToggle;
pub use persistence::SledStore;
pub use playlists::{CollaborationService, PlaylistService};
pub use ports::CacheStore;
pub use repositories::{AlbumRepository, RefreshTokenRepository, SongRepository, UserRepository};
