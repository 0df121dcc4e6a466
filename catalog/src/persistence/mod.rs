pub mod repository;
pub mod sled_store;

pub use repository::{
    ActivityStore, AlbumStore, CollaborationStore, LikeStore, PlaylistStore, SongStore,
    TokenStore, UserStore,
};
pub use sled_store::SledStore;
