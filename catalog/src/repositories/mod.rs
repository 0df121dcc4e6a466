pub mod album;
pub mod refresh_token;
pub mod song;
pub mod user;

pub use album::AlbumRepository;
pub use refresh_token::{RefreshTokenRepository, generate_refresh_token};
pub use song::SongRepository;
pub use user::UserRepository;
