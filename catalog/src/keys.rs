//! Cache key namespace and TTLs.
//!
//! User lookups by id and by username live under disjoint prefixes so a
//! username that happens to equal a user id cannot collide.

use shared::TtlMs;

pub const ALBUM_TTL: TtlMs = TtlMs::from_secs(1800);
pub const ALBUM_LIKES_TTL: TtlMs = TtlMs::from_secs(1800);
pub const USER_PROFILE_TTL: TtlMs = TtlMs::from_secs(259_200);
pub const USER_CREDENTIAL_TTL: TtlMs = TtlMs::from_secs(259_200);
pub const REFRESH_TOKEN_TTL: TtlMs = TtlMs::from_secs(604_800);

pub fn album(id: &str) -> String {
    format!("album:{}", id)
}

pub fn albums() -> String {
    "albums".to_string()
}

pub fn album_likes(id: &str) -> String {
    format!("album-likes:{}", id)
}

pub fn user_by_id(id: &str) -> String {
    format!("user:id:{}", id)
}

pub fn user_by_username(username: &str) -> String {
    format!("user:username:{}", username)
}

pub fn refresh_token(token: &str) -> String {
    format!("refreshToken:{}", token)
}
