pub mod albums;
pub mod authentications;
pub mod collaborations;
pub mod health;
pub mod playlists;
pub mod songs;
pub mod users;

pub use albums::{
    add_album, delete_album, edit_album, get_album, get_album_likes, list_albums, toggle_album_like,
    upload_cover,
};
pub use authentications::{delete_refresh_token, login, verify_refresh_token};
pub use collaborations::{add_collaboration, delete_collaboration};
pub use health::health_check;
pub use playlists::{
    add_playlist, add_playlist_song, delete_playlist, delete_playlist_song, get_playlist_activities,
    get_playlist_songs, list_playlists,
};
pub use songs::{add_song, delete_song, edit_song, get_song, list_songs};
pub use users::{add_user, get_user, update_fullname};
