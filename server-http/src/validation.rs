use catalog::CatalogError;
use catalog::domain::NewSong;

pub fn require(field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        return Err(CatalogError::InvalidInput(format!(
            "'{}' must not be empty",
            field
        )));
    }
    Ok(())
}

pub fn validate_album(name: &str) -> Result<(), CatalogError> {
    require("name", name)
}

pub fn validate_song(song: &NewSong) -> Result<(), CatalogError> {
    require("title", &song.title)?;
    require("performer", &song.performer)?;
    require("genre", &song.genre)
}
