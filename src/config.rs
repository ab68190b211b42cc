use std::path::PathBuf;
use std::env;
use lazy_static::lazy_static;

lazy_static! {
    // Base directory
    pub static ref BASE_DIR: PathBuf = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Uploaded media files, served under /uploads
    pub static ref MEDIA_DIR: PathBuf = env::var("MEDIA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| BASE_DIR.join("media"));

    // Playlist text files, split into active/inactive sets
    pub static ref PLAYLISTS_DIR: PathBuf = env::var("PLAYLISTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| BASE_DIR.join("playlists"));
}

// Names of the two playlist sets under PLAYLISTS_DIR
pub const ACTIVE_SET: &str = "active";
pub const INACTIVE_SET: &str = "inactive";

// Extension a playlist file must carry to be picked up by a scan
pub const PLAYLIST_EXT: &str = "txt";

// URL prefix under which stored media is retrievable
pub const UPLOADS_PREFIX: &str = "/uploads";

// Canonical extension sets for read-time type classification.
// Lower-cased, no leading dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "tiff", "webp", "bmp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "mpg", "wmv"];

// Server configuration
pub const PORT: u16 = 3000;
pub const HOST: &str = "0.0.0.0";

/// Port the server binds to, overridable via the PORT environment variable.
pub fn port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(PORT)
}
