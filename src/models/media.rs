use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::config;

/// Media kind as the client renders it. Derived from the filename extension
/// on every read; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    Unknown,
}

impl Default for MediaType {
    fn default() -> Self {
        MediaType::Unknown
    }
}

impl MediaType {
    /// Classify by lower-cased filename extension against the canonical sets.
    pub fn from_filename(filename: &str) -> Self {
        let ext = match Path::new(filename).extension().and_then(|e| e.to_str()) {
            Some(ext) => ext.to_ascii_lowercase(),
            None => return MediaType::Unknown,
        };

        if config::IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            MediaType::Image
        } else if config::VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaType::Video
        } else {
            MediaType::Unknown
        }
    }

    /// Upload-time classification from the declared content type: anything
    /// under image/ is an image, everything else is treated as video. This
    /// can disagree with the extension-based classification used on read.
    pub fn from_mime_top(top: &str) -> Self {
        if top.eq_ignore_ascii_case("image") {
            MediaType::Image
        } else {
            MediaType::Video
        }
    }
}

/// One uploaded asset as a playlist sees it. Only `filename` is persisted;
/// the rest is rebuilt whenever a playlist file is read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    pub filename: String,
}

impl MediaItem {
    /// Rebuild an item from a stored filename (the read path).
    pub fn from_filename(filename: &str) -> Self {
        MediaItem {
            id: filename.to_string(),
            name: filename.to_string(),
            url: format!("{}/{}", config::UPLOADS_PREFIX, filename),
            media_type: MediaType::from_filename(filename),
            filename: filename.to_string(),
        }
    }
}

/// An ordered, named collection of filename references. Item order equals
/// line order in the backing text file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

impl Playlist {
    /// Derive the filesystem-safe id used as the playlist file's base name:
    /// every character outside [A-Za-z0-9] becomes an underscore.
    pub fn sanitize_id(name: &str) -> String {
        name.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// Display name reconstructed from an id. Lossy: any non-alphanumeric
    /// in the original name comes back as a space.
    pub fn display_name(id: &str) -> String {
        id.replace('_', " ")
    }
}
