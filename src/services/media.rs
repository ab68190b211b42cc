use std::fs;
use std::path::{Path, PathBuf};

use rocket::fs::TempFile;

use crate::config;
use crate::error::{AppError, Result};
use crate::models::{MediaItem, MediaType};

/// A directory of uploaded binary files, addressed by filename. Files keep
/// their original upload name; a second upload with the same name silently
/// overwrites the first.
#[derive(Debug, Clone)]
pub struct MediaStore {
    dir: PathBuf,
}

impl MediaStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        MediaStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_layout(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Persist one uploaded file under its original name and describe it.
    /// Type here comes from the declared content type, not the extension.
    pub async fn store(&self, file: &mut TempFile<'_>) -> Result<MediaItem> {
        let raw = file
            .raw_name()
            .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_string())
            .unwrap_or_default();

        let name = sanitize_upload_name(&raw)
            .ok_or_else(|| AppError::invalid_input("upload is missing a usable file name"))?;

        let media_type = file
            .content_type()
            .map(|ct| MediaType::from_mime_top(ct.top().as_str()))
            .unwrap_or(MediaType::Video);

        let dest = self.dir.join(&name);
        file.copy_to(&dest).await?;

        log::info!("Stored upload {} ({} bytes)", name, file.len());

        Ok(MediaItem {
            id: name.clone(),
            name: name.clone(),
            url: Self::url_for(&name),
            media_type,
            filename: name,
        })
    }

    /// Whether a stored file backs this filename. Names that are not plain
    /// file names never touch the filesystem.
    pub fn exists(&self, filename: &str) -> bool {
        match self.path_for(filename) {
            Some(path) => path.is_file(),
            None => false,
        }
    }

    /// On-disk path for a stored filename, or None if the name could escape
    /// the media directory.
    pub fn path_for(&self, filename: &str) -> Option<PathBuf> {
        if is_plain_filename(filename) {
            Some(self.dir.join(filename))
        } else {
            None
        }
    }

    pub fn url_for(filename: &str) -> String {
        format!("{}/{}", config::UPLOADS_PREFIX, filename)
    }
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Reduce a client-supplied upload name to its final path component.
/// Browsers send plain names; anything else is cut down rather than trusted.
fn sanitize_upload_name(raw: &str) -> Option<String> {
    let name = raw
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    if is_plain_filename(name) {
        Some(name.to_string())
    } else {
        None
    }
}
