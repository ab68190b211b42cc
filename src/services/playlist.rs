use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config;
use crate::error::{AppError, Result};
use crate::models::{MediaItem, Playlist};
use crate::services::media::MediaStore;

/// Playlist persistence over two sibling directories ("active" and
/// "inactive"), each holding one `{id}.txt` file per playlist with one
/// stored filename per line. Reads resolve an id against the active set
/// first; writes and deletes happen in place wherever the file was found.
///
/// There is no locking: concurrent writers to the same playlist race and
/// the last writer wins.
#[derive(Debug, Clone)]
pub struct PlaylistStore {
    active: PathBuf,
    inactive: PathBuf,
    media: MediaStore,
}

impl PlaylistStore {
    pub fn new(playlists_dir: impl AsRef<Path>, media: MediaStore) -> Self {
        let playlists_dir = playlists_dir.as_ref();
        PlaylistStore {
            active: playlists_dir.join(config::ACTIVE_SET),
            inactive: playlists_dir.join(config::INACTIVE_SET),
            media,
        }
    }

    pub fn ensure_layout(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.active)?;
        fs::create_dir_all(&self.inactive)
    }

    /// All playlists across both sets, active set first, each in directory
    /// enumeration order. A file that disappears between enumeration and
    /// read (a concurrent delete) is skipped, not an error.
    pub fn list(&self) -> Result<Vec<Playlist>> {
        let mut playlists = Vec::new();

        for dir in [&self.active, &self.inactive] {
            for id in scan_ids(dir)? {
                match self.read(&id) {
                    Ok(playlist) => playlists.push(playlist),
                    Err(AppError::NotFound(_)) => {
                        log::warn!("Playlist {} vanished during scan, skipping", id);
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(playlists)
    }

    /// Create an empty playlist in the inactive set. The id is the name with
    /// every non-alphanumeric character replaced by an underscore; creating
    /// a name that derives to an existing id truncates that playlist.
    pub fn create(&self, name: &str) -> Result<Playlist> {
        if name.is_empty() {
            return Err(AppError::invalid_input("Playlist name is required"));
        }

        let id = Playlist::sanitize_id(name);
        fs::write(self.inactive.join(playlist_file(&id)), "")?;

        log::info!("Created playlist {} (\"{}\")", id, name);

        Ok(Playlist {
            id,
            name: name.to_string(),
            items: Vec::new(),
        })
    }

    /// Rewrite a playlist's file with the submitted items' filenames, one
    /// per line, in order. No existence check at write time; dangling names
    /// are filtered on the next read.
    pub fn update(&self, id: &str, items: &[MediaItem]) -> Result<()> {
        let path = self.locate(id).ok_or_else(|| AppError::not_found("Playlist"))?;
        write_filenames(&path, items.iter().map(|item| item.filename.as_str()))?;

        log::info!("Updated playlist {} ({} items)", id, items.len());
        Ok(())
    }

    /// Remove a playlist's file from whichever set holds it.
    pub fn delete(&self, id: &str) -> Result<()> {
        let path = self.locate(id).ok_or_else(|| AppError::not_found("Playlist"))?;
        fs::remove_file(path)?;

        log::info!("Deleted playlist {}", id);
        Ok(())
    }

    /// Append the submitted items' filenames to a playlist, duplicates and
    /// all, and return the playlist rebuilt through the normal read path.
    pub fn add_media(&self, id: &str, items: &[MediaItem]) -> Result<Playlist> {
        let path = self.locate(id).ok_or_else(|| AppError::not_found("Playlist"))?;

        let mut filenames = read_filenames(&path)?;
        filenames.extend(items.iter().map(|item| item.filename.clone()));
        write_filenames(&path, filenames.iter().map(String::as_str))?;

        log::info!("Added {} items to playlist {}", items.len(), id);
        self.read(id)
    }

    /// Rebuild one playlist from its backing file: filenames become items,
    /// types are re-derived from extensions, and names with no stored file
    /// behind them are silently dropped.
    pub fn read(&self, id: &str) -> Result<Playlist> {
        let path = self.locate(id).ok_or_else(|| AppError::not_found("Playlist"))?;

        let filenames = match read_filenames(&path) {
            Ok(filenames) => filenames,
            Err(AppError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::not_found("Playlist"));
            }
            Err(e) => return Err(e),
        };

        let items = filenames
            .iter()
            .filter(|filename| self.media.exists(filename))
            .map(|filename| MediaItem::from_filename(filename))
            .collect();

        Ok(Playlist {
            id: id.to_string(),
            name: Playlist::display_name(id),
            items,
        })
    }

    /// Resolve an id to its backing file, active set first. Both sets
    /// holding the file should not normally happen; active wins if so.
    fn locate(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() {
            return None;
        }

        let file = playlist_file(id);
        for dir in [&self.active, &self.inactive] {
            let path = dir.join(&file);
            if path.is_file() {
                return Some(path);
            }
        }
        None
    }
}

fn playlist_file(id: &str) -> String {
    format!("{}.{}", id, config::PLAYLIST_EXT)
}

/// Playlist ids found in one set directory, in enumeration order. A missing
/// directory reads as empty rather than failing the whole scan.
fn scan_ids(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut ids = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_playlist = path
            .extension()
            .map(|ext| ext == config::PLAYLIST_EXT)
            .unwrap_or(false);
        if !is_playlist {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            ids.push(stem.to_string());
        }
    }
    Ok(ids)
}

fn read_filenames(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn write_filenames<'a>(path: &Path, filenames: impl Iterator<Item = &'a str>) -> Result<()> {
    let content = filenames.collect::<Vec<_>>().join("\n");
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, PlaylistStore, MediaStore) {
        let tmp = TempDir::new().unwrap();
        let media = MediaStore::new(tmp.path().join("media"));
        media.ensure_layout().unwrap();
        let store = PlaylistStore::new(tmp.path().join("playlists"), media.clone());
        store.ensure_layout().unwrap();
        (tmp, store, media)
    }

    fn touch_media(media: &MediaStore, names: &[&str]) {
        for name in names {
            fs::write(media.dir().join(name), b"data").unwrap();
        }
    }

    fn items(names: &[&str]) -> Vec<MediaItem> {
        names.iter().map(|n| MediaItem::from_filename(n)).collect()
    }

    fn item_filenames(playlist: &Playlist) -> Vec<&str> {
        playlist.items.iter().map(|i| i.filename.as_str()).collect()
    }

    #[test]
    fn create_then_list_yields_one_empty_playlist() {
        let (_tmp, store, _media) = fixture();

        let created = store.create("Morning Loop").unwrap();
        assert_eq!(created.id, "Morning_Loop");
        assert_eq!(created.name, "Morning Loop");
        assert!(created.items.is_empty());

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "Morning_Loop");
        assert_eq!(listed[0].name, "Morning Loop");
        assert!(listed[0].items.is_empty());
    }

    #[test]
    fn create_rejects_empty_name() {
        let (_tmp, store, _media) = fixture();
        assert!(matches!(store.create(""), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn create_with_same_derived_id_truncates() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg"]);

        store.create("show").unwrap();
        store.update("show", &items(&["a.jpg"])).unwrap();
        assert_eq!(store.read("show").unwrap().items.len(), 1);

        // Recreating the same name truncates the existing file.
        store.create("show").unwrap();
        assert!(store.read("show").unwrap().items.is_empty());
    }

    #[test]
    fn update_preserves_order_and_duplicates() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg", "b.mp4", "c.png"]);

        store.create("mix").unwrap();
        store
            .update("mix", &items(&["c.png", "a.jpg", "c.png", "b.mp4"]))
            .unwrap();

        let playlist = store.read("mix").unwrap();
        assert_eq!(item_filenames(&playlist), ["c.png", "a.jpg", "c.png", "b.mp4"]);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let (_tmp, store, _media) = fixture();
        assert!(matches!(
            store.update("nope", &[]),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn add_media_appends_after_existing_entries() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg", "b.jpg", "c.jpg"]);

        store.create("wall").unwrap();
        store.update("wall", &items(&["a.jpg", "b.jpg"])).unwrap();

        let updated = store.add_media("wall", &items(&["c.jpg", "a.jpg"])).unwrap();
        assert_eq!(
            item_filenames(&updated),
            ["a.jpg", "b.jpg", "c.jpg", "a.jpg"]
        );
    }

    #[test]
    fn add_media_unknown_id_is_not_found() {
        let (_tmp, store, _media) = fixture();
        assert!(matches!(
            store.add_media("nope", &[]),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn delete_removes_the_playlist() {
        let (_tmp, store, _media) = fixture();
        store.create("gone").unwrap();
        store.delete("gone").unwrap();

        assert!(store.list().unwrap().is_empty());
        assert!(matches!(store.delete("gone"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn dangling_references_are_dropped_on_read() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["kept.jpg", "doomed.jpg"]);

        store.create("show").unwrap();
        store
            .update("show", &items(&["kept.jpg", "doomed.jpg"]))
            .unwrap();

        fs::remove_file(media.dir().join("doomed.jpg")).unwrap();

        let playlist = store.read("show").unwrap();
        assert_eq!(item_filenames(&playlist), ["kept.jpg"]);
    }

    #[test]
    fn active_set_takes_precedence_on_lookup() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg", "b.jpg"]);

        fs::write(store.active.join("show.txt"), "a.jpg").unwrap();
        fs::write(store.inactive.join("show.txt"), "b.jpg").unwrap();

        let playlist = store.read("show").unwrap();
        assert_eq!(item_filenames(&playlist), ["a.jpg"]);
    }

    #[test]
    fn updates_follow_the_file_to_the_active_set() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg"]);

        fs::write(store.active.join("live.txt"), "").unwrap();
        store.update("live", &items(&["a.jpg"])).unwrap();

        // The write landed in active; inactive never gained a copy.
        assert!(store.active.join("live.txt").is_file());
        assert!(!store.inactive.join("live.txt").exists());
    }

    #[test]
    fn blank_and_padded_lines_are_ignored() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg"]);

        fs::write(store.inactive.join("raw.txt"), "\n  a.jpg  \n\n").unwrap();
        let playlist = store.read("raw").unwrap();
        assert_eq!(item_filenames(&playlist), ["a.jpg"]);
    }

    #[test]
    fn concurrent_updates_leave_exactly_one_submission() {
        let (_tmp, store, media) = fixture();
        touch_media(&media, &["a.jpg", "b.jpg"]);
        store.create("race").unwrap();

        let first = items(&["a.jpg", "a.jpg", "a.jpg"]);
        let second = items(&["b.jpg", "b.jpg"]);

        let s1 = store.clone();
        let s2 = store.clone();
        let f1 = first.clone();
        let f2 = second.clone();
        let t1 = thread::spawn(move || s1.update("race", &f1).unwrap());
        let t2 = thread::spawn(move || s2.update("race", &f2).unwrap());
        t1.join().unwrap();
        t2.join().unwrap();

        // Last writer wins; never an interleaving of both lists.
        let playlist = store.read("race").unwrap();
        let names = item_filenames(&playlist);
        assert!(
            names == ["a.jpg", "a.jpg", "a.jpg"] || names == ["b.jpg", "b.jpg"],
            "unexpected merge: {:?}",
            names
        );
    }
}
