// Library exports for the mediadeck crate
// This allows integration tests to build the full Rocket instance against
// their own directories instead of the configured ones.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use config::port;
pub use error::{AppError, Result};
pub use models::{MediaItem, MediaType, Playlist};
pub use services::{MediaStore, PlaylistStore};

use rocket::data::{Limits, ToByteUnit};
use rocket::{catchers, routes, Build, Rocket};
use rocket_dyn_templates::Template;
use std::path::Path;

/// Build the Rocket instance over the given media and playlist directories.
/// Both directory layouts are created if missing.
pub fn build(media_dir: &Path, playlists_dir: &Path) -> Rocket<Build> {
    let media = MediaStore::new(media_dir);
    let playlists = PlaylistStore::new(playlists_dir, media.clone());

    if let Err(e) = media.ensure_layout() {
        log::error!("Failed to create media directory {}: {}", media_dir.display(), e);
    }
    if let Err(e) = playlists.ensure_layout() {
        log::error!(
            "Failed to create playlist directories under {}: {}",
            playlists_dir.display(),
            e
        );
    }

    // Default limits are too small for video uploads
    let limits = Limits::default()
        .limit("file", 512.mebibytes())
        .limit("data-form", 512.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("address", config::HOST))
        .merge(("port", config::port()))
        .merge(("limits", limits));

    rocket::custom(figment)
        .manage(media)
        .manage(playlists)
        .mount("/", routes![
            // Main interface
            handlers::index,

            // Playlist API
            handlers::list_playlists,
            handlers::create_playlist,
            handlers::update_playlist,
            handlers::delete_playlist,
            handlers::add_media,

            // Media API
            handlers::upload_media,
            handlers::uploads,

            // Service endpoints
            handlers::health_check,

            // Static files and client fallback
            handlers::static_files,
            handlers::fallback,
        ])
        .register("/", catchers![
            handlers::bad_request,
            handlers::not_found,
            handlers::unprocessable,
            handlers::server_error,
        ])
        .attach(Template::fairing())
}
