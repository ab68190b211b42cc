// src/main.rs

use rocket::launch;

use mediadeck::config;
use mediadeck::services::{MediaStore, PlaylistStore};

#[launch]
fn rocket() -> rocket::Rocket<rocket::Build> {
    // Initialize logging
    env_logger::init();

    println!("============================================================");
    println!("MediaDeck - media playlist manager");
    println!("============================================================");

    let media = MediaStore::new(&*config::MEDIA_DIR);
    let playlists = PlaylistStore::new(&*config::PLAYLISTS_DIR, media.clone());

    if let Err(e) = media.ensure_layout() {
        eprintln!("Failed to create media directory: {}", e);
    }
    if let Err(e) = playlists.ensure_layout() {
        eprintln!("Failed to create playlist directories: {}", e);
    }

    // Report what is already on disk
    let media_count = std::fs::read_dir(&*config::MEDIA_DIR)
        .map(|entries| entries.count())
        .unwrap_or(0);
    println!("📁 Media directory: {} ({} files)", config::MEDIA_DIR.display(), media_count);

    match playlists.list() {
        Ok(found) => {
            println!("✅ Found {} playlists", found.len());
            for playlist in &found {
                println!("   \"{}\" ({} items)", playlist.name, playlist.items.len());
            }
        }
        Err(e) => {
            println!("⚠️  Could not scan playlists: {}", e);
        }
    }

    println!("🌐 Server starting at: http://{}:{}", config::HOST, config::port());
    println!("============================================================");

    mediadeck::build(&config::MEDIA_DIR, &config::PLAYLISTS_DIR)
}
