use rocket::form::Form;
use rocket::fs::{NamedFile, TempFile};
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::{catch, delete, get, post, put, FromForm, State};
use rocket_dyn_templates::{context, Template};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::{MediaItem, Playlist};
use crate::services::{MediaStore, PlaylistStore};

// ---------------------------------------------------------------------------
// Request/response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddMediaRequest {
    #[serde(rename = "mediaItems", default)]
    media_items: Vec<MediaItem>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    message: String,
}

#[derive(FromForm)]
pub struct MediaUpload<'r> {
    files: Vec<TempFile<'r>>,
}

// ---------------------------------------------------------------------------
// Pages
// ---------------------------------------------------------------------------

#[get("/")]
pub async fn index() -> Template {
    Template::render("index", context! {
        title: "MediaDeck",
    })
}

// Any route not claimed by the API, /uploads or /static falls back to the
// client entry page.
#[get("/<_..>", rank = 20)]
pub async fn fallback() -> Template {
    Template::render("index", context! {
        title: "MediaDeck",
    })
}

// ---------------------------------------------------------------------------
// Playlist API
// ---------------------------------------------------------------------------

#[get("/api/playlists")]
pub async fn list_playlists(playlists: &State<PlaylistStore>) -> Result<Json<Vec<Playlist>>> {
    Ok(Json(playlists.list()?))
}

#[post("/api/playlists", data = "<body>")]
pub async fn create_playlist(
    body: Json<CreatePlaylistRequest>,
    playlists: &State<PlaylistStore>,
) -> Result<status::Created<Json<Playlist>>> {
    let name = body.name.as_deref().unwrap_or("");
    let playlist = playlists.create(name)?;

    let location = format!("/api/playlists/{}", playlist.id);
    Ok(status::Created::new(location).body(Json(playlist)))
}

// The submitted body is echoed back on success; only the item filenames are
// persisted.
#[put("/api/playlists/<id>", data = "<body>")]
pub async fn update_playlist(
    id: &str,
    body: Json<Playlist>,
    playlists: &State<PlaylistStore>,
) -> Result<Json<Playlist>> {
    playlists.update(id, &body.items)?;
    Ok(body)
}

#[delete("/api/playlists/<id>")]
pub async fn delete_playlist(
    id: &str,
    playlists: &State<PlaylistStore>,
) -> Result<Json<DeleteResponse>> {
    playlists.delete(id)?;
    Ok(Json(DeleteResponse {
        message: "Playlist deleted successfully".to_string(),
    }))
}

#[post("/api/playlists/<id>/media", data = "<body>")]
pub async fn add_media(
    id: &str,
    body: Json<AddMediaRequest>,
    playlists: &State<PlaylistStore>,
) -> Result<Json<Playlist>> {
    Ok(Json(playlists.add_media(id, &body.media_items)?))
}

// ---------------------------------------------------------------------------
// Media API
// ---------------------------------------------------------------------------

#[post("/api/upload", data = "<upload>")]
pub async fn upload_media(
    upload: Form<MediaUpload<'_>>,
    media: &State<MediaStore>,
) -> Result<Json<Vec<MediaItem>>> {
    let mut form = upload.into_inner();
    let mut items = Vec::with_capacity(form.files.len());
    for file in form.files.iter_mut() {
        items.push(media.store(file).await?);
    }
    Ok(Json(items))
}

#[get("/uploads/<file..>")]
pub async fn uploads(file: PathBuf, media: &State<MediaStore>) -> Option<NamedFile> {
    NamedFile::open(media.dir().join(file)).await.ok()
}

// ---------------------------------------------------------------------------
// Service endpoints and static assets
// ---------------------------------------------------------------------------

#[get("/api/health")]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "server_time": chrono::Local::now().to_rfc3339(),
    }))
}

#[get("/static/<file..>")]
pub async fn static_files(file: PathBuf) -> Option<NamedFile> {
    let path = Path::new("static/").join(file);
    NamedFile::open(path).await.ok()
}

// ---------------------------------------------------------------------------
// Error catchers
// ---------------------------------------------------------------------------

#[catch(400)]
pub fn bad_request() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Bad request" }))
}

#[catch(404)]
pub fn not_found() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Not found" }))
}

#[catch(422)]
pub fn unprocessable() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Invalid request body" }))
}

#[catch(500)]
pub fn server_error() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "error": "Internal server error" }))
}
