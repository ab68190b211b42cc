pub mod media;
pub mod playlist;

pub use media::MediaStore;
pub use playlist::PlaylistStore;
