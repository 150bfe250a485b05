/// YouTube Music catalog search
pub mod catalog;
/// Data entities for tracks and artists
pub mod entities;
/// Error types and result aliases
pub mod errors;
/// Hosted playlist lookup client
pub mod playlist;
/// Audio stream URL resolution via `yt-dlp`
pub mod stream;

pub use catalog::{CatalogProvider, SearchFilter, YtMusicClient};
pub use playlist::{PlaylistClient, PlaylistLookup};
pub use stream::{AudioQuality, StreamResolver, YtDlpResolver};
