use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub id: Option<String>,
}

impl Artist {
    pub fn new(name: impl Into<String>) -> Self {
        Artist {
            name: name.into(),
            id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// A track as the catalog provider returns it, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTrack {
    pub title: Option<String>,
    pub artists: Vec<Artist>,
    pub video_id: Option<String>,
    pub duration: Option<String>,
    // provider order, smallest first
    pub thumbnails: Vec<Thumbnail>,
}

/// Normalized track shape served by `GET /search`.
///
/// Missing values serialize as `null`, so clients always see every key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub title: Option<String>,
    pub artist: String,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<CatalogTrack> for TrackRecord {
    fn from(t: CatalogTrack) -> TrackRecord {
        let artist = t
            .artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        TrackRecord {
            title: t.title,
            artist,
            video_id: t.video_id,
            duration: t.duration,
            thumbnail: t.thumbnails.into_iter().last().map(|th| th.url),
        }
    }
}
