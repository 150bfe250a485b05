use log::{debug, error};
use serde_json::{Map, Value};

use crate::clients::errors::{Error, Result};

pub const DEFAULT_PLAYLIST_URL: &str = "https://jiosaavnpro.vercel.app";

pub const DEFAULT_PLAYLIST_LINK: &str =
    "https://www.jiosaavn.com/playlist/bollywood/top-50/4FCrZtZUZvN5V6NlfmGwnA__";

// Outcome of a successful playlist lookup
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistLookup {
    // whatever the upstream put under `data`, unmodified
    Found(Value),
    // upstream answered but carried no `data` key
    Missing,
}

impl PlaylistLookup {
    pub fn into_data(self) -> Value {
        match self {
            PlaylistLookup::Found(data) => data,
            PlaylistLookup::Missing => Value::Object(Map::new()),
        }
    }
}

/// Client for the hosted playlist lookup service.
pub struct PlaylistClient {
    http: reqwest::Client,
    base_url: String,
}

impl PlaylistClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        PlaylistClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    // The link is forwarded as-is; the upstream service validates it
    pub async fn fetch(&self, link: &str) -> Result<PlaylistLookup> {
        let url = format!("{}/api/playlists", self.base_url);
        debug!("Fetching playlist {link} from {url}");

        let response = self.http.get(&url).query(&[("link", link)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(match body {
            Value::Object(mut map) => match map.remove("data") {
                Some(data) => PlaylistLookup::Found(data),
                None => PlaylistLookup::Missing,
            },
            _ => PlaylistLookup::Missing,
        })
    }

    /// Legacy contract: any failure is logged and collapsed into an empty mapping.
    pub async fn fetch_or_empty(&self, link: &str) -> Value {
        match self.fetch(link).await {
            Ok(lookup) => lookup.into_data(),
            Err(e) => {
                error!("Error fetching playlist: {e}");
                Value::Object(Map::new())
            }
        }
    }
}
