use async_trait::async_trait;
use log::debug;
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde_json::Value;

use crate::clients::{
    entities::{Artist, CatalogTrack, Thumbnail},
    errors::{Error, Result},
};

pub const DEFAULT_CATALOG_URL: &str = "https://music.youtube.com/youtubei/v1";

const CLIENT_NAME: &str = "WEB_REMIX";
const CLIENT_VERSION: &str = "1.20241106.01.00";
const ORIGIN: &str = "https://music.youtube.com";
const BROWSER_UA: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Category a catalog search is narrowed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchFilter {
    #[default]
    Songs,
    Videos,
    All,
}

impl SearchFilter {
    /// Opaque `params` token the catalog expects for this category.
    pub const fn params(self) -> Option<&'static str> {
        match self {
            SearchFilter::Songs => Some("EgWKAQIIAWoMEA4QChADEAQQCRAF"),
            SearchFilter::Videos => Some("EgWKAQIQAWoMEA4QChADEAQQCRAF"),
            SearchFilter::All => None,
        }
    }
}

/// Maps a free-text query to ranked track metadata.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    async fn search(&self, query: &str, filter: SearchFilter) -> Result<Vec<CatalogTrack>>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo {
    client_name: &'static str,
    client_version: &'static str,
    hl: &'static str,
    gl: &'static str,
}

#[derive(Serialize)]
struct RequestContext {
    client: ClientInfo,
}

#[derive(Serialize)]
struct SearchBody<'a> {
    context: RequestContext,
    query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<&'static str>,
}

impl<'a> SearchBody<'a> {
    fn new(query: &'a str, filter: SearchFilter) -> Self {
        SearchBody {
            context: RequestContext {
                client: ClientInfo {
                    client_name: CLIENT_NAME,
                    client_version: CLIENT_VERSION,
                    hl: "en",
                    gl: "US",
                },
            },
            query,
            params: filter.params(),
        }
    }
}

/// YouTube Music catalog search over the web client API.
pub struct YtMusicClient {
    http: reqwest::Client,
    base_url: String,
}

impl YtMusicClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        YtMusicClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert("Origin", HeaderValue::from_static(ORIGIN));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self::new(http, base_url))
    }
}

#[async_trait]
impl CatalogProvider for YtMusicClient {
    async fn search(&self, query: &str, filter: SearchFilter) -> Result<Vec<CatalogTrack>> {
        let url = format!("{}/search", self.base_url);
        debug!("Searching catalog for {query:?} ({filter:?})");

        let response = self
            .http
            .post(&url)
            .query(&[("prettyPrint", "false")])
            .json(&SearchBody::new(query, filter))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let raw: Value = response.json().await?;
        let tracks = parse_search_response(&raw)?;
        debug!("Catalog returned {} tracks for {query:?}", tracks.len());
        Ok(tracks)
    }
}

/// Extracts tracks from every music shelf of a search response, in response order.
pub fn parse_search_response(raw: &Value) -> Result<Vec<CatalogTrack>> {
    let tabs = raw
        .pointer("/contents/tabbedSearchResultsRenderer/tabs")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::CatalogUnexpectedResponse("search response has no result tabs".into())
        })?;

    let tracks = tabs
        .iter()
        .filter_map(|tab| {
            tab.pointer("/tabRenderer/content/sectionListRenderer/contents")
                .and_then(Value::as_array)
        })
        .flatten()
        .filter_map(|section| {
            section
                .pointer("/musicShelfRenderer/contents")
                .and_then(Value::as_array)
        })
        .flatten()
        .filter_map(|item| item.get("musicResponsiveListItemRenderer"))
        .map(parse_list_item)
        .collect();

    Ok(tracks)
}

fn parse_list_item(renderer: &Value) -> CatalogTrack {
    let title = flex_column_runs(renderer, 0)
        .and_then(|runs| runs.first())
        .and_then(|run| run.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let details = flex_column_runs(renderer, 1).map(Vec::as_slice).unwrap_or_default();

    let duration = details
        .iter()
        .filter_map(run_text)
        .find(|text| is_duration(text))
        .or_else(|| {
            renderer
                .pointer("/fixedColumns/0/musicResponsiveListItemFixedColumnRenderer/text/runs/0/text")
                .and_then(Value::as_str)
        })
        .map(str::to_string);

    let video_id = renderer
        .pointer("/playlistItemData/videoId")
        .or_else(|| {
            renderer.pointer(
                "/overlay/musicItemThumbnailOverlayRenderer/content/musicPlayButtonRenderer/playNavigationEndpoint/watchEndpoint/videoId",
            )
        })
        .and_then(Value::as_str)
        .map(str::to_string);

    let thumbnails = renderer
        .pointer("/thumbnail/musicThumbnailRenderer/thumbnail/thumbnails")
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(parse_thumbnail).collect())
        .unwrap_or_default();

    CatalogTrack {
        title,
        artists: parse_artists(details),
        video_id,
        duration,
        thumbnails,
    }
}

fn flex_column_runs(renderer: &Value, column: usize) -> Option<&Vec<Value>> {
    renderer
        .get("flexColumns")?
        .get(column)?
        .pointer("/musicResponsiveListItemFlexColumnRenderer/text/runs")?
        .as_array()
}

fn run_text(run: &Value) -> Option<&str> {
    run.get("text").and_then(Value::as_str)
}

fn parse_artists(runs: &[Value]) -> Vec<Artist> {
    let linked: Vec<Artist> = runs
        .iter()
        .filter_map(|run| {
            let browse_id = run
                .pointer("/navigationEndpoint/browseEndpoint/browseId")
                .and_then(Value::as_str)?;
            if !browse_id.starts_with("UC") {
                return None;
            }
            Some(Artist {
                name: run_text(run)?.to_string(),
                id: Some(browse_id.to_string()),
            })
        })
        .collect();

    if !linked.is_empty() {
        return linked;
    }

    // unlinked artist names only appear before the first separator
    runs.iter()
        .filter_map(run_text)
        .take_while(|text| !is_separator(text))
        .filter(|text| !is_duration(text) && !text.trim().is_empty())
        .map(Artist::new)
        .take(1)
        .collect()
}

fn is_separator(text: &str) -> bool {
    text.trim() == "•"
}

fn is_duration(text: &str) -> bool {
    let parts: Vec<&str> = text.split(':').collect();
    (2..=3).contains(&parts.len())
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}

fn parse_thumbnail(value: &Value) -> Option<Thumbnail> {
    let dimension = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
    };
    Some(Thumbnail {
        url: value.get("url")?.as_str()?.to_string(),
        width: dimension("width"),
        height: dimension("height"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn song_item(title: &str, detail_runs: Value, video_id: &str) -> Value {
        json!({
            "musicResponsiveListItemRenderer": {
                "thumbnail": {"musicThumbnailRenderer": {"thumbnail": {"thumbnails": [
                    {"url": "https://lh3/60", "width": 60, "height": 60},
                    {"url": "https://lh3/120", "width": 120, "height": 120}
                ]}}},
                "flexColumns": [
                    {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": [{"text": title}]}}},
                    {"musicResponsiveListItemFlexColumnRenderer": {"text": {"runs": detail_runs}}}
                ],
                "playlistItemData": {"videoId": video_id}
            }
        })
    }

    fn response(items: Vec<Value>) -> Value {
        json!({
            "contents": {"tabbedSearchResultsRenderer": {"tabs": [
                {"tabRenderer": {"content": {"sectionListRenderer": {"contents": [
                    {"itemSectionRenderer": {}},
                    {"musicShelfRenderer": {"contents": items}}
                ]}}}}
            ]}}
        })
    }

    #[test]
    fn parses_linked_artists_duration_and_thumbnails() {
        let runs = json!([
            {"text": "Ed Sheeran", "navigationEndpoint": {"browseEndpoint": {"browseId": "UClmXPfaYhXOYsNn_QUyheWQ"}}},
            {"text": " & "},
            {"text": "Stormzy", "navigationEndpoint": {"browseEndpoint": {"browseId": "UCa0R2zfbGl5FqX0P4BbEU0A"}}},
            {"text": " • "},
            {"text": "÷ (Deluxe)", "navigationEndpoint": {"browseEndpoint": {"browseId": "MPREb_abc"}}},
            {"text": " • "},
            {"text": "3:54"}
        ]);
        let raw = response(vec![song_item("Shape of You", runs, "JGwWNGJdvx8")]);

        let tracks = parse_search_response(&raw).unwrap();

        assert_eq!(tracks.len(), 1);
        let track = &tracks[0];
        assert_eq!(track.title.as_deref(), Some("Shape of You"));
        let names: Vec<_> = track.artists.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Ed Sheeran", "Stormzy"]);
        assert_eq!(track.duration.as_deref(), Some("3:54"));
        assert_eq!(track.video_id.as_deref(), Some("JGwWNGJdvx8"));
        assert_eq!(track.thumbnails.last().unwrap().url, "https://lh3/120");
    }

    #[test]
    fn falls_back_to_plain_artist_run() {
        let runs = json!([{"text": "Unknown Band"}, {"text": " • "}, {"text": "1:02:03"}]);
        let raw = response(vec![song_item("Long Jam", runs, "abc")]);

        let tracks = parse_search_response(&raw).unwrap();

        assert_eq!(tracks[0].artists, vec![Artist::new("Unknown Band")]);
        assert_eq!(tracks[0].duration.as_deref(), Some("1:02:03"));
    }

    #[test]
    fn overlay_video_id_is_used_when_item_data_is_missing() {
        let raw = response(vec![json!({
            "musicResponsiveListItemRenderer": {
                "flexColumns": [],
                "overlay": {"musicItemThumbnailOverlayRenderer": {"content": {"musicPlayButtonRenderer": {
                    "playNavigationEndpoint": {"watchEndpoint": {"videoId": "overlayId"}}
                }}}}
            }
        })]);

        let tracks = parse_search_response(&raw).unwrap();

        assert_eq!(tracks[0].video_id.as_deref(), Some("overlayId"));
        assert_eq!(tracks[0].title, None);
        assert!(tracks[0].artists.is_empty());
        assert!(tracks[0].thumbnails.is_empty());
    }

    #[test]
    fn keeps_response_order_across_shelves() {
        let raw = json!({
            "contents": {"tabbedSearchResultsRenderer": {"tabs": [
                {"tabRenderer": {"content": {"sectionListRenderer": {"contents": [
                    {"musicShelfRenderer": {"contents": [song_item("first", json!([]), "1")]}},
                    {"musicShelfRenderer": {"contents": [song_item("second", json!([]), "2")]}}
                ]}}}}
            ]}}
        });

        let ids: Vec<_> = parse_search_response(&raw)
            .unwrap()
            .into_iter()
            .filter_map(|t| t.video_id)
            .collect();

        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn empty_tab_yields_no_tracks() {
        let raw = json!({"contents": {"tabbedSearchResultsRenderer": {"tabs": [
            {"tabRenderer": {"content": {"sectionListRenderer": {"contents": []}}}}
        ]}}});

        assert!(parse_search_response(&raw).unwrap().is_empty());
    }

    #[test]
    fn missing_tabs_is_an_error() {
        let err = parse_search_response(&json!({"responseContext": {}})).unwrap_err();
        assert!(matches!(err, Error::CatalogUnexpectedResponse(_)));
    }

    #[test]
    fn duration_detection() {
        assert!(is_duration("3:54"));
        assert!(is_duration("1:02:03"));
        assert!(!is_duration("2017"));
        assert!(!is_duration("a:bc"));
        assert!(!is_duration(":30"));
    }

    #[test]
    fn songs_filter_sends_params() {
        let body = serde_json::to_value(SearchBody::new("q", SearchFilter::Songs)).unwrap();
        assert_eq!(body["params"], json!("EgWKAQIIAWoMEA4QChADEAQQCRAF"));
        assert_eq!(body["context"]["client"]["clientName"], json!("WEB_REMIX"));

        let body = serde_json::to_value(SearchBody::new("q", SearchFilter::All)).unwrap();
        assert!(body.get("params").is_none());
    }
}
