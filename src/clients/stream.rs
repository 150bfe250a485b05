use async_trait::async_trait;
use log::{debug, warn};
use tokio::process::Command;

use crate::clients::errors::{Error, Result};

pub const DEFAULT_YTDLP_PATH: &str = "yt-dlp";

const WATCH_URL: &str = "https://www.youtube.com/watch";

/// Upper bound on the audio bitrate a resolved stream may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioQuality {
    pub max_abr_kbps: u32,
}

impl Default for AudioQuality {
    fn default() -> Self {
        AudioQuality { max_abr_kbps: 128 }
    }
}

impl AudioQuality {
    /// yt-dlp format selector: best audio-only stream within the cap.
    pub fn format_selector(&self) -> String {
        format!("bestaudio[abr<={}]", self.max_abr_kbps)
    }
}

/// Canonical watch page for a catalog track identifier.
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL}?v={video_id}")
}

/// Maps a track identifier to a direct, time-limited audio URL.
#[async_trait]
pub trait StreamResolver: Send + Sync {
    async fn resolve(&self, video_id: &str, quality: AudioQuality) -> Result<String>;
}

/// Resolves stream URLs by shelling out to `yt-dlp` without downloading.
pub struct YtDlpResolver {
    binary: String,
}

impl YtDlpResolver {
    pub fn new(binary: impl Into<String>) -> Self {
        YtDlpResolver {
            binary: binary.into(),
        }
    }

    fn args(video_id: &str, quality: AudioQuality) -> Vec<String> {
        vec![
            "-f".into(),
            quality.format_selector(),
            "--get-url".into(),
            "--no-playlist".into(),
            "--no-warnings".into(),
            "--quiet".into(),
            "--skip-download".into(),
            watch_url(video_id),
        ]
    }
}

#[async_trait]
impl StreamResolver for YtDlpResolver {
    async fn resolve(&self, video_id: &str, quality: AudioQuality) -> Result<String> {
        debug!("Resolving stream for {video_id} with {}", quality.format_selector());
        let output = Command::new(&self.binary)
            .args(Self::args(video_id, quality))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::StreamExtractionError(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("yt-dlp exited with {} for {video_id}", output.status);
            return Err(Error::StreamExtractionError(stderr.trim().to_string()));
        }

        first_url(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
            Error::StreamExtractionError(format!(
                "no audio stream matching {} for {video_id}",
                quality.format_selector()
            ))
        })
    }
}

fn first_url(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
