use std::net::SocketAddr;

use log::debug;

use crate::clients::{
    catalog::DEFAULT_CATALOG_URL,
    errors::{Error, Result},
    playlist::DEFAULT_PLAYLIST_URL,
    stream::{AudioQuality, DEFAULT_YTDLP_PATH},
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

/// Runtime settings, read from `SONGBRIDGE_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ytdlp_path: String,
    pub catalog_url: String,
    pub playlist_url: String,
    pub quality: AudioQuality,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            ytdlp_path: DEFAULT_YTDLP_PATH.to_string(),
            catalog_url: DEFAULT_CATALOG_URL.to_string(),
            playlist_url: DEFAULT_PLAYLIST_URL.to_string(),
            quality: AudioQuality::default(),
        }
    }
}

impl Config {
    // Loads `.env` first when one exists, real environment wins
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {path:?}");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let port = match lookup("SONGBRIDGE_PORT") {
            Some(raw) => parse_number("SONGBRIDGE_PORT", &raw)?,
            None => defaults.port,
        };
        let quality = match lookup("SONGBRIDGE_MAX_ABR") {
            Some(raw) => AudioQuality {
                max_abr_kbps: parse_number("SONGBRIDGE_MAX_ABR", &raw)?,
            },
            None => defaults.quality,
        };

        Ok(Config {
            host: lookup("SONGBRIDGE_HOST").unwrap_or(defaults.host),
            port,
            ytdlp_path: lookup("SONGBRIDGE_YTDLP").unwrap_or(defaults.ytdlp_path),
            catalog_url: lookup("SONGBRIDGE_CATALOG_URL").unwrap_or(defaults.catalog_url),
            playlist_url: lookup("SONGBRIDGE_PLAYLIST_URL").unwrap_or(defaults.playlist_url),
            quality,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::ConfigurationError(format!("invalid listen address: {e}")))
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::ConfigurationError(format!("{key}={raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_listen_locally_on_5000() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:5000");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("SONGBRIDGE_HOST", "0.0.0.0"),
            ("SONGBRIDGE_PORT", "8080"),
            ("SONGBRIDGE_MAX_ABR", "160"),
            ("SONGBRIDGE_YTDLP", "/usr/local/bin/yt-dlp"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.quality.max_abr_kbps, 160);
        assert_eq!(config.ytdlp_path, "/usr/local/bin/yt-dlp");
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn bad_port_is_a_configuration_error() {
        let err = Config::from_lookup(lookup_from(&[("SONGBRIDGE_PORT", "http")])).unwrap_err();
        assert!(matches!(err, Error::ConfigurationError(_)));
    }
}
