//! Songbridge - song search and playable audio stream resolution over HTTP
//!
//! This library wraps a music catalog search and an audio stream resolver
//! behind two JSON endpoints, plus a lookup client for hosted playlists.

/// Client modules for interacting with external services
pub mod clients;
/// Runtime configuration from the environment
pub mod config;
/// HTTP routes and handlers
pub mod server;
