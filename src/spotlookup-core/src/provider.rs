use crate::models::{Image, PlaylistRef, Track, TrackRef};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Capability flags describing which backing collaborators a provider has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderCapabilities {
    pub web_api: bool,
    pub native_session: bool,
    pub images: bool,
    pub playlists: bool,
}

impl ProviderCapabilities {
    pub fn supports_images(&self) -> bool {
        self.images
    }

    pub fn supports_playlists(&self) -> bool {
        self.playlists
    }

    /// True when at least one backing source is present.
    pub fn has_backend(&self) -> bool {
        self.web_api || self.native_session
    }
}

/// Common categories of backend failures.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {message}")]
    Network { message: String },
    #[error("authentication error: {message}")]
    Authentication { message: String },
    #[error("entity not found: {entity}")]
    NotFound { entity: String },
    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },
    #[error("rate limited (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },
    #[error("failed to decode response: {message}")]
    Decode { message: String },
    #[error("{message}")]
    Other { message: String },
}

impl ProviderError {
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Read-only catalog surface a media-player host talks to.
///
/// `lookup` never fails: unparseable or unsupported references and backend
/// errors all resolve to an empty list, with the cause logged.
pub trait LibraryProvider {
    /// Stable provider identifier (e.g. "spotify").
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn capabilities(&self) -> ProviderCapabilities;

    /// Expand a resource identifier into an ordered list of playable tracks.
    fn lookup(&self, uri: &str) -> Vec<Track>;

    /// Artwork for each resolvable uri. Unresolvable uris are absent from the map.
    fn get_images(&self, _uris: &[String]) -> HashMap<String, Arc<[Image]>> {
        HashMap::new()
    }

    fn list_playlists(&self) -> ProviderResult<Vec<PlaylistRef>> {
        Err(ProviderError::not_supported("list_playlists"))
    }

    /// Track refs of one playlist; `Ok(None)` when the playlist cannot be found.
    fn playlist_items(&self, _uri: &str) -> ProviderResult<Option<Vec<TrackRef>>> {
        Err(ProviderError::not_supported("playlist_items"))
    }

    fn refresh(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_backend_needs_a_source() {
        let caps = ProviderCapabilities::default();
        assert!(!caps.has_backend());
        let caps = ProviderCapabilities {
            native_session: true,
            ..Default::default()
        };
        assert!(caps.has_backend());
    }

    #[test]
    fn errors_render_context() {
        let err = ProviderError::NotFound {
            entity: "spotify:track:abc".into(),
        };
        assert_eq!(err.to_string(), "entity not found: spotify:track:abc");
        let err = ProviderError::RateLimited {
            retry_after: Some(3),
        };
        assert!(err.to_string().contains("Some(3)"));
    }
}
