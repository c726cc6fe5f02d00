use serde::{Deserialize, Serialize};

/// An artist as embedded in tracks and albums.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artist {
    pub uri: String,
    pub name: String,
}

impl Artist {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }
}

/// A single artwork variant. Dimensions are in pixels when the source reports them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    pub uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Image {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            width: None,
            height: None,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Album summary. Built before its tracks so each track can embed a copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub uri: String,
    pub name: String,
    pub artists: Vec<Artist>,
    /// Release date as reported upstream (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
    pub date: Option<String>,
    pub images: Vec<Image>,
}

/// A playable track as handed to the host.
///
/// `bitrate` describes the encoding the host asked for, not a property of
/// the upstream data: every track produced by one lookup carries the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub uri: String,
    pub name: String,
    pub artists: Vec<Artist>,
    pub album: Option<Album>,
    /// Duration in milliseconds when known.
    pub length_ms: Option<u32>,
    pub track_no: Option<u32>,
    pub disc_no: Option<u32>,
    pub bitrate: u32,
}

impl Track {
    /// First artist name, or an empty string for artist-less tracks.
    pub fn artist_name(&self) -> &str {
        self.artists.first().map(|a| a.name.as_str()).unwrap_or("")
    }
}

/// Lightweight reference to a track, used when browsing playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRef {
    pub uri: String,
    pub name: String,
}

impl TrackRef {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }
}

/// Lightweight reference to a playlist, used when listing a user's playlists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRef {
    pub uri: String,
    pub name: String,
}

impl PlaylistRef {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artist_name_defaults_to_empty() {
        let track = Track {
            uri: "spotify:track:abc".into(),
            name: "ABC 123".into(),
            artists: Vec::new(),
            album: None,
            length_ms: None,
            track_no: None,
            disc_no: None,
            bitrate: 160,
        };
        assert_eq!(track.artist_name(), "");
    }

    #[test]
    fn image_size_is_optional() {
        let image = Image::new("https://i.scdn.co/image/abc");
        assert_eq!(image.width, None);
        let sized = image.with_size(640, 640);
        assert_eq!(sized.width, Some(640));
        assert_eq!(sized.height, Some(640));
    }
}
