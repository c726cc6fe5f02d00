//! Raw Web API payloads. Only the fields the translator reads are modelled.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Restrictions {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Album as embedded in a track or listed under an artist.
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// Full album from `/v1/albums`, with the first page of its tracks embedded.
#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    pub uri: String,
    pub name: String,
    #[serde(default)]
    pub album_type: Option<String>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub restrictions: Option<Restrictions>,
    #[serde(default)]
    pub tracks: Option<Paging<Track>>,
}

impl Album {
    pub fn is_compilation(&self) -> bool {
        self.album_type.as_deref() == Some("compilation")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinkedFrom {
    pub id: String,
}

/// Full or simplified track. Simplified tracks (inside an album) lack `album`.
#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub uri: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration_ms: Option<u32>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub disc_number: Option<u32>,
    #[serde(default)]
    pub is_playable: Option<bool>,
    #[serde(default)]
    pub is_local: bool,
    #[serde(default)]
    pub restrictions: Option<Restrictions>,
    #[serde(default)]
    pub linked_from: Option<LinkedFrom>,
}

/// Entry of `/v1/.../playlists/<id>/tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub is_local: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Playlist as listed under `/v1/users/<owner>/playlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    #[serde(default)]
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    pub owner: User,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Decoded item of a batch response, tagged by the endpoint it came from.
#[derive(Debug, Clone)]
pub enum WebEntity {
    Track(Track),
    Album(Album),
    Artist(Artist),
}

impl WebEntity {
    pub fn into_track(self) -> Option<Track> {
        match self {
            WebEntity::Track(track) => Some(track),
            _ => None,
        }
    }

    pub fn into_album(self) -> Option<Album> {
        match self {
            WebEntity::Album(album) => Some(album),
            _ => None,
        }
    }
}
