//! Interface to a native streaming session.
//!
//! The session owns connection, login and audio; this crate only asks it to
//! resolve a link and block until the projected object is loaded.

use crate::uri::SpotifyUri;
use spotlookup_core::ProviderResult;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Available,
    Unavailable,
    NotStreamable,
    BannedByArtist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NativeAlbumType {
    #[default]
    Album,
    Single,
    Compilation,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeArtist {
    pub uri: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAlbum {
    pub uri: String,
    pub name: String,
    pub artist: Option<NativeArtist>,
    pub year: Option<u32>,
    pub album_type: NativeAlbumType,
    pub is_available: bool,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTrack {
    pub uri: String,
    pub name: String,
    pub artists: Vec<NativeArtist>,
    pub album: Option<NativeAlbum>,
    pub duration_ms: u32,
    pub index: Option<u32>,
    pub disc: Option<u32>,
    pub availability: Availability,
}

/// An album together with its track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeAlbumBrowse {
    pub album: NativeAlbum,
    pub tracks: Vec<NativeTrack>,
}

/// An artist's albums, each browsed with tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeArtistBrowse {
    pub artist: NativeArtist,
    pub albums: Vec<NativeAlbumBrowse>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePlaylist {
    pub uri: String,
    pub name: String,
    pub owner: Option<String>,
    pub tracks: Vec<NativeTrack>,
}

/// Loaded projection of a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NativeEntity {
    Track(NativeTrack),
    Album(NativeAlbumBrowse),
    Artist(NativeArtistBrowse),
    Playlist(NativePlaylist),
}

impl NativeEntity {
    pub fn kind(&self) -> &'static str {
        match self {
            NativeEntity::Track(_) => "track",
            NativeEntity::Album(_) => "album",
            NativeEntity::Artist(_) => "artist",
            NativeEntity::Playlist(_) => "playlist",
        }
    }
}

/// A native session capable of resolving links.
///
/// Implementations block the calling thread for at most `timeout` and are not
/// expected to be usable from several threads at once.
pub trait NativeSession {
    /// Resolve `link`, project it onto its entity type and load it.
    ///
    /// Starred links (`spotify:user:<owner>:starred`) load as a playlist.
    fn load(&self, link: &SpotifyUri, timeout: Duration) -> ProviderResult<NativeEntity>;
}
