//! Expansion of a resource identifier into an ordered list of tracks.
//!
//! Each reference type has a [`LookupStrategy`]. Strategies are built against
//! whichever backing source is present: track, album and artist prefer the
//! Web API, playlists and the starred collection prefer the native session.
//! Failures never leave [`LookupEngine::lookup`]; they are logged and the
//! lookup yields nothing.

use crate::batch::BatchFetcher;
use crate::mapping::{native_to_album, native_to_track, web_to_album, web_to_track};
use crate::models::{self, Paging, PlaylistItem, WebEntity};
use crate::native::{
    NativeAlbumBrowse, NativeAlbumType, NativeEntity, NativePlaylist, NativeSession,
};
use crate::uri::{LinkType, SpotifyUri};
use crate::web::WebClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use spotlookup_core::models::Track;
use spotlookup_core::{LookupConfig, ProviderError, ProviderResult};
use std::time::{Duration, Instant};

/// Artist ids that stand for "many artists" and are excluded from artist expansion.
pub const VARIOUS_ARTISTS_URIS: &[&str] = &["spotify:artist:0LyfQWJT6nXafLPZqxe9Of"];

/// Name of the playlist that backs a user's starred collection.
pub const STARRED_PLAYLIST_NAME: &str = "Starred";

const ARTIST_ALBUMS_LIMIT: u32 = 50;
const ARTIST_ALBUM_BATCH: usize = 20;
const PLAYLIST_TRACKS_LIMIT: u32 = 100;
pub(crate) const USER_PLAYLISTS_LIMIT: u32 = 50;

/// Backing source a strategy runs against.
#[derive(Clone, Copy)]
pub enum Source<'a> {
    Web(&'a dyn WebClient),
    Session {
        session: &'a dyn NativeSession,
        timeout: Duration,
    },
}

impl<'a> Source<'a> {
    fn load(&self, link: &SpotifyUri) -> ProviderResult<NativeEntity> {
        match self {
            Source::Session { session, timeout } => session.load(link, *timeout),
            Source::Web(_) => Err(ProviderError::not_supported("native load")),
        }
    }
}

/// Expands one kind of reference.
pub trait LookupStrategy {
    fn expand(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>>;
}

pub struct TrackStrategy<'a> {
    source: Source<'a>,
    bitrate: u32,
}

impl LookupStrategy for TrackStrategy<'_> {
    fn expand(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        match self.source {
            Source::Web(client) => {
                let track = BatchFetcher::new(client)
                    .fetch(std::slice::from_ref(link))?
                    .remove(link)
                    .and_then(WebEntity::into_track);
                Ok(track
                    .and_then(|t| web_to_track(&t, None, self.bitrate))
                    .into_iter()
                    .collect())
            }
            Source::Session { .. } => match self.source.load(link)? {
                NativeEntity::Track(track) => {
                    Ok(native_to_track(&track, None, self.bitrate).into_iter().collect())
                }
                other => Err(unexpected(link, &other)),
            },
        }
    }
}

pub struct AlbumStrategy<'a> {
    source: Source<'a>,
    bitrate: u32,
}

impl LookupStrategy for AlbumStrategy<'_> {
    fn expand(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        match self.source {
            Source::Web(client) => {
                let album = BatchFetcher::new(client)
                    .fetch(std::slice::from_ref(link))?
                    .remove(link)
                    .and_then(WebEntity::into_album);
                Ok(album
                    .map(|a| web_album_tracks(&a, self.bitrate))
                    .unwrap_or_default())
            }
            Source::Session { .. } => match self.source.load(link)? {
                NativeEntity::Album(browse) => Ok(native_album_tracks(&browse, self.bitrate)),
                other => Err(unexpected(link, &other)),
            },
        }
    }
}

pub struct ArtistStrategy<'a> {
    source: Source<'a>,
    bitrate: u32,
}

impl ArtistStrategy<'_> {
    fn expand_web(&self, client: &dyn WebClient, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        // TODO: follow `next` once artists with more than 50 releases matter
        let listing: Paging<models::AlbumRef> = get_json(
            client,
            &format!(
                "v1/artists/{}/albums?album_type=album,single&limit={ARTIST_ALBUMS_LIMIT}",
                urlencoding::encode(link.id())
            ),
        )?;
        let album_links: Vec<SpotifyUri> = listing
            .items
            .iter()
            .filter_map(|a| a.uri.as_deref())
            .filter_map(|uri| SpotifyUri::parse(uri).ok())
            .collect();

        let albums = BatchFetcher::new(client)
            .with_limit(ARTIST_ALBUM_BATCH)
            .fetch_lenient(&album_links);

        // a release listed twice yields its tracks twice
        let mut tracks = Vec::new();
        for album_link in &album_links {
            let Some(WebEntity::Album(album)) = albums.get(album_link) else {
                continue;
            };
            if skip_web_album(album) {
                tracing::debug!("Skipping album {} for artist {}", album.uri, link);
                continue;
            }
            tracks.extend(web_album_tracks(album, self.bitrate));
        }
        Ok(tracks)
    }

    fn expand_native(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        let browse = match self.source.load(link)? {
            NativeEntity::Artist(browse) => browse,
            other => return Err(unexpected(link, &other)),
        };
        Ok(browse
            .albums
            .iter()
            .filter(|b| !skip_native_album(b))
            .flat_map(|b| native_album_tracks(b, self.bitrate))
            .collect())
    }
}

impl LookupStrategy for ArtistStrategy<'_> {
    fn expand(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        let started = Instant::now();
        let result = match self.source {
            Source::Web(client) => self.expand_web(client, link),
            Source::Session { .. } => self.expand_native(link),
        };
        tracing::debug!(
            "Artist lookup of {} took {}ms",
            link,
            started.elapsed().as_millis()
        );
        result
    }
}

pub struct PlaylistStrategy<'a> {
    source: Source<'a>,
    bitrate: u32,
}

impl LookupStrategy for PlaylistStrategy<'_> {
    fn expand(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        match self.source {
            Source::Web(client) => web_playlist_tracks(client, link, self.bitrate),
            Source::Session { .. } => match self.source.load(link)? {
                NativeEntity::Playlist(playlist) => {
                    Ok(native_playlist_tracks(&playlist, self.bitrate))
                }
                other => Err(unexpected(link, &other)),
            },
        }
    }
}

/// The owner's "Starred" playlist, most recently starred first.
pub struct StarredStrategy<'a> {
    source: Source<'a>,
    bitrate: u32,
}

impl StarredStrategy<'_> {
    fn in_source_order(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        match self.source {
            Source::Web(client) => {
                let Some(owner) = link.owner() else {
                    return Ok(Vec::new());
                };
                let page: Paging<Value> = get_json(
                    client,
                    &format!(
                        "v1/users/{}/playlists?limit={USER_PLAYLISTS_LIMIT}",
                        urlencoding::encode(owner)
                    ),
                )?;
                let playlists: Vec<models::Playlist> = decode_items(page.items);
                let Some(starred) = playlists
                    .iter()
                    .find(|p| p.name == STARRED_PLAYLIST_NAME)
                else {
                    tracing::debug!("No {STARRED_PLAYLIST_NAME} playlist for {owner}");
                    return Ok(Vec::new());
                };
                let playlist_link =
                    SpotifyUri::parse(&starred.uri).map_err(|e| ProviderError::Decode {
                        message: e.to_string(),
                    })?;
                web_playlist_tracks(client, &playlist_link, self.bitrate)
            }
            Source::Session { .. } => match self.source.load(link)? {
                NativeEntity::Playlist(playlist) => {
                    Ok(native_playlist_tracks(&playlist, self.bitrate))
                }
                other => Err(unexpected(link, &other)),
            },
        }
    }
}

impl LookupStrategy for StarredStrategy<'_> {
    fn expand(&self, link: &SpotifyUri) -> ProviderResult<Vec<Track>> {
        let mut tracks = self.in_source_order(link)?;
        tracks.reverse();
        Ok(tracks)
    }
}

/// Dispatches a lookup to the strategy for the reference's type.
pub struct LookupEngine<'a> {
    config: LookupConfig,
    web: Option<&'a dyn WebClient>,
    session: Option<&'a dyn NativeSession>,
}

impl<'a> LookupEngine<'a> {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            config,
            web: None,
            session: None,
        }
    }

    pub fn with_web_client(mut self, client: &'a dyn WebClient) -> Self {
        self.web = Some(client);
        self
    }

    pub fn with_session(mut self, session: &'a dyn NativeSession) -> Self {
        self.session = Some(session);
        self
    }

    fn web_source(&self) -> Option<Source<'a>> {
        self.web.map(Source::Web)
    }

    fn session_source(&self) -> Option<Source<'a>> {
        self.session.map(|session| Source::Session {
            session,
            timeout: self.config.timeout(),
        })
    }

    /// Pick the strategy for `kind`, or `None` when the kind is unsupported
    /// or no backing source is present.
    pub fn strategy(&self, kind: &LinkType) -> Option<Box<dyn LookupStrategy + 'a>> {
        let bitrate = self.config.bitrate;
        let web_first = || self.web_source().or_else(|| self.session_source());
        let session_first = || self.session_source().or_else(|| self.web_source());

        let strategy: Box<dyn LookupStrategy + 'a> = match kind {
            LinkType::Track => Box::new(TrackStrategy {
                source: web_first()?,
                bitrate,
            }),
            LinkType::Album => Box::new(AlbumStrategy {
                source: web_first()?,
                bitrate,
            }),
            LinkType::Artist => Box::new(ArtistStrategy {
                source: web_first()?,
                bitrate,
            }),
            LinkType::Playlist => Box::new(PlaylistStrategy {
                source: session_first()?,
                bitrate,
            }),
            LinkType::Starred => Box::new(StarredStrategy {
                source: session_first()?,
                bitrate,
            }),
            LinkType::Unknown(_) => return None,
        };
        Some(strategy)
    }

    /// Resolve `uri` into tracks. Never fails; problems are logged.
    pub fn lookup(&self, uri: &str) -> Vec<Track> {
        let link = match SpotifyUri::parse(uri) {
            Ok(link) => link,
            Err(err) => {
                tracing::info!("Failed to lookup \"{}\": {}", uri, err);
                return Vec::new();
            }
        };

        let Some(strategy) = self.strategy(link.kind()) else {
            if self.web.is_none() && self.session.is_none() {
                tracing::info!("Failed to lookup \"{}\": no backend available", uri);
            } else {
                tracing::info!("Failed to lookup \"{}\": unsupported type {}", uri, link.kind());
            }
            return Vec::new();
        };

        match strategy.expand(&link) {
            Ok(tracks) => {
                tracing::debug!("Lookup of {} produced {} tracks", link, tracks.len());
                tracks
            }
            Err(err) => {
                tracing::info!("Failed to lookup \"{}\": {}", uri, err);
                Vec::new()
            }
        }
    }
}

/// One-shot lookup against whichever collaborators are present.
pub fn lookup(
    config: &LookupConfig,
    session: Option<&dyn NativeSession>,
    uri: &str,
    web_client: Option<&dyn WebClient>,
) -> Vec<Track> {
    let mut engine = LookupEngine::new(*config);
    if let Some(session) = session {
        engine = engine.with_session(session);
    }
    if let Some(client) = web_client {
        engine = engine.with_web_client(client);
    }
    engine.lookup(uri)
}

fn get_json<T: DeserializeOwned>(client: &dyn WebClient, path: &str) -> ProviderResult<T> {
    let body = client.get(path)?;
    serde_json::from_value(body).map_err(|e| ProviderError::Decode {
        message: format!("{path}: {e}"),
    })
}

/// Decode listing items one by one, dropping the ones that do not fit `T`.
pub(crate) fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter(|item| !item.is_null())
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!("Dropping undecodable listing entry: {}", err);
                None
            }
        })
        .collect()
}

fn unexpected(link: &SpotifyUri, entity: &NativeEntity) -> ProviderError {
    ProviderError::Other {
        message: format!("{link} resolved to a {}", entity.kind()),
    }
}

fn web_album_tracks(album: &models::Album, bitrate: u32) -> Vec<Track> {
    let summary = web_to_album(album);
    album
        .tracks
        .iter()
        .flat_map(|page| &page.items)
        .filter_map(|t| web_to_track(t, Some(&summary), bitrate))
        .collect()
}

fn skip_web_album(album: &models::Album) -> bool {
    let various = album
        .artists
        .first()
        .and_then(|a| a.uri.as_deref())
        .is_some_and(|uri| VARIOUS_ARTISTS_URIS.contains(&uri));
    album.is_compilation() || album.restrictions.is_some() || various
}

fn native_album_tracks(browse: &NativeAlbumBrowse, bitrate: u32) -> Vec<Track> {
    let summary = native_to_album(&browse.album);
    browse
        .tracks
        .iter()
        .filter_map(|t| native_to_track(t, Some(&summary), bitrate))
        .collect()
}

fn skip_native_album(browse: &NativeAlbumBrowse) -> bool {
    let album = &browse.album;
    let various = album
        .artist
        .as_ref()
        .is_some_and(|a| VARIOUS_ARTISTS_URIS.contains(&a.uri.as_str()));
    album.album_type == NativeAlbumType::Compilation || !album.is_available || various
}

fn native_playlist_tracks(playlist: &NativePlaylist, bitrate: u32) -> Vec<Track> {
    playlist
        .tracks
        .iter()
        .filter_map(|t| native_to_track(t, None, bitrate))
        .collect()
}

/// First page of a playlist's tracks, unplayable entries skipped.
fn web_playlist_tracks(
    client: &dyn WebClient,
    link: &SpotifyUri,
    bitrate: u32,
) -> ProviderResult<Vec<Track>> {
    let page: Paging<PlaylistItem> = get_json(client, &playlist_tracks_path(link))?;
    Ok(page
        .items
        .iter()
        .filter(|item| !item.is_local)
        .filter_map(|item| item.track.as_ref())
        .filter_map(|t| web_to_track(t, None, bitrate))
        .collect())
}

pub(crate) fn playlist_tracks_path(link: &SpotifyUri) -> String {
    let id = urlencoding::encode(link.id());
    match link.owner() {
        Some(owner) => format!(
            "v1/users/{}/playlists/{id}/tracks?limit={PLAYLIST_TRACKS_LIMIT}&market=from_token",
            urlencoding::encode(owner)
        ),
        None => format!("v1/playlists/{id}/tracks?limit={PLAYLIST_TRACKS_LIMIT}&market=from_token"),
    }
}
