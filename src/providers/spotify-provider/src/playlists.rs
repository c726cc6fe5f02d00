//! Read-only browsing of a user's playlists.

use crate::lookup::{decode_items, playlist_tracks_path, USER_PLAYLISTS_LIMIT};
use crate::mapping::web_to_track_ref;
use crate::models::{Paging, Playlist, PlaylistItem};
use crate::uri::{LinkType, SpotifyUri};
use crate::web::WebClient;
use spotlookup_core::models::{PlaylistRef, TrackRef};
use serde_json::Value;
use spotlookup_core::{ProviderError, ProviderResult};

pub struct PlaylistBrowser<'a> {
    client: &'a dyn WebClient,
    user_id: Option<&'a str>,
}

impl<'a> PlaylistBrowser<'a> {
    pub fn new(client: &'a dyn WebClient, user_id: Option<&'a str>) -> Self {
        Self { client, user_id }
    }

    /// First page of the user's playlists. Playlists owned by someone else
    /// get an ` (by <owner>)` suffix.
    pub fn list(&self) -> ProviderResult<Vec<PlaylistRef>> {
        let Some(user_id) = self.user_id else {
            return Ok(Vec::new());
        };
        let path = format!(
            "v1/users/{}/playlists?limit={USER_PLAYLISTS_LIMIT}",
            urlencoding::encode(user_id)
        );
        let page: Paging<Value> =
            serde_json::from_value(self.client.get(&path)?).map_err(|e| ProviderError::Decode {
                message: e.to_string(),
            })?;
        let playlists: Vec<Playlist> = decode_items(page.items);

        Ok(playlists
            .into_iter()
            .filter(|p| match p.kind.as_deref() {
                None | Some("playlist") => true,
                Some(other) => {
                    tracing::debug!("Skipping {} of type {}", p.uri, other);
                    false
                }
            })
            .map(|p| {
                let name = if p.owner.id == user_id {
                    p.name
                } else {
                    format!("{} (by {})", p.name, p.owner.id)
                };
                PlaylistRef::new(p.uri, name)
            })
            .collect())
    }

    /// Like [`list`](Self::list), but failures are logged and yield nothing.
    pub fn as_list(&self) -> Vec<PlaylistRef> {
        self.list().unwrap_or_else(|err| {
            tracing::warn!("Failed to list playlists: {}", err);
            Vec::new()
        })
    }

    /// Track refs of a playlist, or `None` when it cannot be looked up.
    pub fn get_items(&self, uri: &str) -> Option<Vec<TrackRef>> {
        let link = match SpotifyUri::parse(uri) {
            Ok(link) if *link.kind() == LinkType::Playlist => link,
            _ => {
                tracing::info!("Failed to lookup Spotify playlist URI {}", uri);
                return None;
            }
        };

        let page = self
            .client
            .get(&playlist_tracks_path(&link))
            .and_then(|body| {
                serde_json::from_value::<Paging<PlaylistItem>>(body).map_err(|e| {
                    ProviderError::Decode {
                        message: e.to_string(),
                    }
                })
            });
        match page {
            Ok(page) => Some(
                page.items
                    .iter()
                    .filter(|item| !item.is_local)
                    .filter_map(|item| item.track.as_ref())
                    .filter_map(web_to_track_ref)
                    .collect(),
            ),
            Err(err) => {
                tracing::info!("Failed to lookup Spotify playlist URI {}: {}", uri, err);
                None
            }
        }
    }

    /// Re-list the playlists. Returns how many were found.
    pub fn refresh(&self) -> usize {
        let count = self.as_list().len();
        tracing::info!("Refreshed {} playlists", count);
        count
    }
}
