//! Batched entity lookups against the `/v1/<type>s/?ids=` endpoints.

use crate::models::{Album, Artist, Track, WebEntity};
use crate::uri::{LinkType, SpotifyUri};
use crate::web::WebClient;
use serde::de::DeserializeOwned;
use serde_json::Value;
use spotlookup_core::{ProviderError, ProviderResult};
use std::collections::{HashMap, HashSet};

/// Hard upper bound the Web API accepts for one batch request.
pub const MAX_IDS_PER_REQUEST: usize = 50;

pub type BatchResult = HashMap<SpotifyUri, WebEntity>;

/// Entity types that have a batch endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    Track,
    Album,
    Artist,
}

impl BatchKind {
    pub fn of(kind: &LinkType) -> Option<Self> {
        match kind {
            LinkType::Track => Some(BatchKind::Track),
            LinkType::Album => Some(BatchKind::Album),
            LinkType::Artist => Some(BatchKind::Artist),
            _ => None,
        }
    }

    /// Collection key in both the endpoint path and the response body.
    pub fn plural(&self) -> &'static str {
        match self {
            BatchKind::Track => "tracks",
            BatchKind::Album => "albums",
            BatchKind::Artist => "artists",
        }
    }

    fn decode(&self, item: Value) -> Result<(String, WebEntity), serde_json::Error> {
        Ok(match self {
            BatchKind::Track => {
                let track: Track = decode(item)?;
                // relinked tracks answer with a different id
                let id = track
                    .linked_from
                    .as_ref()
                    .map(|l| l.id.clone())
                    .or_else(|| track.id.clone())
                    .unwrap_or_default();
                (id, WebEntity::Track(track))
            }
            BatchKind::Album => {
                let album: Album = decode(item)?;
                (album.id.clone(), WebEntity::Album(album))
            }
            BatchKind::Artist => {
                let artist: Artist = decode(item)?;
                (artist.id.clone(), WebEntity::Artist(artist))
            }
        })
    }
}

fn decode<T: DeserializeOwned>(item: Value) -> Result<T, serde_json::Error> {
    serde_json::from_value(item)
}

/// Issues one request per chunk of at most `limit` ids, one entity type per request.
pub struct BatchFetcher<'a> {
    client: &'a dyn WebClient,
    limit: usize,
}

impl<'a> BatchFetcher<'a> {
    pub fn new(client: &'a dyn WebClient) -> Self {
        Self {
            client,
            limit: MAX_IDS_PER_REQUEST,
        }
    }

    /// Use smaller chunks. Values above [`MAX_IDS_PER_REQUEST`] are clamped.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_IDS_PER_REQUEST);
        self
    }

    /// Fetch every reference, failing on the first request that fails.
    pub fn fetch(&self, links: &[SpotifyUri]) -> ProviderResult<BatchResult> {
        let mut result = BatchResult::new();
        for (kind, group) in group_by_kind(links) {
            for chunk in group.chunks(self.limit) {
                result.extend(self.fetch_chunk(kind, chunk)?);
            }
        }
        Ok(result)
    }

    /// Like [`fetch`](Self::fetch), but a failed chunk is logged and skipped.
    pub fn fetch_lenient(&self, links: &[SpotifyUri]) -> BatchResult {
        let mut result = BatchResult::new();
        for (kind, group) in group_by_kind(links) {
            for chunk in group.chunks(self.limit) {
                match self.fetch_chunk(kind, chunk) {
                    Ok(found) => result.extend(found),
                    Err(err) => tracing::warn!(
                        "Skipping batch of {} {}: {}",
                        chunk.len(),
                        kind.plural(),
                        err
                    ),
                }
            }
        }
        result
    }

    fn fetch_chunk(&self, kind: BatchKind, chunk: &[&SpotifyUri]) -> ProviderResult<BatchResult> {
        let mut result = BatchResult::new();
        if chunk.is_empty() {
            return Ok(result);
        }

        let by_id: HashMap<&str, &SpotifyUri> = chunk.iter().map(|l| (l.id(), *l)).collect();
        let ids: Vec<String> = chunk
            .iter()
            .map(|l| urlencoding::encode(l.id()).into_owned())
            .collect();
        let path = format!("v1/{}/?ids={}", kind.plural(), ids.join(","));
        tracing::debug!("Fetching {} {}", chunk.len(), kind.plural());

        let mut body = self.client.get(&path)?;
        let items = match body.get_mut(kind.plural()).map(Value::take) {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(ProviderError::Decode {
                    message: format!("expected {} array, got {other}", kind.plural()),
                })
            }
        };

        for item in items.into_iter().filter(|item| !item.is_null()) {
            let (id, entity) = match kind.decode(item) {
                Ok(decoded) => decoded,
                Err(err) => {
                    tracing::warn!("Dropping undecodable {} entry: {}", kind.plural(), err);
                    continue;
                }
            };
            match by_id.get(id.as_str()) {
                Some(link) => {
                    result.insert((*link).clone(), entity);
                }
                None => tracing::debug!("Ignoring unrequested {} id {:?}", kind.plural(), id),
            }
        }
        Ok(result)
    }
}

/// Group by batchable kind in first-seen order, dropping duplicates and
/// references without a batch endpoint.
fn group_by_kind(links: &[SpotifyUri]) -> Vec<(BatchKind, Vec<&SpotifyUri>)> {
    let mut groups: Vec<(BatchKind, Vec<&SpotifyUri>)> = Vec::new();
    let mut seen = HashSet::new();
    for link in links {
        let Some(kind) = BatchKind::of(link.kind()) else {
            tracing::debug!("No batch endpoint for {}", link);
            continue;
        };
        if !seen.insert(link) {
            continue;
        }
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, group)) => group.push(link),
            None => groups.push((kind, vec![link])),
        }
    }
    groups
}
