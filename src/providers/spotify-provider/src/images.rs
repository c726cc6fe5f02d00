//! Image resolution with a process-wide cache.

use crate::batch::BatchFetcher;
use crate::mapping::web_to_image;
use crate::models::{self, WebEntity};
use crate::uri::{LinkType, SpotifyUri};
use crate::web::WebClient;
use spotlookup_core::models::Image;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

type Entries = HashMap<SpotifyUri, Arc<[Image]>>;

/// Images per resolved reference.
///
/// A track shares its album's entry, so both keys point at the same
/// allocation. The lock is held for a whole [`ImageResolver::get_images`]
/// call, so concurrent callers never fetch the same key twice.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: Mutex<Entries>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, link: &SpotifyUri) -> Option<Arc<[Image]>> {
        self.lock().get(link).cloned()
    }

    pub fn insert(&self, link: SpotifyUri, images: Arc<[Image]>) {
        self.lock().insert(link, images);
    }

    /// Point `link` at the entry of `target`. Returns false when `target` is absent.
    pub fn alias(&self, link: SpotifyUri, target: &SpotifyUri) -> bool {
        let mut entries = self.lock();
        match entries.get(target).cloned() {
            Some(images) => {
                entries.insert(link, images);
                true
            }
            None => false,
        }
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock leaves the map consistent, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Resolves track, album and artist references to their images.
pub struct ImageResolver<'a> {
    client: &'a dyn WebClient,
    cache: &'a ImageCache,
}

impl<'a> ImageResolver<'a> {
    pub fn new(client: &'a dyn WebClient, cache: &'a ImageCache) -> Self {
        Self { client, cache }
    }

    /// Map each resolvable input uri to its images.
    ///
    /// Unparseable uris, playlists and ids the backend does not know are
    /// left out of the result.
    pub fn get_images(&self, uris: &[String]) -> HashMap<String, Arc<[Image]>> {
        let requested: Vec<(&String, SpotifyUri)> = uris
            .iter()
            .filter_map(|uri| match SpotifyUri::parse(uri) {
                Ok(link) if has_images(link.kind()) => Some((uri, link)),
                Ok(link) => {
                    tracing::debug!("No images for {} references", link.kind());
                    None
                }
                Err(err) => {
                    tracing::debug!("Skipping image lookup: {}", err);
                    None
                }
            })
            .collect();

        let mut entries = self.cache.lock();
        let missing: Vec<SpotifyUri> = requested
            .iter()
            .filter(|(_, link)| !entries.contains_key(link))
            .map(|(_, link)| link.clone())
            .collect();

        if !missing.is_empty() {
            tracing::debug!("Fetching images for {} references", missing.len());
            let fetched = BatchFetcher::new(self.client).fetch_lenient(&missing);
            for (link, entity) in fetched {
                store(&mut entries, link, entity);
            }
        }

        requested
            .into_iter()
            .filter_map(|(uri, link)| Some((uri.clone(), entries.get(&link)?.clone())))
            .collect()
    }
}

fn has_images(kind: &LinkType) -> bool {
    matches!(kind, LinkType::Track | LinkType::Album | LinkType::Artist)
}

fn to_images(images: &[models::Image]) -> Arc<[Image]> {
    images.iter().map(web_to_image).collect()
}

fn store(entries: &mut Entries, link: SpotifyUri, entity: WebEntity) {
    let images = match entity {
        // a track fetched in the same batch may already hold this album's entry
        WebEntity::Album(album) => {
            entries.entry(link).or_insert_with(|| to_images(&album.images));
            return;
        }
        WebEntity::Artist(artist) => to_images(&artist.images),
        WebEntity::Track(track) => {
            let Some(album) = track.album else {
                tracing::debug!("Track {} has no album to take images from", link);
                return;
            };
            let album_link = album.uri.as_deref().and_then(|u| SpotifyUri::parse(u).ok());
            match album_link {
                Some(album_link) => entries
                    .entry(album_link)
                    .or_insert_with(|| to_images(&album.images))
                    .clone(),
                None => to_images(&album.images),
            }
        }
    };
    entries.insert(link, images);
}
