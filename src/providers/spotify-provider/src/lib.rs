pub mod batch;
pub mod images;
pub mod lookup;
mod mapping;
pub mod models;
pub mod native;
pub mod playlists;
pub mod uri;
pub mod web;

use images::{ImageCache, ImageResolver};
use lookup::LookupEngine;
use native::NativeSession;
use playlists::PlaylistBrowser;
use spotlookup_core::models::{Image, PlaylistRef, Track, TrackRef};
use spotlookup_core::{
    Config, LibraryProvider, LookupConfig, ProviderCapabilities, ProviderError, ProviderResult,
};
use std::collections::HashMap;
use std::sync::Arc;
use web::{HttpWebClient, WebClient};

pub use batch::{BatchFetcher, MAX_IDS_PER_REQUEST};
pub use lookup::{lookup, VARIOUS_ARTISTS_URIS};
pub use uri::{LinkType, SpotifyUri, UriError};

/// Spotify library provider backed by the Web API, a native session, or both.
pub struct SpotifyProvider {
    id: String,
    name: String,
    config: LookupConfig,
    user_id: Option<String>,
    web: Option<Box<dyn WebClient>>,
    session: Option<Box<dyn NativeSession>>,
    images: Arc<ImageCache>,
}

impl SpotifyProvider {
    pub fn new(config: LookupConfig) -> Self {
        Self {
            id: "spotify".into(),
            name: "Spotify".into(),
            config,
            user_id: None,
            web: None,
            session: None,
            images: Arc::new(ImageCache::new()),
        }
    }

    /// Provider over the HTTP Web API client described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let client = HttpWebClient::new(&config.web_api)?;
        let mut provider = Self::new(config.lookup).with_web_client(client);
        if let Some(user_id) = &config.web_api.user_id {
            provider = provider.with_user_id(user_id.clone());
        }
        Ok(provider)
    }

    pub fn with_web_client(mut self, client: impl WebClient + 'static) -> Self {
        self.web = Some(Box::new(client));
        self
    }

    pub fn with_session(mut self, session: impl NativeSession + 'static) -> Self {
        self.session = Some(Box::new(session));
        self
    }

    /// Share an image cache with other providers.
    pub fn with_image_cache(mut self, cache: Arc<ImageCache>) -> Self {
        self.images = cache;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn image_cache(&self) -> &Arc<ImageCache> {
        &self.images
    }

    pub fn clear_image_cache(&self) {
        self.images.clear();
    }

    fn engine(&self) -> LookupEngine<'_> {
        let mut engine = LookupEngine::new(self.config);
        if let Some(client) = self.web.as_deref() {
            engine = engine.with_web_client(client);
        }
        if let Some(session) = self.session.as_deref() {
            engine = engine.with_session(session);
        }
        engine
    }

    fn browser(&self, operation: &str) -> ProviderResult<PlaylistBrowser<'_>> {
        let client = self
            .web
            .as_deref()
            .ok_or_else(|| ProviderError::not_supported(operation))?;
        Ok(PlaylistBrowser::new(client, self.user_id.as_deref()))
    }
}

impl LibraryProvider for SpotifyProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> ProviderCapabilities {
        let web_api = self.web.is_some();
        ProviderCapabilities {
            web_api,
            native_session: self.session.is_some(),
            images: web_api,
            playlists: web_api,
        }
    }

    fn lookup(&self, uri: &str) -> Vec<Track> {
        self.engine().lookup(uri)
    }

    fn get_images(&self, uris: &[String]) -> HashMap<String, Arc<[Image]>> {
        match self.web.as_deref() {
            Some(client) => ImageResolver::new(client, &self.images).get_images(uris),
            None => {
                tracing::debug!("Image lookup needs the Web API");
                HashMap::new()
            }
        }
    }

    fn list_playlists(&self) -> ProviderResult<Vec<PlaylistRef>> {
        self.browser("list_playlists")?.list()
    }

    fn playlist_items(&self, uri: &str) -> ProviderResult<Option<Vec<TrackRef>>> {
        Ok(self.browser("playlist_items")?.get_items(uri))
    }

    fn refresh(&self) {
        if let Ok(browser) = self.browser("refresh") {
            browser.refresh();
        }
    }
}
