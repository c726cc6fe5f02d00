use crate::models::Track;
use crate::provider::LibraryProvider;
use thiserror::Error;

/// Fixtures a provider implementation supplies to run the shared lookup contract.
#[derive(Debug, Clone)]
pub struct LookupContractExpectations {
    /// Bitrate every produced track must carry.
    pub bitrate: u32,
    pub track: TrackExpectation,
    pub album: Option<AlbumExpectation>,
    pub reversed_playlist: Option<ReversedPlaylistExpectation>,
}

/// A track uri that resolves to exactly one track.
#[derive(Debug, Clone)]
pub struct TrackExpectation {
    pub uri: String,
    pub name: String,
}

/// An album uri and the track uris it must expand to, in order.
#[derive(Debug, Clone)]
pub struct AlbumExpectation {
    pub uri: String,
    pub track_uris: Vec<String>,
}

/// A starred-style uri whose result must be `playlist_uri`'s result reversed.
#[derive(Debug, Clone)]
pub struct ReversedPlaylistExpectation {
    pub starred_uri: String,
    pub playlist_uri: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupContractError {
    #[error("lookup of invalid uri {uri:?} returned {count} tracks")]
    InvalidUriResolved { uri: String, count: usize },
    #[error("track lookup returned {count} tracks, expected exactly one")]
    TrackCount { count: usize },
    #[error("track lookup returned {actual:?}, expected {expected:?}")]
    TrackMismatch { expected: String, actual: String },
    #[error("track {uri} carries bitrate {actual}, expected {expected}")]
    BitrateMismatch {
        uri: String,
        expected: u32,
        actual: u32,
    },
    #[error("album lookup returned {actual:?}, expected {expected:?}")]
    AlbumOrder {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("starred lookup returned {actual:?}, expected reversed playlist {expected:?}")]
    NotReversed {
        expected: Vec<String>,
        actual: Vec<String>,
    },
}

const INVALID_URIS: &[&str] = &["invalid", "", "spotify:", "spotify:track:", "http://"];

/// Run the shared lookup contract against a provider.
pub fn run_lookup_contract<P: LibraryProvider + ?Sized>(
    provider: &P,
    expectations: &LookupContractExpectations,
) -> Result<(), LookupContractError> {
    verify_invalid_uris(provider)?;
    verify_track(provider, expectations)?;
    if let Some(album) = &expectations.album {
        verify_album(provider, album, expectations.bitrate)?;
    }
    if let Some(reversed) = &expectations.reversed_playlist {
        verify_reversed(provider, reversed)?;
    }
    Ok(())
}

fn verify_invalid_uris<P: LibraryProvider + ?Sized>(
    provider: &P,
) -> Result<(), LookupContractError> {
    for uri in INVALID_URIS {
        let count = provider.lookup(uri).len();
        if count != 0 {
            return Err(LookupContractError::InvalidUriResolved {
                uri: (*uri).to_string(),
                count,
            });
        }
    }
    Ok(())
}

fn verify_track<P: LibraryProvider + ?Sized>(
    provider: &P,
    expectations: &LookupContractExpectations,
) -> Result<(), LookupContractError> {
    let expected = &expectations.track;
    let tracks = provider.lookup(&expected.uri);
    let [track] = tracks.as_slice() else {
        return Err(LookupContractError::TrackCount {
            count: tracks.len(),
        });
    };
    if track.uri != expected.uri || track.name != expected.name {
        return Err(LookupContractError::TrackMismatch {
            expected: format!("{} ({})", expected.uri, expected.name),
            actual: format!("{} ({})", track.uri, track.name),
        });
    }
    verify_bitrate(std::slice::from_ref(track), expectations.bitrate)
}

fn verify_album<P: LibraryProvider + ?Sized>(
    provider: &P,
    expected: &AlbumExpectation,
    bitrate: u32,
) -> Result<(), LookupContractError> {
    let tracks = provider.lookup(&expected.uri);
    let actual = uris(&tracks);
    if actual != expected.track_uris {
        return Err(LookupContractError::AlbumOrder {
            expected: expected.track_uris.clone(),
            actual,
        });
    }
    verify_bitrate(&tracks, bitrate)
}

fn verify_reversed<P: LibraryProvider + ?Sized>(
    provider: &P,
    expected: &ReversedPlaylistExpectation,
) -> Result<(), LookupContractError> {
    let mut forward = uris(&provider.lookup(&expected.playlist_uri));
    forward.reverse();
    let actual = uris(&provider.lookup(&expected.starred_uri));
    if actual != forward {
        return Err(LookupContractError::NotReversed {
            expected: forward,
            actual,
        });
    }
    Ok(())
}

fn verify_bitrate(tracks: &[Track], expected: u32) -> Result<(), LookupContractError> {
    match tracks.iter().find(|t| t.bitrate != expected) {
        Some(track) => Err(LookupContractError::BitrateMismatch {
            uri: track.uri.clone(),
            expected,
            actual: track.bitrate,
        }),
        None => Ok(()),
    }
}

fn uris(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.uri.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderCapabilities;
    use std::collections::HashMap;

    struct FakeProvider {
        bitrate: u32,
        catalog: HashMap<String, Vec<&'static str>>,
    }

    impl FakeProvider {
        fn new(bitrate: u32) -> Self {
            let mut catalog = HashMap::new();
            catalog.insert("spotify:track:abc".to_string(), vec!["abc"]);
            catalog.insert("spotify:album:def".to_string(), vec!["abc", "xyz"]);
            catalog.insert(
                "spotify:user:alice:playlist:starred".to_string(),
                vec!["old", "newest"],
            );
            catalog.insert(
                "spotify:user:alice:starred".to_string(),
                vec!["newest", "old"],
            );
            Self { bitrate, catalog }
        }

        fn track(&self, id: &str) -> Track {
            Track {
                uri: format!("spotify:track:{id}"),
                name: id.to_uppercase(),
                artists: Vec::new(),
                album: None,
                length_ms: Some(1000),
                track_no: None,
                disc_no: None,
                bitrate: self.bitrate,
            }
        }
    }

    impl LibraryProvider for FakeProvider {
        fn id(&self) -> &str {
            "fake"
        }

        fn name(&self) -> &str {
            "Fake"
        }

        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                web_api: true,
                ..Default::default()
            }
        }

        fn lookup(&self, uri: &str) -> Vec<Track> {
            self.catalog
                .get(uri)
                .map(|ids| ids.iter().map(|id| self.track(id)).collect())
                .unwrap_or_default()
        }
    }

    fn expectations() -> LookupContractExpectations {
        LookupContractExpectations {
            bitrate: 160,
            track: TrackExpectation {
                uri: "spotify:track:abc".into(),
                name: "ABC".into(),
            },
            album: Some(AlbumExpectation {
                uri: "spotify:album:def".into(),
                track_uris: vec!["spotify:track:abc".into(), "spotify:track:xyz".into()],
            }),
            reversed_playlist: Some(ReversedPlaylistExpectation {
                starred_uri: "spotify:user:alice:starred".into(),
                playlist_uri: "spotify:user:alice:playlist:starred".into(),
            }),
        }
    }

    #[test]
    fn contract_passes_for_well_behaved_provider() {
        let result = run_lookup_contract(&FakeProvider::new(160), &expectations());
        assert!(result.is_ok(), "expected contract to pass: {result:?}");
    }

    #[test]
    fn contract_flags_wrong_bitrate() {
        let result = run_lookup_contract(&FakeProvider::new(320), &expectations());
        assert!(matches!(
            result,
            Err(LookupContractError::BitrateMismatch { actual: 320, .. })
        ));
    }

    #[test]
    fn contract_flags_album_order() {
        let mut expectations = expectations();
        if let Some(album) = expectations.album.as_mut() {
            album.track_uris.reverse();
        }
        let result = run_lookup_contract(&FakeProvider::new(160), &expectations);
        assert!(matches!(result, Err(LookupContractError::AlbumOrder { .. })));
    }
}
