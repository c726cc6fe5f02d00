//! Spotify resource identifiers.
//!
//! Accepted forms:
//!
//! - `spotify:track:<id>`, `spotify:album:<id>`, `spotify:artist:<id>`
//! - `spotify:playlist:<id>` and `spotify:user:<owner>:playlist:<id>`
//! - `spotify:user:<owner>:starred`
//! - `https://open.spotify.com/...` equivalents of all of the above
//!
//! Any other `spotify:<kind>:<id>` parses as [`LinkType::Unknown`] so callers
//! can report it as unsupported rather than malformed.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

/// The starred collection is addressed by owner only; this is its id.
pub const STARRED_ID: &str = "starred";

const WEB_HOSTS: &[&str] = &["open.spotify.com", "play.spotify.com"];

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LinkType {
    Track,
    Album,
    Artist,
    Playlist,
    Starred,
    Unknown(String),
}

impl LinkType {
    fn from_segment(segment: &str) -> Self {
        match segment {
            "track" => LinkType::Track,
            "album" => LinkType::Album,
            "artist" => LinkType::Artist,
            "playlist" => LinkType::Playlist,
            other => LinkType::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LinkType::Track => "track",
            LinkType::Album => "album",
            LinkType::Artist => "artist",
            LinkType::Playlist => "playlist",
            LinkType::Starred => "starred",
            LinkType::Unknown(kind) => kind,
        }
    }
}

impl fmt::Display for LinkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("malformed Spotify URI {uri:?}: {reason}")]
    Malformed { uri: String, reason: &'static str },
}

/// A parsed, typed reference to a Spotify resource.
///
/// Equality is over `(kind, id, owner)` with percent-encoding removed, so
/// differently quoted spellings of the same resource compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpotifyUri {
    kind: LinkType,
    id: String,
    owner: Option<String>,
}

impl SpotifyUri {
    pub fn parse(input: &str) -> Result<Self, UriError> {
        let malformed = |reason| UriError::Malformed {
            uri: input.to_string(),
            reason,
        };

        let decoded = if let Some(rest) = input.strip_prefix("spotify:") {
            rest.split(':').map(decode).collect::<Option<Vec<_>>>()
        } else if input.starts_with("http://") || input.starts_with("https://") {
            web_segments(input)
        } else {
            return Err(malformed("unrecognised scheme"));
        };
        let segments = decoded.ok_or_else(|| malformed("undecodable or foreign location"))?;

        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(malformed("empty path segment"));
        }

        match segments.as_slice() {
            ["user", owner, "starred"] => Ok(Self::starred(*owner)),
            ["user", owner, "playlist", id] => Ok(Self::playlist(*id, Some(*owner))),
            ["user", ..] => Err(malformed("unsupported user resource")),
            [kind, id] => Ok(Self {
                kind: LinkType::from_segment(kind),
                id: (*id).to_string(),
                owner: None,
            }),
            [] | [_] => Err(malformed("missing resource id")),
            _ => Err(malformed("too many path segments")),
        }
    }

    pub fn track(id: impl Into<String>) -> Self {
        Self {
            kind: LinkType::Track,
            id: id.into(),
            owner: None,
        }
    }

    pub fn album(id: impl Into<String>) -> Self {
        Self {
            kind: LinkType::Album,
            id: id.into(),
            owner: None,
        }
    }

    pub fn artist(id: impl Into<String>) -> Self {
        Self {
            kind: LinkType::Artist,
            id: id.into(),
            owner: None,
        }
    }

    pub fn playlist(id: impl Into<String>, owner: Option<impl Into<String>>) -> Self {
        Self {
            kind: LinkType::Playlist,
            id: id.into(),
            owner: owner.map(Into::into),
        }
    }

    pub fn starred(owner: impl Into<String>) -> Self {
        Self {
            kind: LinkType::Starred,
            id: STARRED_ID.to_string(),
            owner: Some(owner.into()),
        }
    }

    pub fn kind(&self) -> &LinkType {
        &self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Canonical `spotify:` form. Always parses back to an equal reference.
    pub fn uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SpotifyUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = urlencoding::encode(&self.id);
        match (&self.kind, &self.owner) {
            (LinkType::Starred, Some(owner)) => {
                write!(f, "spotify:user:{}:starred", urlencoding::encode(owner))
            }
            (LinkType::Playlist, Some(owner)) => write!(
                f,
                "spotify:user:{}:playlist:{id}",
                urlencoding::encode(owner)
            ),
            (kind, _) => write!(f, "spotify:{}:{id}", urlencoding::encode(kind.as_str())),
        }
    }
}

impl FromStr for SpotifyUri {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn decode(segment: &str) -> Option<String> {
    urlencoding::decode(segment).ok().map(|s| s.into_owned())
}

fn web_segments(input: &str) -> Option<Vec<String>> {
    let url = Url::parse(input).ok()?;
    if !WEB_HOSTS.contains(&url.host_str()?) {
        return None;
    }
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .map(decode)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_kinds() {
        let link = SpotifyUri::parse("spotify:track:abc").unwrap();
        assert_eq!(link.kind(), &LinkType::Track);
        assert_eq!(link.id(), "abc");
        assert_eq!(link.owner(), None);

        assert_eq!(
            SpotifyUri::parse("spotify:album:def").unwrap(),
            SpotifyUri::album("def")
        );
        assert_eq!(
            SpotifyUri::parse("spotify:artist:abba").unwrap(),
            SpotifyUri::artist("abba")
        );
    }

    #[test]
    fn parses_owned_and_unowned_playlists() {
        let owned = SpotifyUri::parse("spotify:user:alice:playlist:foo").unwrap();
        assert_eq!(owned.kind(), &LinkType::Playlist);
        assert_eq!(owned.id(), "foo");
        assert_eq!(owned.owner(), Some("alice"));

        let unowned = SpotifyUri::parse("spotify:playlist:foo").unwrap();
        assert_eq!(unowned.owner(), None);
        assert_ne!(owned, unowned);
    }

    #[test]
    fn starred_is_its_own_kind() {
        let starred = SpotifyUri::parse("spotify:user:alice:starred").unwrap();
        assert_eq!(starred.kind(), &LinkType::Starred);
        assert_eq!(starred.owner(), Some("alice"));
        assert_eq!(starred.uri(), "spotify:user:alice:starred");
    }

    #[test]
    fn parses_web_urls() {
        assert_eq!(
            SpotifyUri::parse("https://open.spotify.com/track/abc?si=xyz").unwrap(),
            SpotifyUri::track("abc")
        );
        assert_eq!(
            SpotifyUri::parse("https://open.spotify.com/user/alice/playlist/foo").unwrap(),
            SpotifyUri::playlist("foo", Some("alice"))
        );
        assert_eq!(
            SpotifyUri::parse("https://open.spotify.com/user/alice/starred").unwrap(),
            SpotifyUri::starred("alice")
        );
        assert!(SpotifyUri::parse("https://example.com/track/abc").is_err());
    }

    #[test]
    fn unknown_kind_round_trips() {
        let link = SpotifyUri::parse("spotify:show:xyz").unwrap();
        assert_eq!(link.kind(), &LinkType::Unknown("show".into()));
        assert_eq!(SpotifyUri::parse(&link.uri()).unwrap(), link);
    }

    #[test]
    fn quoting_does_not_affect_equality() {
        let quoted = SpotifyUri::parse("spotify:user:al%20ice:playlist:foo").unwrap();
        let plain = SpotifyUri::playlist("foo", Some("al ice"));
        assert_eq!(quoted, plain);
        assert_eq!(quoted.uri(), "spotify:user:al%20ice:playlist:foo");
    }

    #[test]
    fn canonical_form_round_trips() {
        let inputs = [
            "spotify:track:abc",
            "spotify:album:def",
            "spotify:artist:abba",
            "spotify:playlist:foo",
            "spotify:user:alice:playlist:foo",
            "spotify:user:alice:starred",
            "spotify:user:a%3Ab:playlist:foo",
            "https://open.spotify.com/album/def",
        ];
        for input in inputs {
            let link = SpotifyUri::parse(input).unwrap();
            assert_eq!(SpotifyUri::parse(&link.uri()).unwrap(), link, "{input}");
        }
    }

    #[test]
    fn rejects_malformed_input() {
        for input in [
            "invalid",
            "",
            "spotify:",
            "spotify:track",
            "spotify:track:",
            "spotify::abc",
            "spotify:track:abc:extra",
            "spotify:user:alice",
            "spotify:user:alice:playlist",
            "spotify:user:alice:follows:x",
            "spotify:track:%FF",
        ] {
            assert!(
                matches!(SpotifyUri::parse(input), Err(UriError::Malformed { .. })),
                "{input:?} should be malformed"
            );
        }
    }
}
