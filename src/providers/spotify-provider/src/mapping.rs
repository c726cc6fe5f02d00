use crate::models::{self, AlbumRef, ArtistRef};
use crate::native::{Availability, NativeAlbum, NativeArtist, NativeTrack};
use spotlookup_core::models::{Album, Artist, Image, Track, TrackRef};

pub fn web_to_image(image: &models::Image) -> Image {
    Image {
        uri: image.url.clone(),
        width: image.width,
        height: image.height,
    }
}

fn web_to_artist(artist: &ArtistRef) -> Option<Artist> {
    let uri = artist.uri.clone()?;
    Some(Artist::new(uri, artist.name.clone()))
}

fn web_to_artists(artists: &[ArtistRef]) -> Vec<Artist> {
    artists.iter().filter_map(web_to_artist).collect()
}

/// Full album (from a batch lookup) to its summary.
pub fn web_to_album(album: &models::Album) -> Album {
    Album {
        uri: album.uri.clone(),
        name: album.name.clone(),
        artists: web_to_artists(&album.artists),
        date: album.release_date.clone(),
        images: album.images.iter().map(web_to_image).collect(),
    }
}

/// Album embedded in a track payload. `None` when it has no uri.
pub fn web_album_ref_to_album(album: &AlbumRef) -> Option<Album> {
    Some(Album {
        uri: album.uri.clone()?,
        name: album.name.clone(),
        artists: web_to_artists(&album.artists),
        date: album.release_date.clone(),
        images: album.images.iter().map(web_to_image).collect(),
    })
}

/// Whether the Web API says the track can be streamed.
pub fn web_track_is_playable(track: &models::Track) -> bool {
    !track.is_local
        && track.is_playable != Some(false)
        && track.restrictions.is_none()
        && track.uri.is_some()
}

/// Translate a raw track. Unplayable tracks translate to `None`.
///
/// When `album` is not supplied it is derived from the track's embedded album.
pub fn web_to_track(track: &models::Track, album: Option<&Album>, bitrate: u32) -> Option<Track> {
    if !web_track_is_playable(track) {
        return None;
    }
    let album = match album {
        Some(album) => Some(album.clone()),
        None => track.album.as_ref().and_then(web_album_ref_to_album),
    };
    Some(Track {
        uri: track.uri.clone()?,
        name: track.name.clone(),
        artists: web_to_artists(&track.artists),
        album,
        length_ms: track.duration_ms,
        track_no: track.track_number,
        disc_no: track.disc_number,
        bitrate,
    })
}

pub fn web_to_track_ref(track: &models::Track) -> Option<TrackRef> {
    if !web_track_is_playable(track) {
        return None;
    }
    Some(TrackRef {
        uri: track.uri.clone()?,
        name: track.name.clone(),
    })
}

fn native_to_artist(artist: &NativeArtist) -> Artist {
    Artist::new(artist.uri.clone(), artist.name.clone())
}

pub fn native_to_album(album: &NativeAlbum) -> Album {
    Album {
        uri: album.uri.clone(),
        name: album.name.clone(),
        artists: album.artist.iter().map(native_to_artist).collect(),
        date: album.year.map(|y| y.to_string()),
        images: album.cover_url.iter().map(Image::new).collect(),
    }
}

pub fn native_to_track(track: &NativeTrack, album: Option<&Album>, bitrate: u32) -> Option<Track> {
    if track.availability != Availability::Available {
        return None;
    }
    let album = match album {
        Some(album) => Some(album.clone()),
        None => track.album.as_ref().map(native_to_album),
    };
    Some(Track {
        uri: track.uri.clone(),
        name: track.name.clone(),
        artists: track.artists.iter().map(native_to_artist).collect(),
        album,
        length_ms: Some(track.duration_ms),
        track_no: track.index,
        disc_no: track.disc,
        bitrate,
    })
}
