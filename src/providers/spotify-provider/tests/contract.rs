use serde_json::{json, Value};
use spotify_provider::web::HttpWebClient;
use spotify_provider::SpotifyProvider;
use spotlookup_core::provider_contract::{
    run_lookup_contract, AlbumExpectation, LookupContractExpectations,
    ReversedPlaylistExpectation, TrackExpectation,
};
use spotlookup_core::{LookupConfig, WebApiConfig};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn track(id: &str) -> Value {
    json!({
        "id": id,
        "uri": format!("spotify:track:{id}"),
        "name": format!("Track {id}"),
        "artists": [{"id": "abba", "uri": "spotify:artist:abba", "name": "ABBA"}],
        "duration_ms": 174300
    })
}

async fn mount(server: &MockServer, at: &str, query: Option<(&str, &str)>, body: Value) {
    let mut mock = Mock::given(method("GET")).and(path(at));
    if let Some((key, value)) = query {
        mock = mock.and(query_param(key, value));
    }
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn spotify_provider_contract() {
    let server = MockServer::start().await;

    mount(
        &server,
        "/v1/tracks/",
        Some(("ids", "abc")),
        json!({ "tracks": [track("abc")] }),
    )
    .await;
    mount(
        &server,
        "/v1/albums/",
        Some(("ids", "def")),
        json!({ "albums": [{
            "id": "def",
            "uri": "spotify:album:def",
            "name": "DEF 456",
            "album_type": "album",
            "artists": [{"uri": "spotify:artist:abba", "name": "ABBA"}],
            "tracks": {"items": [track("t1"), track("t2"), track("t3")]}
        }]}),
    )
    .await;
    mount(
        &server,
        "/v1/users/alice/playlists",
        None,
        json!({"items": [{
            "uri": "spotify:user:alice:playlist:st",
            "name": "Starred",
            "owner": {"id": "alice"},
            "type": "playlist"
        }]}),
    )
    .await;
    mount(
        &server,
        "/v1/users/alice/playlists/st/tracks",
        None,
        json!({"items": [{"track": track("t1")}, {"track": track("t2")}]}),
    )
    .await;

    let web_config = WebApiConfig {
        base_url: format!("{}/", server.uri()),
        access_token: Some("test-token".into()),
        user_id: Some("alice".into()),
    };

    let outcome = tokio::task::spawn_blocking(move || {
        let lookup = LookupConfig {
            bitrate: 320,
            timeout_seconds: 10,
        };
        let provider = SpotifyProvider::new(lookup)
            .with_web_client(HttpWebClient::new(&web_config).unwrap())
            .with_user_id("alice");
        let expectations = LookupContractExpectations {
            bitrate: 320,
            track: TrackExpectation {
                uri: "spotify:track:abc".into(),
                name: "Track abc".into(),
            },
            album: Some(AlbumExpectation {
                uri: "spotify:album:def".into(),
                track_uris: vec![
                    "spotify:track:t1".into(),
                    "spotify:track:t2".into(),
                    "spotify:track:t3".into(),
                ],
            }),
            reversed_playlist: Some(ReversedPlaylistExpectation {
                starred_uri: "spotify:user:alice:starred".into(),
                playlist_uri: "spotify:user:alice:playlist:st".into(),
            }),
        };
        run_lookup_contract(&provider, &expectations)
    })
    .await
    .unwrap();

    if let Err(e) = outcome {
        panic!("Contract test failed: {}", e);
    }
}
