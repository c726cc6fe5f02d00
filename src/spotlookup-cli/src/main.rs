use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use spotify_provider::SpotifyProvider;
use spotlookup_core::models::Track;
use spotlookup_core::{init_logging, AppDirs, Config, LibraryProvider};
use thiserror::Error;

const ACCESS_TOKEN_ENV: &str = "SPOTIFY_ACCESS_TOKEN";
const USER_ID_ENV: &str = "SPOTIFY_USER_ID";

#[derive(Debug, Parser)]
#[command(name = "spotlookup", version, about = "Resolve Spotify URIs into track metadata")]
struct Cli {
    /// Web API access token (takes precedence over SPOTIFY_ACCESS_TOKEN and config)
    #[arg(long, global = true)]
    access_token: Option<String>,
    /// Account whose playlists are listed (takes precedence over SPOTIFY_USER_ID and config)
    #[arg(long, global = true)]
    user_id: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Expand URIs into tracks
    Lookup {
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// Resolve images for track, album and artist URIs
    Images {
        #[arg(required = true)]
        uris: Vec<String>,
    },
    /// Playlist browsing commands
    #[command(subcommand)]
    Playlists(PlaylistsCommand),
    /// Print the config path and effective settings
    Config,
}

#[derive(Debug, Subcommand)]
enum PlaylistsCommand {
    /// List the user's playlists
    List,
    /// List the tracks of one playlist
    Items { uri: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("no playlist found for {0}")]
    UnknownPlaylist(String),
}

impl Cli {
    fn apply_overrides(&self, config: Config) -> Config {
        let access_token = self
            .access_token
            .clone()
            .or_else(|| std::env::var(ACCESS_TOKEN_ENV).ok());
        let user_id = self
            .user_id
            .clone()
            .or_else(|| std::env::var(USER_ID_ENV).ok());
        config.with_overrides(access_token, user_id)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let dirs = AppDirs::discover()?;
    let config = cli.apply_overrides(Config::load_or_default(&dirs)?);
    config.validate()?;
    let _logging = init_logging(&config.logging, &dirs)?;

    if let Command::Config = cli.command {
        println!("Config file: {}", Config::config_path(&dirs).display());
        print_json(&describe_config(&config))?;
        return Ok(());
    }

    let provider = SpotifyProvider::from_config(&config)?;
    tracing::debug!(
        "Using provider '{}' with {:?}",
        provider.id(),
        provider.capabilities()
    );

    match cli.command {
        Command::Lookup { uris } => {
            let results: Vec<(String, Vec<Track>)> = uris
                .into_iter()
                .map(|uri| {
                    let tracks = provider.lookup(&uri);
                    (uri, tracks)
                })
                .collect();
            print_json(&render_lookups(&results))?;
        }
        Command::Images { uris } => {
            let images = provider.get_images(&uris);
            let rendered: serde_json::Map<String, Value> = images
                .into_iter()
                .map(|(uri, images)| (uri, json!(&*images)))
                .collect();
            print_json(&Value::Object(rendered))?;
        }
        Command::Playlists(PlaylistsCommand::List) => {
            let playlists = provider.list_playlists()?;
            print_json(&json!(playlists))?;
        }
        Command::Playlists(PlaylistsCommand::Items { uri }) => {
            let items = provider
                .playlist_items(&uri)?
                .ok_or(CliError::UnknownPlaylist(uri))?;
            print_json(&json!(items))?;
        }
        Command::Config => {}
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_lookups(results: &[(String, Vec<Track>)]) -> Value {
    Value::Array(
        results
            .iter()
            .map(|(uri, tracks)| json!({ "uri": uri, "tracks": tracks }))
            .collect(),
    )
}

fn describe_config(config: &Config) -> Value {
    json!({
        "config_version": config.config_version,
        "lookup": config.lookup,
        "web_api": {
            "base_url": config.web_api.base_url,
            "access_token": config.web_api.access_token.as_ref().map(|_| "<redacted>"),
            "user_id": config.web_api.user_id,
        },
        "logging": config.logging,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use spotlookup_core::models::Artist;

    fn sample_track() -> Track {
        Track {
            uri: "spotify:track:abc".into(),
            name: "ABC 123".into(),
            artists: vec![Artist::new("spotify:artist:abba", "ABBA")],
            album: None,
            length_ms: Some(174300),
            track_no: Some(7),
            disc_no: None,
            bitrate: 160,
        }
    }

    #[test]
    fn lookup_requires_uris() {
        assert!(Cli::try_parse_from(["spotlookup", "lookup"]).is_err());

        let cli = Cli::try_parse_from([
            "spotlookup",
            "lookup",
            "spotify:track:a",
            "spotify:album:b",
        ])
        .expect("lookup should parse");
        match cli.command {
            Command::Lookup { uris } => assert_eq!(uris.len(), 2),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spotlookup",
            "playlists",
            "list",
            "--user-id",
            "alice",
            "--access-token",
            "token",
        ])
        .expect("playlists list should parse");

        let config = cli.apply_overrides(Config::default());
        assert_eq!(config.web_api.user_id.as_deref(), Some("alice"));
        assert_eq!(config.web_api.access_token.as_deref(), Some("token"));
        assert!(matches!(cli.command, Command::Playlists(PlaylistsCommand::List)));
    }

    #[test]
    fn playlist_items_takes_a_uri() {
        let cli = Cli::try_parse_from([
            "spotlookup",
            "playlists",
            "items",
            "spotify:user:alice:playlist:foo",
        ])
        .expect("playlists items should parse");
        match cli.command {
            Command::Playlists(PlaylistsCommand::Items { uri }) => {
                assert_eq!(uri, "spotify:user:alice:playlist:foo")
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lookups_render_per_uri() {
        let rendered = render_lookups(&[
            ("spotify:track:abc".into(), vec![sample_track()]),
            ("invalid".into(), Vec::new()),
        ]);
        assert_eq!(rendered[0]["uri"], "spotify:track:abc");
        assert_eq!(rendered[0]["tracks"][0]["name"], "ABC 123");
        assert_eq!(rendered[0]["tracks"][0]["bitrate"], 160);
        assert_eq!(rendered[1]["tracks"], json!([]));
    }

    #[test]
    fn config_description_redacts_token() {
        let config = Config::default().with_overrides(Some("secret".into()), None);
        let described = describe_config(&config);
        assert_eq!(described["web_api"]["access_token"], "<redacted>");
        assert!(!described.to_string().contains("secret"));
    }
}
