//! Spotify Top Tracks - Entry Point
//!
//! With no subcommand it runs the OAuth proxy; `top-tracks` prints a user's
//! top tracks from the tokens the proxy handed out.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spotify_top_tracks::{
    SpotifyClient, TokenSession,
    config::{Config, defaults},
    formatters::{format_profile_markdown, format_top_tracks_json, format_top_tracks_markdown},
    models::{TimeRange, TokenSet},
    server::AuthProxyServer,
};

#[derive(Parser, Debug)]
#[command(name = "spotify-top-tracks")]
#[command(about = "OAuth proxy and top-tracks viewer for the Spotify Web API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the signed-in user's top tracks
    TopTracks(TopTracksArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Spotify application client id
    #[arg(long, env = "CLIENT_ID")]
    client_id: Option<String>,

    /// Spotify application client secret
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// Redirect URI registered with Spotify
    #[arg(long, env = "REDIRECT_URI", default_value = defaults::REDIRECT_URI)]
    redirect_uri: String,

    /// Frontend the browser returns to with tokens
    #[arg(long, env = "FRONTEND_URI", default_value = defaults::FRONTEND_URI)]
    frontend_uri: String,

    /// HTTP server port
    #[arg(long, env = "PORT", default_value_t = defaults::PORT)]
    port: u16,

    /// Directory with the built frontend
    #[arg(long, env = "STATIC_DIR", default_value = defaults::STATIC_DIR)]
    static_dir: PathBuf,
}

#[derive(Args, Debug)]
struct TopTracksArgs {
    /// URL the proxy redirected the browser to (carries the tokens)
    #[arg(long, conflicts_with = "access_token")]
    redirect_url: Option<String>,

    /// Access token, if not using --redirect-url
    #[arg(long)]
    access_token: Option<String>,

    /// Refresh token, enables refreshing through the proxy
    #[arg(long)]
    refresh_token: Option<String>,

    /// Base URL of the running proxy
    #[arg(long, default_value = "http://localhost:8888")]
    proxy_url: String,

    /// Time range: short, medium or long
    #[arg(long, default_value = "short")]
    range: TimeRange,

    /// Number of tracks (1-50)
    #[arg(long, default_value_t = 20)]
    limit: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Markdown)]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Numbered Markdown list
    #[default]
    Markdown,
    /// Compact JSON
    Json,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so `top-tracks` output stays pipeable.
    if json {
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    match cli.command {
        Some(Command::TopTracks(args)) => run_top_tracks(args).await,
        None => run_serve(cli.serve).await,
    }
}

async fn run_serve(args: ServeArgs) -> anyhow::Result<()> {
    let client_id = args.client_id.context("CLIENT_ID is required (flag or environment)")?;
    let client_secret =
        args.client_secret.context("CLIENT_SECRET is required (flag or environment)")?;

    let mut config = Config::new(client_id, client_secret);
    config.redirect_uri = args.redirect_uri;
    config.frontend_uri = args.frontend_uri;
    config.port = args.port;
    config.static_dir = args.static_dir;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.port,
        "Starting Spotify auth proxy"
    );

    AuthProxyServer::new(config).run().await
}

async fn run_top_tracks(args: TopTracksArgs) -> anyhow::Result<()> {
    let tokens = match (args.redirect_url, args.access_token) {
        (Some(url), _) => TokenSet::from_redirect_url(&url)?,
        // Lifetime unknown; treat as fresh and let a 401 trigger the refresh.
        (None, Some(access)) => TokenSet::new(access, args.refresh_token, 3600),
        (None, None) => anyhow::bail!("pass --redirect-url or --access-token"),
    };

    let spotify = SpotifyClient::new(&Config::default())?;
    let spotify = &spotify;
    let mut session = TokenSession::new(tokens, args.proxy_url)?;

    let (range, limit) = (args.range, args.limit);

    let profile = session
        .call(|token| async move { spotify.current_user(&token).await })
        .await
        .context("failed to load profile")?;
    let page = session
        .call(|token| async move { spotify.top_tracks(&token, range, limit).await })
        .await
        .context("failed to load top tracks")?;

    tracing::info!(user = %profile.id, count = page.items.len(), %range, "Loaded top tracks");

    match args.format {
        OutputFormat::Markdown => {
            println!("{}\n", format_profile_markdown(&profile));
            println!("{}", format_top_tracks_markdown(&page, range));
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&format_top_tracks_json(&page, range))?);
        }
    }

    Ok(())
}
