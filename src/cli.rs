use clap::{Parser, Subcommand};
use log::info;
use songbridge::clients::{
    PlaylistClient,
    errors::Result,
    playlist::DEFAULT_PLAYLIST_LINK,
};
use songbridge::config::Config;
use songbridge::server;

#[derive(Parser)]
#[command(name = "songbridge")]
#[command(version, about = "Song search and audio stream URL service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Interface to bind, overrides SONGBRIDGE_HOST
        #[arg(long)]
        host: Option<String>,
        /// Port to bind, overrides SONGBRIDGE_PORT
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print a hosted playlist's metadata as JSON
    Playlist {
        #[arg(default_value = DEFAULT_PLAYLIST_LINK)]
        link: String,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            info!("Starting server ...");
            server::serve(&config).await
        }
        Commands::Playlist { link } => print_playlist(&config, &link).await,
    }
}

async fn print_playlist(config: &Config, link: &str) -> Result<()> {
    let client = PlaylistClient::new(reqwest::Client::new(), config.playlist_url.clone());
    let data = client.fetch_or_empty(link).await;
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}
