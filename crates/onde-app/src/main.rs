//! onde - live radio companion with an assistant panel

mod config;
mod news;
mod player;
mod ui;

use std::sync::Arc;

use clap::Parser;
use onde_chat::{ChatConfig, ChatEngine, HttpAssistant};
use onde_tui::Theme;

/// Production stream endpoint
pub const DEFAULT_STREAM_URL: &str = "https://listen.radioking.com/radio/722114/stream/787982";
/// Knowledge/news server
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// onde - listen to the live feed, ask the assistant
#[derive(Parser, Debug)]
#[command(name = "onde")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Knowledge/news server base URL
    #[arg(short, long)]
    server: Option<String>,

    /// Audio stream URL
    #[arg(long)]
    stream: Option<String>,

    /// Use the light theme
    #[arg(long)]
    light: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup tracing
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("onde_chat=debug,onde_app=debug")
            .init();
    }

    // Initialize config and exit
    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let file_config = config::Config::load();
    let server_url = args
        .server
        .or(file_config.server_url)
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    let stream_url = args
        .stream
        .or(file_config.stream_url)
        .unwrap_or_else(|| DEFAULT_STREAM_URL.to_string());
    let theme = if args.light || file_config.theme.as_deref() == Some("light") {
        Theme::light()
    } else {
        Theme::dark()
    };

    let assistant = Arc::new(HttpAssistant::new(server_url.clone()));
    let (chat, engine) = ChatEngine::new(assistant, ChatConfig::default());
    tokio::spawn(engine.run());

    // Transition log, visible under --verbose
    let mut chat_events = chat.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = chat_events.recv().await {
            tracing::debug!(?event, "chat event");
        }
    });

    let client = reqwest::Client::new();
    let headlines = match news::fetch_headlines(&client, &server_url).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!(%e, "headlines unavailable");
            Vec::new()
        }
    };

    let mut player = player::Player::new(stream_url);
    let result = ui::run_app(chat.clone(), &mut player, headlines, theme).await;

    // Unmount: no timer may outlive the panel, whatever phase it was in.
    chat.shutdown().await;
    result
}
