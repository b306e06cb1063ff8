//! flipdeck command-line client
//!
//! Studies and manages the cards kept by the flipdeck card store service.

mod client;
mod commands;
mod config;
mod speaker;
mod study;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use flipdeck_core::{Narrator, SpeechService};
use tracing_subscriber::EnvFilter;

use client::HttpCardStore;
use commands::Command;
use config::CliConfig;
use speaker::{CommandSpeaker, LogSpeaker};

/// flipdeck - shuffled flashcards with speech
#[derive(Parser, Debug)]
#[command(name = "flipdeck")]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the card store service
    #[arg(long, global = true, env = "FLIPDECK_SERVER", value_name = "URL")]
    server: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = CliConfig::load(args.config.as_deref())?.with_server(args.server);
    tracing::debug!(server = %config.server_url, "using card store");
    let store = HttpCardStore::new(&config.server_url)?;

    match args.command {
        Command::Study { mute } => {
            if mute {
                study_with(&store, Arc::new(LogSpeaker), &config).await
            } else {
                let speaker = Arc::new(CommandSpeaker::new());
                study_with(&store, speaker, &config).await
            }
        }
        Command::List => commands::list(&store).await,
        command => {
            let mut editor = commands::open_editor(store, &config.gate()).await?;
            commands::run_edit(&mut editor, command).await
        }
    }
}

async fn study_with<S>(store: &HttpCardStore, speaker: Arc<S>, config: &CliConfig) -> anyhow::Result<()>
where
    S: SpeechService + VoiceSource,
{
    if !store.check_connectivity().await.unwrap_or(false) {
        anyhow::bail!("card store at {} is not reachable", store.base_url());
    }

    let narrator = Narrator::new(Arc::clone(&speaker), config.speech.clone());
    let catalog = narrator.catalog().clone();
    tokio::task::spawn_blocking(move || match speaker.load() {
        Ok(voices) => catalog.publish(voices),
        Err(e) => tracing::warn!(error = %e, "could not list voices"),
    });

    study::run_study(store, narrator).await
}

/// Hosts whose voice list takes a while to arrive.
trait VoiceSource {
    fn load(&self) -> std::io::Result<Vec<flipdeck_core::Voice>>;
}

impl VoiceSource for CommandSpeaker {
    fn load(&self) -> std::io::Result<Vec<flipdeck_core::Voice>> {
        self.load_voices()
    }
}

impl VoiceSource for LogSpeaker {
    fn load(&self) -> std::io::Result<Vec<flipdeck_core::Voice>> {
        Ok(self.available_voices())
    }
}
