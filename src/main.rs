//! Tilawa - Recitation identification
//!
//! Command-line front end: identify a transcript, resolve chapter names and
//! play verse audio.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tilawa::chapters::chapter_name;
use tilawa::config::Config;
use tilawa::corpus::CorpusStore;
use tilawa::playback::{ClipEngine, PlaybackHandle, PlaybackOutcome, PlaybackSequencer};
use tilawa::result::{MatchResult, MatchSource, VerseLocator};
use tilawa::{resolve_chapter_number, RecognitionSession};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Load the corpus from a local JSON file instead of the network
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Identify the passage behind a transcript (reads stdin when TEXT is omitted)
    Identify {
        text: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Play the identified verses
        #[arg(long)]
        play: bool,
    },

    /// Resolve a chapter name to its number
    Resolve { name: String },

    /// Play verses FROM..=TO of a chapter
    Play {
        chapter: u32,
        from: u32,
        to: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Setup logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("📿 Tilawa v{} starting...", env!("CARGO_PKG_VERSION"));

    match args.command {
        Command::Identify { text, json, play } => {
            let transcript = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read transcript from stdin")?;
                    buf
                }
            };

            let store = match &args.corpus {
                Some(path) => Arc::new(CorpusStore::from_file(path)?),
                None => Arc::new(CorpusStore::from_config(&config)?),
            };
            let mut session = RecognitionSession::with_store(store, &config)?;

            let result = match session.submit_transcript(&transcript).await {
                Ok(result) => result,
                Err(e) => bail!("{}", e.user_message()),
            };
            print_result(&result, json)?;

            if play {
                match session.play_result(&result) {
                    Some(handle) => wait_for_playback(handle).await?,
                    None => warn!("Playback unavailable for '{}'", result.chapter_name),
                }
            }
        }
        Command::Resolve { name } => {
            let number = resolve_chapter_number(&name);
            if number == 0 {
                bail!("Unknown chapter: {}", name);
            }
            println!("{number}");
        }
        Command::Play { chapter, from, to } => {
            let Some(name) = chapter_name(chapter) else {
                bail!("Chapter must be between 1 and 114, got {}", chapter);
            };
            let locator = match to {
                Some(to) => VerseLocator::Range { start: from, end: to },
                None => VerseLocator::Single(from),
            };
            let result = MatchResult {
                chapter_name: name.to_string(),
                chapter_number: chapter,
                text: String::new(),
                translation: String::new(),
                locator,
                score: None,
                source: MatchSource::Local,
            };

            let engine = Arc::new(ClipEngine::new(&config)?);
            let sequencer = PlaybackSequencer::from_config(engine, &config);
            match sequencer.play(&result, chapter) {
                Some(handle) => wait_for_playback(handle).await?,
                None => bail!("Nothing to play for {}", result.label()),
            }
        }
    }

    Ok(())
}

fn print_result(result: &MatchResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{} · {}", result.chapter_name, result.label());
    if !result.text.is_empty() {
        println!("{}", result.text);
    }
    if !result.translation.is_empty() {
        println!("{}", result.translation);
    }
    if let Some(score) = result.score {
        println!("score: {score:.3}");
    }
    Ok(())
}

/// Wait for playback, cancelling on Ctrl-C
async fn wait_for_playback(handle: PlaybackHandle) -> Result<()> {
    let token = handle.token();
    tokio::select! {
        outcome = handle.join() => {
            match outcome? {
                PlaybackOutcome::Completed => info!("✅ Playback finished"),
                PlaybackOutcome::Cancelled => info!("⏹️ Playback cancelled"),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            token.cancel();
            info!("⏹️ Playback cancelled");
        }
    }
    Ok(())
}
