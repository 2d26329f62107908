//! Yak CLI — a terminal chatbot with conversation memory.

mod dataset;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;
use yak_api::OpenAiProvider;
use yak_config::{CliOverrides, YakConfig};
use yak_session::{DEFAULT_KEEP_RECENT, HistoryStore, Session, compact, exchange};
use yak_types::CompletionProvider;

#[derive(Parser)]
#[command(name = "yak", version, about = "A terminal chatbot with conversation memory")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Send a single prompt and print the response (non-interactive, no history)
    #[arg(short, long)]
    print: Option<String>,

    /// Talk to a local Ollama server instead of the hosted API
    #[arg(long)]
    ollama: bool,

    /// Model to use
    #[arg(long)]
    model: Option<String>,

    /// API key (overrides OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// History file (defaults to ~/.yak/conversation.json)
    #[arg(long)]
    history: Option<PathBuf>,

    /// Enable verbose/debug logging
    #[arg(long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a fine-tuning dataset and estimate its training cost
    Dataset { path: PathBuf },

    /// Convert a JSON array file to JSONL
    Convert { input: PathBuf, output: PathBuf },

    /// Split a text file into overlapping chunks
    Split {
        path: PathBuf,
        #[arg(long, default_value_t = 100)]
        chunk_size: usize,
        #[arg(long, default_value_t = 20)]
        chunk_overlap: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .init();

    // Dataset tooling needs no API configuration.
    match cli.command {
        Some(Command::Dataset { path }) => return dataset::check(&path),
        Some(Command::Convert { input, output }) => return dataset::convert(&input, &output),
        Some(Command::Split {
            path,
            chunk_size,
            chunk_overlap,
        }) => return dataset::split(&path, chunk_size, chunk_overlap),
        None => {}
    }

    let config = YakConfig::load(CliOverrides {
        api_key: cli.api_key,
        model: cli.model,
        history_path: cli.history,
        use_ollama: cli.ollama,
    })
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let provider = if config.use_ollama {
        OpenAiProvider::ollama(&config.api_base_url, timeout)
    } else {
        OpenAiProvider::openai(&config.api_key, &config.api_base_url, timeout)
    }
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    if let Some(prompt) = cli.print {
        // One-shot mode: single turn, nothing persisted.
        let mut session = Session::new();
        match exchange(&provider, &config.model, &mut session, &prompt).await {
            Ok(reply) => println!("{reply}"),
            Err(e) => anyhow::bail!("completion failed: {e}"),
        }
        return Ok(());
    }

    repl(&provider, &config).await
}

async fn repl(provider: &dyn CompletionProvider, config: &YakConfig) -> Result<()> {
    let store = HistoryStore::new(config.history_path.clone())
        .await
        .context("Failed to open history store")?;
    let mut session = store.load().await;

    eprintln!(
        "yak v{} (provider: {}, model: {}, session: {})",
        env!("CARGO_PKG_VERSION"),
        provider.name(),
        config.model,
        session.short_id()
    );
    eprintln!("Commands: save, load, summarize, quit. Press Ctrl+D to exit.\n");

    let stdin = io::stdin();
    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut input = String::new();
        let bytes_read = stdin.lock().read_line(&mut input)?;
        if bytes_read == 0 {
            eprintln!();
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "save" => {
                match store.save(&session).await {
                    Ok(()) => eprintln!("Conversation saved to {}.", store.path().display()),
                    Err(e) => eprintln!("Error saving conversation: {e}"),
                }
                continue;
            }
            "load" => {
                session = store.load().await;
                eprintln!("Loaded conversation ({} messages).", session.messages.len());
                continue;
            }
            "summarize" => {
                if summarize(&mut session) {
                    eprintln!("Conversation summarized.");
                } else {
                    eprintln!("Nothing to summarize: conversation is short enough.");
                }
                continue;
            }
            _ => {}
        }

        match exchange(provider, &config.model, &mut session, input).await {
            Ok(reply) => {
                println!("\nAssistant: {reply}\n");
                if session.messages.len() > config.compact_threshold && summarize(&mut session) {
                    eprintln!("(Conversation auto-summarized to save context.)");
                }
            }
            Err(e) => {
                // Failure stands in for the reply; the user turn stays.
                eprintln!("\nError: {e}\n");
            }
        }
    }

    // No implicit save on exit: persistence is the operator's call.
    Ok(())
}

/// Compact the session in place. Returns false when it is already short
/// enough.
fn summarize(session: &mut Session) -> bool {
    match compact(&session.messages, DEFAULT_KEEP_RECENT) {
        Some(result) => {
            tracing::debug!(
                removed = result.messages_removed,
                remaining = result.new_messages.len(),
                "compacted conversation"
            );
            session.messages = result.new_messages;
            session.compaction_count += 1;
            true
        }
        None => false,
    }
}
