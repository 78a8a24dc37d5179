//! quizbot binary: HTTP endpoint or one-shot question answering.
//!
//! All tracing output goes to stderr so that `ask` can print clean JSON on
//! stdout.

use clap::{Parser, Subcommand};
use quizbot::{AnswerServer, AppConfig, DefaultAnswerService, Query};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Answers multiple-choice questions with web-search context.
#[derive(Parser)]
#[command(name = "quizbot", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Serve `POST /api/request` until Ctrl+C.
    Serve,

    /// Answer one question and print the answer as JSON.
    Ask {
        /// Question text including its numbered options.
        query: String,

        /// Request id echoed in the answer.
        #[arg(long, default_value_t = 0)]
        id: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quizbot=info,quizbot_search=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => AppConfig::from_file(path)?,
        None => {
            let config = AppConfig::default()
                .with_api_key_override(std::env::var(quizbot::config::API_KEY_ENV).ok());
            config.validate()?;
            config
        }
    };

    let service = Arc::new(DefaultAnswerService::from_config(&config)?);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(service, &config).await,
        Command::Ask { query, id } => ask(&service, Query::new(id, query)).await,
    }
}

async fn serve(service: Arc<DefaultAnswerService>, config: &AppConfig) -> anyhow::Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "quizbot starting");

    let server = AnswerServer::start(service, &config.server).await?;
    info!(port = server.port(), "ready, press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;
    info!("received Ctrl+C, shutting down");
    server.shutdown();
    Ok(())
}

async fn ask(service: &DefaultAnswerService, query: Query) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    let cancel_on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_on_signal.cancel();
        }
    });

    let answer = service.answer_with_cancel(&query, &cancel).await?;
    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}
