//! CLI module for the adaptive RAG workflow
//!
//! Provides subcommands:
//! - `ask`: answer one question and exit
//! - `chat`: interactive session with history

pub mod ask;
pub mod chat;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::{RunOutcome, RunResult};
use crate::infrastructure::logging;

pub const EXIT_OK: i32 = 0;
pub const EXIT_UPSTREAM_FAILURE: i32 = 1;
pub const EXIT_NO_ANSWER: i32 = 2;
pub const EXIT_USAGE: i32 = 64;

/// Adaptive RAG - answers questions from a document index, the web or the model itself
#[derive(Parser)]
#[command(name = "adaptive-rag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Answer a single question read from --question or stdin
    Ask(ask::AskArgs),

    /// Start an interactive chat session
    Chat(chat::ChatArgs),
}

/// Process exit code for a finished run
pub fn exit_code(result: &RunResult) -> i32 {
    match result.outcome {
        RunOutcome::Ok => EXIT_OK,
        RunOutcome::Exhausted if result.answer().is_some() => EXIT_OK,
        RunOutcome::Exhausted => EXIT_NO_ANSWER,
        RunOutcome::UpstreamFailure => EXIT_UPSTREAM_FAILURE,
    }
}

/// Load `.env`, configuration and logging
fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);
    config.validate()?;

    Ok(config)
}
