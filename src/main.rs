use clap::Parser;
use adaptive_rag::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Ask(args) => cli::ask::run(args).await?,
        Command::Chat(args) => cli::chat::run(args).await?,
    };

    std::process::exit(code)
}
