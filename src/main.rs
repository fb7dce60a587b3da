use ailayzer_rag::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Ask(args) => cli::ask::run(args).await,
        Command::Chat(args) => cli::chat::run(args).await,
        Command::ResetSession => cli::reset::run().await,
    }
}
