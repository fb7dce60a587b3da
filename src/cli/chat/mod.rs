//! Chat command - interactive question loop

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::domain::RagQuery;
use crate::infrastructure::session_file::SessionFile;

const RESET_COMMAND: &str = "/reset";

#[derive(Debug, Args)]
pub struct ChatArgs {
    /// Print answers as they are generated
    #[arg(long)]
    pub stream: bool,

    /// Session id; defaults to the persisted one
    #[arg(long)]
    pub session: Option<String>,
}

pub async fn run(args: ChatArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let pipeline = crate::create_pipeline(&config)?;
    let mut session_id = super::resolve_session(&config, args.session).await?;

    println!(
        "Session {}. Type '{}' to start over, 'exit' or 'quit' to leave.",
        session_id, RESET_COMMAND
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = line.trim();
        if is_exit(input) {
            break;
        }
        if input.is_empty() {
            continue;
        }
        if input == RESET_COMMAND {
            pipeline.reset_session(&session_id).await;
            let marker = SessionFile::new(&config.session.marker_file);
            marker.delete().await?;
            session_id = marker.load_or_create().await?;
            println!("New session {}.", session_id);
            continue;
        }

        match RagQuery::validated(input, Some(&session_id)) {
            Ok(query) => {
                if let Err(e) = super::ask::answer(&pipeline, query, args.stream).await {
                    warn!(error = %e, "Failed to answer");
                }
            }
            Err(e) => println!("{}", e),
        }
    }

    pipeline.sessions().shutdown().await;
    Ok(())
}

fn print_prompt() {
    use std::io::Write;

    print!("> ");
    let _ = std::io::stdout().flush();
}

fn is_exit(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "exit" | "quit")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_words() {
        assert!(is_exit("exit"));
        assert!(is_exit("QUIT"));
        assert!(!is_exit("exit now"));
        assert!(!is_exit(""));
    }
}
