//! Ask command - answers one question on stdout

use std::io::Write;
use std::sync::Arc;

use clap::Args;
use futures::StreamExt;

use crate::domain::{AnswerResult, RagQuery};
use crate::infrastructure::rag::{RagPipeline, StreamEvent};

#[derive(Debug, Args)]
pub struct AskArgs {
    /// The question
    #[arg(required = true, num_args = 1..)]
    pub query: Vec<String>,

    /// Print the answer as it is generated
    #[arg(long)]
    pub stream: bool,

    /// Session id; defaults to the persisted one
    #[arg(long)]
    pub session: Option<String>,
}

pub async fn run(args: AskArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let pipeline = crate::create_pipeline(&config)?;
    let session_id = super::resolve_session(&config, args.session).await?;

    let query = RagQuery::validated(&args.query.join(" "), Some(&session_id))?;
    answer(&pipeline, query, args.stream).await
}

/// Answer one query and print it; shared with the chat loop
pub(crate) async fn answer(
    pipeline: &Arc<RagPipeline>,
    query: RagQuery,
    stream: bool,
) -> anyhow::Result<()> {
    if !stream {
        let result = pipeline.run(query).await?;
        println!("{}", result.answer);
        print_footer(&result);
        return Ok(());
    }

    let mut events = pipeline.stream(query)?;
    let mut stdout = std::io::stdout();

    while let Some(event) = events.next().await {
        match event {
            StreamEvent::Delta(text) => {
                write!(stdout, "{}", text)?;
                stdout.flush()?;
            }
            StreamEvent::Error(message) => {
                writeln!(stdout)?;
                writeln!(stdout, "{}", message)?;
            }
            StreamEvent::Completed(result) => {
                writeln!(stdout)?;
                print_footer(&result);
            }
            StreamEvent::Started | StreamEvent::Done => {}
        }
    }

    Ok(())
}

fn print_footer(result: &AnswerResult) {
    println!(
        "[source: {} | hallucination: {:.2} | grade: {:.2}]",
        result.source, result.hallucination_score, result.answer_grade
    );
}
