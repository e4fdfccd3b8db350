//! Ask command - answers one question and exits

use std::io::Write;

use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

use super::{exit_code, EXIT_USAGE};
use crate::domain::{RagWorkflow, RunOutcome, RunResult, WorkflowError};

pub(crate) const UNAVAILABLE: &str = "The answer service is unavailable, please try again later.";
const TIMED_OUT: &str = "Timed out waiting for an answer.";

/// Arguments for the ask command
#[derive(Args, Clone, Debug)]
pub struct AskArgs {
    /// Question to answer; read from stdin when omitted
    #[arg(long, short)]
    pub question: Option<String>,
}

/// Run the ask command and return the process exit code
pub async fn run(args: AskArgs) -> anyhow::Result<i32> {
    let config = super::bootstrap()?;
    let workflow = crate::build_executor(&config).await?;

    let question = match args.question {
        Some(question) => question,
        None => read_question(BufReader::new(tokio::io::stdin())).await?,
    };

    let mut stdout = std::io::stdout();
    answer(&workflow, &question, &mut stdout).await
}

/// Read the first line of input
pub async fn read_question<R: AsyncBufRead + Unpin>(reader: R) -> anyhow::Result<String> {
    let mut lines = reader.lines();
    let line = lines.next_line().await?.unwrap_or_default();
    Ok(line.trim().to_string())
}

/// Run the workflow and print its answer or failure reason
pub async fn answer<W: Write>(
    workflow: &dyn RagWorkflow,
    question: &str,
    out: &mut W,
) -> anyhow::Result<i32> {
    match workflow.run(question).await {
        Ok(result) => {
            render(&result, out)?;
            Ok(exit_code(&result))
        }
        Err(WorkflowError::InvalidInput(message)) => {
            writeln!(out, "Error: {}", message)?;
            Ok(EXIT_USAGE)
        }
        Err(e) => Err(e.into()),
    }
}

/// Print the outcome of a run
pub fn render<W: Write>(result: &RunResult, out: &mut W) -> std::io::Result<()> {
    match (result.outcome, result.answer()) {
        (RunOutcome::Ok, Some(answer)) => writeln!(out, "{}", answer),
        (RunOutcome::Exhausted, Some(answer)) => {
            warn!(
                generation_attempts = result.state.generation_attempts,
                search_attempts = result.state.search_attempts,
                "Answer could not be fully verified within the retry limits"
            );
            writeln!(out, "{}", answer)
        }
        (RunOutcome::UpstreamFailure, _) => {
            warn!(
                run_id = %result.run_id,
                error = result.error.as_deref().unwrap_or("unknown"),
                "Run failed"
            );
            let reason = if result.timed_out { TIMED_OUT } else { UNAVAILABLE };
            writeln!(out, "Error: {}", reason)
        }
        (_, None) => writeln!(out, "No answer could be produced within the retry limits."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{EXIT_NO_ANSWER, EXIT_OK, EXIT_UPSTREAM_FAILURE};
    use crate::domain::workflow::MockRagWorkflow;
    use crate::domain::WorkflowState;

    async fn ask(workflow: &MockRagWorkflow, question: &str) -> (i32, String) {
        let mut out = Vec::new();
        let code = answer(workflow, question, &mut out).await.unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_answer_ok() {
        let workflow = MockRagWorkflow::new(Some("SCKS meets on Tuesdays."), RunOutcome::Ok);

        let (code, output) = ask(&workflow, "When does SCKS meet?").await;

        assert_eq!(code, EXIT_OK);
        assert_eq!(output, "SCKS meets on Tuesdays.\n");
        assert_eq!(workflow.questions(), vec!["When does SCKS meet?"]);
    }

    #[tokio::test]
    async fn test_exhausted_with_answer_still_prints_it() {
        let workflow = MockRagWorkflow::new(Some("best effort"), RunOutcome::Exhausted);

        let (code, output) = ask(&workflow, "q").await;

        assert_eq!(code, EXIT_OK);
        assert_eq!(output, "best effort\n");
    }

    #[tokio::test]
    async fn test_exhausted_without_answer() {
        let workflow = MockRagWorkflow::new(None, RunOutcome::Exhausted);

        let (code, output) = ask(&workflow, "q").await;

        assert_eq!(code, EXIT_NO_ANSWER);
        assert!(output.starts_with("No answer"));
    }

    #[tokio::test]
    async fn test_upstream_failure() {
        let workflow = MockRagWorkflow::new(None, RunOutcome::UpstreamFailure);

        let (code, output) = ask(&workflow, "q").await;

        assert_eq!(code, EXIT_UPSTREAM_FAILURE);
        assert_eq!(output, format!("Error: {}\n", UNAVAILABLE));
    }

    fn render_to_string(result: &RunResult) -> String {
        let mut out = Vec::new();
        render(result, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_upstream_failure_hides_internals() {
        let error = WorkflowError::node_execution(
            "web_search",
            "Provider error (duck_duck_go): HTTP request failed: error sending request for url \
             (https://html.duckduckgo.com/html/?q=x)",
        );
        let result = RunResult::new(
            uuid::Uuid::new_v4(),
            RunOutcome::UpstreamFailure,
            WorkflowState::new("x"),
        )
        .with_error(&error);

        let output = render_to_string(&result);

        assert_eq!(output, format!("Error: {}\n", UNAVAILABLE));
        for internal in ["web_search", "duck_duck_go", "http", "Node"] {
            assert!(!output.contains(internal), "leaked {internal}: {output}");
        }
    }

    #[test]
    fn test_deadline_expiry_message() {
        let result = RunResult::new(
            uuid::Uuid::new_v4(),
            RunOutcome::UpstreamFailure,
            WorkflowState::new("x"),
        )
        .with_error(&WorkflowError::timeout("grade_documents", 120_000));

        let output = render_to_string(&result);

        assert_eq!(output, "Error: Timed out waiting for an answer.\n");
        assert!(!output.contains("grade_documents"));
    }

    #[tokio::test]
    async fn test_empty_question() {
        let workflow = MockRagWorkflow::new(Some("unused"), RunOutcome::Ok);

        let (code, output) = ask(&workflow, "").await;

        assert_eq!(code, EXIT_USAGE);
        assert_eq!(output, "Error: question is empty\n");
        assert!(workflow.questions().is_empty());
    }

    #[tokio::test]
    async fn test_read_question_takes_first_line() {
        let input: &[u8] = b"  What is SCKS?  \nignored\n";

        assert_eq!(read_question(input).await.unwrap(), "What is SCKS?");
    }

    #[tokio::test]
    async fn test_read_question_empty_input() {
        let input: &[u8] = b"";

        assert_eq!(read_question(input).await.unwrap(), "");
    }
}
