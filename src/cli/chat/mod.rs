//! Chat command - interactive question loop with session history

use std::io::Write;

use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::cli::ask::{render, UNAVAILABLE};
use crate::domain::{Exchange, RagWorkflow, SessionStore, WorkflowError};
use crate::infrastructure::session::InMemorySessionStore;

const HELP: &str = "Type a question and press enter.
Commands:
  /history  show this session's questions and answers
  /clear    forget this session's history
  /help     show this help
  /bye      end the session (also /quit, /exit)";

/// Arguments for the chat command
#[derive(Args, Clone, Debug)]
pub struct ChatArgs {
    /// Session id used to group the conversation history
    #[arg(long, default_value = "default")]
    pub session: String,
}

/// One parsed line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Ask(String),
    History,
    Clear,
    Help,
    Bye,
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }

        match line.to_lowercase().as_str() {
            "/bye" | "/quit" | "/exit" | "bye" => Self::Bye,
            "/history" => Self::History,
            "/clear" => Self::Clear,
            "/help" | "?" => Self::Help,
            other if other.starts_with('/') => Self::Help,
            _ => Self::Ask(line.to_string()),
        }
    }
}

/// Run the chat command
pub async fn run(args: ChatArgs) -> anyhow::Result<i32> {
    let config = super::bootstrap()?;
    let workflow = crate::build_executor(&config).await?;
    let store = InMemorySessionStore::new();

    let session = ChatSession::new(&workflow, &store, args.session);
    let mut stdout = std::io::stdout();
    session
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;

    Ok(super::EXIT_OK)
}

/// A chat loop bound to one session of a store
pub struct ChatSession<'a> {
    workflow: &'a dyn RagWorkflow,
    store: &'a dyn SessionStore,
    session_id: String,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        workflow: &'a dyn RagWorkflow,
        store: &'a dyn SessionStore,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            workflow,
            store,
            session_id: session_id.into(),
        }
    }

    /// Read commands until `bye` or end of input, then end the session
    pub async fn run<R, W>(&self, input: R, out: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        info!(session = %self.session_id, "Chat session started");
        writeln!(out, "Ask a question, or /help for commands.")?;

        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(out)?;
                break;
            };

            if !self.handle(ReplCommand::parse(&line), out).await? {
                break;
            }
        }

        self.store.end(&self.session_id).await?;
        info!(session = %self.session_id, "Chat session ended");
        Ok(())
    }

    /// Execute one command; returns false when the session should stop
    pub async fn handle<W: Write>(&self, command: ReplCommand, out: &mut W) -> anyhow::Result<bool> {
        match command {
            ReplCommand::Empty => {}
            ReplCommand::Help => writeln!(out, "{}", HELP)?,
            ReplCommand::Bye => {
                writeln!(out, "Bye!")?;
                return Ok(false);
            }
            ReplCommand::Clear => {
                self.store.clear(&self.session_id).await?;
                writeln!(out, "History cleared.")?;
            }
            ReplCommand::History => self.print_history(out).await?,
            ReplCommand::Ask(question) => self.ask(question, out).await?,
        }

        Ok(true)
    }

    async fn ask<W: Write>(&self, question: String, out: &mut W) -> anyhow::Result<()> {
        let history = match self.store.history(&self.session_id).await {
            Ok(history) => history,
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Failed to load history");
                Vec::new()
            }
        };

        let result = match self.workflow.run_with_history(&question, &history).await {
            Ok(result) => result,
            Err(WorkflowError::InvalidInput(message)) => {
                writeln!(out, "Error: {}", message)?;
                return Ok(());
            }
            Err(e) => {
                warn!(session = %self.session_id, error = %e, "Run failed");
                writeln!(out, "Error: {}", UNAVAILABLE)?;
                return Ok(());
            }
        };

        render(&result, out)?;

        let exchange = Exchange::new(question, result.answer().map(str::to_string), result.outcome);
        if let Err(e) = self.store.append(&self.session_id, exchange).await {
            warn!(session = %self.session_id, error = %e, "Failed to record exchange");
        }

        Ok(())
    }

    async fn print_history<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        let history = self.store.history(&self.session_id).await?;
        if history.is_empty() {
            writeln!(out, "No questions asked yet.")?;
            return Ok(());
        }

        for (i, exchange) in history.iter().enumerate() {
            writeln!(out, "{}. Q: {}", i + 1, exchange.question)?;
            writeln!(
                out,
                "   A: {} [{}]",
                exchange.answer.as_deref().unwrap_or("(no answer)"),
                exchange.outcome
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::MockSessionStore;
    use crate::domain::workflow::MockRagWorkflow;
    use crate::domain::{DomainError, RunOutcome};

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("/bye"), ReplCommand::Bye);
        assert_eq!(ReplCommand::parse("/QUIT"), ReplCommand::Bye);
        assert_eq!(ReplCommand::parse("/exit"), ReplCommand::Bye);
        assert_eq!(ReplCommand::parse("Bye"), ReplCommand::Bye);
        assert_eq!(ReplCommand::parse("/history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse("/clear"), ReplCommand::Clear);
        assert_eq!(ReplCommand::parse("/help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse("/unknown"), ReplCommand::Help);
        assert_eq!(
            ReplCommand::parse("  What is SCKS? "),
            ReplCommand::Ask("What is SCKS?".to_string())
        );
        assert_eq!(
            ReplCommand::parse("bye for now, what is SCKS?"),
            ReplCommand::Ask("bye for now, what is SCKS?".to_string())
        );
    }

    #[tokio::test]
    async fn test_session_records_history_and_ends() {
        let workflow = MockRagWorkflow::new(Some("Tuesdays."), RunOutcome::Ok);
        let store = InMemorySessionStore::new();
        let session = ChatSession::new(&workflow, &store, "s1");
        let input: &[u8] = b"When does SCKS meet?\n\n/history\n/bye\nnever asked\n";
        let mut out = Vec::new();

        session.run(input, &mut out).await.unwrap();

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("> Tuesdays.\n"));
        assert!(output.contains("1. Q: When does SCKS meet?"));
        assert!(output.contains("   A: Tuesdays. [ok]"));
        assert!(output.ends_with("Bye!\n"));
        assert_eq!(workflow.questions(), vec!["When does SCKS meet?"]);
        assert!(store.session_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_forgets_history() {
        let workflow = MockRagWorkflow::new(Some("answer"), RunOutcome::Ok);
        let store = InMemorySessionStore::new();
        let session = ChatSession::new(&workflow, &store, "s1");
        let mut out = Vec::new();

        session
            .handle(ReplCommand::Ask("q".to_string()), &mut out)
            .await
            .unwrap();
        assert_eq!(store.history("s1").await.unwrap().len(), 1);

        session.handle(ReplCommand::Clear, &mut out).await.unwrap();
        session.handle(ReplCommand::History, &mut out).await.unwrap();

        assert!(store.history("s1").await.unwrap().is_empty());
        assert!(String::from_utf8(out).unwrap().ends_with("No questions asked yet.\n"));
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let workflow = MockRagWorkflow::new(Some("answer"), RunOutcome::Ok);
        let mut store = MockSessionStore::new();
        store.expect_history().returning(|_| Ok(Vec::new()));
        store.expect_append().times(1).returning(|_, _| Ok(()));
        store.expect_end().times(1).returning(|_| Ok(true));
        let session = ChatSession::new(&workflow, &store, "s2");
        let input: &[u8] = b"q\n";

        session.run(input, &mut Vec::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_failure_does_not_stop_the_session() {
        let workflow = MockRagWorkflow::new(Some("answer"), RunOutcome::Ok);
        let mut store = MockSessionStore::new();
        store
            .expect_history()
            .returning(|_| Err(DomainError::internal("disk full")));
        store
            .expect_append()
            .returning(|_, _| Err(DomainError::internal("disk full")));
        let session = ChatSession::new(&workflow, &store, "s1");
        let mut out = Vec::new();

        let keep_going = session
            .handle(ReplCommand::Ask("q".to_string()), &mut out)
            .await
            .unwrap();

        assert!(keep_going);
        assert_eq!(String::from_utf8(out).unwrap(), "answer\n");
    }

    #[tokio::test]
    async fn test_workflow_error_is_printed() {
        let workflow = MockRagWorkflow::new(Some("answer"), RunOutcome::Ok);
        let store = InMemorySessionStore::new();
        let session = ChatSession::new(&workflow, &store, "s1");
        let mut out = Vec::new();

        session
            .handle(ReplCommand::Ask(" ".to_string()), &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: question is empty\n"
        );
    }

    #[tokio::test]
    async fn test_follow_up_carries_earlier_turns() {
        let workflow = MockRagWorkflow::new(Some("Tuesdays."), RunOutcome::Ok);
        let store = InMemorySessionStore::new();
        let session = ChatSession::new(&workflow, &store, "s1");
        let input: &[u8] = b"When does SCKS meet?\nAnd where?\n/bye\n";

        session.run(input, &mut Vec::new()).await.unwrap();

        let histories = workflow.histories();
        assert_eq!(histories.len(), 2);
        assert!(histories[0].is_empty());
        assert_eq!(histories[1].len(), 1);
        assert_eq!(histories[1][0].question, "When does SCKS meet?");
        assert_eq!(histories[1][0].answer.as_deref(), Some("Tuesdays."));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_leaked() {
        let workflow = MockRagWorkflow::new(None, RunOutcome::UpstreamFailure);
        let store = InMemorySessionStore::new();
        let session = ChatSession::new(&workflow, &store, "s1");
        let mut out = Vec::new();

        session
            .handle(ReplCommand::Ask("q".to_string()), &mut out)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            format!("Error: {}\n", UNAVAILABLE)
        );
    }
}
