mod stdio_loop;
mod tty_loop;

use std::future::Future;
use std::io::{self, IsTerminal};
use std::pin::Pin;

use anyhow::Result;

use crate::agent::ActionAgent;
use crate::editor::Editor;

trait InteractiveBackend {
    fn run<'a>(
        &'a self,
        agent: &'a ActionAgent,
        editor: &'a dyn Editor,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
}

struct TtyBackend;
struct StdioBackend;

impl InteractiveBackend for TtyBackend {
    fn run<'a>(
        &'a self,
        agent: &'a ActionAgent,
        editor: &'a dyn Editor,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(tty_loop::run(agent, editor))
    }
}

impl InteractiveBackend for StdioBackend {
    fn run<'a>(
        &'a self,
        agent: &'a ActionAgent,
        editor: &'a dyn Editor,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        Box::pin(stdio_loop::run(agent, editor))
    }
}

pub async fn run_interactive(agent: &ActionAgent, editor: &dyn Editor) -> Result<()> {
    println!("Interactive mode. Type exit to finish; start with ? to chat without editing.");

    let backend: &dyn InteractiveBackend =
        if io::stdin().is_terminal() && io::stdout().is_terminal() {
            &TtyBackend
        } else {
            &StdioBackend
        };
    backend.run(agent, editor).await
}

pub fn is_exit_command(input: &str) -> bool {
    matches!(input, "exit" | "quit" | "/exit" | "/quit")
}

/// One request: a leading `?` streams a plain chat answer, anything else
/// runs a dispatch session against the editor. Per-request errors are
/// reported by the caller; the loop carries on with the next request.
pub(crate) async fn handle_request(
    agent: &ActionAgent,
    editor: &dyn Editor,
    input: &str,
) -> Result<()> {
    if let Some(question) = input.strip_prefix('?') {
        return agent.chat(question.trim()).await;
    }
    let outcome = agent.execute(input, editor).await?;
    println!();
    println!("{} statement(s) applied", outcome.dispatched);
    Ok(())
}
