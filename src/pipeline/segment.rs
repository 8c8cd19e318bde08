use std::pin::Pin;
use std::task::{Context, Poll, ready};

use futures::Stream;

use crate::error::AgentError;

use super::dialect::ScriptDialect;

/// Splits the extracted code stream into dispatchable statements.
///
/// Incoming chunks collect in a pending buffer until a newline makes a
/// candidate line complete; the dialect policy then drops comments and blank
/// lines and rewrites command-mode lines. A trailing line with no
/// terminating newline is discarded at end of stream, never dispatched.
pub struct StatementSegmenter<S> {
    chunks: S,
    dialect: ScriptDialect,
    pending: String,
    done: bool,
}

impl<S> StatementSegmenter<S> {
    pub fn new(chunks: S, dialect: ScriptDialect) -> Self {
        Self {
            chunks,
            dialect,
            pending: String::new(),
            done: false,
        }
    }
}

impl<S> Stream for StatementSegmenter<S>
where
    S: Stream<Item = Result<String, AgentError>> + Unpin,
{
    type Item = Result<String, AgentError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if let Some(statement) = next_complete_statement(&mut this.pending, &this.dialect) {
                return Poll::Ready(Some(Ok(statement)));
            }
            if this.done {
                return Poll::Ready(None);
            }
            match ready!(Pin::new(&mut this.chunks).poll_next(cx)) {
                Some(Ok(chunk)) => this.pending.push_str(&chunk),
                Some(Err(err)) => {
                    this.done = true;
                    this.pending.clear();
                    return Poll::Ready(Some(Err(err)));
                }
                None => {
                    this.done = true;
                    this.pending.clear();
                    return Poll::Ready(None);
                }
            }
        }
    }
}

fn next_complete_statement(pending: &mut String, dialect: &ScriptDialect) -> Option<String> {
    while let Some(idx) = pending.find('\n') {
        let candidate = pending[..idx].to_string();
        pending.drain(..=idx);
        if let Some(statement) = dialect.prepare(&candidate) {
            return Some(statement);
        }
    }
    None
}
