use futures::{Stream, StreamExt};
use tracing::trace;

use crate::editor::Editor;
use crate::error::AgentError;

#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOutcome {
    pub dispatched: usize,
}

/// Feed each finalized statement to the editor, one at a time, in source
/// order. The editor's input channel is a serialized resource: the next
/// statement is not pulled until the previous submission call returned. A
/// failed submission abandons the rest of the sequence; statements already
/// applied are not undone.
pub async fn dispatch<S>(mut statements: S, editor: &dyn Editor) -> Result<DispatchOutcome, AgentError>
where
    S: Stream<Item = Result<String, AgentError>> + Unpin,
{
    let mut outcome = DispatchOutcome::default();
    while let Some(statement) = statements.next().await {
        let statement = statement?;
        trace!(statement = statement.as_str(), "feeding editor input");
        editor.feed_input(&statement).await?;
        outcome.dispatched += 1;
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::mock::RecordingEditor;
    use futures::stream;

    fn statements(items: &[&str]) -> impl Stream<Item = Result<String, AgentError>> + Unpin {
        stream::iter(
            items
                .iter()
                .map(|item| Ok(item.to_string()))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn dispatches_in_source_order() {
        let editor = RecordingEditor::new();
        let outcome = dispatch(statements(&["dd", "5Gdd", ":w<CR>"]), &editor)
            .await
            .expect("dispatch succeeds");
        assert_eq!(outcome.dispatched, 3);
        assert_eq!(editor.recorded(), vec!["dd", "5Gdd", ":w<CR>"]);
    }

    #[tokio::test]
    async fn halts_on_first_submission_failure() {
        let editor = RecordingEditor::failing_on(2);
        let err = dispatch(statements(&["dd", ":%d<CR>", "p"]), &editor)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EditorSubmission(_)));
        // the first statement stays applied, the third is never attempted
        assert_eq!(editor.recorded(), vec!["dd"]);
    }

    #[tokio::test]
    async fn propagates_upstream_errors_without_further_dispatch() {
        let editor = RecordingEditor::new();
        let source = stream::iter(vec![
            Ok("dd".to_string()),
            Err(AgentError::ProviderTransport("mid-stream".into())),
            Ok("never".to_string()),
        ]);
        let err = dispatch(source, &editor).await.unwrap_err();
        assert!(matches!(err, AgentError::ProviderTransport(_)));
        assert_eq!(editor.recorded(), vec!["dd"]);
    }

    #[tokio::test]
    async fn empty_sequence_touches_nothing() {
        let editor = RecordingEditor::new();
        let outcome = dispatch(statements(&[]), &editor).await.expect("empty ok");
        assert_eq!(outcome.dispatched, 0);
        assert!(editor.recorded().is_empty());
    }
}
