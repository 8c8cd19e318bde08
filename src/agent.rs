use std::io::{self, Write};

use anyhow::Result;
use futures::StreamExt;
use tracing::debug;

use crate::editor::Editor;
use crate::llm::{ChatMessage, CompletionProvider, DeltaStream};
use crate::pipeline::{
    CodeBlockExtractor, DispatchOutcome, ScriptDialect, StatementSegmenter, dispatch,
};
use crate::prompt::{self, PromptInput};

/// Requested as a provider-side stop sequence so generation halts at or
/// before the closing fence. The extractor still handles the fence arriving
/// in-band.
const FENCE_STOP: &str = "```";

/// Runs one dispatch session per request: prompt assembly, streaming
/// completion, fence extraction, segmentation, and ordered dispatch to the
/// editor. Holds no state across requests.
pub struct ActionAgent {
    provider: Box<dyn CompletionProvider>,
    dialect: ScriptDialect,
    echo: bool,
}

impl ActionAgent {
    pub fn new(provider: Box<dyn CompletionProvider>, dialect: ScriptDialect, echo: bool) -> Self {
        Self {
            provider,
            dialect,
            echo,
        }
    }

    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Translate the request into editor commands and apply them as they
    /// stream in. Statements already applied when an error occurs stay
    /// applied.
    pub async fn execute(&self, request: &str, editor: &dyn Editor) -> Result<DispatchOutcome> {
        let rendered = prompt::render(&PromptInput {
            request: request.to_string(),
            dialect: self.dialect.name.to_string(),
            comment_leader: self.dialect.comment_leader.to_string(),
            buffer_name: editor.buffer_name().await?,
            working_dir: editor.working_dir().await?,
            visible_lines: editor.visible_lines().await?,
        })?;
        let messages = [
            ChatMessage::system(rendered.system),
            ChatMessage::user(rendered.user),
        ];

        let deltas = self.provider.stream(&messages, Some(FENCE_STOP)).await?;
        let chunks = CodeBlockExtractor::new(deltas);
        let chunks: DeltaStream = if self.echo {
            Box::pin(chunks.inspect(|chunk| {
                if let Ok(text) = chunk {
                    print!("{text}");
                    let _ = io::stdout().flush();
                }
            }))
        } else {
            Box::pin(chunks)
        };
        let statements = StatementSegmenter::new(chunks, self.dialect);

        let outcome = dispatch(statements, editor).await?;
        debug!(dispatched = outcome.dispatched, "dispatch session finished");
        Ok(outcome)
    }

    /// Plain streamed chat: the answer goes to stdout, the editor is never
    /// touched.
    pub async fn chat(&self, request: &str) -> Result<()> {
        let messages = [ChatMessage::user(request.to_string())];
        let mut deltas = self.provider.stream(&messages, None).await?;
        while let Some(delta) = deltas.next().await {
            print!("{}", delta?);
            let _ = io::stdout().flush();
        }
        println!();
        Ok(())
    }
}
