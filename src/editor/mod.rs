mod nvim;

use futures::future::BoxFuture;

use crate::error::AgentError;

pub use nvim::NvimEditor;

/// The live editor the agent drives. Input submission is fire-and-forget;
/// the introspection calls exist only to build the prompt.
pub trait Editor: Send + Sync {
    /// Submit raw input (keys or a terminated command-mode line) to the
    /// editor's input channel.
    fn feed_input<'a>(&'a self, keys: &'a str) -> BoxFuture<'a, Result<(), AgentError>>;

    /// The lines currently visible in the active window, each prefixed with
    /// a right-aligned four-column line number and one space.
    fn visible_lines(&self) -> BoxFuture<'_, Result<Vec<String>, AgentError>>;

    /// Name of the active buffer, relative to the working directory when
    /// possible.
    fn buffer_name(&self) -> BoxFuture<'_, Result<String, AgentError>>;

    fn working_dir(&self) -> BoxFuture<'_, Result<String, AgentError>>;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Records submitted input in order; optionally fails the n-th call.
    pub(crate) struct RecordingEditor {
        pub(crate) inputs: Mutex<Vec<String>>,
        pub(crate) fail_on: Option<usize>,
    }

    impl RecordingEditor {
        pub(crate) fn new() -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }

        pub(crate) fn failing_on(call: usize) -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                fail_on: Some(call),
            }
        }

        pub(crate) fn recorded(&self) -> Vec<String> {
            self.inputs.lock().expect("mock lock").clone()
        }
    }

    impl Editor for RecordingEditor {
        fn feed_input<'a>(&'a self, keys: &'a str) -> BoxFuture<'a, Result<(), AgentError>> {
            Box::pin(async move {
                let mut inputs = self.inputs.lock().expect("mock lock");
                if let Some(call) = self.fail_on
                    && inputs.len() + 1 == call
                {
                    return Err(AgentError::EditorSubmission("injected failure".into()));
                }
                inputs.push(keys.to_string());
                Ok(())
            })
        }

        fn visible_lines(&self) -> BoxFuture<'_, Result<Vec<String>, AgentError>> {
            Box::pin(async {
                Ok(vec![
                    "   1 fn main() {".to_string(),
                    "   2 }".to_string(),
                ])
            })
        }

        fn buffer_name(&self) -> BoxFuture<'_, Result<String, AgentError>> {
            Box::pin(async { Ok("demo.rs".to_string()) })
        }

        fn working_dir(&self) -> BoxFuture<'_, Result<String, AgentError>> {
            Box::pin(async { Ok("/tmp/demo".to_string()) })
        }
    }
}
