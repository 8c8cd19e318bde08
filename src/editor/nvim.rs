use std::path::Path;

use futures::future::BoxFuture;
use nvim_rs::compat::tokio::Compat;
use nvim_rs::error::LoopError;
use nvim_rs::{Handler, Neovim};
use tokio::io::WriteHalf;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::AgentError;

use super::Editor;

type NvimWriter = Compat<WriteHalf<TcpStream>>;

/// Incoming requests and notifications from Neovim are ignored; the agent
/// only ever calls into the editor.
#[derive(Clone)]
struct NoopHandler;

impl Handler for NoopHandler {
    type Writer = NvimWriter;
}

/// A live Neovim instance reached over its msgpack-RPC TCP socket.
pub struct NvimEditor {
    nvim: Neovim<NvimWriter>,
    _io: JoinHandle<Result<(), Box<LoopError>>>,
}

impl NvimEditor {
    pub async fn connect(addr: &str) -> Result<Self, AgentError> {
        let (nvim, io) = nvim_rs::create::tokio::new_tcp(addr, NoopHandler)
            .await
            .map_err(|err| {
                AgentError::EditorUnavailable(format!(
                    "could not connect to {addr}: {err} (is Neovim listening? start it with --listen {addr})"
                ))
            })?;
        debug!(addr, "connected to Neovim");
        Ok(Self { nvim, _io: io })
    }

    async fn eval_number(&self, expr: &str) -> Result<i64, AgentError> {
        let value = self
            .nvim
            .eval(expr)
            .await
            .map_err(|err| AgentError::EditorUnavailable(format!("eval({expr}) failed: {err}")))?;
        value.as_i64().ok_or_else(|| {
            AgentError::EditorUnavailable(format!("eval({expr}) returned a non-number"))
        })
    }
}

impl Editor for NvimEditor {
    fn feed_input<'a>(&'a self, keys: &'a str) -> BoxFuture<'a, Result<(), AgentError>> {
        Box::pin(async move {
            self.nvim
                .input(keys)
                .await
                .map_err(|err| AgentError::EditorSubmission(err.to_string()))?;
            Ok(())
        })
    }

    fn visible_lines(&self) -> BoxFuture<'_, Result<Vec<String>, AgentError>> {
        Box::pin(async move {
            let first = self.eval_number("line('w0')").await?;
            let last = self.eval_number("line('w$')").await?;
            let buffer = self.nvim.get_current_buf().await.map_err(|err| {
                AgentError::EditorUnavailable(format!("get_current_buf failed: {err}"))
            })?;
            let lines = buffer
                .get_lines(first - 1, last, false)
                .await
                .map_err(|err| {
                    AgentError::EditorUnavailable(format!("get_lines failed: {err}"))
                })?;
            Ok(lines
                .into_iter()
                .enumerate()
                .map(|(offset, line)| format!("{:>4} {}", first + offset as i64, line))
                .collect())
        })
    }

    fn buffer_name(&self) -> BoxFuture<'_, Result<String, AgentError>> {
        Box::pin(async move {
            let buffer = self.nvim.get_current_buf().await.map_err(|err| {
                AgentError::EditorUnavailable(format!("get_current_buf failed: {err}"))
            })?;
            let name = buffer.get_name().await.map_err(|err| {
                AgentError::EditorUnavailable(format!("get_name failed: {err}"))
            })?;
            let cwd = self.working_dir().await?;
            let relative = Path::new(&name)
                .strip_prefix(&cwd)
                .map(|path| path.display().to_string())
                .unwrap_or(name);
            Ok(relative)
        })
    }

    fn working_dir(&self) -> BoxFuture<'_, Result<String, AgentError>> {
        Box::pin(async move {
            let value = self.nvim.eval("getcwd()").await.map_err(|err| {
                AgentError::EditorUnavailable(format!("eval(getcwd()) failed: {err}"))
            })?;
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| AgentError::EditorUnavailable("getcwd() returned a non-string".into()))
        })
    }
}
