use clap::Parser;

use crate::engine;

#[derive(Debug, Parser)]
#[command(
    name = "nvim-agent",
    version,
    about = "LLM-powered streaming editing agent for Neovim"
)]
pub struct Cli {
    /// Engine id from the registry (see --list-engines)
    #[arg(short = 'e', long = "engine", default_value = engine::DEFAULT_ENGINE)]
    pub engine: String,

    /// API key (overrides environment variable)
    #[arg(short = 'k', long = "key")]
    pub key: Option<String>,

    /// Neovim msgpack-RPC TCP address (nvim --listen <addr>)
    #[arg(long = "addr", default_value = "127.0.0.1:7777")]
    pub addr: String,

    /// Destination scripting dialect
    #[arg(long = "dialect", default_value = "vim")]
    pub dialect: String,

    /// Run a single request and exit
    #[arg(long = "once")]
    pub once: Option<String>,

    /// Do not echo generated code while it streams
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// List registered engine ids and exit
    #[arg(long = "list-engines")]
    pub list_engines: bool,
}
