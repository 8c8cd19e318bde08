pub mod agent;
pub mod app;
pub mod cli;
pub mod editor;
pub mod engine;
pub mod error;
pub mod interactive;
pub mod llm;
pub mod pipeline;
pub mod prompt;
