use anyhow::Result;

use crate::agent::ActionAgent;
use crate::cli::Cli;
use crate::editor::NvimEditor;
use crate::engine;
use crate::error::AgentError;
use crate::interactive;
use crate::llm;
use crate::pipeline;

pub async fn run(cli: Cli) -> Result<()> {
    if cli.list_engines {
        for id in engine::engine_ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let dialect = pipeline::dialect_by_name(&cli.dialect).ok_or_else(|| {
        AgentError::Configuration(format!("unknown dialect '{}'", cli.dialect))
    })?;
    let spec = engine::lookup_engine(&cli.engine)?;
    let api_key = engine::resolve_key(spec.provider, cli.key.as_deref())?;
    let provider = llm::build_provider(spec, api_key);

    // Fail fast before any completion call when the editor is unreachable.
    let nvim = NvimEditor::connect(&cli.addr).await?;

    let agent = ActionAgent::new(provider, *dialect, !cli.quiet);
    eprintln!("Using engine {} ({})", spec.id, agent.model_name());

    if let Some(request) = cli.once.as_deref() {
        let outcome = agent.execute(request, &nvim).await?;
        println!();
        println!("{} statement(s) applied", outcome.dispatched);
        return Ok(());
    }

    interactive::run_interactive(&agent, &nvim).await
}
