use anyhow::{Context, Result};
use tera::{Context as TeraContext, Tera};

#[derive(Debug, Clone)]
pub struct PromptInput {
    pub request: String,
    pub dialect: String,
    pub comment_leader: String,
    pub buffer_name: String,
    pub working_dir: String,
    pub visible_lines: Vec<String>,
}

pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT_TEMPLATE: &str = include_str!("prompts/system_prompt.tera");
const USER_PROMPT_TEMPLATE: &str = include_str!("prompts/user_prompt.tera");

pub fn render(input: &PromptInput) -> Result<RenderedPrompt> {
    let mut context = TeraContext::new();
    context.insert("dialect", &input.dialect);
    context.insert("comment_leader", &input.comment_leader);

    let system = Tera::one_off(SYSTEM_PROMPT_TEMPLATE, &context, false)
        .with_context(|| "failed to render system prompt")?;

    context.insert("request", &input.request);
    context.insert("buffer_name", &input.buffer_name);
    context.insert("working_dir", &input.working_dir);
    context.insert("visible_lines", &input.visible_lines);

    let user = Tera::one_off(USER_PROMPT_TEMPLATE, &context, false)
        .with_context(|| "failed to render user prompt")?;

    Ok(RenderedPrompt { system, user })
}
