use anyhow::Result;
use rustyline::error::ReadlineError;

use crate::agent::ActionAgent;
use crate::editor::Editor;
use crate::interactive::{handle_request, is_exit_command};

pub async fn run(agent: &ActionAgent, editor: &dyn Editor) -> Result<()> {
    let mut readline = rustyline::DefaultEditor::new()?;
    loop {
        match readline.readline("> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                let _ = readline.add_history_entry(input);
                if is_exit_command(input) {
                    println!("Good Bye!");
                    break;
                }

                if let Err(err) = handle_request(agent, editor, input).await {
                    eprintln!("error: {err}");
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("Good Bye!");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}
