use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::agent::ActionAgent;
use crate::editor::Editor;
use crate::interactive::{handle_request, is_exit_command};

pub async fn run(agent: &ActionAgent, editor: &dyn Editor) -> Result<()> {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    let mut line = String::new();
    loop {
        line.clear();
        print!("> ");
        io::stdout().flush()?;
        if lock.read_line(&mut line)? == 0 {
            println!("Good Bye!");
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if is_exit_command(input) {
            println!("Good Bye!");
            break;
        }

        if let Err(err) = handle_request(agent, editor, input).await {
            eprintln!("error: {err}");
        }
    }
    Ok(())
}
