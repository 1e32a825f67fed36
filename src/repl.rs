use crate::session::{Outcome, Session};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;

const PROMPT: &str = ">> ";

const MONKEY_FACE: &str = r#"            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;

/// Reads lines until end of input, evaluating each against the same session.
pub fn start(mut session: Session) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                if line.trim() == "exit" {
                    break;
                }
                if line.trim().is_empty() {
                    continue;
                }

                let _ = editor.add_history_entry(line.as_str());
                match session.run(&line) {
                    Ok(outcome) => print_outcome(outcome),
                    Err(err) => eprintln!("ERROR: {}", err),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        }
    }

    info!("repl finished");
    Ok(())
}

pub fn print_outcome(outcome: Outcome) {
    match outcome {
        Outcome::Diagnostics(errors) => print_parser_errors(&errors),
        Outcome::Value(obj) => println!("{}", obj),
        Outcome::Nothing => {}
    }
}

fn print_parser_errors(errors: &[String]) {
    print!("{}", MONKEY_FACE);
    println!("Woops! We ran into some monkey business here!");
    println!(" parser errors:");
    for error in errors {
        println!("\t{}", error);
    }
}
