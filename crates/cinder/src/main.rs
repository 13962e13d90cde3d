use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use cinder::config::Config;
use cinder::runner::{eval_input, run_file, ReplBuffer, ReplInput};
use cinder::{CinderError, Interpreter, InterpreterBuilder, Value};

#[derive(Parser)]
#[command(name = "cinder", version, about = "Cinder: a small Lisp with rationals and matrices")]
struct Cli {
    /// Program file to run
    file: Option<PathBuf>,

    /// Evaluate an expression and print the result
    #[arg(short, long)]
    eval: Option<String>,

    /// Start without the builtin catalogue
    #[arg(long)]
    no_stdlib: bool,

    /// REPL history file
    #[arg(long)]
    history: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `cinder_eval=trace`
    #[arg(long)]
    log: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let config = Config::from_env().with_overrides(cli.history, cli.log, cli.no_stdlib);

    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(cinder::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let interpreter = InterpreterBuilder::new().with_stdlib(config.stdlib).build();

    if let Some(expr) = &cli.eval {
        match interpreter.eval_str(expr) {
            Ok(val) => {
                if !matches!(val, Value::Nil) {
                    println!("{val}");
                }
            }
            Err(e) => exit_on_error(&e),
        }
        return;
    }

    if let Some(file) = &cli.file {
        match run_file(&interpreter, file, &mut std::io::stderr()) {
            Ok(report) if report.is_success() => {}
            Ok(_) => std::process::exit(1),
            Err(e) => exit_on_error(&e),
        }
        return;
    }

    if let Some(code) = repl(&interpreter, &config) {
        std::process::exit(code);
    }
}

/// Exit with the code of an `(exit n)` request, or report the error and exit with 1.
fn exit_on_error(error: &CinderError) -> ! {
    if let Some(code) = error.exit_code() {
        let _ = std::io::stdout().flush();
        std::process::exit(code);
    }
    eprintln!("Error: {error}");
    std::process::exit(1);
}

/// Run the interactive loop. Returns the code passed to `(exit n)`, if any.
fn repl(interpreter: &Interpreter, config: &Config) -> Option<i32> {
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Error: cannot start line editor: {e}");
            return Some(1);
        }
    };
    let _ = rl.load_history(&config.history_file);

    println!("Cinder v{}", env!("CARGO_PKG_VERSION"));
    println!("Type ,help for help, ,quit to exit\n");

    let mut buffer = ReplBuffer::new();
    let mut exit_code = None;

    loop {
        let prompt = if buffer.is_pending() {
            config.continuation_prompt.as_str()
        } else {
            config.prompt.as_str()
        };
        match rl.readline(prompt) {
            Ok(line) => {
                if !buffer.is_pending() {
                    match line.trim() {
                        ",quit" | ",exit" | ",q" => break,
                        ",help" | ",h" => {
                            print_help();
                            continue;
                        }
                        ",env" => {
                            print_env(interpreter);
                            continue;
                        }
                        _ => {}
                    }
                }

                let input = match buffer.push_line(&line) {
                    Ok(ReplInput::Complete(input)) => input,
                    Ok(ReplInput::Incomplete | ReplInput::Empty) => continue,
                    Err(e) => {
                        eprintln!("Error: {e}");
                        continue;
                    }
                };

                let _ = rl.add_history_entry(input.trim());

                match eval_input(interpreter, &input) {
                    Ok(values) => {
                        for val in values {
                            println!("{val}");
                        }
                    }
                    Err(e) if e.exit_code().is_some() => {
                        exit_code = e.exit_code();
                        break;
                    }
                    Err(e) => {
                        if e.is_bug() {
                            tracing::error!(error = %e, "interpreter bug");
                        }
                        eprintln!("Error: {e}");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                if buffer.is_pending() {
                    buffer.clear();
                    println!("^C");
                    continue;
                }
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {e}");
                break;
            }
        }
    }

    if let Some(dir) = config.history_file.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    if let Err(e) = rl.save_history(&config.history_file) {
        tracing::debug!(error = %e, "could not save history");
    }
    println!("Goodbye!");
    exit_code
}

fn print_help() {
    println!("Cinder REPL Commands:");
    println!("  ,quit / ,q    Exit the REPL");
    println!("  ,help / ,h    Show this help");
    println!("  ,env          Show user-defined bindings");
    println!();
    println!("Special Forms:");
    println!("  quote, quasiquote, if, cond, and, or, lambda, define, let, begin");
    println!();
    println!("Numbers:");
    println!("  (rational 1 3)             exact rational 1/3");
    println!("  (matrix '(1 2) '(3 4))     2x2 matrix; + - * work element-wise / as product");
}

fn print_env(interpreter: &Interpreter) {
    let env = interpreter.global_env();
    let user_bindings: Vec<(String, Value)> = env
        .local_names()
        .into_iter()
        .filter_map(|name| env.get_str(&name).map(|val| (name, val)))
        .filter(|(_, val)| !matches!(val, Value::Builtin(_)))
        .collect();
    if user_bindings.is_empty() {
        println!("(no user-defined bindings)");
    } else {
        for (name, val) in user_bindings {
            println!("  {name} = {val}");
        }
    }
}
