use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use rustyline::{DefaultEditor, error::ReadlineError};
use sqlpeek::{
    commands::{Command, execute},
    storage::{config::ReaderConfig, database::Database},
};
use tracing_subscriber::EnvFilter;

const HISTORY_FILE: &str = ".sqlpeek_history";

/// Inspect the pages and records of an SQLite database file.
#[derive(Debug, Parser)]
#[command(name = "sqlpeek", version)]
struct Cli {
    /// Path to the database file
    database: PathBuf,

    /// Dot-command to run, e.g. `.dbinfo` or `.rows apples`; starts a shell when omitted
    command: Vec<String>,

    /// Log every decoded cell
    #[arg(long)]
    trace: bool,
}

fn init_logging(trace: bool) {
    let default_filter = if trace { "sqlpeek=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_multiline_command(rl: &mut DefaultEditor) -> rustyline::Result<String> {
    let mut input = String::new();
    let mut prompt = "sqlpeek> ";

    loop {
        let line = rl.readline(prompt)?;
        let trimmed_line = line.trim_end();

        if let Some(continued) = trimmed_line.strip_suffix('\\') {
            input.push_str(continued);
            input.push(' ');
            prompt = "     ...> ";
        } else {
            input.push_str(trimmed_line);
            break;
        }
    }

    Ok(input)
}

/// Runs one line of input; returns `false` when the session should end.
fn process_command(database: &mut Database, line: &str) -> bool {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = Command::parse(line).and_then(|command| execute(database, &command, &mut out));
    let _ = out.flush();
    match result {
        Ok(keep_going) => keep_going,
        Err(e) => {
            eprintln!("Error: {}", e);
            true
        }
    }
}

fn run_shell(database: &mut Database) -> rustyline::Result<()> {
    let mut rl = DefaultEditor::new()?;
    let _ = rl.load_history(HISTORY_FILE);

    loop {
        match read_multiline_command(&mut rl) {
            Ok(input) => {
                let command = input.trim();
                if command.is_empty() {
                    continue;
                }
                rl.add_history_entry(command)?;
                if !process_command(database, command) {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }

    rl.save_history(HISTORY_FILE)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.trace);

    let config = ReaderConfig::default().with_trace_cells(cli.trace);
    let mut database = match Database::open_with_config(&cli.database, config) {
        Ok(database) => database,
        Err(e) => {
            eprintln!("Error: {}: {}", cli.database.display(), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.command.is_empty() {
        return match run_shell(&mut database) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let line = cli.command.join(" ");
    let mut out = std::io::stdout().lock();
    match Command::parse(&line).and_then(|command| execute(&mut database, &command, &mut out)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
