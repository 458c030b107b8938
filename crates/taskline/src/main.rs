//! CLI entry point for taskline.

use std::io::{self, BufRead};

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::{Reply, Session};
use config::AppConfig;
use ui::Ui;

mod commands;
mod config;
mod ui;

/// Chat-style task tracking from a single flat file.
#[derive(Parser, Debug)]
#[command(
    name = "taskline",
    version,
    about = "taskline: todos, deadlines and events tracked from your terminal"
)]
struct Cli {
    /// Directory for the task data file (overrides the configured
    /// location).
    #[arg(long)]
    data_dir: Option<String>,
}

fn main() -> Result<()> {
    let Cli { data_dir } = Cli::parse();
    install_tracing();

    let config = AppConfig::load(".")?;
    let dir = config.storage.data_dir(data_dir);
    let file = config.storage.file;

    let ui = Ui;
    ui.show_welcome();

    let mut session = match Session::open(&dir, &file) {
        Ok(session) => session,
        Err(err) => {
            warn!(error = %err, "storage unavailable; continuing without persistence");
            ui.show_storage_error();
            Session::in_memory()
        }
    };

    let stdin = io::stdin();
    run(&mut session, ui, stdin.lock())
}

/// Read one command per line until `bye` or end of input. The input
/// handle is passed in by value and dropped when the loop exits.
fn run(session: &mut Session, ui: Ui, input: impl BufRead) -> Result<()> {
    for line in input.lines() {
        let line = line?;
        let outcome = session.handle_line(&line);
        match outcome.reply {
            Reply::Message(text) => ui.show_message(&text),
            Reply::Error(text) => ui.show_error(&text),
            Reply::List(tasks) => ui.show_list(&tasks),
            Reply::Matches(matches) => ui.show_matches(&matches),
            Reply::Exit => {
                ui.show_goodbye();
                return Ok(());
            }
        }
        if outcome.storage_failed {
            ui.show_storage_error();
        }
    }
    Ok(())
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
