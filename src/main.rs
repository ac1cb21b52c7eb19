#[macro_use]
extern crate prettytable;

use anyhow::Context;
use log::info;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use structopt::StructOpt;

mod cli;
mod config;
mod interface;
mod model;
mod stats;

use cli::CommandLineArgs;
use model::TaskStore;

fn default_log_file() -> Option<PathBuf> {
    config::project_dirs().map(|dirs| dirs.data_local_dir().join("taskboard.log"))
}

/// Send log records to a file so they never mix with the board. When
/// no file location is known, logs go to stderr.
fn setup_logging(log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::from_default_env();

    if let Some(path) = log_file.or_else(default_log_file) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create log directory.")?;
        }
        let target = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}.", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(target)));
    }

    builder.init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Get the command-line arguments.
    let CommandLineArgs {
        config_file,
        log_file,
    } = CommandLineArgs::from_args();

    setup_logging(log_file)?;
    let settings = config::load_settings(config_file.as_deref())?;
    info!("starting with {:?}", settings);

    // The board lives only as long as this session.
    let mut store = TaskStore::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    interface::run(&mut store, &settings, stdin.lock(), &mut stdout.lock())?;

    info!("leaving with {} tasks", store.len());
    Ok(())
}
