use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

use crate::model::Priority;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "taskboard",
    about = "A minimal in-memory task board."
)]
pub struct CommandLineArgs {
    /// Use a different settings file.
    #[structopt(parse(from_os_str), short, long)]
    pub config_file: Option<PathBuf>,

    /// Write logs (see RUST_LOG) to this file.
    #[structopt(parse(from_os_str), short, long)]
    pub log_file: Option<PathBuf>,
}

/// A command typed at the board prompt.
#[derive(Debug, PartialEq, StructOpt)]
#[structopt(
    name = "",
    no_version,
    global_settings = &[
        AppSettings::NoBinaryName,
        AppSettings::ColorNever,
        AppSettings::DisableVersion,
        AppSettings::VersionlessSubcommands,
    ]
)]
pub enum ShellCommand {
    /// Create a new task.
    Add {
        /// The task title.
        #[structopt()]
        title: Vec<String>,

        /// High, Medium or Low.
        #[structopt(short, long)]
        priority: Option<Priority>,

        /// Estimated time in minutes.
        #[structopt(short, long, allow_hyphen_values = true)]
        minutes: Option<String>,
    },
    /// Mark the task at a position as done, or as pending again.
    #[structopt(alias = "toggle")]
    Done {
        #[structopt()]
        position: usize,
    },
    /// Delete the task at a position.
    Rm {
        #[structopt()]
        position: usize,
    },
    /// Show the tasks and the statistics.
    List,
    /// Show the statistics only.
    Stats,
    /// Leave the board.
    #[structopt(alias = "exit")]
    Quit,
}

impl ShellCommand {
    /// Parse the words of one prompt line.
    pub fn from_words(words: &[String]) -> Result<Self, structopt::clap::Error> {
        ShellCommand::from_iter_safe(words)
    }
}
