use anyhow::{Context, Result};
use humantime::format_duration;
use log::{debug, warn};
use prettytable::{format, Cell, Row, Table};
use std::io::{BufRead, Write};
use std::time::Duration as STDDuration;
use structopt::clap::ErrorKind;

use crate::cli::ShellCommand;
use crate::config::Settings;
use crate::model::{Priority, Task, TaskStore, ValidationError};
use crate::stats::{self, Stats};

const PROMPT: &str = "> ";
const EMPTY_BOARD: &str = "No tasks yet. Use 'add' to begin.";

/// What the loop should do after a command.
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until `quit` or end of input, applying
/// each one to `store` and redrawing the board after every change.
pub fn run<R: BufRead, W: Write>(
    store: &mut TaskStore,
    settings: &Settings,
    input: R,
    out: &mut W,
) -> Result<()> {
    render_board(store, settings, out)?;
    write!(out, "{}", PROMPT)?;
    out.flush()?;

    for line in input.lines() {
        let line = line.context("Failed to read command.")?;
        if dispatch(store, settings, &line, out)? == Flow::Quit {
            return Ok(());
        }
        write!(out, "{}", PROMPT)?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn dispatch<W: Write>(
    store: &mut TaskStore,
    settings: &Settings,
    line: &str,
    out: &mut W,
) -> Result<Flow> {
    let words = match shell_words::split(line) {
        Ok(words) => words,
        Err(err) => {
            warn!("unparsable line {:?}: {}", line, err);
            writeln!(out, "Could not read command: {}", err)?;
            return Ok(Flow::Continue);
        }
    };
    if words.is_empty() {
        return Ok(Flow::Continue);
    }

    let command = match ShellCommand::from_words(&words) {
        Ok(command) => command,
        Err(err) => {
            if !matches!(err.kind, ErrorKind::HelpDisplayed) {
                warn!("rejected command {:?}", line);
            }
            writeln!(out, "{}", err.message)?;
            return Ok(Flow::Continue);
        }
    };
    debug!("{:?}", command);

    match command {
        ShellCommand::Add {
            title,
            priority,
            minutes,
        } => {
            let priority = priority.unwrap_or(settings.default_priority);
            let minutes = minutes.unwrap_or_else(|| settings.default_minutes.to_string());
            add_task(store, settings, &title.join(" "), priority, &minutes, out)?
        }
        ShellCommand::Done { position } => toggle_task(store, settings, position, out)?,
        ShellCommand::Rm { position } => remove_task(store, settings, position, out)?,
        ShellCommand::List => render_board(store, settings, out)?,
        ShellCommand::Stats => render_stats(&stats::compute(store), out)?,
        ShellCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn add_task<W: Write>(
    store: &mut TaskStore,
    settings: &Settings,
    title: &str,
    priority: Priority,
    minutes: &str,
    out: &mut W,
) -> Result<()> {
    match store.create(title, priority, minutes) {
        Ok(_) => render_board(store, settings, out),
        Err(err) => {
            warn!("task rejected: {:?}", err);
            let heading = match err {
                ValidationError::EmptyTitle => "Missing",
                ValidationError::InvalidTime(_) => "Invalid",
            };
            writeln!(out, "{}: {}", heading, err)?;
            Ok(())
        }
    }
}

fn toggle_task<W: Write>(
    store: &mut TaskStore,
    settings: &Settings,
    position: usize,
    out: &mut W,
) -> Result<()> {
    match store.id_at(position) {
        Some(id) => {
            store.toggle(id);
            render_board(store, settings, out)
        }
        None => no_task_at(position, out),
    }
}

fn remove_task<W: Write>(
    store: &mut TaskStore,
    settings: &Settings,
    position: usize,
    out: &mut W,
) -> Result<()> {
    match store.id_at(position) {
        Some(id) => {
            store.remove(id);
            render_board(store, settings, out)
        }
        None => no_task_at(position, out),
    }
}

fn no_task_at<W: Write>(position: usize, out: &mut W) -> Result<()> {
    warn!("no task at position {}", position);
    writeln!(out, "No task at position {}.", position)?;
    Ok(())
}

/// Draw the statistics box followed by the task table.
fn render_board<W: Write>(store: &TaskStore, settings: &Settings, out: &mut W) -> Result<()> {
    render_stats(&stats::compute(store), out)?;

    if store.is_empty() {
        writeln!(out, "{}", EMPTY_BOARD)?;
        return Ok(());
    }

    let mut table = Table::new();
    table.set_titles(row!["#", "done", "task", "created", "completed"]);
    for (index, task) in store.iter().enumerate() {
        table.add_row(task_row(index + 1, task, settings.title_width));
    }
    table.print(out)?;
    Ok(())
}

fn task_row(position: usize, task: &Task, title_width: usize) -> Row {
    let checkbox = if task.is_completed() { "[x]" } else { "[ ]" };
    let text = format!(
        "{}\n{} priority | {} min",
        textwrap::fill(task.title(), title_width.max(1)),
        task.priority(),
        task.minutes()
    );
    let completed = task
        .completed_at()
        .map(|at| at.format("%T").to_string())
        .unwrap_or_default();

    let cells = vec![
        position.to_string(),
        checkbox.to_string(),
        text,
        task.created_at().format("%T").to_string(),
        completed,
    ];
    Row::new(cells.iter().map(|content| Cell::new(content)).collect())
}

fn render_stats<W: Write>(stats: &Stats, out: &mut W) -> Result<()> {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(row![c => "Pending", "Completed", "Total Time", "Done %"]);
    table.add_row(row![c =>
        stats.pending,
        stats.completed,
        fmt_total_time(stats.total_time),
        format!("{}%", stats.done_percent)
    ]);
    table.print(out)?;
    Ok(())
}

fn fmt_total_time(minutes: i64) -> String {
    if minutes > 0 {
        let readable = format_duration(STDDuration::from_secs((minutes as u64).saturating_mul(60)));
        format!("{} min ({})", minutes, readable)
    } else {
        format!("{} min", minutes)
    }
}
