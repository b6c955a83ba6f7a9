use std::io::{self, Write};

use serde::Serialize;
use todotxt_core::commands::Report;
use todotxt_core::line::Task;
use todotxt_core::query::Listing;
use todotxt_core::store::{DepriOutcome, DoneOutcome};
use todotxt_render::Renderer;

use crate::help;

pub fn print_report<W: Write>(
    out: &mut W,
    report: &Report,
    renderer: &Renderer<'_>,
) -> io::Result<()> {
    match report {
        Report::Added(task) => {
            writeln!(out, "--\nTODO:\tAdded new task\n\t{}", renderer.render(task))?;
            writeln!(out, "--")?;
        }
        Report::Done(outcomes) => {
            writeln!(out, "--\nTODO:")?;
            for outcome in outcomes {
                match outcome {
                    DoneOutcome::Marked(task) => {
                        writeln!(out, "\tMarked done: {}", renderer.render(task))?
                    }
                    DoneOutcome::AlreadyDone(task) => {
                        writeln!(out, "\tAlready done: {}", renderer.render(task))?
                    }
                }
            }
            writeln!(out, "--")?;
        }
        Report::Deprioritised(outcomes) => {
            writeln!(out, "--\nTODO:")?;
            for outcome in outcomes {
                match outcome {
                    DepriOutcome::Deprioritised(task) => {
                        writeln!(out, "\tDeprioritised: {}", renderer.render(task))?
                    }
                    DepriOutcome::Completed(task) => {
                        writeln!(out, "\tERROR: Task completed: {}", renderer.render(task))?
                    }
                    DepriOutcome::NoPriority(task) => {
                        writeln!(out, "\tERROR: No priority: {}", renderer.render(task))?
                    }
                }
            }
            writeln!(out, "--")?;
        }
        Report::PrioritySet(task) => {
            writeln!(out, "--\nTODO:\tTask priority set.\n\t{}", renderer.render(task))?;
            writeln!(out, "--")?;
        }
        Report::Deleted(tasks) => {
            writeln!(out, "--\nTODO:")?;
            for task in tasks {
                writeln!(out, "\tDeleted task: {}", renderer.render(task))?;
            }
            writeln!(out, "--")?;
        }
        Report::Archived(tasks) => {
            writeln!(out, "--\nTODO:\tThe following tasks have been archived:")?;
            for task in tasks {
                writeln!(out, "\t{}", renderer.render(task))?;
            }
            writeln!(out, "--")?;
        }
        Report::Listed => {}
        Report::Help => write!(out, "{}", help::LONG_HELP)?,
        Report::ShortHelp => write!(out, "{}", help::SHORT_HELP)?,
    }
    Ok(())
}

pub fn print_listing<W: Write>(
    out: &mut W,
    listing: &Listing,
    renderer: &Renderer<'_>,
) -> io::Result<()> {
    for entry in &listing.entries {
        writeln!(out, "{}", renderer.render(&entry.numbered))?;
    }
    writeln!(out, "--\nTODO:\t{}", listing.summary())
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    number: usize,
    line: &'a str,
    #[serde(flatten)]
    task: Task,
    projects: Vec<String>,
    contexts: Vec<String>,
}

pub fn print_json<W: Write>(out: &mut W, listing: &Listing) -> anyhow::Result<()> {
    let payload: Vec<JsonEntry<'_>> = listing
        .entries
        .iter()
        .map(|entry| {
            let task = Task::parse(&entry.text);
            let projects = task.projects().into_iter().map(str::to_string).collect();
            let contexts = task.contexts().into_iter().map(str::to_string).collect();
            JsonEntry {
                number: entry.number,
                line: &entry.text,
                task,
                projects,
                contexts,
            }
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)?;
    Ok(())
}
