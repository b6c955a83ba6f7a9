use chrono::NaiveDate;
use tracing::debug;

use crate::action::Action;
use crate::error::TodoError;
use crate::store::{DepriOutcome, DoneOutcome, TodoStore};

/// What a command did, ready for the CLI to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Added(String),
    Done(Vec<DoneOutcome>),
    Deprioritised(Vec<DepriOutcome>),
    PrioritySet(String),
    Deleted(Vec<String>),
    Archived(Vec<String>),
    Listed,
    Help,
    ShortHelp,
}

/// Runs `action` against the store. Mutating actions persist the list before returning;
/// a failed action leaves both files untouched.
pub fn execute(
    store: &mut TodoStore,
    action: &Action,
    today: NaiveDate,
) -> Result<Report, TodoError> {
    debug!(?action, "executing action");
    let report = match action {
        Action::Add(text) => Report::Added(store.add(text, today)),
        Action::Do(items) => Report::Done(store.mark_done(items, today)?),
        Action::Deprioritize(items) => Report::Deprioritised(store.deprioritize(items)?),
        Action::Priority { item, priority } => {
            Report::PrioritySet(store.set_priority(*item, *priority)?)
        }
        Action::Delete(items) => Report::Deleted(store.delete(items)?),
        Action::Archive => Report::Archived(store.archive()?),
        Action::List(_) => Report::Listed,
        Action::Help => Report::Help,
        Action::ShortHelp => Report::ShortHelp,
    };
    if action.is_mutating() {
        store.save()?;
    }
    Ok(report)
}
