use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::TodoError;
use crate::line::{self, Priority, DATE_FORMAT};

pub const TODO_FILE: &str = "todo.txt";
pub const DONE_FILE: &str = "done.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoneOutcome {
    Marked(String),
    AlreadyDone(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepriOutcome {
    Deprioritised(String),
    Completed(String),
    NoPriority(String),
}

/// The primary task list held in memory between load and save.
///
/// Lines are kept in persistence order, which is also the display order, so a display
/// position `n` always names `lines[n - 1]` for the duration of one command.
#[derive(Debug, Clone)]
pub struct TodoStore {
    todo_path: PathBuf,
    done_path: PathBuf,
    lines: Vec<String>,
    loaded_count: usize,
}

impl TodoStore {
    pub fn load(todo_dir: &Path) -> Result<Self, TodoError> {
        let todo_path = todo_dir.join(TODO_FILE);
        let done_path = todo_dir.join(DONE_FILE);
        let mut lines = read_lines(&todo_path)?;
        lines.sort();
        debug!(path = %todo_path.display(), count = lines.len(), "loaded task list");
        Ok(Self {
            todo_path,
            done_path,
            loaded_count: lines.len(),
            lines,
        })
    }

    pub fn todo_path(&self) -> &Path {
        &self.todo_path
    }

    pub fn done_path(&self) -> &Path {
        &self.done_path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of tasks in the persisted list, used for the "K of N" summary.
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub fn range_check(&self, item: i64) -> Result<usize, TodoError> {
        if item < 1 || item > self.lines.len() as i64 {
            return Err(TodoError::OutOfRange(item));
        }
        Ok((item - 1) as usize)
    }

    fn resolve(&self, items: &[i64]) -> Result<Vec<usize>, TodoError> {
        items.iter().map(|item| self.range_check(*item)).collect()
    }

    pub fn add(&mut self, text: &str, today: NaiveDate) -> String {
        let task = format!("{} {}", today.format(DATE_FORMAT), text.trim());
        self.lines.push(task.clone());
        task
    }

    pub fn mark_done(
        &mut self,
        items: &[i64],
        today: NaiveDate,
    ) -> Result<Vec<DoneOutcome>, TodoError> {
        let indices = self.resolve(items)?;
        let mut outcomes = Vec::with_capacity(indices.len());
        for idx in indices {
            let task = &self.lines[idx];
            if line::is_completed(task) {
                outcomes.push(DoneOutcome::AlreadyDone(task.clone()));
                continue;
            }
            let done = line::mark_completed(task, today);
            self.lines[idx] = done.clone();
            outcomes.push(DoneOutcome::Marked(done));
        }
        Ok(outcomes)
    }

    pub fn deprioritize(&mut self, items: &[i64]) -> Result<Vec<DepriOutcome>, TodoError> {
        let indices = self.resolve(items)?;
        let mut outcomes = Vec::with_capacity(indices.len());
        for idx in indices {
            let task = &self.lines[idx];
            if line::is_completed(task) {
                outcomes.push(DepriOutcome::Completed(task.clone()));
                continue;
            }
            if line::parse_priority(task).is_none() {
                outcomes.push(DepriOutcome::NoPriority(task.clone()));
                continue;
            }
            let stripped = line::strip_priority(task).trim().to_string();
            self.lines[idx] = stripped.clone();
            outcomes.push(DepriOutcome::Deprioritised(stripped));
        }
        Ok(outcomes)
    }

    pub fn set_priority(&mut self, item: i64, priority: Priority) -> Result<String, TodoError> {
        let idx = self.range_check(item)?;
        let task = &self.lines[idx];
        if line::is_completed(task) {
            return Err(TodoError::TaskCompleted(task.clone()));
        }
        let updated = line::set_priority(task, priority);
        self.lines[idx] = updated.clone();
        Ok(updated)
    }

    /// Removes the given display positions. Repeated positions are removed once.
    pub fn delete(&mut self, items: &[i64]) -> Result<Vec<String>, TodoError> {
        let mut indices = self.resolve(items)?;
        indices.sort_unstable_by(|a, b| b.cmp(a));
        indices.dedup();
        Ok(indices
            .into_iter()
            .map(|idx| self.lines.remove(idx))
            .collect())
    }

    /// Moves completed tasks to the done file and returns them in the order written.
    ///
    /// The primary list is only changed in memory; callers persist it with [`save`].
    ///
    /// [`save`]: TodoStore::save
    pub fn archive(&mut self) -> Result<Vec<String>, TodoError> {
        let (mut completed, remaining): (Vec<String>, Vec<String>) = self
            .lines
            .iter()
            .cloned()
            .partition(|task| line::is_completed(task));
        if completed.is_empty() {
            return Err(TodoError::NothingToArchive);
        }
        completed.sort();

        let needs_separator = if self.done_path.exists() {
            backup(&self.done_path)?;
            let existing = fs::read_to_string(&self.done_path)?;
            !existing.is_empty() && !existing.ends_with('\n')
        } else {
            false
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.done_path)?;
        if needs_separator {
            file.write_all(b"\n")?;
        }
        for task in &completed {
            writeln!(file, "{}", task)?;
        }
        debug!(path = %self.done_path.display(), count = completed.len(), "archived tasks");

        self.lines = remaining;
        Ok(completed)
    }

    pub fn save(&mut self) -> Result<(), TodoError> {
        if self.todo_path.exists() {
            backup(&self.todo_path)?;
        }
        self.lines.sort();
        let mut body = String::new();
        for task in &self.lines {
            body.push_str(task);
            body.push('\n');
        }
        fs::write(&self.todo_path, body)?;
        self.loaded_count = self.lines.len();
        debug!(path = %self.todo_path.display(), count = self.lines.len(), "saved task list");
        Ok(())
    }
}

pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("bak")
}

fn backup(path: &Path) -> Result<PathBuf, TodoError> {
    let target = backup_path(path);
    fs::copy(path, &target)?;
    Ok(target)
}

fn read_lines(path: &Path) -> Result<Vec<String>, TodoError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(text
        .lines()
        .map(|task| task.trim_end().to_string())
        .filter(|task| !task.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn store_with(temp: &TempDir, lines: &[&str]) -> TodoStore {
        let mut body = lines.join("\n");
        body.push('\n');
        fs::write(temp.path().join(TODO_FILE), body).expect("write todo");
        TodoStore::load(temp.path()).expect("load")
    }

    #[test]
    fn load_missing_file_yields_empty_store() {
        let temp = TempDir::new().expect("tempdir");
        let store = TodoStore::load(temp.path()).expect("load");
        assert!(store.is_empty());
        assert_eq!(store.loaded_count(), 0);
    }

    #[test]
    fn load_trims_trailing_whitespace_and_skips_blank_lines() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(TODO_FILE), "b task  \r\n\n  \na task\n").expect("write");
        let store = TodoStore::load(temp.path()).expect("load");
        assert_eq!(store.lines(), &["a task".to_string(), "b task".to_string()]);
    }

    #[test]
    fn range_check_rejects_zero_and_past_end() {
        let temp = TempDir::new().expect("tempdir");
        let store = store_with(&temp, &["one", "two"]);
        assert_eq!(store.range_check(1).expect("first"), 0);
        assert_eq!(store.range_check(2).expect("last"), 1);
        assert!(matches!(store.range_check(0), Err(TodoError::OutOfRange(0))));
        assert!(matches!(store.range_check(3), Err(TodoError::OutOfRange(3))));
        assert!(matches!(store.range_check(-1), Err(TodoError::OutOfRange(-1))));
    }

    #[test]
    fn add_prepends_today() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = TodoStore::load(temp.path()).expect("load");
        let task = store.add("  walk dog @park ", today());
        assert_eq!(task, "2024-05-06 walk dog @park");
        assert_eq!(store.lines(), &[task]);
    }

    #[test]
    fn mark_done_leaves_completed_lines_alone() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["open task", "x 2024-01-01 old task"]);
        let outcomes = store.mark_done(&[1, 2], today()).expect("do");
        assert_eq!(
            outcomes,
            vec![
                DoneOutcome::Marked("x 2024-05-06 open task".to_string()),
                DoneOutcome::AlreadyDone("x 2024-01-01 old task".to_string()),
            ]
        );
        assert_eq!(store.lines()[1], "x 2024-01-01 old task");
    }

    #[test]
    fn mark_done_out_of_range_mutates_nothing() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["a", "b"]);
        let err = store.mark_done(&[1, 5], today()).unwrap_err();
        assert!(matches!(err, TodoError::OutOfRange(5)));
        assert_eq!(store.lines(), &["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn deprioritize_reports_per_item_failures() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["(A) urgent", "plain", "x 2024-01-01 (B) done"]);
        let outcomes = store.deprioritize(&[1, 2, 3]).expect("depri");
        assert_eq!(
            outcomes,
            vec![
                DepriOutcome::Deprioritised("urgent".to_string()),
                DepriOutcome::NoPriority("plain".to_string()),
                DepriOutcome::Completed("x 2024-01-01 (B) done".to_string()),
            ]
        );
    }

    #[test]
    fn set_priority_rejects_completed_task() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["x 2024-01-01 finished"]);
        let err = store
            .set_priority(1, Priority::new('A').unwrap())
            .unwrap_err();
        assert!(matches!(err, TodoError::TaskCompleted(_)));
    }

    #[test]
    fn delete_removes_highest_positions_first() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["a", "b", "c", "d"]);
        let removed = store.delete(&[2, 4, 2]).expect("delete");
        assert_eq!(removed, vec!["d".to_string(), "b".to_string()]);
        assert_eq!(store.lines(), &["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn save_writes_sorted_lines_and_backup() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["m task"]);
        store.add("another", today());
        store.save().expect("save");

        let written = fs::read_to_string(temp.path().join(TODO_FILE)).expect("read");
        assert_eq!(written, "2024-05-06 another\nm task\n");
        let backup = fs::read_to_string(temp.path().join("todo.bak")).expect("backup");
        assert_eq!(backup, "m task\n");
        assert_eq!(store.loaded_count(), 2);
    }

    #[test]
    fn archive_appends_to_existing_done_file() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(DONE_FILE), "x 2023-12-31 earlier").expect("done");
        let mut store = store_with(
            &temp,
            &["x 2024-02-02 second", "keep me", "x 2024-01-01 first"],
        );

        let archived = store.archive().expect("archive");
        assert_eq!(archived, vec!["x 2024-01-01 first", "x 2024-02-02 second"]);
        assert_eq!(store.lines(), &["keep me".to_string()]);

        let done = fs::read_to_string(temp.path().join(DONE_FILE)).expect("read done");
        assert_eq!(
            done,
            "x 2023-12-31 earlier\nx 2024-01-01 first\nx 2024-02-02 second\n"
        );
        let backup = fs::read_to_string(temp.path().join("done.bak")).expect("backup");
        assert_eq!(backup, "x 2023-12-31 earlier");
    }

    #[test]
    fn save_replaces_previous_backup() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["first"]);
        store.add("second", today());
        store.save().expect("first save");
        store.delete(&[2]).expect("delete");
        store.save().expect("second save");

        let backup = fs::read_to_string(temp.path().join("todo.bak")).expect("backup");
        assert_eq!(backup, "2024-05-06 second\nfirst\n");
        let written = fs::read_to_string(temp.path().join(TODO_FILE)).expect("read");
        assert_eq!(written, "2024-05-06 second\n");
    }

    #[test]
    fn archive_replaces_stale_done_backup() {
        let temp = TempDir::new().expect("tempdir");
        fs::write(temp.path().join(DONE_FILE), "x 2024-03-03 current\n").expect("done");
        fs::write(temp.path().join("done.bak"), "stale backup\n").expect("stale");
        let mut store = store_with(&temp, &["x 2024-04-04 newer", "open"]);

        store.archive().expect("archive");
        let backup = fs::read_to_string(temp.path().join("done.bak")).expect("backup");
        assert_eq!(backup, "x 2024-03-03 current\n");
    }

    #[test]
    fn archive_without_completed_tasks_fails() {
        let temp = TempDir::new().expect("tempdir");
        let mut store = store_with(&temp, &["open"]);
        assert!(matches!(store.archive(), Err(TodoError::NothingToArchive)));
        assert!(!temp.path().join(DONE_FILE).exists());
    }

    #[test]
    fn backup_path_replaces_extension() {
        assert_eq!(
            backup_path(Path::new("/tmp/todo/todo.txt")),
            PathBuf::from("/tmp/todo/todo.bak")
        );
    }
}
