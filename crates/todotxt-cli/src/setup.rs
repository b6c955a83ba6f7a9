//! First-run setup: create a missing config file or todo directory after asking.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use todotxt_core::config::{self, ConfigError, TodoConfig};
use tracing::debug;

pub fn load_or_create_config<R: BufRead, W: Write>(
    path: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<TodoConfig> {
    if !path.is_file() {
        writeln!(output, "--\nTODO:\t{} config file does not exist.", path.display())?;
        if !confirm(input, output, "\tCreate a default config file [y/n]? ")? {
            return Err(ConfigError::NotFound(path.to_path_buf()).into());
        }
        let home = config::resolve_user_home_dir()
            .context("cannot determine home directory for the default todo_dir")?;
        config::write_default_config(path, &home.join("todo"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        writeln!(output, "\t{} created.", path.display())?;
    }
    let config = config::load_config(path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    Ok(config)
}

pub fn ensure_todo_dir<R: BufRead, W: Write>(
    todo_dir: &Path,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    if todo_dir.is_dir() {
        return Ok(());
    }
    writeln!(output, "--\nTODO:\t{} does not exist", todo_dir.display())?;
    if !confirm(input, output, "\tCreate it [y/n]? ")? {
        bail!("todo directory does not exist");
    }
    fs::create_dir_all(todo_dir)
        .with_context(|| format!("failed to create {}", todo_dir.display()))?;
    debug!(path = %todo_dir.display(), "created todo directory");
    Ok(())
}

/// Asks a yes/no question. End of input counts as "no".
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> io::Result<bool> {
    write!(output, "{}", question)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(answer.trim().to_lowercase().starts_with('y'))
}
