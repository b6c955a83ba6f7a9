use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const CONFIG_ENV: &str = "TODOTXT_CONFIG";
pub const CONFIG_FILENAME: &str = ".todotxt.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("No config file at {0}")]
    NotFound(PathBuf),
    #[error("No \"todo_dir\" specified in {0}")]
    MissingTodoDir(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoConfig {
    /// Directory holding todo.txt and done.txt.
    pub todo_dir: Option<String>,
    pub colour_mode: Option<bool>,
    /// Verb (plus optional arguments) used when none is given on the command line.
    pub default_action: Option<String>,
    /// Escape code overrides keyed by colour name, e.g. `YELLOW = "[1;33m"`.
    #[serde(default)]
    pub colours: BTreeMap<String, String>,
    #[serde(default)]
    pub task_colours: TaskColours,
}

/// Colour names for each display role. Unset roles keep the built-in colour.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskColours {
    pub priority_a: Option<String>,
    pub priority_b: Option<String>,
    pub priority_c: Option<String>,
    pub priority_x: Option<String>,
    pub done: Option<String>,
    pub normal: Option<String>,
    pub project: Option<String>,
    pub context: Option<String>,
}

impl TodoConfig {
    pub fn todo_dir(&self, source: &Path) -> Result<PathBuf, ConfigError> {
        self.todo_dir
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(expand_home)
            .ok_or_else(|| ConfigError::MissingTodoDir(source.to_path_buf()))
    }

    pub fn colour_mode(&self) -> bool {
        self.colour_mode.unwrap_or(true)
    }

    pub fn default_action(&self) -> Option<Vec<String>> {
        let value = self.default_action.as_deref()?.trim();
        if value.is_empty() {
            return None;
        }
        Some(value.split_whitespace().map(str::to_string).collect())
    }
}

pub fn resolve_user_home_dir() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    if let Ok(profile) = std::env::var("USERPROFILE") {
        let trimmed = profile.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    None
}

/// Config file location: explicit path, then `TODOTXT_CONFIG`, then `~/.todotxt.toml`.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(value) = std::env::var(CONFIG_ENV) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    resolve_user_home_dir().map(|home| home.join(CONFIG_FILENAME))
}

pub fn load_config(path: &Path) -> Result<TodoConfig, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let config = toml::from_str::<TodoConfig>(&text)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

pub fn write_default_config(path: &Path, todo_dir: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_config_text(todo_dir))?;
    Ok(())
}

pub fn default_config_text(todo_dir: &Path) -> String {
    let todo_dir = toml::Value::String(todo_dir.to_string_lossy().into_owned());
    format!(
        "# Directory containing the todo.txt and done.txt files.\n\
todo_dir = {todo_dir}\n\
\n\
# Colour mode when displaying the task list. -c/--colour and -p/--plain override this.\n\
colour_mode = true\n\
\n\
# Action performed when none is given on the command line.\n\
default_action = \"list\"\n\
\n\
# Escape codes for named colours. Overrides the built-in codes.\n\
# WARNING: incorrect codes can make output unreadable.\n\
[colours]\n\
# BLACK        = \"[0;30m\"\n\
# RED          = \"[0;31m\"\n\
# GREEN        = \"[0;32m\"\n\
# BROWN        = \"[0;33m\"\n\
# BLUE         = \"[0;34m\"\n\
# PURPLE       = \"[0;35m\"\n\
# CYAN         = \"[0;36m\"\n\
# LIGHT_GREY   = \"[0;37m\"\n\
# DARK_GREY    = \"[1;30m\"\n\
# LIGHT_RED    = \"[1;31m\"\n\
# LIGHT_GREEN  = \"[1;32m\"\n\
# YELLOW       = \"[1;33m\"\n\
# LIGHT_BLUE   = \"[1;34m\"\n\
# LIGHT_PURPLE = \"[1;35m\"\n\
# LIGHT_CYAN   = \"[1;36m\"\n\
# WHITE        = \"[1;37m\"\n\
\n\
# Colours used when displaying the task list.\n\
[task_colours]\n\
priority_a = \"YELLOW\"\n\
priority_b = \"LIGHT_GREEN\"\n\
priority_c = \"LIGHT_BLUE\"\n\
priority_x = \"WHITE\"\n\
done = \"DARK_GREY\"\n\
normal = \"LIGHT_GREY\"\n\
# Project keywords start with '+', e.g. +GalacticaRepairs\n\
project = \"LIGHT_RED\"\n\
# Context keywords start with '@', e.g. @CylonHomeWorld\n\
context = \"LIGHT_CYAN\"\n"
    )
}

fn expand_home(value: &str) -> PathBuf {
    if let Some(rest) = value.strip_prefix("~/") {
        if let Some(home) = resolve_user_home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(value)
}
