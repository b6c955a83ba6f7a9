//! Terminal colouring for task lines.
//!
//! A [`Palette`] is built once from configuration and handed to a [`Renderer`] by
//! reference. Rendering never changes the task text itself, it only wraps it in escape
//! sequences.

use std::collections::BTreeMap;

use thiserror::Error;
use todotxt_core::config::TaskColours;
use todotxt_core::line::{self, Priority, TagKind};

pub const RESET: &str = "\x1b[0m";
const ESC: char = '\x1b';

pub const BLACK: &str = "\x1b[0;30m";
pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const BROWN: &str = "\x1b[0;33m";
pub const BLUE: &str = "\x1b[0;34m";
pub const PURPLE: &str = "\x1b[0;35m";
pub const CYAN: &str = "\x1b[0;36m";
pub const LIGHT_GREY: &str = "\x1b[0;37m";
pub const DARK_GREY: &str = "\x1b[1;30m";
pub const LIGHT_RED: &str = "\x1b[1;31m";
pub const LIGHT_GREEN: &str = "\x1b[1;32m";
pub const YELLOW: &str = "\x1b[1;33m";
pub const LIGHT_BLUE: &str = "\x1b[1;34m";
pub const LIGHT_PURPLE: &str = "\x1b[1;35m";
pub const LIGHT_CYAN: &str = "\x1b[1;36m";
pub const WHITE: &str = "\x1b[1;37m";

pub const NAMED_COLOURS: [(&str, &str); 16] = [
    ("BLACK", BLACK),
    ("RED", RED),
    ("GREEN", GREEN),
    ("BROWN", BROWN),
    ("BLUE", BLUE),
    ("PURPLE", PURPLE),
    ("CYAN", CYAN),
    ("LIGHT_GREY", LIGHT_GREY),
    ("DARK_GREY", DARK_GREY),
    ("LIGHT_RED", LIGHT_RED),
    ("LIGHT_GREEN", LIGHT_GREEN),
    ("YELLOW", YELLOW),
    ("LIGHT_BLUE", LIGHT_BLUE),
    ("LIGHT_PURPLE", LIGHT_PURPLE),
    ("LIGHT_CYAN", LIGHT_CYAN),
    ("WHITE", WHITE),
];

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown colour \"{name}\" for task_colours.{role}")]
    UnknownColour { role: &'static str, name: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Role {
    PriorityA,
    PriorityB,
    PriorityC,
    PriorityOther,
    Done,
    Normal,
    Project,
    Context,
}

impl Role {
    fn config_key(self) -> &'static str {
        match self {
            Role::PriorityA => "priority_a",
            Role::PriorityB => "priority_b",
            Role::PriorityC => "priority_c",
            Role::PriorityOther => "priority_x",
            Role::Done => "done",
            Role::Normal => "normal",
            Role::Project => "project",
            Role::Context => "context",
        }
    }

    fn default_colour(self) -> &'static str {
        match self {
            Role::PriorityA => "YELLOW",
            Role::PriorityB => "LIGHT_GREEN",
            Role::PriorityC => "LIGHT_BLUE",
            Role::PriorityOther => "WHITE",
            Role::Done => "DARK_GREY",
            Role::Normal => "LIGHT_GREY",
            Role::Project => "LIGHT_RED",
            Role::Context => "LIGHT_CYAN",
        }
    }

    fn configured(self, colours: &TaskColours) -> Option<&str> {
        let value = match self {
            Role::PriorityA => &colours.priority_a,
            Role::PriorityB => &colours.priority_b,
            Role::PriorityC => &colours.priority_c,
            Role::PriorityOther => &colours.priority_x,
            Role::Done => &colours.done,
            Role::Normal => &colours.normal,
            Role::Project => &colours.project,
            Role::Context => &colours.context,
        };
        value.as_deref().map(str::trim).filter(|name| !name.is_empty())
    }
}

/// Escape sequence per display role. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    priority_a: String,
    priority_b: String,
    priority_c: String,
    priority_other: String,
    done: String,
    normal: String,
    project: String,
    context: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            priority_a: YELLOW.to_string(),
            priority_b: LIGHT_GREEN.to_string(),
            priority_c: LIGHT_BLUE.to_string(),
            priority_other: WHITE.to_string(),
            done: DARK_GREY.to_string(),
            normal: LIGHT_GREY.to_string(),
            project: LIGHT_RED.to_string(),
            context: LIGHT_CYAN.to_string(),
        }
    }
}

impl Palette {
    /// Builds a palette from escape code overrides (keyed by colour name) and the colour
    /// name chosen for each role.
    pub fn from_config(
        overrides: &BTreeMap<String, String>,
        task_colours: &TaskColours,
    ) -> Result<Self, RenderError> {
        let mut codes: BTreeMap<String, String> = NAMED_COLOURS
            .iter()
            .map(|(name, code)| (name.to_string(), code.to_string()))
            .collect();
        for (name, code) in overrides {
            codes.insert(name.trim().to_uppercase(), escape_code(code));
        }

        let pick = |role: Role| -> Result<String, RenderError> {
            let name = role
                .configured(task_colours)
                .unwrap_or(role.default_colour())
                .to_uppercase();
            codes
                .get(&name)
                .cloned()
                .ok_or(RenderError::UnknownColour {
                    role: role.config_key(),
                    name,
                })
        };

        Ok(Self {
            priority_a: pick(Role::PriorityA)?,
            priority_b: pick(Role::PriorityB)?,
            priority_c: pick(Role::PriorityC)?,
            priority_other: pick(Role::PriorityOther)?,
            done: pick(Role::Done)?,
            normal: pick(Role::Normal)?,
            project: pick(Role::Project)?,
            context: pick(Role::Context)?,
        })
    }

    pub fn style(&self, role: Role) -> &str {
        match role {
            Role::PriorityA => &self.priority_a,
            Role::PriorityB => &self.priority_b,
            Role::PriorityC => &self.priority_c,
            Role::PriorityOther => &self.priority_other,
            Role::Done => &self.done,
            Role::Normal => &self.normal,
            Role::Project => &self.project,
            Role::Context => &self.context,
        }
    }

    pub fn priority_style(&self, priority: Priority) -> &str {
        let role = match priority.letter() {
            'A' => Role::PriorityA,
            'B' => Role::PriorityB,
            'C' => Role::PriorityC,
            _ => Role::PriorityOther,
        };
        self.style(role)
    }
}

fn escape_code(code: &str) -> String {
    let code = code.trim();
    if code.starts_with(ESC) {
        code.to_string()
    } else {
        format!("{}{}", ESC, code)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    palette: &'a Palette,
    colour: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(palette: &'a Palette, colour: bool) -> Self {
        Self { palette, colour }
    }

    pub fn colour_enabled(&self) -> bool {
        self.colour
    }

    /// Colours one (possibly numbered) task line. The number prefix stays uncoloured and
    /// each tag falls back to the line's base style right after it.
    pub fn render(&self, text: &str) -> String {
        if !self.colour {
            return text.to_string();
        }
        let (_, task) = line::strip_line_number(text);
        let prefix = &text[..text.len() - task.len()];
        let base = self.base_style(task);

        let mut spans: Vec<_> = line::tag_positions(task, TagKind::Project)
            .into_iter()
            .map(|span| (span, Role::Project))
            .chain(
                line::tag_positions(task, TagKind::Context)
                    .into_iter()
                    .map(|span| (span, Role::Context)),
            )
            .collect();
        spans.sort_by_key(|(span, _)| span.start);

        let mut out = String::with_capacity(text.len() + 16 * (spans.len() + 2));
        out.push_str(prefix);
        out.push_str(base);
        let mut cursor = 0;
        for (span, role) in spans {
            out.push_str(&task[cursor..span.start]);
            out.push_str(self.palette.style(role));
            out.push_str(&task[span.clone()]);
            out.push_str(base);
            cursor = span.end;
        }
        out.push_str(&task[cursor..]);
        out.push_str(RESET);
        out
    }

    fn base_style(&self, task: &str) -> &'a str {
        if let Some((priority, _)) = line::parse_priority(task) {
            return self.palette.priority_style(priority);
        }
        if line::is_completed(task) {
            return self.palette.style(Role::Done);
        }
        self.palette.style(Role::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_mode_returns_text_unchanged() {
        let palette = Palette::default();
        let renderer = Renderer::new(&palette, false);
        assert_eq!(renderer.render("1   (A) task +proj"), "1   (A) task +proj");
    }

    #[test]
    fn priority_sets_base_style() {
        let palette = Palette::default();
        let renderer = Renderer::new(&palette, true);
        assert_eq!(
            renderer.render("(A) pay rent"),
            format!("{YELLOW}(A) pay rent{RESET}")
        );
        assert_eq!(
            renderer.render("(Q) someday"),
            format!("{WHITE}(Q) someday{RESET}")
        );
    }

    #[test]
    fn completed_and_normal_lines_use_their_styles() {
        let palette = Palette::default();
        let renderer = Renderer::new(&palette, true);
        assert_eq!(
            renderer.render("x 2024-01-01 done"),
            format!("{DARK_GREY}x 2024-01-01 done{RESET}")
        );
        assert_eq!(renderer.render("plain"), format!("{LIGHT_GREY}plain{RESET}"));
    }

    #[test]
    fn tags_revert_to_base_style() {
        let palette = Palette::default();
        let renderer = Renderer::new(&palette, true);
        assert_eq!(
            renderer.render("(B) buy milk +errands @home later"),
            format!(
                "{LIGHT_GREEN}(B) buy milk {LIGHT_RED}+errands{LIGHT_GREEN} \
{LIGHT_CYAN}@home{LIGHT_GREEN} later{RESET}"
            )
        );
    }

    #[test]
    fn line_number_prefix_is_not_coloured() {
        let palette = Palette::default();
        let renderer = Renderer::new(&palette, true);
        assert_eq!(
            renderer.render("12  @phone mum"),
            format!("12  {LIGHT_GREY}{LIGHT_CYAN}@phone{LIGHT_GREY} mum{RESET}")
        );
    }

    #[test]
    fn from_config_applies_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("yellow".to_string(), "[0;93m".to_string());
        let task_colours = TaskColours {
            project: Some("green".to_string()),
            ..TaskColours::default()
        };
        let palette = Palette::from_config(&overrides, &task_colours).expect("palette");
        assert_eq!(palette.style(Role::PriorityA), "\x1b[0;93m");
        assert_eq!(palette.style(Role::Project), GREEN);
        assert_eq!(palette.style(Role::Context), LIGHT_CYAN);
    }

    #[test]
    fn from_config_defaults_match_default_palette() {
        let palette =
            Palette::from_config(&BTreeMap::new(), &TaskColours::default()).expect("palette");
        assert_eq!(palette, Palette::default());
    }

    #[test]
    fn from_config_rejects_unknown_colour() {
        let task_colours = TaskColours {
            done: Some("MAUVE".to_string()),
            ..TaskColours::default()
        };
        let err = Palette::from_config(&BTreeMap::new(), &task_colours).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown colour \"MAUVE\" for task_colours.done"
        );
    }
}
