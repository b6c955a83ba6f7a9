use crate::error::TodoError;
use crate::line::Priority;

/// A fully validated command. Item numbers are display positions and are range checked
/// against the store when the action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add(String),
    Do(Vec<i64>),
    Deprioritize(Vec<i64>),
    Priority { item: i64, priority: Priority },
    Delete(Vec<i64>),
    Archive,
    List(Vec<String>),
    Help,
    ShortHelp,
}

impl Action {
    /// Resolves a verb and its arguments, e.g. `["pri", "2", "A"]`.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self, TodoError> {
        let Some((verb, rest)) = args.split_first() else {
            return Err(TodoError::usage("Empty action list passed!"));
        };
        let rest: Vec<&str> = rest.iter().map(|arg| arg.as_ref()).collect();

        match verb.as_ref() {
            "add" | "a" => {
                let text = rest.join(" ");
                if text.trim().is_empty() {
                    return Err(TodoError::usage(
                        "\"add\" action requires a task description.",
                    ));
                }
                // One task is one line of todo.txt.
                if text.contains(['\n', '\r']) {
                    return Err(TodoError::usage(
                        "\"add\" task description must be a single line.",
                    ));
                }
                Ok(Action::Add(text))
            }
            "do" => Ok(Action::Do(parse_items("do", &rest)?)),
            "depri" | "dp" => Ok(Action::Deprioritize(parse_items("depri", &rest)?)),
            "pri" | "p" => {
                let [item, priority] = rest.as_slice() else {
                    return Err(TodoError::usage(
                        "\"pri\" action requires ITEM# and PRIORITY arguments.",
                    ));
                };
                let item = parse_item(item)?;
                let priority = priority
                    .parse::<Priority>()
                    .map_err(|err| TodoError::usage(err.to_string()))?;
                Ok(Action::Priority { item, priority })
            }
            "del" | "rm" => Ok(Action::Delete(parse_items("del", &rest)?)),
            "archive" => Ok(Action::Archive),
            "list" | "ls" => Ok(Action::List(
                rest.iter().map(|term| term.to_string()).collect(),
            )),
            "help" => Ok(Action::Help),
            "shorthelp" => Ok(Action::ShortHelp),
            other => Err(TodoError::usage(format!("Unknown action: {}", other))),
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Action::Add(_)
                | Action::Do(_)
                | Action::Deprioritize(_)
                | Action::Priority { .. }
                | Action::Delete(_)
                | Action::Archive
        )
    }

    /// Terms for the listing shown after this action, or `None` when nothing is listed.
    pub fn listing_terms(&self) -> Option<&[String]> {
        match self {
            Action::List(terms) => Some(terms.as_slice()),
            Action::Help | Action::ShortHelp => None,
            _ => Some(&[][..]),
        }
    }
}

fn parse_items(verb: &str, args: &[&str]) -> Result<Vec<i64>, TodoError> {
    let items = args
        .iter()
        .flat_map(|arg| arg.split(|c: char| c == ',' || c.is_whitespace()))
        .filter(|value| !value.is_empty())
        .map(parse_item)
        .collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        return Err(TodoError::usage(format!(
            "\"{}\" action requires at least one ITEM#.",
            verb
        )));
    }
    Ok(items)
}

fn parse_item(value: &str) -> Result<i64, TodoError> {
    let trimmed = value.trim().trim_end_matches(',');
    trimmed
        .parse::<i64>()
        .map_err(|_| TodoError::usage(format!("Non-numeric used for ITEM# \"{}\".", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_resolves_aliases() {
        assert_eq!(
            Action::parse(&["a", "buy", "milk"]).expect("add"),
            Action::Add("buy milk".to_string())
        );
        assert_eq!(Action::parse(&["rm", "3"]).expect("rm"), Action::Delete(vec![3]));
        assert_eq!(
            Action::parse(&["dp", "1"]).expect("dp"),
            Action::Deprioritize(vec![1])
        );
        assert_eq!(
            Action::parse(&["ls", "+home"]).expect("ls"),
            Action::List(vec!["+home".to_string()])
        );
    }

    #[test]
    fn parse_items_accepts_commas_and_separate_args() {
        assert_eq!(
            Action::parse(&["do", "1,2", "3,", "4"]).expect("do"),
            Action::Do(vec![1, 2, 3, 4])
        );
        assert_eq!(
            Action::parse(&["do", "1, 2"]).expect("do"),
            Action::Do(vec![1, 2])
        );
    }

    #[test]
    fn parse_rejects_non_numeric_items() {
        let err = Action::parse(&["do", "one"]).unwrap_err();
        assert!(matches!(err, TodoError::Usage(msg) if msg.contains("\"one\"")));
    }

    #[test]
    fn parse_keeps_negative_items_for_range_check() {
        assert_eq!(Action::parse(&["del", "-2"]).expect("del"), Action::Delete(vec![-2]));
    }

    #[test]
    fn parse_pri_requires_item_and_letter() {
        assert!(matches!(
            Action::parse(&["pri", "2"]),
            Err(TodoError::Usage(_))
        ));
        assert!(matches!(
            Action::parse(&["pri", "2", "a"]),
            Err(TodoError::Usage(msg)) if msg.contains("A to Z")
        ));
        assert_eq!(
            Action::parse(&["p", "2", "Z"]).expect("pri"),
            Action::Priority {
                item: 2,
                priority: Priority::new('Z').unwrap()
            }
        );
    }

    #[test]
    fn parse_add_rejects_multiline_text() {
        assert!(matches!(
            Action::parse(&["add", "buy milk\nrm -rf everything"]),
            Err(TodoError::Usage(msg)) if msg.contains("single line")
        ));
        assert!(matches!(
            Action::parse(&["a", "first", "second\r"]),
            Err(TodoError::Usage(_))
        ));
    }

    #[test]
    fn parse_rejects_unknown_and_empty() {
        assert!(matches!(Action::parse(&["frobnicate"]), Err(TodoError::Usage(_))));
        assert!(matches!(Action::parse::<&str>(&[]), Err(TodoError::Usage(_))));
        assert!(matches!(Action::parse(&["add"]), Err(TodoError::Usage(_))));
        assert!(matches!(Action::parse(&["do"]), Err(TodoError::Usage(_))));
    }

    #[test]
    fn listing_terms_follow_action_kind() {
        assert_eq!(Action::Archive.listing_terms(), Some(&[][..]));
        assert_eq!(Action::Help.listing_terms(), None);
        let list = Action::List(vec!["x".to_string()]);
        assert_eq!(list.listing_terms(), Some(&["x".to_string()][..]));
        assert!(Action::Archive.is_mutating());
        assert!(!list.is_mutating());
    }
}
