use regex::Regex;
use tracing::debug;

use crate::error::TodoError;
use crate::line;
use crate::store::TodoStore;

/// Logical AND of whole-word, case-sensitive term matches.
#[derive(Debug, Clone)]
pub struct TermFilter {
    terms: Vec<Regex>,
}

impl TermFilter {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Result<Self, regex::Error> {
        let terms = terms
            .iter()
            .map(|term| term.as_ref())
            .filter(|term| !term.is_empty())
            .map(|term| Regex::new(&format!(r"(?:^|\W){}(?:\W|$)", regex::escape(term))))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(terms = terms.len(), "built term filter");
        Ok(Self { terms })
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.terms.iter().all(|term| term.is_match(text))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Display position in the full sorted list, not in the filtered result.
    pub number: usize,
    pub text: String,
    pub numbered: String,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub entries: Vec<ListEntry>,
    pub total: usize,
}

impl Listing {
    pub fn shown(&self) -> usize {
        self.entries.len()
    }

    pub fn summary(&self) -> String {
        format!("{} of {} tasks", self.shown(), self.total)
    }
}

/// Sorted, numbered and filtered view of the store. Never mutates it.
pub fn list<S: AsRef<str>>(store: &TodoStore, terms: &[S]) -> Result<Listing, TodoError> {
    let filter = TermFilter::new(terms)?;
    let mut sorted = store.lines().to_vec();
    sorted.sort();
    let numbered = line::add_line_numbers(&sorted);

    let entries = sorted
        .into_iter()
        .zip(numbered)
        .enumerate()
        .filter(|(_, (text, _))| filter.matches(text))
        .map(|(idx, (text, numbered))| ListEntry {
            number: idx + 1,
            text,
            numbered,
        })
        .collect();

    Ok(Listing {
        entries,
        total: store.loaded_count(),
    })
}
