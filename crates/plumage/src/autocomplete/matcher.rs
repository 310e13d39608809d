//! Filtering, ordering and highlighting of candidates.

use std::cmp::Ordering;

use regex::{Regex, RegexBuilder};

use crate::candidate::Candidate;

/// The current input text, prepared for matching.
///
/// The trimmed text is compiled into a case-insensitive pattern with regex
/// metacharacters escaped, so `"a.b"` only matches a literal dot.
#[derive(Debug, Clone)]
pub struct Query {
    raw: String,
    trimmed: String,
    contains: Option<Regex>,
    prefix: Option<Regex>,
}

impl Query {
    /// Prepare input text for matching.
    pub fn new(input: &str) -> Self {
        let trimmed = input.trim().to_string();
        let escaped = regex::escape(&trimmed);
        let compile = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .ok()
        };
        Self {
            raw: input.to_string(),
            contains: compile(&escaped),
            prefix: compile(&format!("^(?:{escaped})")),
            trimmed,
        }
    }

    /// The input exactly as typed.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The input with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        &self.trimmed
    }

    /// Case-insensitive substring test.
    pub fn is_contained_in(&self, text: &str) -> bool {
        match &self.contains {
            Some(pattern) => pattern.is_match(text),
            None => text.to_lowercase().contains(&self.trimmed.to_lowercase()),
        }
    }

    /// Case-insensitive prefix test.
    pub fn is_prefix_of(&self, text: &str) -> bool {
        match &self.prefix {
            Some(pattern) => pattern.is_match(text),
            None => text.to_lowercase().starts_with(&self.trimmed.to_lowercase()),
        }
    }

    /// Split `text` into plain and emphasized runs around every
    /// case-insensitive occurrence of the trimmed input.
    pub fn highlight<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let pattern = match &self.contains {
            Some(pattern) if !self.trimmed.is_empty() => pattern,
            _ => return vec![Segment::Plain(text)],
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for found in pattern.find_iter(text) {
            if found.start() > last {
                segments.push(Segment::Plain(&text[last..found.start()]));
            }
            segments.push(Segment::Emphasis(found.as_str()));
            last = found.end();
        }
        if last < text.len() {
            segments.push(Segment::Plain(&text[last..]));
        }
        segments
    }
}

/// A run of label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    /// Text outside any match.
    Plain(&'t str),
    /// Text matching the query, rendered inside `<mark>`.
    Emphasis(&'t str),
}

/// Keeps candidates whose label contains the input. The default filter.
pub fn filter_contains(candidate: &Candidate, query: &Query) -> bool {
    query.is_contained_in(&candidate.label)
}

/// Keeps candidates whose label starts with the input.
pub fn filter_starts_with(candidate: &Candidate, query: &Query) -> bool {
    query.is_prefix_of(&candidate.label)
}

/// Shorter labels first, then lexicographic. The default sort.
pub fn sort_by_length(a: &Candidate, b: &Candidate) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.label.cmp(&b.label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[Candidate]) -> Vec<&str> {
        items.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let query = Query::new("  OWL ");
        assert_eq!(query.trimmed(), "OWL");
        assert!(filter_contains(&Candidate::new("Barn Owl", "x"), &query));
        assert!(filter_contains(&Candidate::new("owlet", "x"), &query));
        assert!(!filter_contains(&Candidate::new("Osprey", "x"), &query));
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let query = Query::new("a.b");
        assert!(filter_contains(&Candidate::new("xa.by", "x"), &query));
        assert!(!filter_contains(&Candidate::new("axb", "x"), &query));

        let query = Query::new("(owl");
        assert!(filter_contains(&Candidate::new("Tawny (owl)", "x"), &query));
    }

    #[test]
    fn test_starts_with() {
        let query = Query::new("bar");
        assert!(filter_starts_with(&Candidate::new("Barn Owl", "x"), &query));
        assert!(!filter_starts_with(&Candidate::new("Crossbar", "x"), &query));
    }

    #[test]
    fn test_sort_by_length_then_label() {
        let mut items = vec![
            Candidate::new("ab", "ab"),
            Candidate::new("abc", "abc"),
            Candidate::new("a", "a"),
            Candidate::new("ba", "ba"),
        ];
        items.sort_by(sort_by_length);
        assert_eq!(labels(&items), vec!["a", "ab", "ba", "abc"]);
    }

    #[test]
    fn test_highlight_every_occurrence() {
        let query = Query::new("o");
        assert_eq!(
            query.highlight("Snowy Owl"),
            vec![
                Segment::Plain("Sn"),
                Segment::Emphasis("o"),
                Segment::Plain("wy "),
                Segment::Emphasis("O"),
                Segment::Plain("wl"),
            ]
        );
    }

    #[test]
    fn test_highlight_empty_input() {
        let query = Query::new("   ");
        assert_eq!(query.highlight("Jay"), vec![Segment::Plain("Jay")]);
    }
}
