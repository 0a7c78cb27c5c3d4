use serde::{Deserialize, Serialize};

/// Text returned when a captcha could not be solved
pub const NOT_SOLVED: &str = "Not solved";

/// Marker rendered for an unresolved glyph in devmode
pub const UNRESOLVED_MARKER: char = '-';

/// Number of glyphs in every captcha
pub const CAPTCHA_LENGTH: usize = 6;

/// Outcome of matching a single glyph
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Resolved(char),
    Unresolved,
}

impl Symbol {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Character shown for this position
    pub fn as_char(&self) -> char {
        match self {
            Self::Resolved(c) => *c,
            Self::Unresolved => UNRESOLVED_MARKER,
        }
    }
}

impl From<Option<char>> for Symbol {
    fn from(value: Option<char>) -> Self {
        value.map_or(Self::Unresolved, Self::Resolved)
    }
}

/// Result of one solve invocation
///
/// `aborted` is set when matching stopped at the first unresolved glyph;
/// `symbols` then holds only the positions evaluated so far.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Solution {
    pub symbols: Vec<Symbol>,
    pub aborted: bool,
}

impl Solution {
    /// Solution for a fully evaluated captcha
    pub fn complete(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols,
            aborted: false,
        }
    }

    /// Solution for a solve that stopped at an unresolved glyph
    pub fn aborted(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols,
            aborted: true,
        }
    }

    /// True only when every position resolved to a symbol
    pub fn is_solved(&self) -> bool {
        !self.aborted
            && self.symbols.len() == CAPTCHA_LENGTH
            && self.symbols.iter().all(Symbol::is_resolved)
    }

    /// Final captcha text: the resolved characters (dashes for unresolved
    /// positions in devmode) or the `Not solved` sentinel
    pub fn text(&self) -> String {
        if self.aborted {
            return NOT_SOLVED.to_string();
        }
        self.symbols.iter().map(Symbol::as_char).collect()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text())
    }
}
