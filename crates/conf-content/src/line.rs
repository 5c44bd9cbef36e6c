//! Line classification shared by the parser and the writer
//!
//! A bare word is structurally ambiguous: it could be a section header,
//! an option key, or a continuation value. Classification tries the
//! section pattern first, the option pattern second, and falls back to
//! value capture, gated on whether an option is currently collecting
//! values. Running the same classifier on both the parse pass and the
//! write-back pass keeps the two sides agreeing on every line.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern for `[section]` headers at line start
pub static SECTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([A-Za-z0-9:*_-]+)\]").unwrap());

/// Pattern for `key = value` option lines (value may be empty)
static OPTION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)\s*=\s*(.*)$").unwrap());

/// Pattern for a bare option key with no `=`
static BARE_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z0-9_]+)\s*$").unwrap());

/// Structural classification of one raw line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line
    Blank,
    /// Line starting with `#`; preserved verbatim, never parsed
    Comment,
    /// `[name]` header; payload is the bracket interior
    Section(&'a str),
    /// New option key, with the inline value portion (possibly empty)
    Option { key: &'a str, value: &'a str },
    /// Continuation value belonging to the option currently collecting
    Value(&'a str),
    /// Unclassifiable outside a value run; ignored by parser and writer
    Other,
}

/// Classify one line.
///
/// `awaiting_values` is the parse-state gate: while an option is
/// collecting values, a bare identifier is a continuation value rather
/// than a fresh option key. A line carrying an explicit `key =` token is
/// always a fresh option.
pub fn classify(line: &str, awaiting_values: bool) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }
    if line.starts_with('#') {
        return LineKind::Comment;
    }
    if let Some(cap) = SECTION_PATTERN.captures(line) {
        return LineKind::Section(cap.get(1).map_or("", |m| m.as_str()));
    }
    if let Some(cap) = OPTION_PATTERN.captures(line) {
        let key = cap.get(1).map_or("", |m| m.as_str());
        let value = cap.get(2).map_or("", |m| m.as_str()).trim_end();
        return LineKind::Option { key, value };
    }
    if !awaiting_values {
        if let Some(cap) = BARE_KEY_PATTERN.captures(line) {
            return LineKind::Option {
                key: cap.get(1).map_or("", |m| m.as_str()),
                value: "",
            };
        }
    }
    if awaiting_values {
        return LineKind::Value(line.trim());
    }
    LineKind::Other
}

/// Stateful wrapper that tracks the value-run gate across lines.
///
/// Sections and blank lines end a value run; comments leave it open, so
/// a value run survives an interleaved comment line.
#[derive(Debug, Default)]
pub struct Classifier {
    awaiting_values: bool,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify<'a>(&mut self, line: &'a str) -> LineKind<'a> {
        let kind = classify(line, self.awaiting_values);
        match kind {
            LineKind::Section(_) | LineKind::Blank => self.awaiting_values = false,
            LineKind::Option { .. } => self.awaiting_values = true,
            LineKind::Comment | LineKind::Value(_) | LineKind::Other => {}
        }
        kind
    }
}
