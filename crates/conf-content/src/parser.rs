//! Line-oriented parse state machine
//!
//! Classification precedence is section > option > continuation value
//! (see [`crate::line`]); the state enum here supplies the "awaiting
//! values" gate and the current section/option cursors.

use crate::document::{Document, MalformedLine};
use crate::error::{Error, Result};
use crate::line::{classify, LineKind};

/// Parse state across lines of one `read` pass.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ParserState {
    /// No section header seen yet; an option line here is malformed.
    Start,
    /// Inside a section, no option collecting values.
    InSection,
    /// The named option is collecting continuation values.
    AwaitingValue,
}

pub(crate) fn run<I, S>(doc: &mut Document, lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = ParserState::Start;
    let mut current_section: Option<String> = None;
    let mut current_option: Option<String> = None;

    for raw in lines {
        let line = strip_terminator(raw.as_ref());
        doc.original_lines.push(line.to_string());

        let awaiting = state == ParserState::AwaitingValue;
        match classify(line, awaiting) {
            LineKind::Blank => {
                if state == ParserState::AwaitingValue {
                    state = ParserState::InSection;
                    current_option = None;
                }
            }
            LineKind::Comment => {}
            LineKind::Section(name) => {
                register_section(doc, name);
                current_section = Some(name.to_string());
                current_option = None;
                state = ParserState::InSection;
            }
            LineKind::Option { key, value } => match &current_section {
                Some(section) => {
                    register_option(doc, section, key, value);
                    current_option = Some(key.to_string());
                    state = ParserState::AwaitingValue;
                }
                None => {
                    let bad = MalformedLine {
                        line: doc.original_lines.len(),
                        content: line.to_string(),
                    };
                    tracing::warn!(
                        line = bad.line,
                        content = %bad.content,
                        "option line before any section header; halting read"
                    );
                    doc.malformed = Some(bad.clone());
                    return Err(Error::Malformed {
                        line: bad.line,
                        content: bad.content,
                    });
                }
            },
            LineKind::Value(text) => {
                if let (Some(section), Some(option)) = (&current_section, &current_option) {
                    if !text.is_empty() {
                        if let Some(values) = doc
                            .data
                            .get_mut(section)
                            .and_then(|options| options.get_mut(option))
                        {
                            values.push(text.to_string());
                        }
                    }
                }
            }
            LineKind::Other => {}
        }
    }

    tracing::debug!(
        sections = doc.sections.len(),
        lines = doc.original_lines.len(),
        "read pass complete"
    );
    Ok(())
}

/// Strip one trailing `\n` or `\r\n` so raw and pre-split sources both work.
fn strip_terminator(raw: &str) -> &str {
    let line = raw.strip_suffix('\n').unwrap_or(raw);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Register a section header. A re-seen name keeps its position and its
/// accumulated option map (multi-file merge).
fn register_section(doc: &mut Document, name: &str) {
    if !doc.sections.iter().any(|s| s == name) {
        doc.sections.push(name.to_string());
    }
    doc.data.entry(name.to_string()).or_default();
}

/// Register an option key under a section, resetting any previous value
/// list for that key (later occurrence wins), and capture the inline
/// value portion when present.
fn register_option(doc: &mut Document, section: &str, key: &str, value: &str) {
    let mut values = Vec::new();
    if !value.is_empty() {
        values.push(value.to_string());
    }
    if let Some(options) = doc.data.get_mut(section) {
        options.insert(key.to_string(), values);
    }
}
