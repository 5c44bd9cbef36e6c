//! Document model and mutation API
//!
//! A [`Document`] holds the parsed sections/options/values, the original
//! lines verbatim, and the staged edit sets the writer reconciles against
//! that text. Mutation methods never touch the original lines; they only
//! update parsed data or the staging sets, so write-back always works
//! from the unmodified source.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::{parser, writer};

/// Ordered option map for one section: key -> value list
pub(crate) type OptionMap = IndexMap<String, Vec<String>>;

/// Outcome of [`Document::remove_option`].
///
/// Distinguishes "nothing to do" (the section is unknown) from "not
/// applicable" (the section exists but the option does not).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoveOutcome {
    /// The section is unknown; nothing was staged.
    SectionMissing,
    /// The section exists but has no such option.
    OptionMissing,
    /// The option was staged for removal (or un-staged, if it was itself
    /// a staged addition).
    Removed,
}

/// Borrowed view of an option's stored values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueView<'a> {
    /// Exactly one value is stored.
    Single(&'a str),
    /// Zero or several values (multi-line option).
    Many(&'a [String]),
}

impl<'a> ValueView<'a> {
    fn from_values(values: &'a [String]) -> Self {
        match values {
            [single] => Self::Single(single),
            many => Self::Many(many),
        }
    }

    /// The single value, if exactly one is stored.
    pub fn as_single(&self) -> Option<&'a str> {
        match self {
            Self::Single(v) => Some(v),
            Self::Many(_) => None,
        }
    }
}

/// An INI-style configuration document with staged edits.
#[derive(Debug, Default, Clone)]
pub struct Document {
    /// Original lines verbatim, newline-stripped, across all `read` calls
    pub(crate) original_lines: Vec<String>,
    /// Section names in discovery order (parsed and staged-new), unique
    pub(crate) sections: Vec<String>,
    /// Parsed data: section -> option -> ordered values
    pub(crate) data: IndexMap<String, OptionMap>,
    /// Sections staged for append at end of file, in staging order
    pub(crate) pending_new_sections: Vec<String>,
    /// Options staged for insertion: section -> option -> values
    pub(crate) pending_new_options: IndexMap<String, OptionMap>,
    /// Sections staged for removal
    pub(crate) pending_removed_sections: HashSet<String>,
    /// Options staged for removal, per section
    pub(crate) pending_removed_options: HashMap<String, HashSet<String>>,
    /// Set once an option line is seen before any section header
    pub(crate) malformed: Option<MalformedLine>,
}

/// The line that halted parsing, for error reporting.
#[derive(Debug, Clone)]
pub(crate) struct MalformedLine {
    pub(crate) line: usize,
    pub(crate) content: String,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a complete source text into a fresh document.
    pub fn parse(source: &str) -> Result<Self> {
        let mut doc = Self::new();
        doc.read(source.lines())?;
        Ok(doc)
    }

    /// Feed one file's worth of lines into the document.
    ///
    /// May be called repeatedly to merge several files: a re-seen section
    /// keeps its accumulated options, a re-seen option key is reset and
    /// repopulated by the later occurrence.
    ///
    /// Every line is retained verbatim for write-back, including comments
    /// and blanks. Line terminators (`\n` or `\r\n`) are stripped if
    /// present, so both raw and pre-split sources are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Malformed`] when an option line appears before
    /// any section header. Parsing halts at that line; everything parsed
    /// before it is retained and [`Self::is_malformed`] reports true.
    pub fn read<I, S>(&mut self, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(bad) = &self.malformed {
            return Err(Error::Malformed {
                line: bad.line,
                content: bad.content.clone(),
            });
        }
        parser::run(self, lines)
    }

    /// Reconcile staged edits against the original text.
    ///
    /// Produces the final text: removals and value updates applied in
    /// place, new options inserted at the end of their section's option
    /// block, new sections appended at end of file, comments preserved,
    /// and runs of blank lines collapsed to at most one.
    pub fn write(&self) -> String {
        writer::render(self)
    }

    /// Stage a new section for append at end of file.
    ///
    /// Returns false (and stages nothing) when the name is already known.
    pub fn add_section(&mut self, name: &str) -> bool {
        if self.sections.iter().any(|s| s == name) {
            return false;
        }
        self.sections.push(name.to_string());
        self.pending_new_sections.push(name.to_string());
        tracing::debug!(section = %name, "staged new section");
        true
    }

    /// Set `option` under `section` to a single `value`.
    ///
    /// A parsed option's value list is replaced in place (discarding any
    /// multi-line values it held). An option the section does not yet
    /// have is staged for insertion at the end of the section's option
    /// block; options of a staged-new section are staged under it.
    /// Returns false when the section is unknown.
    pub fn set(&mut self, section: &str, option: &str, value: &str) -> bool {
        if self.pending_new_sections.iter().any(|s| s == section) {
            self.stage_option(section, option, value);
            return true;
        }
        match self.data.get_mut(section) {
            Some(options) => {
                if let Some(values) = options.get_mut(option) {
                    *values = vec![value.to_string()];
                } else {
                    self.stage_option(section, option, value);
                }
                true
            }
            None => false,
        }
    }

    fn stage_option(&mut self, section: &str, option: &str, value: &str) {
        self.pending_new_options
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string(), vec![value.to_string()]);
        tracing::debug!(section = %section, option = %option, "staged new option");
    }

    /// Look up an option's values; staged new options are visible too.
    pub fn get(&self, section: &str, option: &str) -> Option<ValueView<'_>> {
        self.lookup(section, option).map(ValueView::from_values)
    }

    fn lookup(&self, section: &str, option: &str) -> Option<&[String]> {
        self.data
            .get(section)
            .and_then(|options| options.get(option))
            .or_else(|| {
                self.pending_new_options
                    .get(section)
                    .and_then(|options| options.get(option))
            })
            .map(Vec::as_slice)
    }

    /// Whether the named section exists (parsed or staged-new).
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.iter().any(|s| s == section)
    }

    /// Whether the named option exists (parsed or staged-new).
    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.lookup(section, option).is_some()
    }

    /// Section names in discovery order, including staged-new sections.
    pub fn section_names(&self) -> &[String] {
        &self.sections
    }

    /// Option keys of a section in discovery order, parsed keys first,
    /// then staged-new keys. None when the section is unknown.
    pub fn option_names(&self, section: &str) -> Option<Vec<&str>> {
        if !self.has_section(section) {
            return None;
        }
        let mut names: Vec<&str> = self
            .data
            .get(section)
            .into_iter()
            .flat_map(|options| options.keys().map(String::as_str))
            .collect();
        if let Some(staged) = self.pending_new_options.get(section) {
            names.extend(staged.keys().map(String::as_str));
        }
        Some(names)
    }

    /// Stage a section for removal; its header and option lines are
    /// dropped on write. A staged-new section is un-staged instead.
    /// Returns false when the section is unknown.
    pub fn remove_section(&mut self, section: &str) -> bool {
        if let Some(pos) = self.pending_new_sections.iter().position(|s| s == section) {
            self.pending_new_sections.remove(pos);
            self.pending_new_options.shift_remove(section);
            self.sections.retain(|s| s != section);
            return true;
        }
        if self.data.contains_key(section) {
            self.pending_removed_sections.insert(section.to_string());
            tracing::debug!(section = %section, "staged section removal");
            return true;
        }
        false
    }

    /// Stage an option for removal; its line is dropped on write.
    /// A staged-new option is un-staged instead.
    pub fn remove_option(&mut self, section: &str, option: &str) -> RemoveOutcome {
        if !self.has_section(section) {
            return RemoveOutcome::SectionMissing;
        }
        if let Some(staged) = self.pending_new_options.get_mut(section) {
            if staged.shift_remove(option).is_some() {
                return RemoveOutcome::Removed;
            }
        }
        let known = self
            .data
            .get(section)
            .is_some_and(|options| options.contains_key(option));
        if !known {
            return RemoveOutcome::OptionMissing;
        }
        self.pending_removed_options
            .entry(section.to_string())
            .or_default()
            .insert(option.to_string());
        tracing::debug!(section = %section, option = %option, "staged option removal");
        RemoveOutcome::Removed
    }

    /// Whether a malformed line halted parsing.
    pub fn is_malformed(&self) -> bool {
        self.malformed.is_some()
    }

    /// 1-based index (into the original lines) of the line that halted
    /// parsing, if any.
    pub fn malformed_line(&self) -> Option<usize> {
        self.malformed.as_ref().map(|bad| bad.line)
    }

    /// The original lines, verbatim and newline-stripped.
    pub fn original_lines(&self) -> &[String] {
        &self.original_lines
    }

    pub(crate) fn is_section_removed(&self, section: &str) -> bool {
        self.pending_removed_sections.contains(section)
    }

    pub(crate) fn is_option_removed(&self, section: &str, option: &str) -> bool {
        self.pending_removed_options
            .get(section)
            .is_some_and(|options| options.contains(option))
    }
}
