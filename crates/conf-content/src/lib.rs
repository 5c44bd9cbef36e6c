//! Format-preserving parsing and rewriting of INI-style configuration text
//!
//! Parses `[section]` / `key = value` documents into an in-memory model
//! while keeping every original line verbatim, then reconciles staged
//! edits (added/removed sections and options, value updates) back against
//! the original text, preserving comments and collapsing blank-line runs.

pub mod document;
pub mod error;
pub mod line;

mod parser;
mod writer;

pub use document::{Document, RemoveOutcome, ValueView};
pub use error::{Error, Result};
pub use line::LineKind;
