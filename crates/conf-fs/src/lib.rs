//! File I/O boundary for conf-content documents
//!
//! Reads configuration files into [`conf_content::Document`]s,
//! distinguishing "file not found" from malformed content, and persists
//! reconciled text atomically.

pub mod error;
pub mod io;
pub mod store;

pub use error::{Error, Result};
pub use store::{load_document, read_document, write_document};
