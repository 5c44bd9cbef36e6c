//! Reading and persisting documents by path
//!
//! The read side distinguishes a missing file (no document mutation at
//! all) from malformed content (partial state retained on the document,
//! queryable via `is_malformed`). The write side renders the reconciled
//! text and persists it atomically.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use conf_content::Document;

use crate::io::write_atomic;
use crate::{Error, Result};

/// Read the file at `path` into `doc`.
///
/// May be called with the same document for several paths to merge
/// files. A missing path yields [`Error::NotFound`] and leaves the
/// document untouched; malformed content yields [`Error::Parse`] with
/// everything before the offending line retained.
pub fn read_document(path: impl AsRef<Path>, doc: &mut Document) -> Result<()> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    tracing::debug!(path = %path.display(), bytes = text.len(), "reading document");
    doc.read(text.lines())?;
    Ok(())
}

/// Read the file at `path` into a fresh document.
pub fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let mut doc = Document::new();
    read_document(path, &mut doc)?;
    Ok(doc)
}

/// Reconcile `doc` and persist the result atomically at `path`.
pub fn write_document(path: impl AsRef<Path>, doc: &Document) -> Result<()> {
    let path = path.as_ref();
    let text = doc.write();
    tracing::debug!(path = %path.display(), bytes = text.len(), "writing document");
    write_atomic(path, text.as_bytes())
}
