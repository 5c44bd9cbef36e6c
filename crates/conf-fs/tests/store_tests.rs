//! Tests for the path-keyed read/write boundary

use conf_content::{Document, ValueView};
use conf_fs::{load_document, read_document, write_document, Error};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_read_document_missing_path_is_not_found() {
    let temp = TempDir::new().unwrap();
    let mut doc = Document::new();

    let err = read_document(temp.path().join("absent.conf"), &mut doc).unwrap_err();

    assert!(matches!(err, Error::NotFound { .. }));
    // no state change at all
    assert!(doc.original_lines().is_empty());
    assert!(doc.section_names().is_empty());
}

#[test]
fn test_read_document_malformed_keeps_partial_state() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("bad.conf");
    fs::write(&path, "# prologue\nstray = 1\n").unwrap();

    let mut doc = Document::new();
    let err = read_document(&path, &mut doc).unwrap_err();

    assert!(matches!(err, Error::Parse(_)));
    assert!(doc.is_malformed());
    assert_eq!(doc.original_lines(), &["# prologue", "stray = 1"]);
}

#[test]
fn test_load_document_parses_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.conf");
    fs::write(&path, "[net]\nhost = localhost\n").unwrap();

    let doc = load_document(&path).unwrap();

    assert_eq!(
        doc.get("net", "host"),
        Some(ValueView::Single("localhost"))
    );
}

#[test]
fn test_crlf_file_parses_like_lf() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dos.conf");
    fs::write(&path, "[net]\r\nhost = localhost\r\n").unwrap();

    let doc = load_document(&path).unwrap();

    assert_eq!(
        doc.get("net", "host"),
        Some(ValueView::Single("localhost"))
    );
}

#[test]
fn test_read_document_merges_files() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("base.conf");
    let overlay = temp.path().join("overlay.conf");
    fs::write(&base, "[net]\nhost = localhost\n").unwrap();
    fs::write(&overlay, "[net]\nhost = 0.0.0.0\nport = 80\n").unwrap();

    let mut doc = Document::new();
    read_document(&base, &mut doc).unwrap();
    read_document(&overlay, &mut doc).unwrap();

    assert_eq!(doc.get("net", "host"), Some(ValueView::Single("0.0.0.0")));
    assert_eq!(doc.get("net", "port"), Some(ValueView::Single("80")));
}

#[test]
fn test_write_document_persists_reconciled_text() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.conf");
    fs::write(&path, "[net]\nhost = localhost\nport = 8080\n").unwrap();

    let mut doc = load_document(&path).unwrap();
    doc.set("net", "host", "0.0.0.0");
    doc.remove_option("net", "port");
    write_document(&path, &doc).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "[net]\nhost = 0.0.0.0\n"
    );
}
