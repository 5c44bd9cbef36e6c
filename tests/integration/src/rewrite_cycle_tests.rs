//! End-to-end read -> mutate -> write-back cycles over real files

use conf_content::{Document, RemoveOutcome, ValueView};
use conf_fs::{load_document, read_document, write_document, Error};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_full_rewrite_cycle() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.conf");
    fs::write(
        &path,
        "# application config\n[net]\nhost = localhost\nport = 8080\n\n[db]\nuser = admin\npassword = hunter2\n",
    )
    .unwrap();

    let mut doc = load_document(&path).unwrap();
    doc.set("net", "host", "0.0.0.0");
    assert_eq!(doc.remove_option("db", "password"), RemoveOutcome::Removed);
    doc.add_section("cache");
    doc.set("cache", "ttl", "60");
    write_document(&path, &doc).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# application config\n[net]\nhost = 0.0.0.0\nport = 8080\n\n[db]\nuser = admin\n\n[cache]\nttl = 60\n"
    );
}

#[test]
fn test_rewrite_cycle_is_stable_on_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("app.conf");
    fs::write(&path, "[s]\nk =\nline1\nline2\n\n\n# tail\n").unwrap();

    let doc = load_document(&path).unwrap();
    write_document(&path, &doc).unwrap();
    let first = fs::read_to_string(&path).unwrap();

    let doc = load_document(&path).unwrap();
    write_document(&path, &doc).unwrap();
    let second = fs::read_to_string(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, "[s]\nk =\nline1\nline2\n\n# tail\n");
}

#[test]
fn test_merge_overlay_then_write() {
    let temp = TempDir::new().unwrap();
    let base = temp.path().join("base.conf");
    let overlay = temp.path().join("overlay.conf");
    let merged = temp.path().join("merged.conf");
    fs::write(&base, "[net]\nhost = localhost\n").unwrap();
    fs::write(&overlay, "[net]\nhost = 0.0.0.0\n").unwrap();

    let mut doc = Document::new();
    read_document(&base, &mut doc).unwrap();
    read_document(&overlay, &mut doc).unwrap();
    assert_eq!(doc.get("net", "host"), Some(ValueView::Single("0.0.0.0")));
    write_document(&merged, &doc).unwrap();

    // both original blocks survive, each re-rendered from merged data
    assert_eq!(
        fs::read_to_string(&merged).unwrap(),
        "[net]\nhost = 0.0.0.0\n[net]\nhost = 0.0.0.0\n"
    );
}

#[test]
fn test_missing_file_reports_not_found() {
    let temp = TempDir::new().unwrap();
    let err = load_document(temp.path().join("absent.conf")).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}
