//! Write-back reconciliation
//!
//! Re-walks the original lines once, applying staged removals and value
//! updates in place, inserting staged new options at the end of their
//! section's option block, and appending staged new sections at end of
//! file. Comments pass through verbatim; runs of blank lines collapse to
//! at most one. Option lines are always re-rendered from parsed data, so
//! value updates need no separate staging.
//!
//! Multi-line values are re-emitted one value per source continuation
//! line, so comments interleaved in a value run keep their position; any
//! values left over when the run ends (the stored list can be longer
//! than the source run after a merge) are drained at the run boundary.

use std::collections::{HashMap, HashSet};

use crate::document::Document;
use crate::line::{Classifier, LineKind};

pub(crate) fn render(doc: &Document) -> String {
    let (option_totals, header_totals) = line_totals(doc);
    let mut out = String::new();
    let mut classifier = Classifier::new();
    let mut current_section: Option<&str> = None;
    let mut options_seen: HashMap<&str, usize> = HashMap::new();
    let mut headers_seen: HashMap<&str, usize> = HashMap::new();
    let mut blank_run = 0usize;
    let mut flushed: HashSet<&str> = HashSet::new();
    // values still to emit in place for the option line being walked
    let mut run_values: &[String] = &[];
    // section whose staged options flush once its current value run ends
    let mut pending_flush: Option<&str> = None;

    for line in &doc.original_lines {
        match classifier.classify(line) {
            LineKind::Section(name) => {
                end_run(
                    doc,
                    &mut run_values,
                    &mut pending_flush,
                    &headers_seen,
                    &header_totals,
                    &mut out,
                    &mut flushed,
                    &mut blank_run,
                );
                if let Some(prev) = current_section {
                    maybe_flush(
                        doc,
                        prev,
                        &headers_seen,
                        &header_totals,
                        &mut out,
                        &mut flushed,
                        &mut blank_run,
                    );
                }
                current_section = Some(name);
                *headers_seen.entry(name).or_insert(0) += 1;
                if !doc.is_section_removed(name) {
                    push_line(&mut out, line);
                    blank_run = 0;
                }
                if option_totals.get(name).copied().unwrap_or(0) == 0 {
                    maybe_flush(
                        doc,
                        name,
                        &headers_seen,
                        &header_totals,
                        &mut out,
                        &mut flushed,
                        &mut blank_run,
                    );
                }
            }
            LineKind::Option { key, .. } => {
                end_run(
                    doc,
                    &mut run_values,
                    &mut pending_flush,
                    &headers_seen,
                    &header_totals,
                    &mut out,
                    &mut flushed,
                    &mut blank_run,
                );
                match current_section {
                    // Option line with no enclosing section: the malformed
                    // tail of a halted read. Kept verbatim.
                    None => {
                        push_line(&mut out, line);
                        blank_run = 0;
                    }
                    Some(section) => {
                        let seen = {
                            let count = options_seen.entry(section).or_insert(0);
                            *count += 1;
                            *count
                        };
                        let dropped = doc.is_section_removed(section)
                            || doc.is_option_removed(section, key);
                        if !dropped {
                            match doc.data.get(section).and_then(|options| options.get(key)) {
                                Some(values) => match values.as_slice() {
                                    [single] if !single.is_empty() => {
                                        out.push_str(key);
                                        out.push_str(" = ");
                                        out.push_str(single);
                                        out.push('\n');
                                    }
                                    [] | [_] => {
                                        out.push_str(key);
                                        out.push_str(" =\n");
                                    }
                                    many => {
                                        out.push_str(key);
                                        out.push_str(" =\n");
                                        run_values = many;
                                    }
                                },
                                None => push_line(&mut out, line),
                            }
                            blank_run = 0;
                        }
                        if seen >= option_totals.get(section).copied().unwrap_or(0) {
                            pending_flush = Some(section);
                        }
                    }
                }
            }
            LineKind::Value(_) => {
                // one stored value per source continuation line, keeping
                // interleaved comments in place
                if let Some((value, rest)) = run_values.split_first() {
                    push_line(&mut out, value);
                    blank_run = 0;
                    run_values = rest;
                }
            }
            LineKind::Other => {}
            LineKind::Blank => {
                end_run(
                    doc,
                    &mut run_values,
                    &mut pending_flush,
                    &headers_seen,
                    &header_totals,
                    &mut out,
                    &mut flushed,
                    &mut blank_run,
                );
                blank_run += 1;
                if blank_run < 2 {
                    out.push('\n');
                }
            }
            LineKind::Comment => {
                push_line(&mut out, line);
                blank_run = 0;
            }
        }
    }

    end_run(
        doc,
        &mut run_values,
        &mut pending_flush,
        &headers_seen,
        &header_totals,
        &mut out,
        &mut flushed,
        &mut blank_run,
    );
    if let Some(section) = current_section {
        flush_new_options(doc, section, &mut out, &mut flushed, &mut blank_run);
    }

    for section in &doc.pending_new_sections {
        tracing::debug!(section = %section, "appending staged section");
        blank_run += 1;
        if blank_run < 2 {
            out.push('\n');
        }
        out.push('[');
        out.push_str(section);
        out.push_str("]\n");
        blank_run = 0;
        if let Some(options) = doc.pending_new_options.get(section) {
            for (key, values) in options {
                push_option(&mut out, key, values);
            }
        }
    }

    out
}

/// Count original option lines and header lines per section, with the
/// same stateful classification the main pass uses. The main pass
/// flushes a section's staged new options once its option-line count is
/// exhausted, which places them at the end of the existing option block
/// rather than at end of file; the header count keys that flush off the
/// section's final block when the same name heads several blocks.
fn line_totals(doc: &Document) -> (HashMap<&str, usize>, HashMap<&str, usize>) {
    let mut options: HashMap<&str, usize> = HashMap::new();
    let mut headers: HashMap<&str, usize> = HashMap::new();
    let mut classifier = Classifier::new();
    let mut current_section: Option<&str> = None;

    for line in &doc.original_lines {
        match classifier.classify(line) {
            LineKind::Section(name) => {
                current_section = Some(name);
                options.entry(name).or_insert(0);
                *headers.entry(name).or_insert(0) += 1;
            }
            LineKind::Option { .. } => {
                if let Some(section) = current_section {
                    *options.entry(section).or_insert(0) += 1;
                }
            }
            _ => {}
        }
    }
    (options, headers)
}

/// Close the current value run: drain values the source run was too
/// short to carry, then flush any staged-option insertion that was
/// waiting for the run to end.
#[allow(clippy::too_many_arguments)]
fn end_run<'a>(
    doc: &'a Document,
    run_values: &mut &'a [String],
    pending_flush: &mut Option<&'a str>,
    headers_seen: &HashMap<&'a str, usize>,
    header_totals: &HashMap<&'a str, usize>,
    out: &mut String,
    flushed: &mut HashSet<&'a str>,
    blank_run: &mut usize,
) {
    for value in run_values.iter() {
        push_line(out, value);
        *blank_run = 0;
    }
    *run_values = &[];
    if let Some(section) = pending_flush.take() {
        maybe_flush(
            doc,
            section,
            headers_seen,
            header_totals,
            out,
            flushed,
            blank_run,
        );
    }
}

/// Flush a section's staged new options only once its final header block
/// has been reached; earlier blocks of a repeated section name leave the
/// insertion to the last one.
fn maybe_flush<'a>(
    doc: &'a Document,
    section: &'a str,
    headers_seen: &HashMap<&'a str, usize>,
    header_totals: &HashMap<&'a str, usize>,
    out: &mut String,
    flushed: &mut HashSet<&'a str>,
    blank_run: &mut usize,
) {
    let seen = headers_seen.get(section).copied().unwrap_or(0);
    let total = header_totals.get(section).copied().unwrap_or(0);
    if seen >= total {
        flush_new_options(doc, section, out, flushed, blank_run);
    }
}

/// Emit a section's staged new options, once.
fn flush_new_options<'a>(
    doc: &'a Document,
    section: &'a str,
    out: &mut String,
    flushed: &mut HashSet<&'a str>,
    blank_run: &mut usize,
) {
    if !flushed.insert(section) || doc.is_section_removed(section) {
        return;
    }
    let Some(options) = doc.pending_new_options.get(section) else {
        return;
    };
    for (key, values) in options {
        push_option(out, key, values);
        *blank_run = 0;
    }
}

/// Render an option from its stored values in bulk: `key = value` for a
/// single value, `key =` plus one line per value for multi-line values,
/// bare `key =` when no value is stored. Used for staged insertions,
/// which have no source run to interleave with.
fn push_option(out: &mut String, key: &str, values: &[String]) {
    match values {
        [single] if !single.is_empty() => {
            out.push_str(key);
            out.push_str(" = ");
            out.push_str(single);
            out.push('\n');
        }
        [] | [_] => {
            out.push_str(key);
            out.push_str(" =\n");
        }
        many => {
            out.push_str(key);
            out.push_str(" =\n");
            for value in many {
                out.push_str(value);
                out.push('\n');
            }
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}
