//! Region replacement in hand-authored files.
//!
//! Input is always the backup text. Lines outside the managed region are
//! passed through byte-identical, including their original line endings.
use anyhow::Result;

use crate::error::GenerationError;

/// A literal line matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    /// Line contains the text anywhere.
    Contains(&'a str),
    /// Line starts with the text (leading whitespace is not skipped).
    StartsWith(&'a str),
    /// Line, trimmed, starts with the text.
    TrimmedStartsWith(&'a str),
}

impl Marker<'_> {
    /// Whether `line` matches.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        match self {
            Self::Contains(text) => line.contains(text),
            Self::StartsWith(text) => line.starts_with(text),
            Self::TrimmedStartsWith(text) => line.trim_start().starts_with(text),
        }
    }

    const fn text(&self) -> &str {
        match self {
            Self::Contains(text) | Self::StartsWith(text) | Self::TrimmedStartsWith(text) => text,
        }
    }
}

/// How a targeted line is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit<'a> {
    /// Replace the line with these lines.
    Replace(&'a [String]),
    /// Keep the line and insert these lines after it.
    Append(&'a [String]),
}

fn find(
    lines: &[&str],
    from: usize,
    marker: &Marker<'_>,
    file: &str,
) -> Result<usize, GenerationError> {
    lines
        .iter()
        .skip(from)
        .position(|line| marker.matches(line))
        .map(|offset| from + offset)
        .ok_or_else(|| GenerationError::MarkerNotFound {
            file: file.to_string(),
            marker: marker.text().to_string(),
        })
}

fn push_lines(out: &mut String, lines: &[String]) {
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
}

/// Replace the lines strictly between the last of `anchors` and `end`.
///
/// Anchors are located in sequence, each at or after the line following the
/// previous one; `end` is the first match after the last anchor. Both the
/// anchor and end lines are kept.
///
/// # Errors
///
/// Returns [`GenerationError::MarkerNotFound`] naming the first marker that
/// could not be located.
pub fn splice_region(
    text: &str,
    file: &str,
    anchors: &[Marker<'_>],
    end: &Marker<'_>,
    body: &[String],
) -> Result<String> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut at = 0;
    let mut last = None;
    for anchor in anchors {
        let found = find(&lines, at, anchor, file)?;
        last = Some(found);
        at = found + 1;
    }
    let stop = find(&lines, at, end, file)?;

    let mut out = String::with_capacity(text.len());
    for (i, line) in lines.iter().enumerate() {
        if last.is_some_and(|start| i > start) && i < stop {
            if i == at {
                push_lines(&mut out, body);
            }
            continue;
        }
        if i == stop && at == stop {
            push_lines(&mut out, body);
        }
        out.push_str(line);
    }
    Ok(out)
}

/// Rewrite the first line matching `target` that follows the `scope` line.
///
/// # Errors
///
/// Returns [`GenerationError::MarkerNotFound`] when either marker is absent.
pub fn edit_line(
    text: &str,
    file: &str,
    scope: &Marker<'_>,
    target: &Marker<'_>,
    edit: Edit<'_>,
) -> Result<String> {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let start = find(&lines, 0, scope, file)?;
    let hit = find(&lines, start + 1, target, file)?;

    let mut out = String::with_capacity(text.len());
    for (i, line) in lines.iter().enumerate() {
        if i != hit {
            out.push_str(line);
            continue;
        }
        match edit {
            Edit::Replace(replacement) => push_lines(&mut out, replacement),
            Edit::Append(extra) => {
                out.push_str(line);
                if !line.ends_with('\n') {
                    out.push('\n');
                }
                push_lines(&mut out, extra);
            }
        }
    }
    Ok(out)
}

/// Collapse the run of lines matching `matcher` into one `replacement`
/// line at the position of the first match. Returns the text unchanged
/// when nothing matches.
#[must_use]
pub fn collapse_lines(text: &str, matcher: &Marker<'_>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut inserted = false;
    for line in text.split_inclusive('\n') {
        if matcher.matches(line) {
            if !inserted {
                out.push_str(replacement);
                out.push('\n');
                inserted = true;
            }
            continue;
        }
        out.push_str(line);
    }
    out
}
