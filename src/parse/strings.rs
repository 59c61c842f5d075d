//! C string literal helpers: segment scanning and escape handling.

/// Quoted segments found on one line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segments {
    /// Concatenated segment contents, escapes left as written.
    pub text: String,
    /// Number of segments seen.
    pub count: usize,
    /// Whether a `)` follows the last closing quote (the literal list ends
    /// on this line).
    pub closed: bool,
}

/// Scan `line` for `"…"` segments, honouring backslash escapes.
///
/// An unterminated segment contributes what was seen up to the end of the
/// line.
#[must_use]
pub fn segments(line: &str) -> Segments {
    let mut out = Segments::default();
    let mut chars = line.chars();
    let mut after_last = String::new();
    while let Some(c) = chars.next() {
        if c != '"' {
            after_last.push(c);
            continue;
        }
        out.count += 1;
        after_last.clear();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    out.text.push('\\');
                    if let Some(escaped) = chars.next() {
                        out.text.push(escaped);
                    }
                }
                '"' => break,
                other => out.text.push(other),
            }
        }
    }
    out.closed = out.count > 0 && after_last.trim_start().starts_with(')');
    out
}

/// Reverse C escaping for `\n`, `\"` and `\\`; other escapes are kept.
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Escape `text` for a C string literal; the inverse of [`unescape`].
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out
}

/// Title-case an identifier fragment: underscores become spaces and each
/// alphabetic run starts upper-case (`MR_MIME` becomes `Mr Mime`).
#[must_use]
pub fn title_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let mut prev_alpha = false;
    for c in ident.replace('_', " ").trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Split `text` on `sep` outside quotes, parentheses and braces.
#[must_use]
pub fn split_top_level<'a>(text: &'a str, sep: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    let mut escaped = false;
    let mut start = 0;
    let mut iter = text.char_indices();
    while let Some((i, c)) = iter.next() {
        if in_quote {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_quote = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_quote = true,
            '(' | '{' | '[' => depth += 1,
            ')' | '}' | ']' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text.get(i..).is_some_and(|rest| rest.starts_with(sep)) => {
                parts.push(text.get(start..i).unwrap_or_default());
                start = i + sep.len();
                for _ in 1..sep.chars().count() {
                    iter.next();
                }
            }
            _ => {}
        }
    }
    parts.push(text.get(start..).unwrap_or_default());
    parts
}
