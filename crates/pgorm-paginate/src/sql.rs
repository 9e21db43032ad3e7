//! Lightweight SQL text helpers used by the dialects.
//!
//! These scan SQL lexically (string literals, quoted identifiers, comments and
//! parenthesis depth); they do not parse it.

/// A run of bytes that is opaque to the word scanner.
enum Run {
    /// String literal or quoted identifier, ending before the given offset.
    Quoted(usize),
    /// Line or block comment, ending before the given offset.
    Comment(usize),
}

/// The literal, quoted identifier or comment starting at byte `i`, if any.
fn run_at(sql: &str, i: usize) -> Option<Run> {
    let bytes = sql.as_bytes();
    match bytes[i] {
        open @ (b'\'' | b'"' | b'`' | b'[') => {
            let close = if open == b'[' { b']' } else { open };
            let mut j = i + 1;
            while j < bytes.len() {
                if bytes[j] == close {
                    // doubled delimiter is an escape
                    if bytes.get(j + 1) == Some(&close) {
                        j += 2;
                        continue;
                    }
                    return Some(Run::Quoted(j + 1));
                }
                j += 1;
            }
            Some(Run::Quoted(bytes.len()))
        }
        b'-' if bytes.get(i + 1) == Some(&b'-') => Some(Run::Comment(
            sql[i..].find('\n').map_or(bytes.len(), |p| i + p + 1),
        )),
        b'/' if bytes.get(i + 1) == Some(&b'*') => Some(Run::Comment(
            sql[i + 2..].find("*/").map_or(bytes.len(), |p| i + 2 + p + 2),
        )),
        _ => None,
    }
}

/// Trim surrounding whitespace plus trailing comments and statement terminators.
///
/// The result never ends inside a comment, so text appended to it stays part
/// of the statement.
pub(crate) fn trim_statement(sql: &str) -> &str {
    let bytes = sql.as_bytes();
    let mut end = 0;
    let mut i = 0;
    while i < bytes.len() {
        match run_at(sql, i) {
            Some(Run::Quoted(next)) => {
                end = next;
                i = next;
            }
            Some(Run::Comment(next)) => i = next,
            None => {
                if bytes[i] != b';' && !bytes[i].is_ascii_whitespace() {
                    end = i + 1;
                }
                i += 1;
            }
        }
    }
    sql[..end].trim_start()
}

/// Whether `s` holds nothing but whitespace and comments.
fn is_blank(s: &str) -> bool {
    let mut i = 0;
    while i < s.len() {
        match run_at(s, i) {
            Some(Run::Comment(next)) => i = next,
            Some(Run::Quoted(_)) => return false,
            None if s.as_bytes()[i].is_ascii_whitespace() => i += 1,
            None => return false,
        }
    }
    true
}

/// A bare word found outside literals, comments and parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Word<'a> {
    pub offset: usize,
    pub text: &'a str,
}

impl Word<'_> {
    pub fn is(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }

    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Collect top-level words (depth 0) in order of appearance.
pub(crate) fn top_level_words(sql: &str) -> Vec<Word<'_>> {
    let bytes = sql.as_bytes();
    let mut words = Vec::new();
    let mut depth: usize = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(Run::Quoted(next) | Run::Comment(next)) = run_at(sql, i) {
            i = next;
            continue;
        }
        match bytes[i] {
            b'(' => {
                depth += 1;
                i += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'_' | b'$')) {
                    i += 1;
                }
                if depth == 0 && !bytes[start].is_ascii_digit() {
                    words.push(Word {
                        offset: start,
                        text: &sql[start..i],
                    });
                }
            }
            _ => i += 1,
        }
    }
    words
}

/// Offset of the last top-level `ORDER BY`, if any.
///
/// The two keywords may only be separated by whitespace and comments.
pub(crate) fn find_order_by(sql: &str) -> Option<usize> {
    let words = top_level_words(sql);
    words
        .windows(2)
        .rev()
        .find(|pair| {
            pair[0].is("ORDER") && pair[1].is("BY") && is_blank(&sql[pair[0].end()..pair[1].offset])
        })
        .map(|pair| pair[0].offset)
}

/// Remove a trailing top-level `ORDER BY` clause.
///
/// The clause is kept when it is followed by `OFFSET`/`FETCH`/`LIMIT`, since it
/// then determines which rows are returned.
pub(crate) fn strip_trailing_order_by(sql: &str) -> &str {
    let Some(pos) = find_order_by(sql) else {
        return sql;
    };
    let limited = top_level_words(&sql[pos..])
        .iter()
        .any(|w| w.is("OFFSET") || w.is("FETCH") || w.is("LIMIT"));
    if limited { sql } else { trim_statement(&sql[..pos]) }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

pub(crate) fn truncate_for_log(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}
