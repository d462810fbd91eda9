use crate::parser::names::{keyword_at, terminal_segment, unquote_identifier};

/// Parenthesis depth and quote state while walking query text.
///
/// Characters inside single-quoted literals or double-quoted identifiers never
/// change the depth and are never reported as top-level.
#[derive(Debug, Default, Clone, Copy)]
struct DepthTracker {
    depth: usize,
    quote: Option<char>,
}

impl DepthTracker {
    fn in_quotes(&self) -> bool {
        self.quote.is_some()
    }

    /// Advance over `ch`, returning `true` when it is a structural character at
    /// depth 0 outside quotes.
    fn step(&mut self, ch: char) -> bool {
        if let Some(open) = self.quote {
            if ch == open {
                self.quote = None;
            }
            return false;
        }
        match ch {
            '\'' | '"' => {
                self.quote = Some(ch);
                false
            }
            '(' => {
                self.depth += 1;
                false
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                false
            }
            _ => self.depth == 0,
        }
    }
}

/// Locate the projection list of the first `SELECT ... FROM` clause.
///
/// The closing `FROM` is the first one at the same parenthesis depth as the
/// `SELECT` keyword, so sub-selects nested in the projection keep their own
/// `FROM`. A leading `DISTINCT` is skipped. Returns `None` when the query has
/// no such clause.
pub fn projection_list(query: &str) -> Option<&str> {
    let mut tracker = DepthTracker::default();
    let mut select: Option<(usize, usize)> = None;

    for (idx, ch) in query.char_indices() {
        let depth = tracker.depth;
        let quoted = tracker.in_quotes();
        tracker.step(ch);
        if quoted {
            continue;
        }

        match select {
            None => {
                if keyword_at(query, idx, "select") {
                    select = Some((idx + "select".len(), depth));
                }
            }
            Some((start, select_depth)) => {
                if tracker.depth < select_depth {
                    // The enclosing sub-select closed before any FROM.
                    return None;
                }
                if depth == select_depth && idx > start && keyword_at(query, idx, "from") {
                    return Some(strip_distinct(&query[start..idx]));
                }
            }
        }
    }

    None
}

fn strip_distinct(projection: &str) -> &str {
    let trimmed = projection.trim_start();
    if keyword_at(trimmed, 0, "distinct") {
        &trimmed["distinct".len()..]
    } else {
        projection
    }
}

/// Split a projection list on commas at parenthesis depth 0.
///
/// Items are trimmed; empty items (e.g. from a trailing comma) are dropped.
pub fn split_projection(projection: &str) -> Vec<&str> {
    let mut tracker = DepthTracker::default();
    let mut items = Vec::new();
    let mut start = 0usize;

    for (idx, ch) in projection.char_indices() {
        if tracker.step(ch) && ch == ',' {
            items.push(projection[start..idx].trim());
            start = idx + 1;
        }
    }
    items.push(projection[start..].trim());

    items.retain(|item| !item.is_empty());
    items
}

/// Return the text following the last whitespace-delimited `AS` in `item`.
///
/// The search ignores nesting: an `AS` inside a parenthesized sub-select is
/// still a candidate when no later one exists.
pub fn alias_of(item: &str) -> Option<&str> {
    let bytes = item.as_bytes();
    if bytes.len() < 4 {
        return None;
    }

    (1..bytes.len() - 2)
        .rev()
        .find(|&idx| {
            bytes[idx - 1].is_ascii_whitespace()
                && bytes[idx..idx + 2].eq_ignore_ascii_case(b"as")
                && bytes[idx + 2].is_ascii_whitespace()
        })
        .map(|idx| item[idx + 2..].trim())
}

/// Derive the output column name of a single projection item.
///
/// - `expr AS alias` → `alias`
/// - `table.column` → `column`
/// - surrounding double quotes are removed from the result
pub fn column_name(item: &str) -> String {
    let name = match alias_of(item) {
        Some(alias) => alias,
        None => terminal_segment(item.trim()),
    };
    unquote_identifier(name.trim()).to_string()
}

/// Infer the ordered output column names of a query from its text.
///
/// Returns an empty list when the query has no `SELECT ... FROM` clause, which
/// callers treat as "no inferred schema".
///
/// Only simple projection items are guaranteed correct: an item whose nested
/// expression contains its own `AS` but carries no outer alias picks up the
/// inner one.
pub fn extract_columns(query: &str) -> Vec<String> {
    let Some(projection) = projection_list(query) else {
        return Vec::new();
    };

    split_projection(projection)
        .into_iter()
        .map(column_name)
        .filter(|name| !name.is_empty())
        .collect()
}
