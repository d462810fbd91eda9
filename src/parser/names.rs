/// Return the identifier without surrounding double quotes.
pub fn unquote_identifier(ident: &str) -> &str {
    ident
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(ident)
}

/// Normalize an identifier for case-insensitive matching.
///
/// Trims whitespace, removes surrounding double quotes on a single identifier,
/// and lowercases the result.
pub fn normalize_identifier(ident: &str) -> String {
    unquote_identifier(ident.trim()).to_ascii_lowercase()
}

/// Return the text after the last `.` that sits outside quotes.
///
/// Handles dots inside quoted identifiers and string literals, e.g.
/// `"my.schema"."col.name"` yields `"col.name"`. Text without an unquoted dot
/// is returned whole.
pub fn terminal_segment(name: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut start = 0usize;

    for (idx, ch) in name.char_indices() {
        match (quote, ch) {
            (Some(open), _) if ch == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '.') => start = idx + 1,
            (None, _) => {}
        }
    }

    &name[start..]
}

/// True when the ASCII keyword `keyword` starts at byte `idx` of `text` as a whole word.
///
/// The comparison is case-insensitive; the characters on either side must not
/// be identifier characters.
pub fn keyword_at(text: &str, idx: usize, keyword: &str) -> bool {
    let Some(candidate) = text.get(idx..idx + keyword.len()) else {
        return false;
    };
    if !candidate.eq_ignore_ascii_case(keyword) {
        return false;
    }
    let before = text[..idx].chars().next_back();
    let after = text[idx + keyword.len()..].chars().next();
    !before.is_some_and(is_identifier_char) && !after.is_some_and(is_identifier_char)
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
