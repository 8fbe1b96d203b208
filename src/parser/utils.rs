//! Parser utility functions - bracket-aware searching and name shapes

/// Find first occurrence of a char outside brackets and string literals
pub fn find_char_balanced(s: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut string_quote = '\0';
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == string_quote {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = true;
                string_quote = c;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ if c == target && depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split string by comma, respecting bracket balance and string literals
pub fn split_by_comma_balanced(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = s;
    while let Some(pos) = find_char_balanced(rest, ',') {
        parts.push(rest[..pos].trim().to_string());
        rest = &rest[pos + 1..];
    }
    if !rest.trim().is_empty() {
        parts.push(rest.trim().to_string());
    }
    parts
}

/// Find a whole-word keyword outside brackets and string literals
pub fn find_keyword_balanced(s: &str, keyword: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(offset) = s[search_from..].find(keyword) {
        let i = search_from + offset;
        let end = i + keyword.len();
        let start_ok = s[..i]
            .chars()
            .next_back()
            .map_or(true, |c| !is_ident_char(c));
        let end_ok = s[end..].chars().next().map_or(true, |c| !is_ident_char(c));
        if start_ok && end_ok && is_top_level(s, i) {
            return Some(i);
        }
        search_from = end;
    }
    None
}

/// Whether byte position `pos` lies outside every bracket and string literal
fn is_top_level(s: &str, pos: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut string_quote = '\0';
    for (i, c) in s.char_indices() {
        if i >= pos {
            break;
        }
        if in_string {
            if c == string_quote {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' | '\'' => {
                in_string = true;
                string_quote = c;
            }
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    depth == 0 && !in_string
}

pub fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// `name` -- a single identifier
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_ident_start(c) => chars.all(is_ident_char),
        _ => false,
    }
}

/// `a.b.c` -- identifiers joined by dots
pub fn is_dotted_path(s: &str) -> bool {
    !s.is_empty() && s.split('.').all(is_identifier)
}

/// Something that can stand left of `=`: `x`, `obj.attr`, `items[0]`,
/// or a comma-separated tuple of those.
pub fn is_assignable_target(s: &str) -> bool {
    let parts = split_by_comma_balanced(s);
    !parts.is_empty() && parts.iter().all(|p| is_single_target(p))
}

fn is_single_target(s: &str) -> bool {
    let mut chars = s.char_indices().peekable();
    // Leading identifier
    match chars.peek() {
        Some((_, c)) if is_ident_start(*c) => {}
        _ => return false,
    }
    while let Some((_, c)) = chars.peek() {
        if is_ident_char(*c) {
            chars.next();
        } else {
            break;
        }
    }
    // Trailers: `.attr` or `[index]`
    while let Some((i, c)) = chars.next() {
        match c {
            '.' => {
                match chars.next() {
                    Some((_, c)) if is_ident_start(c) => {}
                    _ => return false,
                }
                while let Some((_, c)) = chars.peek() {
                    if is_ident_char(*c) {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            '[' => {
                let close = match find_matching_bracket(s, i, '[', ']') {
                    Some(close) if close > i + 1 => close,
                    _ => return false,
                };
                while let Some((j, _)) = chars.peek() {
                    if *j <= close {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            _ => return false,
        }
    }
    true
}

/// Index of the bracket closing the `open` at byte `start`, skipping string literals
pub fn find_matching_bracket(s: &str, start: usize, open: char, close: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, c) in s[start..].char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }
        if c == '"' || c == '\'' {
            quote = Some(c);
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return Some(start + i);
            }
        }
    }
    None
}
