/// Escapes `input` for use inside a DOT double-quoted string.
pub fn escape_dot(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Wraps `id` in double quotes, escaping as needed.
pub fn quote_id(id: &str) -> String {
    format!("\"{}\"", escape_dot(id))
}

/// Left-justifies `text` to at least `width` characters without truncating.
pub fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(escape_dot(r#"say "hi"\"#), r#"say \"hi\"\\"#);
        assert_eq!(quote_id("A"), "\"A\"");
    }

    #[test]
    fn pads_without_truncating() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_right("", 3), "   ");
        assert_eq!(pad_right("abcdef", 3), "abcdef");
    }
}
