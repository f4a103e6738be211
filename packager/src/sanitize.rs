//! Text normalisation and string literal escaping for embedded modules.
//!
//! Module text goes through two steps before it lands in the generated
//! source: [`sanitize`] normalises whitespace, then [`string_literal`] turns
//! the result into a Rust string literal that decodes back to exactly the
//! sanitised text.

/// Normalise module text for embedding.
///
/// Horizontal tabs and carriage returns are each replaced by a single space.
/// Everything else is preserved.
///
/// # Examples
///
/// ```
/// use easyjs_packager::sanitize::sanitize;
///
/// assert_eq!(sanitize("a\tb\r\nc"), "a b \nc");
/// ```
#[must_use]
pub fn sanitize(raw: &str) -> String {
    raw.replace(['\t', '\r'], " ")
}

/// Escape text so it can sit between the quotes of a Rust string literal.
///
/// Backslashes and double quotes are escaped, newlines are kept verbatim so
/// the generated source stays readable, and any other control character is
/// written as a `\u{..}` escape.
#[must_use]
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push('\n'),
            c if c.is_control() => escaped.push_str(&format!("\\u{{{:x}}}", u32::from(c))),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Render `text` as a complete, quoted Rust string literal.
///
/// # Examples
///
/// ```
/// use easyjs_packager::sanitize::string_literal;
///
/// assert_eq!(string_literal(r#"say("hi")"#), r#""say(\"hi\")""#);
/// ```
#[must_use]
pub fn string_literal(text: &str) -> String {
    format!("\"{}\"", escape_literal(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Decode the body of a literal produced by [`escape_literal`].
    fn unescape(body: &str) -> String {
        let mut out = String::new();
        let mut chars = body.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some('u') => {
                    let hex: String = chars
                        .by_ref()
                        .skip(1)
                        .take_while(|&h| h != '}')
                        .collect();
                    let code = u32::from_str_radix(&hex, 16).expect("hex escape");
                    out.push(char::from_u32(code).expect("valid scalar"));
                }
                other => panic!("unexpected escape {other:?}"),
            }
        }
        out
    }

    #[rstest]
    #[case::tab("fn main() {\n\treturn 1\n}", "fn main() {\n return 1\n}")]
    #[case::crlf("a\r\nb\r\n", "a \nb \n")]
    #[case::untouched("say(\"hi\")", "say(\"hi\")")]
    fn sanitize_normalises_only_tabs_and_carriage_returns(
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(sanitize(raw), expected);
    }

    #[rstest]
    #[case::quotes("say(\"hi\")")]
    #[case::backslashes(r"path\to\file \n not a newline")]
    #[case::raw_delimiter("r##\"oops\"## and \"#")]
    #[case::control("bell\u{7}null\u{0}")]
    #[case::unicode("émoji 🦀 and 日本語")]
    #[case::multiline("line one\nline two\n")]
    fn escaped_literal_round_trips(#[case] text: &str) {
        assert_eq!(unescape(&escape_literal(text)), text);
    }

    #[test]
    fn literal_never_contains_unescaped_quote() {
        let literal = string_literal("a\"b\\\"c");
        let body = literal
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .expect("quoted literal");
        let mut previous_backslashes = 0;
        for c in body.chars() {
            if c == '"' {
                assert_eq!(previous_backslashes % 2, 1, "bare quote in {literal}");
            }
            previous_backslashes = if c == '\\' { previous_backslashes + 1 } else { 0 };
        }
    }

    #[test]
    fn control_characters_use_unicode_escapes() {
        assert_eq!(escape_literal("\u{1b}[0m"), "\\u{1b}[0m");
    }
}
