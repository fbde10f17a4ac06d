// src/parse.rs

/// One physical data line: one string per column.
pub type Row = Vec<String>;

/// Split `text` into rows of fields.
///
/// Quoting follows the usual CSV rules: `"` opens a quoted span, `""` inside a
/// span is a literal quote, and delimiters or line breaks inside a span are
/// data. A bare `"` in the middle of a field also opens a span. `\r` outside a
/// span is dropped, so `\r\n` and `\n` endings parse the same.
///
/// Never fails. Unterminated spans run to the end of input, and a trailing
/// empty line contributes no row.
pub fn parse_csv(text: &str) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut row: Row = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut current)),
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut current));
                rows.push(std::mem::take(&mut row));
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() || !row.is_empty() {
        row.push(current);
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Row> {
        raw.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn empty_input_has_no_rows() {
        assert!(parse_csv("").is_empty());
    }

    #[test]
    fn plain_fields_survive_a_join_and_reparse() {
        let expected = rows(&[&["boss", "place", "HP"], &["A", "Cave", "50"], &["B", "", "30"]]);
        let text = expected
            .iter()
            .map(|r| r.join(","))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(parse_csv(&text), expected);
        assert_eq!(parse_csv(&format!("{text}\n")), expected);
    }

    #[test]
    fn doubled_quotes_inside_a_span_are_literal() {
        let parsed = parse_csv(r#"x,"a,""b""""#);
        assert_eq!(parsed, rows(&[&["x", r#"a,"b""#]]));
    }

    #[test]
    fn quoted_newline_stays_in_one_field() {
        let parsed = parse_csv("name,note\nA,\"line one\nline two\"\nB,plain\n");
        assert_eq!(
            parsed,
            rows(&[
                &["name", "note"],
                &["A", "line one\nline two"],
                &["B", "plain"],
            ])
        );
    }

    #[test]
    fn missing_trailing_newline_does_not_add_a_row() {
        assert_eq!(parse_csv("a,b\nc,d"), rows(&[&["a", "b"], &["c", "d"]]));
    }

    #[test]
    fn crlf_endings_match_lf_endings() {
        assert_eq!(parse_csv("a,b\r\nc,d\r\n"), parse_csv("a,b\nc,d\n"));
    }

    #[test]
    fn carriage_return_inside_quotes_is_kept() {
        assert_eq!(parse_csv("\"a\r\nb\"\n"), rows(&[&["a\r\nb"]]));
    }

    #[test]
    fn bare_quote_mid_field_opens_a_span() {
        // The quote opens a span that swallows the comma.
        assert_eq!(parse_csv("ab\"c,d\"e,f\n"), rows(&[&["abc,de", "f"]]));
    }

    #[test]
    fn unterminated_span_runs_to_end_of_input() {
        assert_eq!(parse_csv("a,\"b,c\nd"), rows(&[&["a", "b,c\nd"]]));
    }

    #[test]
    fn trailing_comma_yields_an_empty_last_field() {
        assert_eq!(parse_csv("a,\n"), rows(&[&["a", ""]]));
        assert_eq!(parse_csv("a,"), rows(&[&["a", ""]]));
    }

    #[test]
    fn blank_lines_in_the_middle_are_single_empty_fields() {
        assert_eq!(parse_csv("a\n\nb\n"), rows(&[&["a"], &[""], &["b"]]));
    }

    #[test]
    fn quoted_empty_field_at_end_of_input_is_flushed() {
        // `""` leaves the field empty but the row already holds "a".
        assert_eq!(parse_csv("a,\"\""), rows(&[&["a", ""]]));
    }

    #[test]
    fn multibyte_labels_parse_cleanly() {
        let parsed = parse_csv("ボス戦名,出現場所\nりゅうおう,りゅうおうの城\n");
        assert_eq!(
            parsed,
            rows(&[&["ボス戦名", "出現場所"], &["りゅうおう", "りゅうおうの城"]])
        );
    }
}
