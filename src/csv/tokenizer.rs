//! Hand-written CSV tokenizer.
//!
//! Turns raw text into rows of unescaped fields. Quoting follows the
//! RFC 4180 convention: a double quote toggles quoted state, a doubled
//! quote inside a quoted field decodes to one literal quote, and commas
//! inside quotes are literal. Spreadsheet exports are messy, so every
//! extracted field is trimmed of surrounding whitespace.
//!
//! Line endings are normalized first (CRLF, CR and LF all terminate a row)
//! and blank lines are dropped entirely rather than becoming empty rows.

/// Split raw CSV text into rows of trimmed field values.
pub fn tokenize(input: &str) -> Vec<Vec<String>> {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(split_line)
        .collect()
}

/// Tokenize a single line, honoring quoted fields and `""` escapes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    // Escaped quote: consume the pair, keep one literal.
                    buf.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                fields.push(buf.trim().to_string());
                buf.clear();
            }
            _ => buf.push(c),
        }
    }

    fields.push(buf.trim().to_string());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(tokenize("a,b,c"), vec![row(&["a", "b", "c"])]);
    }

    #[test]
    fn test_quoted_comma_is_literal() {
        assert_eq!(tokenize(r#"a,"b,c",d"#), vec![row(&["a", "b,c", "d"])]);
    }

    #[test]
    fn test_escaped_quote_decodes_to_one_quote() {
        assert_eq!(
            tokenize(r#""He said ""hi""",x"#),
            vec![row(&[r#"He said "hi""#, "x"])]
        );
    }

    #[test]
    fn test_fields_are_trimmed() {
        assert_eq!(tokenize("  a , b  ,c "), vec![row(&["a", "b", "c"])]);
    }

    #[test]
    fn test_line_ending_variants() {
        let rows = tokenize("a,b\r\nc,d\re,f\ng,h");
        assert_eq!(
            rows,
            vec![row(&["a", "b"]), row(&["c", "d"]), row(&["e", "f"]), row(&["g", "h"])]
        );
    }

    #[test]
    fn test_blank_lines_are_dropped() {
        let rows = tokenize("a,b\n\n   \nc,d\n");
        assert_eq!(rows, vec![row(&["a", "b"]), row(&["c", "d"])]);
    }

    #[test]
    fn test_trailing_empty_field() {
        assert_eq!(tokenize("a,b,"), vec![row(&["a", "b", ""])]);
    }
}
