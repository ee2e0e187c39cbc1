//! Line tokenizer for delimited text

/// Split one line on commas, honoring double-quoted fields
pub fn split_line(line: &str) -> Vec<String> {
    split_line_with(line, b',')
}

/// Split one line on `delimiter`, honoring double-quoted fields
///
/// Every `"` flips the inside-quotes flag and is dropped. A delimiter inside
/// quotes is literal text. The trailing field is always emitted, so the
/// result is never empty: `""` yields `[""]` and `"a,"` yields `["a", ""]`.
pub fn split_line_with(line: &str, delimiter: u8) -> Vec<String> {
    let delimiter = delimiter as char;
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => fields.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Trimmed field at `index`, or `""` when the line is too short
pub fn field(fields: &[String], index: usize) -> &str {
    fields.get(index).map(|f| f.trim()).unwrap_or("")
}

/// Trimmed field at `index`, or `default` when absent or blank
pub fn field_or<'a>(fields: &'a [String], index: usize, default: &'a str) -> &'a str {
    match field(fields, index) {
        "" => default,
        value => value,
    }
}

/// Lines that contain something other than whitespace
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple() {
        assert_eq!(split_line("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_quoted_delimiter() {
        assert_eq!(split_line("a,\"b,c\",d"), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_split_keeps_trailing_empty_field() {
        assert_eq!(split_line("a,b,"), vec!["a", "b", ""]);
        assert_eq!(split_line(",,"), vec!["", "", ""]);
    }

    #[test]
    fn test_split_empty_line() {
        assert_eq!(split_line(""), vec![""]);
    }

    #[test]
    fn test_split_rejoins_unquoted_lines() {
        for line in ["x", ",lead", "1,Jane Doe,,KA,550", " padded , cells "] {
            assert_eq!(split_line(line).join(","), line);
        }
    }

    #[test]
    fn test_split_unterminated_quote_runs_to_end() {
        assert_eq!(split_line("a,\"b,c"), vec!["a", "b,c"]);
    }

    #[test]
    fn test_split_quote_after_padding() {
        assert_eq!(split_line("a, \"b,c\",d"), vec!["a", " b,c", "d"]);
    }

    #[test]
    fn test_split_quote_inside_field() {
        assert_eq!(split_line("a,x\"b,c\"y,d"), vec!["a", "xb,cy", "d"]);
    }

    #[test]
    fn test_split_doubled_quote_is_two_toggles() {
        assert_eq!(split_line("\"a\"\"b\",c"), vec!["ab", "c"]);
    }

    #[test]
    fn test_split_other_delimiter() {
        assert_eq!(split_line_with("a;\"b;c\";d", b';'), vec!["a", "b;c", "d"]);
    }

    #[test]
    fn test_field_helpers() {
        let fields = split_line(" a ,, c");
        assert_eq!(field(&fields, 0), "a");
        assert_eq!(field(&fields, 1), "");
        assert_eq!(field(&fields, 9), "");
        assert_eq!(field_or(&fields, 1, "0"), "0");
        assert_eq!(field_or(&fields, 2, "0"), "c");
    }

    #[test]
    fn test_non_blank_lines() {
        let lines: Vec<&str> = non_blank_lines("a\n\n  \r\nb\n").collect();
        assert_eq!(lines, vec!["a", "b"]);
    }
}
