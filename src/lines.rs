//! Line-level cleanup of transformed text.

/// Collapse every run of blank lines into a single blank line.
///
/// A line is blank if it is empty or whitespace only; the first blank line of
/// a run is kept as is. The text is split on `\n`, so a trailing newline counts
/// as a final empty line.
///
/// ```
/// use console_strip::lines::collapse_blank_lines;
///
/// let text = "a\n\n  \n\t\nb\n";
/// assert_eq!(collapse_blank_lines(text), "a\n\nb\n");
///
/// assert_eq!(collapse_blank_lines("\n"), "");
/// assert_eq!(collapse_blank_lines("a\n\n"), "a\n");
/// ```
pub fn collapse_blank_lines(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_was_blank = false;

    for (i, line) in text
        .split('\n')
        .filter(|line| {
            let blank = line.trim().is_empty();
            let keep = !(blank && previous_was_blank);
            previous_was_blank = blank;
            keep
        })
        .enumerate()
    {
        if i != 0 {
            output.push('\n');
        }
        output.push_str(line);
    }

    output
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_single_blank_lines() {
        let text = "a\n\nb\n\nc";
        assert_eq!(text, collapse_blank_lines(text));
    }

    #[test]
    fn collapses_long_runs() {
        assert_eq!("a\n\nb", collapse_blank_lines("a\n\n\n\n\n\nb"));
        assert_eq!("\na", collapse_blank_lines("\n\n\na"));
    }

    #[test]
    fn keeps_first_blank_line_of_run() {
        // Whitespace from the first line of the run survives.
        assert_eq!("a\n  \nb", collapse_blank_lines("a\n  \n\t\n\nb"));
    }

    #[test]
    fn crlf_blank_lines() {
        assert_eq!("a\r\n\r\nb\r\n", collapse_blank_lines("a\r\n\r\n\r\n\r\nb\r\n"));
    }

    #[test]
    fn empty() {
        assert_eq!("", collapse_blank_lines(""));
    }
}
