/// Splits the corpus into one chunk per line, dropping blank and
/// whitespace-only lines. Kept lines are not trimmed.
pub fn chunk_lines(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_lines_and_keeps_order() {
        let text = "first\n\n   \nsecond\r\n\tthird \n";
        assert_eq!(chunk_lines(text), vec!["first", "second", "\tthird "]);
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_lines("").is_empty());
        assert!(chunk_lines("\n \n\t\n").is_empty());
    }
}
