//! Output cleaning applied to every model reply before it is shown or stored.
//!
//! The model is asked for plain prose but sometimes wraps parts of a reply
//! in Markdown code fences or prefixes it with a bare `json` tag. Cleaning
//! is best effort and never fails:
//!
//! 1. every fenced block, from an opening ```` ``` ```` to the next closing
//!    one and across lines, is removed together with its content;
//! 2. a case-insensitive `json` at the very start of what remains is
//!    removed along with the whitespace after it;
//! 3. surrounding whitespace is trimmed.
//!
//! An unterminated fence is left in place.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("fence pattern is valid"));
static LEADING_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\Ajson\s*").expect("json pattern is valid"));

pub fn clean_reply(raw: &str) -> String {
    let without_fences = FENCED_BLOCK.replace_all(raw, "");
    let without_tag = LEADING_JSON.replace(&without_fences, "");
    without_tag.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_only_trimmed() {
        assert_eq!(clean_reply("  Hello there!\n"), "Hello there!");
        assert_eq!(clean_reply(""), "");
    }

    #[test]
    fn removes_fenced_blocks_across_lines() {
        let raw = "Before\n```json\n{\"a\": 1}\n```\nAfter";
        assert_eq!(clean_reply(raw), "Before\n\nAfter");
    }

    #[test]
    fn removes_each_block_separately() {
        let raw = "A ```x``` B ```y``` C";
        assert_eq!(clean_reply(raw), "A  B  C");
    }

    #[test]
    fn strips_leading_json_tag_case_insensitively() {
        assert_eq!(clean_reply("JSON\n  The IONIQ 5 has 507 km of range."), "The IONIQ 5 has 507 km of range.");
        assert_eq!(clean_reply("json{\"x\":1}"), "{\"x\":1}");
    }

    #[test]
    fn json_in_the_middle_is_kept() {
        assert_eq!(clean_reply("Send me json please"), "Send me json please");
    }

    #[test]
    fn unterminated_fence_is_kept() {
        assert_eq!(clean_reply("```rust\nfn main() {}"), "```rust\nfn main() {}");
    }
}
