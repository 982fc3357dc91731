//! Telegram MarkdownV2 helpers.
//!
//! MarkdownV2 treats most punctuation as markup, and alias addresses are full
//! of `.`, `+` and `-`, so everything user-derived goes through these helpers.

/// Escapes markdown special characters for MarkdownV2 parsing mode
///
/// # Example
/// ```
/// use gmail_alias_bot::utils::markdown::escape_markdown;
///
/// let escaped = escape_markdown("john.doe+tag@gmail.com");
/// assert_eq!(escaped, "john\\.doe\\+tag@gmail\\.com");
/// ```
pub fn escape_markdown(text: &str) -> String {
    const SPECIAL: &[char] = &[
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escapes text placed inside a ``` block, where only `` ` `` and `\` are special.
pub fn escape_code(text: &str) -> String {
    text.replace('\\', "\\\\").replace('`', "\\`")
}

/// Renders lines as a MarkdownV2 pre-formatted block so each one can be copied.
pub fn code_block<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let body = lines
        .into_iter()
        .map(|line| escape_code(line.as_ref()))
        .collect::<Vec<_>>()
        .join("\n");
    format!("```\n{body}\n```")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_basic_markdown() {
        assert_eq!(escape_markdown("Hello *world*"), "Hello \\*world\\*");
        assert_eq!(escape_markdown("_italic_"), "\\_italic\\_");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_escape_alias_address() {
        assert_eq!(
            escape_markdown("jo.hn.do.e@gmail.com"),
            "jo\\.hn\\.do\\.e@gmail\\.com"
        );
        assert_eq!(
            escape_markdown("johndoe+251019k2@googlemail.com"),
            "johndoe\\+251019k2@googlemail\\.com"
        );
    }

    #[test]
    fn test_escape_empty_and_plain_text() {
        assert_eq!(escape_markdown(""), "");
        assert_eq!(escape_markdown("plain text 123"), "plain text 123");
    }

    #[test]
    fn test_code_block_keeps_punctuation() {
        let block = code_block(["a.b+c@gmail.com", "ab@gmail.com"]);
        assert_eq!(block, "```\na.b+c@gmail.com\nab@gmail.com\n```");
        assert_eq!(escape_code("a`b\\c"), "a\\`b\\\\c");
    }
}
