//! fstab Lexer
//!
//! Comment stripping and whitespace splitting for a single line.
//! Tokens borrow from the line and remember their byte span.

/// A whitespace-delimited field with its byte span in the line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize, // byte offset
    pub end: usize,   // byte offset (exclusive)
}

/// Return the part of `line` before the first unescaped `#`.
///
/// A `#` preceded by a backslash is part of the field text.
pub fn strip_comment(line: &str) -> &str {
    let mut escaped = false;

    for (idx, ch) in line.char_indices() {
        match ch {
            '\\' => escaped = !escaped,
            '#' if !escaped => return &line[..idx],
            _ => escaped = false,
        }
    }

    line
}

/// Tokenize a line into whitespace-separated fields.
///
/// Tabs and spaces are equivalent and runs of either collapse into a
/// single separator. Everything from the first unescaped `#` is ignored.
pub fn tokenize_line(line: &str) -> Vec<Token<'_>> {
    let content = strip_comment(line);
    let mut tokens = Vec::new();
    let mut chars = content.char_indices().peekable();

    while let Some((start_idx, ch)) = chars.next() {
        if ch.is_whitespace() {
            continue;
        }

        let mut end_idx = start_idx + ch.len_utf8();
        while let Some(&(idx, next_ch)) = chars.peek() {
            if next_ch.is_whitespace() {
                break;
            }
            end_idx = idx + next_ch.len_utf8();
            chars.next();
        }

        tokens.push(Token {
            text: &content[start_idx..end_idx],
            start: start_idx,
            end: end_idx,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_mixed_whitespace() {
        let tokens = tokenize_line("/dev/sda1\t/boot   ext4 \t defaults 0\t2");
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, ["/dev/sda1", "/boot", "ext4", "defaults", "0", "2"]);
    }

    #[test]
    fn test_token_spans() {
        let line = "UUID=abcd /  ext4";
        let tokens = tokenize_line(line);

        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[0].start, tokens[0].end), (0, 9));
        assert_eq!((tokens[1].start, tokens[1].end), (10, 11));
        assert_eq!((tokens[2].start, tokens[2].end), (13, 17));
        for token in &tokens {
            assert_eq!(&line[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_strip_trailing_comment() {
        assert_eq!(strip_comment("/dev/sda1 / ext4 # root"), "/dev/sda1 / ext4 ");
        assert_eq!(strip_comment("# whole line"), "");
        assert_eq!(strip_comment("no comment"), "no comment");
    }

    #[test]
    fn test_escaped_hash_is_kept() {
        assert_eq!(strip_comment(r"LABEL=disk\#2 /mnt # c"), r"LABEL=disk\#2 /mnt ");
        // a literal backslash does not escape the following hash
        assert_eq!(strip_comment(r"a\\#b"), r"a\\");
    }

    #[test]
    fn test_comment_without_separator() {
        let tokens = tokenize_line("/dev/sda1 /mnt#comment");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].text, "/mnt");
    }

    #[test]
    fn test_tokenize_blank_line() {
        assert!(tokenize_line("   \t  ").is_empty());
        assert!(tokenize_line("").is_empty());
    }
}
