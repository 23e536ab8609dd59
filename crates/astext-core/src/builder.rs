//! Token stream builder
//!
//! Applies the per-chunk [`AppendMode`] pre-processing and records sentinels.

use crate::options::LineSeparator;
use crate::token::{AppendMode, Token, TokenStream};

/// Textual escape for a protected blank inside normalized text
pub const PROTECTED_BLANK_MARKER: &str = "§blank§";

/// Mode-aware writer over a [`TokenStream`]
#[derive(Debug, Default)]
pub struct TextBuilder {
    stream: TokenStream,
}

impl TextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk of text, pre-processed according to `mode`
    pub fn append(&mut self, text: &str, mode: AppendMode) {
        match mode {
            AppendMode::Normalize => self.append_normalized(text),
            AppendMode::PreserveLiteral => self.append_preserved(text, mode, true),
            AppendMode::PreserveLineAndBlank => {
                let text = text.trim_end_matches(is_ascii_space);
                self.append_preserved(text, mode, false);
            }
        }
    }

    pub fn append_block_separator(&mut self) {
        self.stream.push(Token::BlockSeparator);
    }

    pub fn append_line_break(&mut self) {
        self.stream.push(Token::LineBreak);
    }

    pub fn append_tab(&mut self) {
        self.stream.push(Token::Tab);
    }

    /// The tokens appended so far
    pub fn stream(&self) -> &TokenStream {
        &self.stream
    }

    /// Normalize everything appended into the final text
    pub fn finish(self, line_separator: LineSeparator) -> String {
        self.stream.finalize(line_separator)
    }

    fn append_normalized(&mut self, text: &str) {
        let mut parts = text.split(PROTECTED_BLANK_MARKER);
        if let Some(first) = parts.next() {
            self.push_literal(first, AppendMode::Normalize);
        }
        for part in parts {
            self.stream.push(Token::ProtectedBlank);
            self.push_literal(part, AppendMode::Normalize);
        }
    }

    /// Split `text` into literals and sentinels. `protect_tabs` decides
    /// whether tabs become [`Token::Tab`] or stay raw whitespace.
    fn append_preserved(&mut self, text: &str, mode: AppendMode, protect_tabs: bool) {
        let bytes = text.as_bytes();
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let token = match bytes[i] {
                b' ' => Token::ProtectedBlank,
                b'\t' if protect_tabs => Token::Tab,
                b'\r' | b'\n' => Token::LineBreak,
                _ => {
                    i += 1;
                    continue;
                }
            };

            self.push_literal(&text[start..i], mode);
            self.stream.push(token);

            // CRLF is a single line break
            if bytes[i] == b'\r' && bytes.get(i + 1) == Some(&b'\n') {
                i += 1;
            }
            i += 1;
            start = i;
        }

        self.push_literal(&text[start..], mode);
    }

    fn push_literal(&mut self, text: &str, mode: AppendMode) {
        self.stream.push(Token::Literal {
            text: text.to_string(),
            mode,
        });
    }
}

/// ASCII whitespace as understood by the normalizer
pub(crate) fn is_ascii_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str, mode: AppendMode) -> Token {
        Token::Literal {
            text: text.to_string(),
            mode,
        }
    }

    #[test]
    fn test_normalize_stores_verbatim() {
        let mut builder = TextBuilder::new();
        builder.append(" a \t\u{00A0}b\n", AppendMode::Normalize);
        assert_eq!(
            builder.stream().tokens(),
            &[literal(" a \t\u{00A0}b\n", AppendMode::Normalize)]
        );
    }

    #[test]
    fn test_normalize_translates_blank_marker() {
        let mut builder = TextBuilder::new();
        builder.append("a§blank§b", AppendMode::Normalize);
        assert_eq!(
            builder.stream().tokens(),
            &[
                literal("a", AppendMode::Normalize),
                Token::ProtectedBlank,
                literal("b", AppendMode::Normalize),
            ]
        );
    }

    #[test]
    fn test_preserve_literal_tokens() {
        let mode = AppendMode::PreserveLiteral;
        let mut builder = TextBuilder::new();
        builder.append("a b\tc\r\nd\re\n", mode);
        assert_eq!(
            builder.stream().tokens(),
            &[
                literal("a", mode),
                Token::ProtectedBlank,
                literal("b", mode),
                Token::Tab,
                literal("c", mode),
                Token::LineBreak,
                literal("d", mode),
                Token::LineBreak,
                literal("e", mode),
                Token::LineBreak,
            ]
        );
    }

    #[test]
    fn test_preserve_line_and_blank_keeps_tabs_raw() {
        let mode = AppendMode::PreserveLineAndBlank;
        let mut builder = TextBuilder::new();
        builder.append("a\tb c\n \t", mode);
        assert_eq!(
            builder.stream().tokens(),
            &[
                literal("a\tb", mode),
                Token::ProtectedBlank,
                literal("c", mode),
            ]
        );
    }

    #[test]
    fn test_preserve_line_and_blank_all_whitespace() {
        let mut builder = TextBuilder::new();
        builder.append(" \r\n\t ", AppendMode::PreserveLineAndBlank);
        assert!(builder.stream().is_empty());
    }

    #[test]
    fn test_multibyte_text_is_split_on_char_boundaries() {
        let mode = AppendMode::PreserveLiteral;
        let mut builder = TextBuilder::new();
        builder.append("é ü", mode);
        assert_eq!(
            builder.stream().tokens(),
            &[literal("é", mode), Token::ProtectedBlank, literal("ü", mode)]
        );
    }
}
