//! Token stream
//!
//! The intermediate representation produced while walking a node tree. Literal
//! text and structural sentinels are appended in document order and the whole
//! stream is consumed exactly once by [`TokenStream::finalize`].

use crate::normalize;
use crate::options::LineSeparator;

/// Pre-processing policy applied to one chunk of literal text at append time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppendMode {
    /// Store verbatim; whitespace is collapsed later by the normalizer
    #[default]
    Normalize,
    /// Preformatted regions: blanks, tabs and line breaks all survive
    PreserveLiteral,
    /// Form-control values: trailing whitespace is stripped, blanks and
    /// line breaks survive, tabs still collapse
    PreserveLineAndBlank,
}

/// A single entry of the token stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of characters tagged with the mode active when it was appended
    Literal { text: String, mode: AppendMode },

    /// Block-level boundary, rendered as one line separator
    BlockSeparator,

    /// Explicit single line break
    LineBreak,

    /// Column separator
    Tab,

    /// A space that survives whitespace collapsing
    ProtectedBlank,
}

impl Token {
    /// Check if this token is a structural sentinel rather than literal text
    pub fn is_sentinel(&self) -> bool {
        !matches!(self, Token::Literal { .. })
    }
}

/// Append-only sequence of tokens.
///
/// There is no way to remove or reorder tokens once appended; the only way out
/// of a stream is [`finalize`](TokenStream::finalize), which consumes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token. Empty literals are dropped.
    pub fn push(&mut self, token: Token) {
        if let Token::Literal { text, .. } = &token {
            if text.is_empty() {
                return;
            }
        }
        self.tokens.push(token);
    }

    /// The tokens appended so far
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Normalize the stream into its final text
    pub fn finalize(self, line_separator: LineSeparator) -> String {
        normalize::normalize(self.tokens, line_separator)
    }
}
