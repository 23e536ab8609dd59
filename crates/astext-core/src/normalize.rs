//! Stream normalization
//!
//! Turns a finished token stream into text in four ordered passes:
//!
//! 1. trim raw whitespace at both ends
//! 2. reduce the neighborhood of every block separator, then drop the
//!    separators left at either end
//! 3. collapse the remaining raw whitespace runs
//! 4. substitute sentinels with their text
//!
//! Every pass walks the sequence once and pushes onto a fresh buffer, so the
//! whole transform is linear in the emitted text length.

use crate::builder::is_ascii_space;
use crate::options::LineSeparator;
use crate::token::Token;

const NBSP: char = '\u{00A0}';

/// Flattened view of the stream: one entry per literal character or sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Atom {
    Char(char),
    BlockSeparator,
    LineBreak,
    Tab,
    ProtectedBlank,
}

impl Atom {
    /// Raw whitespace that may be trimmed or collapsed. Sentinels never are.
    fn is_collapsible(self) -> bool {
        matches!(self, Atom::Char(c) if is_ascii_space(c))
    }

    fn is_trimmable(self) -> bool {
        self == Atom::BlockSeparator || self.is_collapsible()
    }
}

/// Normalize a token sequence into its final text
pub(crate) fn normalize(tokens: Vec<Token>, line_separator: LineSeparator) -> String {
    let atoms = flatten(tokens);
    let atoms = trim_whitespace(&atoms);
    let atoms = reduce_block_separators(atoms);
    let atoms = collapse_whitespace(&atoms);
    substitute(&atoms, line_separator)
}

fn flatten(tokens: Vec<Token>) -> Vec<Atom> {
    let mut atoms = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Literal { text, .. } => atoms.extend(text.chars().map(Atom::Char)),
            Token::BlockSeparator => atoms.push(Atom::BlockSeparator),
            Token::LineBreak => atoms.push(Atom::LineBreak),
            Token::Tab => atoms.push(Atom::Tab),
            Token::ProtectedBlank => atoms.push(Atom::ProtectedBlank),
        }
    }
    atoms
}

/// Phase 1: drop raw whitespace at both ends. Separators stay until their
/// neighborhood has been reduced.
fn trim_whitespace(atoms: &[Atom]) -> &[Atom] {
    trim_matching(atoms, |a| a.is_collapsible())
}

/// Drop raw whitespace and block separators at both ends
fn trim(atoms: &[Atom]) -> &[Atom] {
    trim_matching(atoms, |a| a.is_trimmable())
}

fn trim_matching(atoms: &[Atom], trimmable: impl Fn(Atom) -> bool) -> &[Atom] {
    let start = atoms
        .iter()
        .position(|&a| !trimmable(a))
        .unwrap_or(atoms.len());
    let end = atoms
        .iter()
        .rposition(|&a| !trimmable(a))
        .map_or(start, |i| i + 1);
    &atoms[start..end]
}

/// Phase 2: no whitespace around separators, no line break right before
/// one, no duplicates.
fn reduce_block_separators(atoms: &[Atom]) -> Vec<Atom> {
    let mut out: Vec<Atom> = Vec::with_capacity(atoms.len());
    let mut after_separator = false;

    for &atom in atoms {
        match atom {
            Atom::BlockSeparator => {
                while out.last().is_some_and(|a| a.is_collapsible()) {
                    out.pop();
                }
                if out.last() == Some(&Atom::LineBreak) {
                    out.pop();
                }
                if out.last() != Some(&Atom::BlockSeparator) {
                    out.push(Atom::BlockSeparator);
                }
                after_separator = true;
            }
            a if a.is_collapsible() && after_separator => {}
            a => {
                out.push(a);
                after_separator = false;
            }
        }
    }

    // Separators at either end render nothing
    let trimmed = trim(&out);
    if trimmed.len() != out.len() {
        return trimmed.to_vec();
    }
    out
}

/// Phase 3: every raw whitespace run becomes a single space
fn collapse_whitespace(atoms: &[Atom]) -> Vec<Atom> {
    let mut out = Vec::with_capacity(atoms.len());
    let mut in_whitespace = false;

    for &atom in atoms {
        match atom {
            Atom::Char(NBSP) => {
                out.push(Atom::Char(' '));
                in_whitespace = false;
            }
            a if a.is_collapsible() => {
                if !in_whitespace {
                    out.push(Atom::Char(' '));
                    in_whitespace = true;
                }
            }
            a => {
                out.push(a);
                in_whitespace = false;
            }
        }
    }

    out
}

/// Phase 4: render sentinels
fn substitute(atoms: &[Atom], line_separator: LineSeparator) -> String {
    let newline = line_separator.as_str();
    let mut output = String::with_capacity(atoms.len());

    for &atom in atoms {
        match atom {
            Atom::Char(c) => output.push(c),
            Atom::ProtectedBlank => output.push(' '),
            Atom::Tab => output.push('\t'),
            Atom::LineBreak | Atom::BlockSeparator => output.push_str(newline),
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use proptest::prelude::*;

    use crate::{AppendMode, LineSeparator, TextBuilder};

    const LS: &str = "\n";

    fn normalized(text: &str) -> String {
        let mut builder = TextBuilder::new();
        builder.append(text, AppendMode::Normalize);
        builder.finish(LineSeparator::Lf)
    }

    fn finish(builder: TextBuilder) -> String {
        builder.finish(LineSeparator::Lf)
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(normalized(""), "");
        assert_eq!(normalized(" \t\r\n "), "");
        assert_eq!(normalized("abc"), "abc");
    }

    #[test]
    fn test_lone_block_separators_vanish() {
        let mut b = TextBuilder::new();
        b.append_block_separator();
        assert_eq!(finish(b), "");

        let mut b = TextBuilder::new();
        b.append_block_separator();
        b.append(" ", AppendMode::Normalize);
        assert_eq!(finish(b), "");

        let mut b = TextBuilder::new();
        b.append(" ", AppendMode::Normalize);
        b.append_block_separator();
        assert_eq!(finish(b), "");

        let mut b = TextBuilder::new();
        b.append(" ", AppendMode::Normalize);
        b.append_block_separator();
        b.append(" ", AppendMode::Normalize);
        assert_eq!(finish(b), "");
    }

    #[test]
    fn test_whitespace_around_separator() {
        let mut b = TextBuilder::new();
        b.append(" a  ", AppendMode::Normalize);
        b.append_block_separator();
        assert_eq!(finish(b), "a");

        let mut b = TextBuilder::new();
        b.append(" a  ", AppendMode::Normalize);
        b.append_block_separator();
        b.append("  x ", AppendMode::Normalize);
        assert_eq!(finish(b), format!("a{LS}x"));
    }

    #[test]
    fn test_consecutive_separators_render_once() {
        for n in 1..=4 {
            let mut b = TextBuilder::new();
            b.append("a", AppendMode::Normalize);
            for _ in 0..n {
                b.append_block_separator();
            }
            b.append("x", AppendMode::Normalize);
            assert_eq!(finish(b), format!("a{LS}x"), "{n} separators");
        }

        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_block_separator();
        b.append("  ", AppendMode::Normalize);
        b.append_block_separator();
        b.append("x", AppendMode::Normalize);
        assert_eq!(finish(b), format!("a{LS}x"));
    }

    #[test]
    fn test_trailing_separators() {
        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_block_separator();
        b.append_block_separator();
        assert_eq!(finish(b), "a");

        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_block_separator();
        b.append("  ", AppendMode::Normalize);
        b.append_block_separator();
        assert_eq!(finish(b), "a");
    }

    #[test]
    fn test_line_break_survives_trim() {
        let mut b = TextBuilder::new();
        b.append_line_break();
        assert_eq!(finish(b), LS);

        let mut b = TextBuilder::new();
        b.append_line_break();
        b.append(" ", AppendMode::Normalize);
        assert_eq!(finish(b), LS);

        let mut b = TextBuilder::new();
        b.append(" ", AppendMode::Normalize);
        b.append_line_break();
        assert_eq!(finish(b), LS);

        let mut b = TextBuilder::new();
        b.append(" ", AppendMode::Normalize);
        b.append_line_break();
        b.append(" ", AppendMode::Normalize);
        assert_eq!(finish(b), LS);
    }

    #[test]
    fn test_line_break_before_separator_is_dropped() {
        let mut b = TextBuilder::new();
        b.append_line_break();
        b.append_block_separator();
        b.append("x", AppendMode::Normalize);
        assert_eq!(finish(b), "x");

        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_line_break();
        b.append_block_separator();
        b.append("x", AppendMode::Normalize);
        assert_eq!(finish(b), format!("a{LS}x"));
    }

    #[test]
    fn test_line_break_before_trailing_separator_is_dropped() {
        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_line_break();
        b.append_block_separator();
        assert_eq!(finish(b), "a");

        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_line_break();
        b.append("  ", AppendMode::Normalize);
        b.append_block_separator();
        b.append_block_separator();
        assert_eq!(finish(b), "a");

        let mut b = TextBuilder::new();
        b.append_block_separator();
        b.append_line_break();
        b.append_block_separator();
        b.append("x", AppendMode::Normalize);
        assert_eq!(finish(b), "x");
    }

    #[test]
    fn test_protected_blank_marker() {
        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append("§blank§", AppendMode::Normalize);
        b.append(" ", AppendMode::Normalize);
        b.append("§blank§", AppendMode::Normalize);
        b.append("x", AppendMode::Normalize);
        assert_eq!(finish(b), "a   x");
    }

    #[test]
    fn test_tabs_are_opaque() {
        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_tab();
        b.append(" ", AppendMode::Normalize);
        b.append_tab();
        b.append("x", AppendMode::Normalize);
        assert_eq!(finish(b), "a\t \tx");
    }

    #[test]
    fn test_nbsp_becomes_plain_space() {
        assert_eq!(normalized("abc\u{00A0}x"), "abc x");
        assert_eq!(normalized("a\u{00A0}\u{00A0}b"), "a  b");
        assert_eq!(normalized("a \u{00A0} b"), "a   b");
    }

    #[test]
    fn test_collapse_mixed_whitespace() {
        assert_eq!(normalized("a     b \t\t\t c \r \r o \n\n\n"), "a b c o");
        assert_eq!(normalized("a\u{000C}\u{000C}b"), "a b");
    }

    #[test]
    fn test_preserve_literal() {
        let mut b = TextBuilder::new();
        b.append("  hello \t abc ", AppendMode::PreserveLiteral);
        assert_eq!(finish(b), "  hello \t abc ");

        let mut b = TextBuilder::new();
        b.append("line 1\r\nline 2\rline 3", AppendMode::PreserveLiteral);
        assert_eq!(finish(b), format!("line 1{LS}line 2{LS}line 3"));
    }

    #[test]
    fn test_preserve_line_and_blank() {
        let mut b = TextBuilder::new();
        b.append("  hello \t abc ", AppendMode::PreserveLineAndBlank);
        assert_eq!(finish(b), "  hello   abc");

        let mut b = TextBuilder::new();
        b.append("a\n\nb  \n", AppendMode::PreserveLineAndBlank);
        assert_eq!(finish(b), format!("a{LS}{LS}b"));
    }

    #[test]
    fn test_special_spaces_pass_through() {
        assert_eq!(normalized("\u{3000}"), "\u{3000}");
        assert_eq!(normalized("\u{FEFF}"), "\u{FEFF}");
        assert_eq!(normalized("\u{200B}"), "\u{200B}");
        assert_eq!(normalized("a\u{3000}\u{3000}b"), "a\u{3000}\u{3000}b");
    }

    #[test]
    fn test_crlf_line_separator() {
        let mut b = TextBuilder::new();
        b.append("a", AppendMode::Normalize);
        b.append_block_separator();
        b.append("b", AppendMode::Normalize);
        b.append_line_break();
        b.append("c", AppendMode::Normalize);
        assert_eq!(b.finish(LineSeparator::CrLf), "a\r\nb\r\nc");
    }

    #[test]
    fn test_performance_whitespace() {
        let length = 80_000;
        let mut text = String::with_capacity(length);
        text.push('a');
        text.push_str(&" ".repeat(length - 2));
        text.push('a');

        let start = Instant::now();
        assert_eq!(normalized(&text), "a a");
        assert!(start.elapsed().as_millis() < 1_000, "normalize took too much time");
    }

    #[test]
    fn test_performance_many_separators() {
        let expected = vec!["x"; 20_000].join(LS);

        let start = Instant::now();
        let mut b = TextBuilder::new();
        for _ in 0..20_000 {
            b.append(" x ", AppendMode::Normalize);
            b.append_block_separator();
        }
        assert_eq!(finish(b), expected);
        assert!(start.elapsed().as_millis() < 400, "normalize took too much time");
    }

    fn is_ascii_space(c: char) -> bool {
        matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{000C}')
    }

    proptest! {
        #[test]
        fn prop_normalized_text_is_trimmed_and_collapsed(
            chunks in prop::collection::vec("[a-c \t\r\n\u{000C}]{0,12}", 0..8),
            separators in prop::collection::vec(any::<bool>(), 0..8),
        ) {
            let mut b = TextBuilder::new();
            for (i, chunk) in chunks.iter().enumerate() {
                b.append(chunk, AppendMode::Normalize);
                if separators.get(i).copied().unwrap_or(false) {
                    b.append_block_separator();
                }
            }
            let text = finish(b);

            prop_assert!(!text.starts_with(is_ascii_space));
            prop_assert!(!text.ends_with(is_ascii_space));
            prop_assert!(!text.contains("  "));
            prop_assert!(!text.contains("\n\n"));
            prop_assert!(!text.contains('\t'));
        }
    }
}
