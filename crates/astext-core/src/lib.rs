//! astext-core - token stream and whitespace normalization
//!
//! This crate holds the node-agnostic half of page text serialization: the
//! token stream a tree walker appends to, the mode-aware builder in front of
//! it and the normalizer that turns the finished stream into text. It is used
//! by `astext`, which walks DOM trees and drives the builder.
//!
//! # Architecture
//!
//! ```text
//!              append(text, mode)   ┌──────────────┐  finalize()
//! Tree walker ─────────────────────▶│ Token Stream │ ────────────▶ Plain text
//!              block / break / tab  └──────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use astext_core::{AppendMode, LineSeparator, TextBuilder};
//!
//! let mut builder = TextBuilder::new();
//! builder.append("  Hello \n  World ", AppendMode::Normalize);
//! builder.append_block_separator();
//! builder.append("  indented\tcode", AppendMode::PreserveLiteral);
//!
//! let text = builder.finish(LineSeparator::Lf);
//! assert_eq!(text, "Hello World\n  indented\tcode");
//! ```

mod builder;
mod normalize;
mod options;
mod token;

pub use builder::{TextBuilder, PROTECTED_BLANK_MARKER};
pub use options::{LineSeparator, OptionsError};
pub use token::{AppendMode, Token, TokenStream};
