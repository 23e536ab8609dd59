//! # astext
//!
//! Convert DOM nodes to the plain text a user perceives on the rendered page.
//!
//! This is the representation automated consumers (test suites, scrapers)
//! inspect to assert on page content: block elements start new lines, table
//! cells are separated by tabs, ordered lists are numbered, form controls show
//! their current value and whitespace collapses the way a browser renders it,
//! except inside preformatted text and text areas.
//!
//! ## Design
//!
//! The serializer walks a CDP-style DOM Node structure and appends literal
//! text and structural markers to a token stream (see `astext-core`). All
//! whitespace decisions are made once, when the finished stream is normalized.
//!
//! Visibility and display come from a [`StyleOracle`]. The default
//! [`InlineStyleOracle`] understands inline `style` attributes; a real style
//! engine can be plugged in with [`TextSerializer::with_oracle`].
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use astext::{Node, TextSerializer};
//!
//! let serializer = TextSerializer::new();
//!
//! let mut p = Node::element("p");
//! p.add_child(Node::text("  Hello \n  World  "));
//!
//! assert_eq!(serializer.as_text(&p), "Hello World");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use astext::TextSerializer;
//!
//! let serializer = TextSerializer::new();
//! let text = serializer.as_text_html("<h1>Hello World</h1>");
//! assert_eq!(text, "Hello World");
//! ```

#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod service;
mod style;
mod utilities;

pub use astext_core::{AppendMode, LineSeparator, OptionsError, TextBuilder};
#[cfg(feature = "html")]
pub use html::{parse_document, parse_html};
pub use node::{Node, NodeKind, NodeRef, NodeType};
pub use service::{AsTextOptions, TextSerializer};
pub use style::{parse_declarations, InlineStyleOracle, StyleOracle};
pub use utilities::{default_display, BLOCK_ELEMENTS, HIDDEN_ELEMENTS};

/// Error type for astext operations
#[derive(Debug, thiserror::Error)]
pub enum AsTextError {
    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: String, value: String },

    #[error("Invalid option: {0}")]
    InvalidOption(#[from] OptionsError),
}

pub type Result<T> = std::result::Result<T, AsTextError>;
