//! HTML parsing support.
//!
//! This module provides functionality to parse HTML strings and convert them
//! to the CDP-style Node structure used by astext. Text and comment nodes are
//! kept; doctypes and processing instructions are dropped.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML fragment into a Node tree rooted at an `html` element.
///
/// # Example
///
/// ```rust
/// use astext::{parse_html, TextSerializer};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1><p>Bye</p>");
///
/// let serializer = TextSerializer::new();
/// let text = serializer.as_text(&node);
/// assert!(text.starts_with("Hello World"));
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Parse a complete HTML document into a Node tree rooted at a document node.
pub fn parse_document(html: &str) -> Node {
    let document = Html::parse_document(html);
    Node::document().with_child(scraper_to_node(document.root_element()))
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();

    // Collect attributes
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };

    // Process children
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Comment(comment) => {
                node.add_child(Node::comment(&comment.comment));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
