//! Style oracle - visibility and display facts for the serializer.
//!
//! The serializer never computes styles itself; it asks a [`StyleOracle`].
//! [`InlineStyleOracle`] is a lightweight default that understands the
//! `style` attribute, the `hidden` attribute and user-agent defaults. Callers
//! with a real style engine (a browser over CDP, for example) plug in their
//! own implementation.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{NodeKind, NodeRef};
use crate::utilities::{clean_attribute, default_display};

/// Source of computed style facts for elements
pub trait StyleOracle {
    /// Whether the node is actually shown, taking its ancestors into account
    fn is_displayed(&self, node: &NodeRef<'_>) -> bool;

    /// The computed `display` value of an element, e.g. `"block"`
    fn computed_display(&self, node: &NodeRef<'_>) -> String;
}

/// `name: value` pairs of a declaration block
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([a-z-]+)\s*:\s*([^;]*?)\s*(?:!\s*important\s*)?(?:;|$)")
        .expect("declaration pattern is valid")
});

/// Parse an inline `style` attribute into its declarations.
///
/// Property names are lowercased; later declarations win.
pub fn parse_declarations(style: &str) -> IndexMap<String, String> {
    let mut declarations = IndexMap::new();
    for caps in DECLARATION.captures_iter(style) {
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        declarations.insert(caps[1].to_ascii_lowercase(), value.to_ascii_lowercase());
    }
    declarations
}

/// Oracle backed by inline styles and user-agent defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineStyleOracle;

impl InlineStyleOracle {
    pub fn new() -> Self {
        Self
    }

    fn declared(node: &NodeRef<'_>, property: &str) -> Option<String> {
        let style = clean_attribute(node.attr("style"))?;
        parse_declarations(style).swap_remove(property)
    }

    fn display_of(node: &NodeRef<'_>) -> String {
        Self::declared(node, "display")
            .unwrap_or_else(|| default_display(&node.tag_name()).to_string())
    }

    /// Hidden by itself, regardless of inherited visibility
    fn is_masked(node: &NodeRef<'_>) -> bool {
        node.node.has_attr("hidden")
            || node.kind() == NodeKind::HiddenInput
            || Self::display_of(node) == "none"
    }
}

impl StyleOracle for InlineStyleOracle {
    fn is_displayed(&self, node: &NodeRef<'_>) -> bool {
        if !node.is_element() {
            return node.parent_element().map_or(true, |p| self.is_displayed(p));
        }

        let mut visibility = None;
        let mut current = Some(node);
        while let Some(element) = current {
            if element.is_element() {
                if Self::is_masked(element) {
                    return false;
                }
                if visibility.is_none() {
                    visibility = Self::declared(element, "visibility");
                }
            }
            current = element.parent();
        }

        !matches!(visibility.as_deref(), Some("hidden" | "collapse"))
    }

    fn computed_display(&self, node: &NodeRef<'_>) -> String {
        if !node.is_element() {
            return "inline".to_string();
        }
        Self::display_of(node)
    }
}
