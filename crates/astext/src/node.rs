//! CDP-style DOM Node structure for page text serialization.
//!
//! This module provides a DOM node structure that matches the Chrome DevTools Protocol
//! DOM.Node structure. Any parser (html5ever, CDP, etc.) can convert their output to
//! this structure to use astext.

use crate::utilities::clean_attribute;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

/// The node variants the serializer treats differently.
///
/// Derived from the node type, the tag name and, for `input`, the `type`
/// attribute. Everything without a dedicated rule is [`NodeKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Text,
    Comment,
    Break,
    HiddenInput,
    Script,
    Style,
    NoFrames,
    NoScript,
    Applet,
    TextArea,
    Preformatted,
    Title,
    TableRow,
    Table,
    OrderedList,
    UnorderedList,
    Select,
    SubmitInput,
    ResetInput,
    CheckBox,
    RadioButton,
    Input,
    InlineFrame,
    Other,
}

/// A DOM node following the CDP DOM.Node structure.
///
/// Form controls keep their current state in attributes: `value`, `checked`,
/// `selected` and `multiple`.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g., "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Text content for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes as flat array [name, value, name, value, ...] (CDP style)
    /// Only present for element nodes
    pub attributes: Option<Vec<String>>,

    /// Child nodes
    pub children: Option<Vec<Node>>,

    /// Document loaded into a frame element (CDP `contentDocument`)
    pub content_document: Option<Box<Node>>,
}

impl Node {
    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self {
            node_type: NodeType::Element,
            node_name: tag_name.to_uppercase(),
            node_value: None,
            attributes: Some(Vec::new()),
            children: Some(Vec::new()),
            content_document: None,
        }
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        node.attributes = Some(
            attrs
                .into_iter()
                .flat_map(|(k, v)| [k.to_string(), v.to_string()])
                .collect(),
        );
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::leaf(NodeType::Text, "#text", content)
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::leaf(NodeType::Comment, "#comment", content)
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::container(NodeType::Document, "#document")
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self::container(NodeType::DocumentFragment, "#document-fragment")
    }

    fn leaf(node_type: NodeType, name: &str, content: &str) -> Self {
        Self {
            node_type,
            node_name: name.to_string(),
            node_value: Some(content.to_string()),
            attributes: None,
            children: None,
            content_document: None,
        }
    }

    fn container(node_type: NodeType, name: &str) -> Self {
        Self {
            node_type,
            node_name: name.to_string(),
            node_value: None,
            attributes: None,
            children: Some(Vec::new()),
            content_document: None,
        }
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this is a text node
    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// Check if this is an element with the given tag name
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(tag)
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> String {
        self.node_name.to_lowercase()
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        let attrs = self.attributes.as_ref()?;

        // CDP stores attributes as flat array: [name, value, name, value, ...]
        attrs
            .chunks_exact(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
            .map(|pair| pair[1].as_str())
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().flat_map(|c| c.iter())
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Get the first child node
    pub fn first_child(&self) -> Option<&Node> {
        self.children().next()
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        if let Some(ref mut children) = self.children {
            children.push(child);
        } else {
            self.children = Some(vec![child]);
        }
    }

    /// Add a child node, builder style
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Attach the document loaded into this frame
    pub fn set_content_document(&mut self, document: Node) {
        self.content_document = Some(Box::new(document));
    }

    /// Set an attribute
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let attrs = self.attributes.get_or_insert_with(Vec::new);

        if let Some(pair) = attrs
            .chunks_exact_mut(2)
            .find(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            pair[1] = value.to_string();
            return;
        }
        attrs.push(name.to_string());
        attrs.push(value.to_string());
    }

    /// Remove an attribute
    pub fn remove_attr(&mut self, name: &str) {
        let Some(attrs) = self.attributes.as_mut() else {
            return;
        };
        if let Some(index) = attrs
            .chunks_exact(2)
            .position(|pair| pair[0].eq_ignore_ascii_case(name))
        {
            attrs.drain(index * 2..index * 2 + 2);
        }
    }

    /// Set or clear a boolean attribute such as `checked` or `selected`
    pub fn set_flag(&mut self, name: &str, on: bool) {
        if on {
            self.set_attr(name, "");
        } else {
            self.remove_attr(name);
        }
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text => out.push_str(self.node_value.as_deref().unwrap_or_default()),
            NodeType::Comment => {}
            _ => {
                for child in self.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Current value of a form control
    pub fn value(&self) -> &str {
        self.attr("value").unwrap_or_default()
    }

    /// Current checked state of a checkbox or radio button
    pub fn is_checked(&self) -> bool {
        self.has_attr("checked")
    }

    /// Current selected state of an option
    pub fn is_selected(&self) -> bool {
        self.has_attr("selected")
    }

    /// Whether a select control allows multiple selection
    pub fn is_multiple(&self) -> bool {
        self.has_attr("multiple")
    }

    /// Classify this node for the serializer
    pub fn kind(&self) -> NodeKind {
        match self.node_type {
            NodeType::Text => return NodeKind::Text,
            NodeType::Comment => return NodeKind::Comment,
            NodeType::Document | NodeType::DocumentFragment => return NodeKind::Other,
            NodeType::Element => {}
        }

        match self.tag_name().as_str() {
            "br" => NodeKind::Break,
            "script" => NodeKind::Script,
            "style" => NodeKind::Style,
            "noframes" => NodeKind::NoFrames,
            "noscript" => NodeKind::NoScript,
            "applet" => NodeKind::Applet,
            "textarea" => NodeKind::TextArea,
            "pre" => NodeKind::Preformatted,
            "title" => NodeKind::Title,
            "tr" => NodeKind::TableRow,
            "table" => NodeKind::Table,
            "ol" => NodeKind::OrderedList,
            "ul" => NodeKind::UnorderedList,
            "select" => NodeKind::Select,
            "iframe" => NodeKind::InlineFrame,
            "input" => self.input_kind(),
            _ => NodeKind::Other,
        }
    }

    fn input_kind(&self) -> NodeKind {
        let input_type = clean_attribute(self.attr("type"))
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match input_type.as_str() {
            "hidden" => NodeKind::HiddenInput,
            "submit" => NodeKind::SubmitInput,
            "reset" => NodeKind::ResetInput,
            "checkbox" => NodeKind::CheckBox,
            "radio" => NodeKind::RadioButton,
            _ => NodeKind::Input,
        }
    }
}

/// A reference to a node with its ancestor chain.
///
/// The chain lives on the stack of the tree walk, so navigating up needs no
/// parent pointers in [`Node`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a NodeRef<'a>>,
}

impl<'a> NodeRef<'a> {
    /// Create a new NodeRef without parent context
    pub fn new(node: &'a Node) -> Self {
        Self { node, parent: None }
    }

    /// Create a reference to a child of `parent`
    pub fn with_parent(node: &'a Node, parent: &'a NodeRef<'a>) -> Self {
        Self {
            node,
            parent: Some(parent),
        }
    }

    /// Get the parent reference if known
    pub fn parent(&self) -> Option<&'a NodeRef<'a>> {
        self.parent
    }

    /// Iterate over the ancestors, closest first
    pub fn ancestors(&self) -> impl Iterator<Item = &'a NodeRef<'a>> {
        std::iter::successors(self.parent, |r| r.parent)
    }

    /// The closest ancestor that is an element
    pub fn parent_element(&self) -> Option<&'a NodeRef<'a>> {
        self.ancestors().find(|r| r.node.is_element())
    }

    /// Delegate to Node methods
    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.node.is_tag(tag)
    }

    pub fn tag_name(&self) -> String {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }
}
