//! TextSerializer - the main entry point for DOM to text conversion.

use astext_core::{AppendMode, LineSeparator, TextBuilder};
use log::{debug, trace};

use crate::node::{Node, NodeKind, NodeRef};
use crate::style::{InlineStyleOracle, StyleOracle};
use crate::{AsTextError, Result};

/// Label of a submit button without a `value`
const DEFAULT_SUBMIT_LABEL: &str = "Submit Query";

/// Label of a reset button without a `value`
const DEFAULT_RESET_LABEL: &str = "Reset";

/// Options for TextSerializer
#[derive(Debug, Clone)]
pub struct AsTextOptions {
    /// Leave out nodes the style oracle reports as not displayed
    pub ignore_masked_elements: bool,

    /// Script execution is enabled for the document (`noscript` content
    /// is emitted only then)
    pub javascript_enabled: bool,

    /// Applet support is enabled (`applet` content is emitted only then)
    pub applets_enabled: bool,

    /// Line terminator for line breaks and block boundaries
    pub line_separator: LineSeparator,
}

impl Default for AsTextOptions {
    fn default() -> Self {
        Self {
            ignore_masked_elements: true,
            javascript_enabled: true,
            applets_enabled: false,
            line_separator: LineSeparator::platform(),
        }
    }
}

impl AsTextOptions {
    /// Set an option from its string form, e.g. `("line_separator", "crlf")`
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        let flag = || {
            value.trim().parse::<bool>().map_err(|_| AsTextError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
            })
        };

        match name {
            "ignore_masked_elements" => self.ignore_masked_elements = flag()?,
            "javascript_enabled" => self.javascript_enabled = flag()?,
            "applets_enabled" => self.applets_enabled = flag()?,
            "line_separator" => self.line_separator = value.parse()?,
            _ => return Err(AsTextError::UnknownOption(name.to_string())),
        }
        Ok(())
    }
}

/// Converts node trees into the text a user perceives on the rendered page
pub struct TextSerializer {
    options: AsTextOptions,
    oracle: Box<dyn StyleOracle + Send + Sync>,
}

impl TextSerializer {
    /// Create a new TextSerializer with default options
    pub fn new() -> Self {
        Self::with_options(AsTextOptions::default())
    }

    /// Create a TextSerializer with custom options
    pub fn with_options(options: AsTextOptions) -> Self {
        Self {
            options,
            oracle: Box::new(InlineStyleOracle::new()),
        }
    }

    /// Replace the style oracle
    pub fn with_oracle<O>(mut self, oracle: O) -> Self
    where
        O: StyleOracle + Send + Sync + 'static,
    {
        self.oracle = Box::new(oracle);
        self
    }

    /// Convert a node tree to text
    pub fn as_text(&self, node: &Node) -> String {
        self.as_text_ref(&NodeRef::new(node))
    }

    /// Convert a node to text, with its ancestors known to the style oracle
    pub fn as_text_ref(&self, node: &NodeRef<'_>) -> String {
        let mut builder = TextBuilder::new();
        self.append_node(&mut builder, node);
        trace!("as_text: {} tokens for <{}>", builder.stream().len(), node.node.node_name);
        builder.finish(self.options.line_separator)
    }

    /// Parse an HTML document and convert it to text
    #[cfg(feature = "html")]
    pub fn as_text_html(&self, html: &str) -> String {
        self.as_text(&crate::html::parse_document(html))
    }

    /// Get the current options
    pub fn options(&self) -> &AsTextOptions {
        &self.options
    }

    /// Get mutable access to options
    pub fn options_mut(&mut self) -> &mut AsTextOptions {
        &mut self.options
    }

    /// Indicates if elements hidden by style settings are left out of the text
    pub fn set_ignore_masked_elements(&mut self, ignore: bool) {
        self.options.ignore_masked_elements = ignore;
    }

    fn is_visible(&self, node: &NodeRef<'_>) -> bool {
        !self.options.ignore_masked_elements || self.oracle.is_displayed(node)
    }

    /// Dispatch a node to its rule
    fn append_node(&self, builder: &mut TextBuilder, node: &NodeRef<'_>) {
        match node.kind() {
            NodeKind::Text => self.append_text(builder, node),
            NodeKind::Comment
            | NodeKind::HiddenInput
            | NodeKind::Script
            | NodeKind::Style
            | NodeKind::NoFrames => {}
            NodeKind::NoScript => {
                if self.options.javascript_enabled {
                    self.append_dom_node(builder, node);
                }
            }
            NodeKind::Applet => {
                if self.options.applets_enabled {
                    self.append_dom_node(builder, node);
                }
            }
            NodeKind::Break => builder.append_line_break(),
            NodeKind::TextArea => self.append_text_area(builder, node),
            NodeKind::Preformatted => self.append_preformatted(builder, node),
            NodeKind::Title => append_title(builder, node.node),
            NodeKind::TableRow => self.append_table_row(builder, node),
            NodeKind::Table => self.append_table(builder, node),
            NodeKind::OrderedList => self.append_list(builder, node, true),
            NodeKind::UnorderedList => self.append_list(builder, node, false),
            NodeKind::Select => self.append_select(builder, node),
            NodeKind::SubmitInput => {
                let label = node.attr("value").unwrap_or(DEFAULT_SUBMIT_LABEL);
                builder.append(label, AppendMode::Normalize);
            }
            NodeKind::ResetInput => {
                let label = node.attr("value").unwrap_or(DEFAULT_RESET_LABEL);
                builder.append(label, AppendMode::Normalize);
            }
            NodeKind::CheckBox | NodeKind::RadioButton => {
                let state = if node.node.is_checked() { "checked" } else { "unchecked" };
                builder.append(state, AppendMode::Normalize);
            }
            NodeKind::Input => builder.append(node.node.value(), AppendMode::Normalize),
            NodeKind::InlineFrame => self.append_inline_frame(builder, node),
            NodeKind::Other => self.append_dom_node(builder, node),
        }
    }

    fn append_children(&self, builder: &mut TextBuilder, parent: &NodeRef<'_>) {
        for child in parent.node.children() {
            self.append_node(builder, &NodeRef::with_parent(child, parent));
        }
    }

    /// Default rule: children, wrapped in block separators for block elements
    fn append_dom_node(&self, builder: &mut TextBuilder, node: &NodeRef<'_>) {
        let block = node.is_element()
            && !node.is_tag("body")
            && self.oracle.computed_display(node) == "block";

        if block {
            builder.append_block_separator();
        }
        self.append_children(builder, node);
        if block {
            builder.append_block_separator();
        }
    }

    fn append_text(&self, builder: &mut TextBuilder, text: &NodeRef<'_>) {
        if let Some(parent) = text.parent_element() {
            // title text is taken as is, without computing any style
            if !parent.is_tag("title") && !self.is_visible(parent) {
                return;
            }
        }
        let data = text.node.node_value.as_deref().unwrap_or_default();
        builder.append(data, AppendMode::Normalize);
    }

    fn append_text_area(&self, builder: &mut TextBuilder, text_area: &NodeRef<'_>) {
        if !self.is_visible(text_area) {
            return;
        }
        match text_area.attr("value") {
            Some(value) => builder.append(value, AppendMode::PreserveLineAndBlank),
            None => builder.append(
                &text_area.node.text_content(),
                AppendMode::PreserveLineAndBlank,
            ),
        }
    }

    fn append_preformatted(&self, builder: &mut TextBuilder, pre: &NodeRef<'_>) {
        if !self.is_visible(pre) {
            return;
        }
        builder.append_block_separator();
        builder.append(&pre.node.text_content(), AppendMode::PreserveLiteral);
        builder.append_block_separator();
    }

    /// Cells separated by tabs
    fn append_table_row(&self, builder: &mut TextBuilder, row: &NodeRef<'_>) {
        let cells = row
            .node
            .element_children()
            .filter(|c| c.is_tag("td") || c.is_tag("th"));

        for (i, cell) in cells.enumerate() {
            if i > 0 {
                builder.append_tab();
            }
            self.append_children(builder, &NodeRef::with_parent(cell, row));
        }
    }

    /// Caption first, then the header rows, the body rows and the footer rows
    fn append_table(&self, builder: &mut TextBuilder, table: &NodeRef<'_>) {
        builder.append_block_separator();

        let section = |tag: &str| table.node.element_children().find(|c| c.is_tag(tag));
        if let Some(caption) = section("caption") {
            builder.append(&caption.text_content(), AppendMode::Normalize);
            builder.append_block_separator();
        }

        let header = section("thead");
        let footer = section("tfoot");
        let is_header_or_footer = |group: &Node| {
            header.is_some_and(|h| std::ptr::eq(h, group))
                || footer.is_some_and(|f| std::ptr::eq(f, group))
        };

        let mut first = true;
        let mut rows = 0;

        if let Some(header) = header {
            let header = NodeRef::with_parent(header, table);
            rows += self.append_table_rows(builder, &header, &mut first);
        }

        for child in table.node.element_children() {
            if child.is_tag("tr") {
                if !first {
                    builder.append_block_separator();
                }
                first = false;
                rows += 1;
                self.append_table_row(builder, &NodeRef::with_parent(child, table));
            } else if is_row_group(child) && !is_header_or_footer(child) {
                let group = NodeRef::with_parent(child, table);
                rows += self.append_table_rows(builder, &group, &mut first);
            }
        }

        if let Some(footer) = footer {
            let footer = NodeRef::with_parent(footer, table);
            self.append_table_rows(builder, &footer, &mut first);
        } else if rows == 0 {
            if let Some(child) = table.node.first_child() {
                debug!("table without rows, falling back to its first child");
                self.append_node(builder, &NodeRef::with_parent(child, table));
            }
        }

        builder.append_block_separator();
    }

    /// Rows of one row group, separated from earlier rows. Returns the
    /// number of rows written.
    fn append_table_rows(
        &self,
        builder: &mut TextBuilder,
        group: &NodeRef<'_>,
        first: &mut bool,
    ) -> usize {
        let mut count = 0;
        for row in group.node.element_children().filter(|c| c.is_tag("tr")) {
            if !*first {
                builder.append_block_separator();
            }
            *first = false;
            count += 1;
            self.append_table_row(builder, &NodeRef::with_parent(row, group));
        }
        count
    }

    /// `ol` and `ul`: one block per child, list items numbered for `ol`
    fn append_list(&self, builder: &mut TextBuilder, list: &NodeRef<'_>, numbered: bool) {
        builder.append_block_separator();

        let mut number = 1;
        for (i, child) in list.node.children().enumerate() {
            if i > 0 {
                builder.append_block_separator();
            }
            let item = NodeRef::with_parent(child, list);
            if numbered && child.is_tag("li") {
                builder.append(&format!("{number}. "), AppendMode::Normalize);
                number += 1;
                self.append_children(builder, &item);
            } else {
                self.append_node(builder, &item);
            }
        }

        builder.append_block_separator();
    }

    /// The selected options, or all of them for a multiple select
    fn append_select(&self, builder: &mut TextBuilder, select: &NodeRef<'_>) {
        let options = select_options(select.node);

        let shown: Vec<_> = if select.node.is_multiple() {
            options
        } else {
            // a single select shows its last selected option, else the first one
            options
                .iter()
                .rev()
                .find(|(_, option)| option.is_selected())
                .or_else(|| options.first())
                .copied()
                .into_iter()
                .collect()
        };

        for (i, (group, option)) in shown.into_iter().enumerate() {
            if i > 0 {
                builder.append_block_separator();
            }
            match group {
                Some(group) => {
                    let group = NodeRef::with_parent(group, select);
                    self.append_node(builder, &NodeRef::with_parent(option, &group));
                }
                None => self.append_node(builder, &NodeRef::with_parent(option, select)),
            }
        }
    }

    fn append_inline_frame(&self, builder: &mut TextBuilder, frame: &NodeRef<'_>) {
        if !self.is_visible(frame) {
            debug!("skipping hidden inline frame");
            return;
        }
        builder.append_block_separator();
        match frame.node.content_document.as_deref() {
            Some(document) => self.append_node(builder, &NodeRef::new(document)),
            None => debug!("inline frame has no loaded document"),
        }
        builder.append_block_separator();
    }
}

impl Default for TextSerializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Only the first child of a title counts, and only if it is text
fn append_title(builder: &mut TextBuilder, title: &Node) {
    if let Some(text) = title.first_child().filter(|c| c.is_text()) {
        builder.append(
            text.node_value.as_deref().unwrap_or_default(),
            AppendMode::Normalize,
        );
        builder.append_block_separator();
    }
}

fn is_row_group(node: &Node) -> bool {
    node.is_tag("thead") || node.is_tag("tbody") || node.is_tag("tfoot")
}

/// Options of a select with the `optgroup` they sit in, in document order
fn select_options(select: &Node) -> Vec<(Option<&Node>, &Node)> {
    let mut options = Vec::new();
    for child in select.element_children() {
        if child.is_tag("option") {
            options.push((None, child));
        } else if child.is_tag("optgroup") {
            options.extend(
                child
                    .element_children()
                    .filter(|o| o.is_tag("option"))
                    .map(|o| (Some(child), o)),
            );
        }
    }
    options
}
