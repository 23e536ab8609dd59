//! Utility functions and constants for HTML processing.

/// Elements rendered as `display: block` by default
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "frameset",
    "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend", "listing",
    "main", "menu", "nav", "noframes", "ol", "optgroup", "option", "p", "plaintext", "pre",
    "search", "section", "summary", "ul", "xmp",
];

/// Elements that are never rendered (`display: none` by default)
pub const HIDDEN_ELEMENTS: &[&str] = &[
    "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "param", "rp",
    "script", "style", "template", "title",
];

/// Default `display` value of table parts and list items
const SPECIAL_DISPLAY: &[(&str, &str)] = &[
    ("li", "list-item"),
    ("table", "table"),
    ("caption", "table-caption"),
    ("colgroup", "table-column-group"),
    ("col", "table-column"),
    ("thead", "table-header-group"),
    ("tbody", "table-row-group"),
    ("tfoot", "table-footer-group"),
    ("tr", "table-row"),
    ("td", "table-cell"),
    ("th", "table-cell"),
    ("ruby", "ruby"),
    ("rt", "ruby-text"),
];

/// Check if a tag is a block-level element
pub(crate) fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// The user-agent `display` value of a tag
pub fn default_display(tag: &str) -> &'static str {
    if is_block(tag) {
        return "block";
    }
    let tag = tag.to_lowercase();
    if HIDDEN_ELEMENTS.contains(&tag.as_str()) {
        return "none";
    }
    SPECIAL_DISPLAY
        .iter()
        .find(|(name, _)| *name == tag)
        .map_or("inline", |&(_, display)| display)
}

/// Clean an attribute value (trim and handle empty)
pub(crate) fn clean_attribute(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
