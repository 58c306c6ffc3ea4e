//! Owned XML element tree built from a `roxmltree` document.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{LoaderError, Result};

/// One node of a parsed XML tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name, `{uri}local` when the element is namespaced.
    pub tag: String,

    /// Attributes in source order. Names are unique.
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    pub children: Vec<Element>,

    /// Text before the first child, untrimmed.
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Parse XML text and return the root element.
    ///
    /// DTDs are accepted; entity references they declare are expanded.
    ///
    /// # Examples
    /// ```
    /// use xmldb_loader::xml::Element;
    ///
    /// let root = Element::parse(r#"<r><a id="1">hi</a><b/></r>"#).unwrap();
    /// assert_eq!(root.tag, "r");
    /// assert_eq!(root.children.len(), 2);
    /// assert_eq!(root.children[0].attribute("id"), Some("1"));
    /// ```
    pub fn parse(xml: &str) -> std::result::Result<Self, roxmltree::Error> {
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(xml, options)?;
        Ok(Self::from_node(doc.root_element()))
    }

    /// Copy a `roxmltree` element node and its element descendants.
    ///
    /// Comments and processing instructions are skipped.
    pub fn from_node(node: Node<'_, '_>) -> Self {
        let tag_name = node.tag_name();
        let attributes = node
            .attributes()
            .map(|attr| {
                (
                    qualified_name(attr.namespace(), attr.name()),
                    attr.value().to_string(),
                )
            })
            .collect();

        Self {
            tag: qualified_name(tag_name.namespace(), tag_name.name()),
            attributes,
            children: node
                .children()
                .filter(Node::is_element)
                .map(Self::from_node)
                .collect(),
            text: leading_text(node),
        }
    }

    /// Look up an attribute value by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Element text with surrounding whitespace removed, if any remains.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Character data before the first child element.
///
/// Text split by comments or processing instructions is joined back together.
fn leading_text(node: Node<'_, '_>) -> Option<String> {
    let mut text: Option<String> = None;
    for child in node.children() {
        if child.is_element() {
            break;
        }
        if !child.is_text() {
            continue;
        }
        if let Some(chunk) = child.text() {
            text.get_or_insert_with(String::new).push_str(chunk);
        }
    }
    text
}

/// Render a possibly namespaced name in Clark notation.
///
/// # Examples
/// ```
/// use xmldb_loader::xml::qualified_name;
///
/// assert_eq!(qualified_name(None, "draw"), "draw");
/// assert_eq!(qualified_name(Some("urn:x"), "draw"), "{urn:x}draw");
/// ```
pub fn qualified_name(namespace: Option<&str>, local: &str) -> String {
    match namespace {
        Some(uri) if !uri.is_empty() => format!("{{{uri}}}{local}"),
        _ => local.to_string(),
    }
}

/// Read and parse an XML file.
///
/// Fails with [`LoaderError::InputNotFound`] when the path does not exist
/// and [`LoaderError::MalformedInput`] when the content is not well-formed.
pub fn load_xml_file(path: &Path) -> Result<Element> {
    if !path.exists() {
        return Err(LoaderError::InputNotFound(path.to_path_buf()));
    }

    tracing::debug!(path = %path.display(), "Reading XML file");
    let xml = fs::read_to_string(path)?;

    let root = Element::parse(&xml).map_err(|source| LoaderError::MalformedInput {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(root = %root.tag, children = root.children.len(), "Parsed XML");
    Ok(root)
}
