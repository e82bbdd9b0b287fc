//! Attribute table parsing for API reference pages.
//!
//! An `<AttributeTable>` wraps a single unordered list in the format:
//!
//! ```text
//! - ATTRIBUTE NAME
//!   - DATA TYPE
//!   - DESCRIPTION
//!     - SUB ATTRIBUTE NAME
//!       - DATA TYPE
//!       - DESCRIPTION
//! ```
//!
//! Nesting can go to an arbitrary depth. The markdown is first turned into a
//! small [`Node`] tree and the attribute records are read off that tree.

use pulldown_cmark::{Event, Options, Parser, Tag};
use serde::Serialize;

/// A fragment of parsed markdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Plain text
    Text(String),
    /// Anything with structure
    Element(Element),
}

/// Structured markdown fragments.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    Code { value: String },
    Emphasis { children: Vec<Node> },
    Strong { children: Vec<Node> },
    Link { href: String, children: Vec<Node> },
    Paragraph { children: Vec<Node> },
    List { ordered: bool, items: Vec<Item> },
    Html { value: String },
    Break,
}

/// A list item and its children.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Item {
    pub children: Vec<Node>,
}

impl Node {
    /// Shorthand for a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// The list payload, if this node is a list.
    pub fn as_list(&self) -> Option<(bool, &[Item])> {
        match self {
            Node::Element(Element::List { ordered, items }) => Some((*ordered, items)),
            _ => None,
        }
    }

    /// Concatenated text content, ignoring formatting.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => match element {
                Element::Code { value } => out.push_str(value),
                Element::Emphasis { children }
                | Element::Strong { children }
                | Element::Link { children, .. }
                | Element::Paragraph { children } => {
                    children.iter().for_each(|c| c.collect_text(out));
                }
                Element::List { items, .. } => {
                    for item in items {
                        item.children.iter().for_each(|c| c.collect_text(out));
                    }
                }
                Element::Html { .. } | Element::Break => {}
            },
        }
    }
}

/// The type or description slot of an attribute: one fragment, or several
/// when the source used inline formatting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Content {
    Single(Node),
    Sequence(Vec<Node>),
}

impl Content {
    fn from_nodes(mut nodes: Vec<Node>) -> Self {
        if nodes.len() == 1 {
            Content::Single(nodes.remove(0))
        } else {
            Content::Sequence(nodes)
        }
    }

    /// Concatenated text content.
    pub fn plain_text(&self) -> String {
        match self {
            Content::Single(node) => node.plain_text(),
            Content::Sequence(nodes) => nodes.iter().map(Node::plain_text).collect(),
        }
    }
}

/// One documented field of an API object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: Content,
    pub description: Content,
    pub child_attributes: Option<Vec<Attribute>>,
}

/// Attribute parsing options.
#[derive(Debug, Clone, Copy)]
pub struct AttributeOptions {
    /// Validate list shape (one unordered list, two children per item).
    /// Lenient mode trusts the shape and only fails where it cannot continue.
    pub strict: bool,
}

impl Default for AttributeOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

/// Errors that can occur when reading an attribute table.
#[derive(Debug, thiserror::Error)]
pub enum AttributeError {
    #[error("[AttributeTable] There must only be 1 markdown list within <AttributeTable>, found {0} fragments")]
    ExpectedSingleList(usize),

    #[error("[AttributeTable] The markdown within <AttributeTable> must be an unordered list")]
    ExpectedUnorderedList,

    #[error("[AttributeTable] Expected attribute list item `{name}` to have 2 children, a name and a nested list. Found {found} instead.")]
    UnexpectedChildCount { name: String, found: usize },

    #[error("No description found for attribute `{name}`. This can happen if the type field (the first list item below an attribute) is left blank and trailing whitespace gets removed. Make sure your editor isn't removing whitespace on save.")]
    MissingDescription { name: String },

    #[error("[AttributeTable] {0}")]
    Structure(String),
}

/// Parse markdown text holding an attribute list.
pub fn parse_attribute_table(
    markdown: &str,
    options: &AttributeOptions,
) -> Result<Vec<Attribute>, AttributeError> {
    parse_attribute_list(&parse_nodes(markdown), options)
}

/// Read attribute records off an already parsed fragment list.
pub fn parse_attribute_list(
    nodes: &[Node],
    options: &AttributeOptions,
) -> Result<Vec<Attribute>, AttributeError> {
    let nodes: Vec<&Node> = nodes.iter().filter(|n| !is_blank(n)).collect();

    if options.strict && nodes.len() != 1 {
        return Err(AttributeError::ExpectedSingleList(nodes.len()));
    }

    let list = nodes
        .first()
        .ok_or_else(|| AttributeError::Structure("no list found".to_string()))?;
    let (ordered, items) = list
        .as_list()
        .ok_or_else(|| AttributeError::Structure("expected a list".to_string()))?;

    if options.strict && ordered {
        return Err(AttributeError::ExpectedUnorderedList);
    }

    items.iter().map(|item| parse_item(item, options)).collect()
}

fn parse_item(item: &Item, options: &AttributeOptions) -> Result<Attribute, AttributeError> {
    let children = normalize(&item.children);
    let name = children
        .first()
        .filter(|n| n.as_list().is_none())
        .map(|n| n.plain_text().trim().to_string())
        .ok_or_else(|| AttributeError::Structure("attribute name is missing".to_string()))?;

    if options.strict && children.len() != 2 {
        return Err(AttributeError::UnexpectedChildCount {
            name,
            found: children.len(),
        });
    }

    let sub_items = children
        .get(1)
        .and_then(Node::as_list)
        .map(|(_, items)| items)
        .ok_or_else(|| {
            AttributeError::Structure(format!("attribute `{name}` has no type/description list"))
        })?;

    let type_item = sub_items.first().ok_or_else(|| {
        AttributeError::Structure(format!("attribute `{name}` has no type"))
    })?;
    let Some(description_item) = sub_items.get(1) else {
        return Err(AttributeError::MissingDescription { name });
    };

    let mut description = normalize(&description_item.children);
    let child_items = match description.last() {
        Some(Node::Element(Element::List {
            ordered: false,
            items,
        })) => Some(items.clone()),
        _ => None,
    };
    if child_items.is_some() {
        description.pop();
    }

    let child_attributes = child_items
        .unwrap_or_default()
        .iter()
        .map(|child| parse_item(child, options))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Attribute {
        name,
        type_: Content::from_nodes(normalize(&type_item.children)),
        description: Content::from_nodes(description),
        child_attributes: (!child_attributes.is_empty()).then_some(child_attributes),
    })
}

/// Merge adjacent text and drop whitespace-only text.
///
/// Escapes such as `\_links` split one logical string into several text
/// events; merging puts them back together before the shape is checked.
/// A lone paragraph is flattened into its parent. Several paragraphs stay
/// separate `Paragraph` elements so their boundaries survive.
fn normalize(children: &[Node]) -> Vec<Node> {
    let paragraphs = children
        .iter()
        .filter(|c| matches!(c, Node::Element(Element::Paragraph { .. })))
        .count();
    let mut out: Vec<Node> = Vec::with_capacity(children.len());

    for child in children {
        match child {
            Node::Element(Element::Paragraph { children }) if paragraphs > 1 => {
                out.push(Node::Element(Element::Paragraph {
                    children: normalize(children),
                }));
            }
            Node::Element(Element::Paragraph { children }) => {
                for inner in normalize(children) {
                    push_merged(&mut out, inner);
                }
            }
            other => push_merged(&mut out, other.clone()),
        }
    }

    out.retain(|n| !is_blank(n));
    out
}

fn push_merged(out: &mut Vec<Node>, node: Node) {
    if let (Some(Node::Text(last)), Node::Text(next)) = (out.last_mut(), &node) {
        last.push_str(next);
        return;
    }
    out.push(node);
}

fn is_blank(node: &Node) -> bool {
    matches!(node, Node::Text(text) if text.trim().is_empty())
}

/// Parse markdown into a fragment tree.
pub fn parse_nodes(markdown: &str) -> Vec<Node> {
    let mut builder = NodeBuilder::new();
    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        builder.push(event);
    }
    builder.finish()
}

#[derive(Debug)]
enum Open {
    Paragraph,
    Emphasis,
    Strong,
    Link(String),
    List(bool),
    Item,
    /// Containers without their own node; children go to the parent
    Passthrough,
}

#[derive(Debug)]
struct Frame {
    open: Open,
    children: Vec<Node>,
    items: Vec<Item>,
}

/// Incrementally builds a [`Node`] tree from pulldown-cmark events.
#[derive(Debug)]
pub struct NodeBuilder {
    stack: Vec<Frame>,
}

impl NodeBuilder {
    /// Create a builder with an empty root.
    pub fn new() -> Self {
        Self {
            stack: vec![Frame {
                open: Open::Passthrough,
                children: Vec::new(),
                items: Vec::new(),
            }],
        }
    }

    /// Feed one event.
    pub fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                let open = match tag {
                    Tag::Paragraph => Open::Paragraph,
                    Tag::Emphasis => Open::Emphasis,
                    Tag::Strong => Open::Strong,
                    Tag::Link { dest_url, .. } => Open::Link(dest_url.to_string()),
                    Tag::List(start) => Open::List(start.is_some()),
                    Tag::Item => Open::Item,
                    _ => Open::Passthrough,
                };
                self.stack.push(Frame {
                    open,
                    children: Vec::new(),
                    items: Vec::new(),
                });
            }
            Event::End(_) => self.close(),
            Event::Text(text) => self.emit(Node::Text(text.to_string())),
            Event::Code(code) => self.emit(Node::Element(Element::Code {
                value: code.to_string(),
            })),
            Event::Html(html) | Event::InlineHtml(html) => {
                self.emit(Node::Element(Element::Html {
                    value: html.to_string(),
                }))
            }
            Event::SoftBreak => self.emit(Node::text("\n")),
            Event::HardBreak => self.emit(Node::Element(Element::Break)),
            _ => {}
        }
    }

    /// Close any open containers and return the root fragments.
    pub fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }

    fn emit(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };

        let node = match frame.open {
            Open::Paragraph => Element::Paragraph {
                children: frame.children,
            },
            Open::Emphasis => Element::Emphasis {
                children: frame.children,
            },
            Open::Strong => Element::Strong {
                children: frame.children,
            },
            Open::Link(href) => Element::Link {
                href,
                children: frame.children,
            },
            Open::List(ordered) => Element::List {
                ordered,
                items: frame.items,
            },
            Open::Item => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.items.push(Item {
                        children: frame.children,
                    });
                }
                return;
            }
            Open::Passthrough => {
                if let Some(parent) = self.stack.last_mut() {
                    parent.children.extend(frame.children);
                }
                return;
            }
        };

        self.emit(Node::Element(node));
    }
}

impl Default for NodeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
