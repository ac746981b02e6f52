//! Element tree: the hast-shaped input of the compiler.
//!
//! Prose has already been turned into elements (`p`, `h1`, `em`, …); MDX
//! constructs keep their own node kinds. Embedded JavaScript arrives already
//! lowered into code-tree nodes.

use crate::estree::{Expression, Provenance, Statement};
use crate::unist::Position;

/// Element tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Document root.
    Root(Root),
    /// HTML element generated from prose.
    Element(Element),
    /// Text.
    Text(Text),
    /// HTML comment.
    Comment(Comment),
    /// MDX JSX element (`<Card>…</Card>`).
    MdxJsxElement(MdxJsxElement),
    /// MDX expression (`{value}`).
    MdxExpression(MdxExpression),
    /// MDX ESM block (`import`/`export`).
    MdxjsEsm(MdxjsEsm),
}

impl Node {
    /// Children of parent nodes.
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Root(node) => Some(&node.children),
            Node::Element(node) => Some(&node.children),
            Node::MdxJsxElement(node) => Some(&node.children),
            _ => None,
        }
    }

    /// Mutable children of parent nodes.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Root(node) => Some(&mut node.children),
            Node::Element(node) => Some(&mut node.children),
            Node::MdxJsxElement(node) => Some(&mut node.children),
            _ => None,
        }
    }

    /// Position in the original document.
    pub fn position(&self) -> Option<Position> {
        match self {
            Node::Root(node) => node.position,
            Node::Element(node) => node.position,
            Node::Text(node) => node.position,
            Node::Comment(node) => node.position,
            Node::MdxJsxElement(node) => node.position,
            Node::MdxExpression(node) => node.position,
            Node::MdxjsEsm(node) => node.position,
        }
    }

    /// Text node without a position.
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(Text {
            value: value.into(),
            position: None,
        })
    }

    /// Element without properties or a position.
    pub fn element(tag_name: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Element(Element {
            tag_name: tag_name.into(),
            properties: Vec::new(),
            children,
            position: None,
        })
    }

    /// Root without a position.
    pub fn root(children: Vec<Node>) -> Self {
        Node::Root(Root {
            children,
            position: None,
        })
    }
}

/// Document root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Root {
    /// Top-level nodes.
    pub children: Vec<Node>,
    /// Position in the original document.
    pub position: Option<Position>,
}

/// HTML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name (`p`, `h1`, `a`, …).
    pub tag_name: String,
    /// Properties in JSX attribute naming (`className`, `href`).
    pub properties: Vec<(String, PropertyValue)>,
    /// Child nodes.
    pub children: Vec<Node>,
    /// Position in the original document.
    pub position: Option<Position>,
}

/// Value of an element property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Plain string.
    String(String),
    /// Present (`true`) or omitted (`false`).
    Boolean(bool),
    /// Number.
    Number(f64),
    /// Space-separated list such as `className`.
    SpaceSeparated(Vec<String>),
    /// Comma-separated list such as `accept`.
    CommaSeparated(Vec<String>),
}

/// Text.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Text content.
    pub value: String,
    /// Position in the original document.
    pub position: Option<Position>,
}

/// HTML comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Comment content.
    pub value: String,
    /// Position in the original document.
    pub position: Option<Position>,
}

/// Whether an MDX construct is block-level or inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdxKind {
    /// Block-level (`mdxJsxFlowElement`, `mdxFlowExpression`).
    Flow,
    /// Inline (`mdxJsxTextElement`, `mdxTextExpression`).
    Text,
}

/// MDX JSX element.
#[derive(Debug, Clone, PartialEq)]
pub struct MdxJsxElement {
    /// Flow or text.
    pub kind: MdxKind,
    /// Name (`Card`, `a.b`, `svg:rect`); `None` for fragments.
    pub name: Option<String>,
    /// Attributes, in order.
    pub attributes: Vec<MdxJsxAttribute>,
    /// Child nodes.
    pub children: Vec<Node>,
    /// Set to explicit by the markup normalizer.
    pub provenance: Provenance,
    /// Position in the original document.
    pub position: Option<Position>,
}

impl MdxJsxElement {
    /// Element with the given kind and name, not yet marked explicit.
    pub fn new(kind: MdxKind, name: Option<&str>, children: Vec<Node>) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
            attributes: Vec::new(),
            children,
            provenance: Provenance::Implicit,
            position: None,
        }
    }
}

/// MDX JSX attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum MdxJsxAttribute {
    /// `name`, `name="value"`, or `name={value}`.
    Property {
        /// Attribute name.
        name: String,
        /// Value; `None` for boolean shorthand.
        value: Option<MdxJsxAttributeValue>,
    },
    /// `{...argument}`; holds the lowered spread argument.
    Spread(Expression),
}

/// MDX JSX attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum MdxJsxAttributeValue {
    /// `"value"`
    Literal(String),
    /// `{value}`, lowered.
    Expression(Expression),
}

/// MDX expression.
#[derive(Debug, Clone, PartialEq)]
pub struct MdxExpression {
    /// Flow or text.
    pub kind: MdxKind,
    /// Lowered expression; `None` for empty or comment-only braces.
    pub expression: Option<Expression>,
    /// Position in the original document.
    pub position: Option<Position>,
}

/// MDX ESM block.
#[derive(Debug, Clone, PartialEq)]
pub struct MdxjsEsm {
    /// Lowered import/export statements.
    pub body: Vec<Statement>,
    /// Position in the original document.
    pub position: Option<Position>,
}
