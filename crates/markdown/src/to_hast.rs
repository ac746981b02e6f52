//! mdast to element tree.
//!
//! Prose becomes HTML elements; MDX constructs keep their own node kinds
//! with embedded code handed to an [`EmbeddedLowering`]. Block siblings are
//! separated by `"\n"` text nodes.

use std::collections::HashMap;

use markdown::mdast::{self, AttributeContent, AttributeValue, ReferenceKind};
use mdxc_core::hast::{
    Element, MdxExpression, MdxJsxAttribute, MdxJsxAttributeValue, MdxJsxElement, MdxKind,
    MdxjsEsm, Node, PropertyValue, Root, Text,
};
use mdxc_core::unist::{Point, Position};
use mdxc_core::{Diagnostics, SourceLocation};

use crate::MdxError;
use crate::frontmatter;
use crate::lowering::EmbeddedLowering;

const WARNING_SOURCE: &str = "mdxc:markdown";

/// Converts a parsed document into an element tree.
pub fn to_hast(
    root: mdast::Node,
    lowering: &dyn EmbeddedLowering,
    frontmatter_name: Option<&str>,
    file: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> Result<Node, MdxError> {
    let mut definitions = HashMap::new();
    collect_definitions(&root, &mut definitions);

    let mut converter = Converter {
        lowering,
        frontmatter_name,
        file,
        diagnostics,
        definitions,
    };

    match root {
        mdast::Node::Root(root) => {
            let children = converter.all(root.children)?;
            Ok(Node::Root(Root {
                children: wrap(children, false),
                position: position(root.position),
            }))
        }
        other => {
            let children = converter.one(other)?;
            Ok(Node::root(children))
        }
    }
}

/// Link definition: url and title.
type Definition = (String, Option<String>);

struct Converter<'a> {
    lowering: &'a dyn EmbeddedLowering,
    frontmatter_name: Option<&'a str>,
    file: Option<&'a str>,
    diagnostics: &'a mut Diagnostics,
    definitions: HashMap<String, Definition>,
}

impl Converter<'_> {
    fn all(&mut self, nodes: Vec<mdast::Node>) -> Result<Vec<Node>, MdxError> {
        let mut result = Vec::with_capacity(nodes.len());
        for node in nodes {
            result.extend(self.one(node)?);
        }
        Ok(result)
    }

    fn one(&mut self, node: mdast::Node) -> Result<Vec<Node>, MdxError> {
        let converted = match node {
            mdast::Node::Root(root) => return self.all(root.children),
            mdast::Node::Text(text) => text_node(text.value, position(text.position)),
            mdast::Node::Paragraph(paragraph) => {
                let children = self.all(paragraph.children)?;
                element("p", Vec::new(), children, position(paragraph.position))
            }
            mdast::Node::Heading(heading) => {
                let children = self.all(heading.children)?;
                element(
                    &format!("h{}", heading.depth),
                    Vec::new(),
                    children,
                    position(heading.position),
                )
            }
            mdast::Node::Emphasis(node) => {
                let children = self.all(node.children)?;
                element("em", Vec::new(), children, position(node.position))
            }
            mdast::Node::Strong(node) => {
                let children = self.all(node.children)?;
                element("strong", Vec::new(), children, position(node.position))
            }
            mdast::Node::Delete(node) => {
                let children = self.all(node.children)?;
                element("del", Vec::new(), children, position(node.position))
            }
            mdast::Node::InlineCode(code) => {
                let position = position(code.position);
                element(
                    "code",
                    Vec::new(),
                    vec![text_node(code.value, position)],
                    position,
                )
            }
            mdast::Node::Break(node) => {
                return Ok(vec![
                    element("br", Vec::new(), Vec::new(), position(node.position)),
                    Node::text("\n"),
                ]);
            }
            mdast::Node::ThematicBreak(node) => {
                element("hr", Vec::new(), Vec::new(), position(node.position))
            }
            mdast::Node::Blockquote(quote) => {
                let children = self.all(quote.children)?;
                element(
                    "blockquote",
                    Vec::new(),
                    wrap(children, true),
                    position(quote.position),
                )
            }
            mdast::Node::Code(code) => code_block(code),
            mdast::Node::Link(link) => {
                let mut properties = vec![("href".to_string(), PropertyValue::String(link.url))];
                if let Some(title) = link.title {
                    properties.push(("title".to_string(), PropertyValue::String(title)));
                }
                let children = self.all(link.children)?;
                element("a", properties, children, position(link.position))
            }
            mdast::Node::Image(image) => {
                image_element(image.url, image.alt, image.title, position(image.position))
            }
            mdast::Node::LinkReference(reference) => {
                let position = position(reference.position);
                let children = self.all(reference.children)?;
                match self.definition(&reference.identifier) {
                    Some((url, title)) => {
                        let mut properties = vec![("href".to_string(), PropertyValue::String(url))];
                        if let Some(title) = title {
                            properties.push(("title".to_string(), PropertyValue::String(title)));
                        }
                        element("a", properties, children, position)
                    }
                    None => {
                        let suffix = reference_suffix(
                            &reference.reference_kind,
                            reference.label.as_deref(),
                            &reference.identifier,
                        );
                        let mut reverted = vec![Node::text("[")];
                        reverted.extend(children);
                        reverted.push(Node::text(format!("]{suffix}")));
                        return Ok(reverted);
                    }
                }
            }
            mdast::Node::ImageReference(reference) => {
                let position = position(reference.position);
                match self.definition(&reference.identifier) {
                    Some((url, title)) => image_element(url, reference.alt, title, position),
                    None => {
                        let suffix = reference_suffix(
                            &reference.reference_kind,
                            reference.label.as_deref(),
                            &reference.identifier,
                        );
                        text_node(format!("![{}]{suffix}", reference.alt), position)
                    }
                }
            }
            mdast::Node::Definition(_) => return Ok(Vec::new()),
            mdast::Node::List(list) => return self.list(list).map(|node| vec![node]),
            mdast::Node::Table(table) => return self.table(table).map(|node| vec![node]),
            mdast::Node::MdxJsxFlowElement(node) => {
                let element = self.jsx(
                    MdxKind::Flow,
                    node.name,
                    node.attributes,
                    node.children,
                    position(node.position),
                )?;
                Node::MdxJsxElement(element)
            }
            mdast::Node::MdxJsxTextElement(node) => {
                let element = self.jsx(
                    MdxKind::Text,
                    node.name,
                    node.attributes,
                    node.children,
                    position(node.position),
                )?;
                Node::MdxJsxElement(element)
            }
            mdast::Node::MdxFlowExpression(node) => {
                let position = position(node.position);
                Node::MdxExpression(MdxExpression {
                    kind: MdxKind::Flow,
                    expression: self.expression(&node.value, position)?,
                    position,
                })
            }
            mdast::Node::MdxTextExpression(node) => {
                let position = position(node.position);
                Node::MdxExpression(MdxExpression {
                    kind: MdxKind::Text,
                    expression: self.expression(&node.value, position)?,
                    position,
                })
            }
            mdast::Node::MdxjsEsm(node) => {
                let position = position(node.position);
                let body = self
                    .lowering
                    .lower_esm(&node.value, position)
                    .map_err(|err| MdxError::Lowering {
                        message: err.message,
                        location: self.location(position),
                    })?;
                Node::MdxjsEsm(MdxjsEsm { body, position })
            }
            mdast::Node::Yaml(yaml) => {
                let position = position(yaml.position);
                let Some(name) = self.frontmatter_name else {
                    log::debug!("Frontmatter left out of the output");
                    return Ok(Vec::new());
                };
                let statement = frontmatter::export_statement(name, &yaml.value, position)
                    .map_err(|err| MdxError::Frontmatter {
                        message: err.to_string(),
                        location: self.location(position),
                    })?;
                Node::MdxjsEsm(MdxjsEsm {
                    body: vec![statement],
                    position,
                })
            }
            mdast::Node::Html(html) => {
                let position = position(html.position);
                log::warn!("Dropping raw HTML at {:?}", position);
                let location = position.map(|position| self.location(Some(position)));
                self.diagnostics.warn_once(
                    "markdown:html",
                    WARNING_SOURCE,
                    "Raw HTML is not supported and was dropped",
                    location,
                );
                return Ok(Vec::new());
            }
            other => {
                let kind = kind_name(&other);
                let position = position(other.position().cloned());
                log::warn!("Skipping unsupported markdown node `{kind}` at {:?}", position);
                let location = position.map(|position| self.location(Some(position)));
                self.diagnostics.warn_once(
                    &format!("markdown:unsupported:{kind}"),
                    WARNING_SOURCE,
                    format!("Unsupported markdown node `{kind}` was skipped"),
                    location,
                );
                return Ok(Vec::new());
            }
        };
        Ok(vec![converted])
    }

    fn list(&mut self, list: mdast::List) -> Result<Node, MdxError> {
        let loose = list.spread
            || list
                .children
                .iter()
                .any(|child| matches!(child, mdast::Node::ListItem(item) if item.spread));

        let mut properties = Vec::new();
        if list.ordered
            && let Some(start) = list.start
            && start != 1
        {
            properties.push(("start".to_string(), PropertyValue::Number(f64::from(start))));
        }

        let mut has_tasks = false;
        let mut items = Vec::with_capacity(list.children.len());
        for child in list.children {
            match child {
                mdast::Node::ListItem(item) => {
                    has_tasks |= item.checked.is_some();
                    items.push(self.list_item(item, loose)?);
                }
                other => items.extend(self.one(other)?),
            }
        }
        if has_tasks {
            properties.push((
                "className".to_string(),
                PropertyValue::SpaceSeparated(vec!["contains-task-list".to_string()]),
            ));
        }

        let tag = if list.ordered { "ol" } else { "ul" };
        Ok(element(
            tag,
            properties,
            wrap(items, true),
            position(list.position),
        ))
    }

    fn list_item(&mut self, item: mdast::ListItem, loose: bool) -> Result<Node, MdxError> {
        let mut results = self.all(item.children)?;
        let mut properties = Vec::new();

        if let Some(checked) = item.checked {
            properties.push((
                "className".to_string(),
                PropertyValue::SpaceSeparated(vec!["task-list-item".to_string()]),
            ));
            let checkbox = element(
                "input",
                vec![
                    (
                        "type".to_string(),
                        PropertyValue::String("checkbox".to_string()),
                    ),
                    ("checked".to_string(), PropertyValue::Boolean(checked)),
                    ("disabled".to_string(), PropertyValue::Boolean(true)),
                ],
                Vec::new(),
                None,
            );
            match results.first_mut() {
                Some(Node::Element(paragraph)) if paragraph.tag_name == "p" => {
                    paragraph.children.insert(0, Node::text(" "));
                    paragraph.children.insert(0, checkbox);
                }
                _ => results.insert(
                    0,
                    element("p", Vec::new(), vec![checkbox, Node::text(" ")], None),
                ),
            }
        }

        let mut children = Vec::new();
        let count = results.len();
        for (index, child) in results.into_iter().enumerate() {
            let paragraph = is_paragraph(&child);
            // Tight lists keep the first paragraph on the `<li>` line.
            if loose || index != 0 || !paragraph {
                children.push(Node::text("\n"));
            }
            match child {
                Node::Element(element) if paragraph && !loose => {
                    children.extend(element.children)
                }
                other => children.push(other),
            }
            if index + 1 == count && (loose || !paragraph) {
                children.push(Node::text("\n"));
            }
        }

        Ok(element("li", properties, children, position(item.position)))
    }

    fn table(&mut self, table: mdast::Table) -> Result<Node, MdxError> {
        let position = position(table.position);
        let mut head = Vec::new();
        let mut body = Vec::new();

        for (row_index, row) in table.children.into_iter().enumerate() {
            let mdast::Node::TableRow(row) = row else {
                continue;
            };
            let tag = if row_index == 0 { "th" } else { "td" };
            let mut cells = Vec::with_capacity(row.children.len());
            for (cell_index, cell) in row.children.into_iter().enumerate() {
                let mdast::Node::TableCell(cell) = cell else {
                    continue;
                };
                let mut properties = Vec::new();
                if let Some(align) = table.align.get(cell_index).and_then(align_value) {
                    properties.push(("align".to_string(), PropertyValue::String(align.into())));
                }
                let children = self.all(cell.children)?;
                cells.push(element(tag, properties, children, self::position(cell.position)));
            }
            let row = element("tr", Vec::new(), wrap(cells, true), self::position(row.position));
            if row_index == 0 {
                head.push(row);
            } else {
                body.push(row);
            }
        }

        let mut sections = vec![element("thead", Vec::new(), wrap(head, true), None)];
        if !body.is_empty() {
            sections.push(element("tbody", Vec::new(), wrap(body, true), None));
        }
        Ok(element("table", Vec::new(), wrap(sections, true), position))
    }

    fn jsx(
        &mut self,
        kind: MdxKind,
        name: Option<String>,
        attributes: Vec<AttributeContent>,
        children: Vec<mdast::Node>,
        position: Option<Position>,
    ) -> Result<MdxJsxElement, MdxError> {
        let mut lowered = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            match attribute {
                AttributeContent::Property(property) => {
                    let value = match property.value {
                        None => None,
                        Some(AttributeValue::Literal(value)) => {
                            Some(MdxJsxAttributeValue::Literal(value))
                        }
                        Some(AttributeValue::Expression(expression)) => {
                            match self.expression(&expression.value, position)? {
                                Some(expression) => {
                                    Some(MdxJsxAttributeValue::Expression(expression))
                                }
                                None => {
                                    return Err(MdxError::Lowering {
                                        message: format!(
                                            "Attribute `{}` needs a value inside its braces",
                                            property.name
                                        ),
                                        location: self.location(position),
                                    });
                                }
                            }
                        }
                    };
                    lowered.push(MdxJsxAttribute::Property {
                        name: property.name,
                        value,
                    });
                }
                AttributeContent::Expression(expression) => {
                    let argument = self
                        .lowering
                        .lower_spread(&expression.value, position)
                        .map_err(|err| MdxError::Lowering {
                            message: err.message,
                            location: self.location(position),
                        })?;
                    lowered.push(MdxJsxAttribute::Spread(argument));
                }
            }
        }

        let mut element = MdxJsxElement::new(kind, name.as_deref(), self.all(children)?);
        element.attributes = lowered;
        element.position = position;
        Ok(element)
    }

    fn expression(
        &mut self,
        source: &str,
        position: Option<Position>,
    ) -> Result<Option<mdxc_core::estree::Expression>, MdxError> {
        self.lowering
            .lower_expression(source, position)
            .map_err(|err| MdxError::Lowering {
                message: err.message,
                location: self.location(position),
            })
    }

    fn definition(&self, identifier: &str) -> Option<Definition> {
        self.definitions.get(&identifier.to_lowercase()).cloned()
    }

    fn location(&self, position: Option<Position>) -> SourceLocation {
        let (line, column) = position
            .map(|position| (position.start.line, position.start.column))
            .unwrap_or((1, 1));
        match self.file {
            Some(file) => SourceLocation::with_file(file.to_string(), line, column),
            None => SourceLocation::new(line, column),
        }
    }
}

fn collect_definitions(node: &mdast::Node, definitions: &mut HashMap<String, Definition>) {
    if let mdast::Node::Definition(definition) = node {
        // First definition wins.
        definitions
            .entry(definition.identifier.to_lowercase())
            .or_insert_with(|| (definition.url.clone(), definition.title.clone()));
    }
    if let Some(children) = node.children() {
        for child in children {
            collect_definitions(child, definitions);
        }
    }
}

fn code_block(code: mdast::Code) -> Node {
    let position = position(code.position);
    let mut properties = Vec::new();
    if let Some(lang) = &code.lang {
        properties.push((
            "className".to_string(),
            PropertyValue::SpaceSeparated(vec![format!("language-{lang}")]),
        ));
    }
    let value = if code.value.is_empty() {
        code.value
    } else {
        format!("{}\n", code.value)
    };
    let inner = element("code", properties, vec![text_node(value, position)], position);
    element("pre", Vec::new(), vec![inner], position)
}

fn image_element(
    url: String,
    alt: String,
    title: Option<String>,
    position: Option<Position>,
) -> Node {
    let mut properties = vec![
        ("src".to_string(), PropertyValue::String(url)),
        ("alt".to_string(), PropertyValue::String(alt)),
    ];
    if let Some(title) = title {
        properties.push(("title".to_string(), PropertyValue::String(title)));
    }
    element("img", properties, Vec::new(), position)
}

fn reference_suffix(kind: &ReferenceKind, label: Option<&str>, identifier: &str) -> String {
    match kind {
        ReferenceKind::Full => format!("[{}]", label.unwrap_or(identifier)),
        ReferenceKind::Collapsed => "[]".to_string(),
        ReferenceKind::Shortcut => String::new(),
    }
}

fn align_value(align: &mdast::AlignKind) -> Option<&'static str> {
    match align {
        mdast::AlignKind::Left => Some("left"),
        mdast::AlignKind::Right => Some("right"),
        mdast::AlignKind::Center => Some("center"),
        mdast::AlignKind::None => None,
    }
}

fn kind_name(node: &mdast::Node) -> &'static str {
    match node {
        mdast::Node::Toml(_) => "toml",
        mdast::Node::Math(_) => "math",
        mdast::Node::InlineMath(_) => "inlineMath",
        mdast::Node::FootnoteDefinition(_) => "footnoteDefinition",
        mdast::Node::FootnoteReference(_) => "footnoteReference",
        mdast::Node::ListItem(_) => "listItem",
        mdast::Node::TableRow(_) => "tableRow",
        mdast::Node::TableCell(_) => "tableCell",
        _ => "unknown",
    }
}

fn is_paragraph(node: &Node) -> bool {
    matches!(node, Node::Element(element) if element.tag_name == "p")
}

/// Joins block siblings with line endings; `loose` also pads both ends.
fn wrap(nodes: Vec<Node>, loose: bool) -> Vec<Node> {
    let mut result = Vec::with_capacity(nodes.len() * 2 + 1);
    if loose {
        result.push(Node::text("\n"));
    }
    let empty = nodes.is_empty();
    for (index, node) in nodes.into_iter().enumerate() {
        if index > 0 {
            result.push(Node::text("\n"));
        }
        result.push(node);
    }
    if loose && !empty {
        result.push(Node::text("\n"));
    }
    result
}

fn element(
    tag_name: &str,
    properties: Vec<(String, PropertyValue)>,
    children: Vec<Node>,
    position: Option<Position>,
) -> Node {
    Node::Element(Element {
        tag_name: tag_name.to_string(),
        properties,
        children,
        position,
    })
}

fn text_node(value: String, position: Option<Position>) -> Node {
    Node::Text(Text { value, position })
}

fn position(position: Option<markdown::unist::Position>) -> Option<Position> {
    position.map(|position| Position {
        start: Point::new(
            position.start.line,
            position.start.column,
            position.start.offset,
        ),
        end: Point::new(position.end.line, position.end.column, position.end.offset),
    })
}
