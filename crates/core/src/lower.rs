//! Tree lowering: element tree to code tree.
//!
//! ESM blocks become top-level statements in document order; everything else
//! is gathered into one `<>…</>` expression statement appended last.

use crate::estree::{
    Expression, ExpressionStatement, JsxAttribute, JsxAttributeItem, JsxAttributeName,
    JsxAttributeValue, JsxChild, JsxElement, JsxExpression, JsxFragment, JsxName, Literal,
    LiteralValue, Program, Provenance, Statement,
};
use crate::hast::{
    Element, MdxExpression, MdxJsxAttribute, MdxJsxAttributeValue, MdxJsxElement, Node,
    PropertyValue,
};

/// Lowers a normalized element tree into a program.
///
/// When there is no content besides ESM and whitespace, no content statement
/// is produced.
pub fn to_program(tree: Node) -> Program {
    let mut program = Program::default();
    let (children, span) = match tree {
        Node::Root(root) => (root.children, root.position),
        other => {
            let span = other.position();
            (vec![other], span)
        }
    };

    let mut content = Vec::new();
    for child in children {
        match child {
            Node::MdxjsEsm(esm) => program.body.extend(esm.body),
            other => {
                if let Some(child) = lower_child(other) {
                    content.push(child);
                }
            }
        }
    }

    let has_content = content.iter().any(|child| !is_whitespace_text(child));
    if has_content {
        program.body.push(Statement::Expression(ExpressionStatement {
            expression: Expression::JsxFragment(Box::new(JsxFragment {
                children: content,
                span,
            })),
            span,
        }));
    }

    program
}

fn is_whitespace_text(child: &JsxChild) -> bool {
    match child {
        JsxChild::Expression(JsxExpression::Expression(Expression::Literal(Literal {
            value: LiteralValue::String(value),
            ..
        }))) => value.trim().is_empty(),
        _ => false,
    }
}

fn lower_children(children: Vec<Node>) -> Vec<JsxChild> {
    children.into_iter().filter_map(lower_child).collect()
}

fn lower_child(node: Node) -> Option<JsxChild> {
    match node {
        Node::Root(root) => Some(JsxChild::Fragment(Box::new(JsxFragment {
            children: lower_children(root.children),
            span: root.position,
        }))),
        Node::Element(element) => Some(JsxChild::Element(Box::new(lower_element(element)))),
        Node::Text(text) => {
            if text.value.is_empty() {
                return None;
            }
            Some(JsxChild::Expression(JsxExpression::Expression(
                Expression::Literal(Literal {
                    value: LiteralValue::String(text.value),
                    span: text.position,
                }),
            )))
        }
        Node::Comment(comment) => Some(JsxChild::Expression(JsxExpression::Empty {
            comment: Some(comment.value),
        })),
        Node::MdxJsxElement(element) => Some(lower_mdx_jsx_element(element)),
        Node::MdxExpression(MdxExpression { expression, .. }) => {
            Some(JsxChild::Expression(match expression {
                Some(expression) => JsxExpression::Expression(expression),
                None => JsxExpression::Empty { comment: None },
            }))
        }
        Node::MdxjsEsm(esm) => {
            log::warn!("ESM found below the document root is ignored: {:?}", esm.position);
            None
        }
    }
}

fn lower_element(element: Element) -> JsxElement {
    let mut attributes = Vec::with_capacity(element.properties.len());
    for (name, value) in element.properties {
        let value = match value {
            PropertyValue::Boolean(false) => continue,
            PropertyValue::Boolean(true) => None,
            PropertyValue::String(value) => Some(JsxAttributeValue::String(value)),
            PropertyValue::Number(value) => Some(JsxAttributeValue::Expression(
                JsxExpression::Expression(Expression::number(value)),
            )),
            PropertyValue::SpaceSeparated(values) => {
                Some(JsxAttributeValue::String(values.join(" ")))
            }
            PropertyValue::CommaSeparated(values) => {
                Some(JsxAttributeValue::String(values.join(", ")))
            }
        };
        attributes.push(JsxAttributeItem::Attribute(JsxAttribute {
            name: JsxAttributeName::parse(&name),
            value,
        }));
    }

    JsxElement {
        name: JsxName::Identifier(element.tag_name),
        attributes,
        children: lower_children(element.children),
        provenance: Provenance::Implicit,
        span: element.position,
    }
}

fn lower_mdx_jsx_element(element: MdxJsxElement) -> JsxChild {
    let children = lower_children(element.children);
    let Some(name) = element.name else {
        return JsxChild::Fragment(Box::new(JsxFragment {
            children,
            span: element.position,
        }));
    };

    let attributes = element
        .attributes
        .into_iter()
        .map(|attribute| match attribute {
            MdxJsxAttribute::Spread(argument) => JsxAttributeItem::Spread(argument),
            MdxJsxAttribute::Property { name, value } => {
                JsxAttributeItem::Attribute(JsxAttribute {
                    name: JsxAttributeName::parse(&name),
                    value: value.map(|value| match value {
                        MdxJsxAttributeValue::Literal(value) => JsxAttributeValue::String(value),
                        MdxJsxAttributeValue::Expression(expression) => {
                            JsxAttributeValue::Expression(JsxExpression::Expression(expression))
                        }
                    }),
                })
            }
        })
        .collect();

    JsxChild::Element(Box::new(JsxElement {
        name: JsxName::parse(&name),
        attributes,
        children,
        provenance: element.provenance,
        span: element.position,
    }))
}
