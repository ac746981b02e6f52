//! Markup normalizer: unwraps inline MDX nodes from incidental paragraphs and
//! marks author-written JSX as explicit.

use crate::estree::Provenance;
use crate::hast::{MdxKind, Node};

/// Normalizes the tree in place.
///
/// A `p` whose sole child is an inline MDX JSX element or inline MDX
/// expression is replaced by that child (as its flow kind). Every MDX JSX
/// element gets [`Provenance::Explicit`]. Nothing else changes.
pub fn normalize(node: &mut Node) {
    if let Node::MdxJsxElement(element) = node {
        element.provenance = Provenance::Explicit;
    }

    if let Some(children) = node.children_mut() {
        for child in children.iter_mut() {
            if let Some(unwrapped) = unwrap_paragraph(child) {
                *child = unwrapped;
            }
            normalize(child);
        }
    }
}

fn unwrap_paragraph(node: &mut Node) -> Option<Node> {
    let Node::Element(element) = node else {
        return None;
    };
    if element.tag_name != "p" || element.children.len() != 1 {
        return None;
    }

    let inline_mdx = match &element.children[0] {
        Node::MdxJsxElement(inner) => inner.kind == MdxKind::Text,
        Node::MdxExpression(inner) => inner.kind == MdxKind::Text,
        _ => false,
    };
    if !inline_mdx {
        return None;
    }

    let mut child = element.children.pop()?;

    match &mut child {
        Node::MdxJsxElement(inner) => inner.kind = MdxKind::Flow,
        Node::MdxExpression(inner) => inner.kind = MdxKind::Flow,
        _ => {}
    }
    log::debug!("Unwrapped paragraph around inline MDX node");
    Some(child)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estree::Expression;
    use crate::hast::{MdxExpression, MdxJsxElement};

    fn text_jsx(name: &str) -> Node {
        Node::MdxJsxElement(MdxJsxElement::new(MdxKind::Text, Some(name), Vec::new()))
    }

    #[test]
    fn test_unwraps_sole_inline_jsx() {
        let mut root = Node::root(vec![Node::element("p", vec![text_jsx("Card")])]);
        normalize(&mut root);

        let children = root.children().expect("root has children");
        let Node::MdxJsxElement(element) = &children[0] else {
            panic!("expected unwrapped element, got {:?}", children[0]);
        };
        assert_eq!(element.kind, MdxKind::Flow);
        assert_eq!(element.provenance, Provenance::Explicit);
    }

    #[test]
    fn test_unwraps_sole_inline_expression() {
        let expression = Node::MdxExpression(MdxExpression {
            kind: MdxKind::Text,
            expression: Some(Expression::ident("value")),
            position: None,
        });
        let mut root = Node::root(vec![Node::element("p", vec![expression])]);
        normalize(&mut root);

        let children = root.children().expect("root has children");
        assert!(matches!(
            &children[0],
            Node::MdxExpression(MdxExpression {
                kind: MdxKind::Flow,
                ..
            })
        ));
    }

    #[test]
    fn test_keeps_paragraph_with_prose() {
        let mut root = Node::root(vec![Node::element(
            "p",
            vec![Node::text("see "), text_jsx("Card")],
        )]);
        normalize(&mut root);

        let children = root.children().expect("root has children");
        let Node::Element(paragraph) = &children[0] else {
            panic!("paragraph should stay");
        };
        let Node::MdxJsxElement(element) = &paragraph.children[1] else {
            panic!("expected inline element");
        };
        assert_eq!(element.kind, MdxKind::Text);
        assert_eq!(element.provenance, Provenance::Explicit);
    }

    #[test]
    fn test_marks_nested_jsx_explicit() {
        let inner = text_jsx("h1");
        let outer = Node::MdxJsxElement(MdxJsxElement::new(
            MdxKind::Flow,
            Some("Card"),
            vec![Node::element("p", vec![Node::text("a "), inner])],
        ));
        let mut root = Node::root(vec![outer]);
        normalize(&mut root);

        let Node::MdxJsxElement(card) = &root.children().expect("children")[0] else {
            panic!("expected card");
        };
        let Node::Element(paragraph) = &card.children[0] else {
            panic!("expected paragraph");
        };
        let Node::MdxJsxElement(h1) = &paragraph.children[1] else {
            panic!("expected h1");
        };
        assert_eq!(h1.provenance, Provenance::Explicit);
    }
}
