//! Markup lowering: compiles JSX into calls for the automatic
//! (`_jsx`/`_jsxs`) or classic (`React.createElement`) runtime.

use crate::estree::*;
use crate::options::{JsxRuntime, Options};
use crate::resolve::first_argument;
use crate::visit::{walk_expression, VisitMut};

/// Lowers every JSX element and fragment in `program`.
///
/// Adds the runtime import (or `arguments[0]` binding) only when JSX was
/// found, so running it on already lowered code changes nothing.
pub fn build_jsx(program: &mut Program, options: &Options) {
    let mut builder = Builder {
        options,
        uses_fragment: false,
        uses_jsx: false,
        uses_jsxs: false,
    };
    builder.visit_program(program);

    if options.jsx_runtime == JsxRuntime::Automatic
        && let Some(statement) = builder.runtime_binding()
    {
        program.body.insert(0, statement);
    }
}

/// Cleans raw JSX text the way Babel does: lines are trimmed, blank lines
/// dropped, and remaining lines joined with a single space.
///
/// Returns `None` when nothing is left.
pub fn clean_jsx_text(value: &str) -> Option<String> {
    let normalized = value.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();
    let last_non_empty = lines
        .iter()
        .rposition(|line| line.chars().any(|ch| ch != ' ' && ch != '\t'));

    let mut result = String::new();
    for (index, line) in lines.iter().enumerate() {
        let mut trimmed = line.replace('\t', " ");
        if index != 0 {
            trimmed = trimmed.trim_start_matches(' ').to_string();
        }
        if index != lines.len() - 1 {
            trimmed = trimmed.trim_end_matches(' ').to_string();
        }
        if trimmed.is_empty() {
            continue;
        }
        if Some(index) != last_non_empty {
            trimmed.push(' ');
        }
        result.push_str(&trimmed);
    }

    if result.is_empty() { None } else { Some(result) }
}

struct Builder<'a> {
    options: &'a Options,
    uses_fragment: bool,
    uses_jsx: bool,
    uses_jsxs: bool,
}

impl Builder<'_> {
    fn automatic(&self) -> bool {
        self.options.jsx_runtime == JsxRuntime::Automatic
    }

    /// Import of the used runtime names, sorted by imported name.
    fn runtime_binding(&self) -> Option<Statement> {
        let names: Vec<(&str, &str)> = [
            (self.uses_fragment, ("Fragment", "_Fragment")),
            (self.uses_jsx, ("jsx", "_jsx")),
            (self.uses_jsxs, ("jsxs", "_jsxs")),
        ]
        .into_iter()
        .filter_map(|(used, names)| used.then_some(names))
        .collect();
        if names.is_empty() {
            return None;
        }

        if self.options.binds_from_arguments() {
            return Some(Statement::const_declaration(
                Pattern::Object(
                    names
                        .iter()
                        .map(|(imported, local)| ObjectPatternProperty::binding(imported, local))
                        .collect(),
                ),
                first_argument(),
            ));
        }

        let source = self.options.jsx_import_source.as_deref().unwrap_or("react");
        Some(Statement::Import(ImportDeclaration {
            specifiers: names
                .iter()
                .map(|(imported, local)| ImportSpecifier::Named {
                    imported: imported.to_string(),
                    local: Identifier::new(*local),
                })
                .collect(),
            source: format!("{}/jsx-runtime", source),
            span: None,
        }))
    }

    fn element_type(&mut self, name: &JsxName) -> Expression {
        match name {
            JsxName::Identifier(name) => {
                let intrinsic = name.starts_with(|ch: char| ch.is_ascii_lowercase())
                    || name.contains('-');
                if intrinsic {
                    Expression::string(name.as_str())
                } else {
                    Expression::ident(name.as_str())
                }
            }
            JsxName::Member { object, properties } => {
                let mut expression = Expression::ident(object.as_str());
                for property in properties {
                    expression = Expression::member(expression, property.as_str());
                }
                expression
            }
            JsxName::Namespaced { .. } => Expression::string(name.to_string()),
        }
    }

    fn fragment_type(&mut self) -> Expression {
        if self.automatic() {
            self.uses_fragment = true;
            return Expression::ident("_Fragment");
        }
        let pragma_frag = self.options.pragma_frag.as_deref().unwrap_or("React.Fragment");
        Expression::member_path(&pragma_frag.split('.').collect::<Vec<_>>())
    }

    fn attribute_value(&mut self, value: Option<JsxAttributeValue>) -> Option<Expression> {
        match value {
            None => Some(Expression::boolean(true)),
            Some(JsxAttributeValue::String(value)) => Some(Expression::string(value)),
            Some(JsxAttributeValue::Expression(JsxExpression::Expression(mut expression))) => {
                self.visit_expression(&mut expression);
                Some(expression)
            }
            Some(JsxAttributeValue::Expression(JsxExpression::Empty { .. })) => None,
            Some(JsxAttributeValue::Element(element)) => Some(self.element(*element)),
            Some(JsxAttributeValue::Fragment(fragment)) => Some(self.fragment(*fragment)),
        }
    }

    fn children(&mut self, children: Vec<JsxChild>) -> Vec<Expression> {
        let mut result = Vec::with_capacity(children.len());
        for child in children {
            match child {
                JsxChild::Text(text) => {
                    if let Some(value) = clean_jsx_text(&text.value) {
                        result.push(Expression::Literal(Literal {
                            value: LiteralValue::String(value),
                            span: text.span,
                        }));
                    }
                }
                JsxChild::Expression(JsxExpression::Expression(mut expression)) => {
                    self.visit_expression(&mut expression);
                    result.push(expression);
                }
                JsxChild::Expression(JsxExpression::Empty { .. }) => {}
                JsxChild::Element(element) => result.push(self.element(*element)),
                JsxChild::Fragment(fragment) => result.push(self.fragment(*fragment)),
            }
        }
        result
    }

    fn element(&mut self, element: JsxElement) -> Expression {
        let element_type = self.element_type(&element.name);
        let mut members = Vec::with_capacity(element.attributes.len() + 1);
        let mut key = None;

        for attribute in element.attributes {
            match attribute {
                JsxAttributeItem::Spread(mut argument) => {
                    self.visit_expression(&mut argument);
                    members.push(ObjectMember::Spread(argument));
                }
                JsxAttributeItem::Attribute(attribute) => {
                    let Some(value) = self.attribute_value(attribute.value) else {
                        continue;
                    };
                    let name = attribute.name.to_string();
                    if self.automatic() && name == "key" {
                        key = Some(value);
                        continue;
                    }
                    members.push(ObjectMember::Property(Property::init(
                        PropertyKey::from_name(&name),
                        value,
                    )));
                }
            }
        }

        let children = self.children(element.children);
        self.call(element_type, members, children, key, element.span)
    }

    fn fragment(&mut self, fragment: JsxFragment) -> Expression {
        let fragment_type = self.fragment_type();
        let children = self.children(fragment.children);
        self.call(fragment_type, Vec::new(), children, None, fragment.span)
    }

    fn call(
        &mut self,
        element_type: Expression,
        mut members: Vec<ObjectMember>,
        mut children: Vec<Expression>,
        key: Option<Expression>,
        span: Option<crate::unist::Position>,
    ) -> Expression {
        let mut arguments = vec![Argument::Expression(element_type)];

        let callee = if self.automatic() {
            let multiple = children.len() > 1;
            match children.len() {
                0 => {}
                1 => members.push(ObjectMember::Property(Property::init(
                    PropertyKey::Identifier("children".to_string()),
                    children.remove(0),
                ))),
                _ => members.push(ObjectMember::Property(Property::init(
                    PropertyKey::Identifier("children".to_string()),
                    Expression::Array(
                        children
                            .drain(..)
                            .map(|child| Some(Argument::Expression(child)))
                            .collect(),
                    ),
                ))),
            }
            arguments.push(Argument::Expression(Expression::Object(members)));
            if let Some(key) = key {
                arguments.push(Argument::Expression(key));
            }
            if multiple {
                self.uses_jsxs = true;
                Expression::ident("_jsxs")
            } else {
                self.uses_jsx = true;
                Expression::ident("_jsx")
            }
        } else {
            arguments.push(Argument::Expression(if members.is_empty() {
                Expression::null()
            } else {
                Expression::Object(members)
            }));
            arguments.extend(children.into_iter().map(Argument::Expression));
            let pragma = self.options.pragma.as_deref().unwrap_or("React.createElement");
            Expression::member_path(&pragma.split('.').collect::<Vec<_>>())
        };

        Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments,
            optional: false,
            span,
        })
    }
}

impl VisitMut for Builder<'_> {
    fn visit_expression(&mut self, expression: &mut Expression) {
        if !expression.is_jsx() {
            walk_expression(self, expression);
            return;
        }
        *expression = match std::mem::replace(expression, Expression::null()) {
            Expression::JsxElement(element) => self.element(*element),
            Expression::JsxFragment(fragment) => self.fragment(*fragment),
            other => other,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OutputFormat;

    fn program_of(expression: Expression) -> Program {
        Program {
            body: vec![Statement::expression(expression)],
            comments: Vec::new(),
        }
    }

    fn heading() -> Expression {
        let mut h1 = JsxElement::new(JsxName::parse("_components.h1"));
        h1.attributes
            .push(JsxAttributeItem::Attribute(JsxAttribute::string("id", "intro")));
        h1.children.push(JsxChild::Expression(JsxExpression::Expression(
            Expression::string("Hello"),
        )));
        Expression::JsxElement(Box::new(h1))
    }

    fn lowered(program: &Program) -> &Expression {
        match program.body.last() {
            Some(Statement::Expression(statement)) => &statement.expression,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_clean_jsx_text() {
        assert_eq!(clean_jsx_text("  a  "), Some("  a  ".to_string()));
        assert_eq!(clean_jsx_text("\n  a\n  b\n"), Some("a b".to_string()));
        assert_eq!(clean_jsx_text("\n   \n"), None);
        assert_eq!(clean_jsx_text("a\tb"), Some("a b".to_string()));
    }

    #[test]
    fn test_automatic_runtime_single_child() {
        let mut program = program_of(heading());
        build_jsx(&mut program, &Options::default());

        assert_eq!(
            program.body[0],
            Statement::Import(ImportDeclaration {
                specifiers: vec![ImportSpecifier::Named {
                    imported: "jsx".into(),
                    local: Identifier::new("_jsx"),
                }],
                source: "react/jsx-runtime".into(),
                span: None,
            })
        );
        assert_eq!(
            *lowered(&program),
            Expression::call(
                Expression::ident("_jsx"),
                vec![
                    Expression::member_path(&["_components", "h1"]),
                    Expression::Object(vec![
                        ObjectMember::Property(Property::init(
                            PropertyKey::Identifier("id".into()),
                            Expression::string("intro"),
                        )),
                        ObjectMember::Property(Property::init(
                            PropertyKey::Identifier("children".into()),
                            Expression::string("Hello"),
                        )),
                    ]),
                ],
            )
        );
    }

    #[test]
    fn test_fragment_with_many_children_uses_jsxs() {
        let fragment = JsxFragment {
            children: vec![
                JsxChild::Element(Box::new(JsxElement::new(JsxName::parse("hr")))),
                JsxChild::Expression(JsxExpression::Empty { comment: None }),
                JsxChild::Element(Box::new(JsxElement::new(JsxName::parse("Card")))),
            ],
            span: None,
        };
        let mut program = program_of(Expression::JsxFragment(Box::new(fragment)));
        build_jsx(&mut program, &Options::default());

        let Statement::Import(import) = &program.body[0] else {
            panic!("expected runtime import");
        };
        let imported: Vec<_> = import
            .specifiers
            .iter()
            .map(|specifier| specifier.local().name.as_str())
            .collect();
        assert_eq!(imported, vec!["_Fragment", "_jsx", "_jsxs"]);

        let Expression::Call(call) = lowered(&program) else {
            panic!("expected call");
        };
        assert_eq!(*call.callee, Expression::ident("_jsxs"));
        assert_eq!(call.arguments[0], Argument::Expression(Expression::ident("_Fragment")));
    }

    #[test]
    fn test_key_is_passed_separately() {
        let mut li = JsxElement::new(JsxName::parse("li"));
        li.attributes
            .push(JsxAttributeItem::Attribute(JsxAttribute::expression(
                "key",
                Expression::ident("id"),
            )));
        let mut program = program_of(Expression::JsxElement(Box::new(li)));
        build_jsx(&mut program, &Options::default());

        assert_eq!(
            *lowered(&program),
            Expression::call(
                Expression::ident("_jsx"),
                vec![
                    Expression::string("li"),
                    Expression::Object(Vec::new()),
                    Expression::ident("id"),
                ],
            )
        );
    }

    #[test]
    fn test_classic_runtime() {
        let options = Options {
            jsx_runtime: JsxRuntime::Classic,
            ..Options::default()
        };
        let mut program = program_of(heading());
        build_jsx(&mut program, &options);

        assert_eq!(program.body.len(), 1, "classic runtime adds no import");
        let Expression::Call(call) = lowered(&program) else {
            panic!("expected call");
        };
        assert_eq!(
            *call.callee,
            Expression::member_path(&["React", "createElement"])
        );
        assert_eq!(call.arguments.len(), 3);
        assert_eq!(
            call.arguments[2],
            Argument::Expression(Expression::string("Hello"))
        );
    }

    #[test]
    fn test_function_body_binds_runtime_from_arguments() {
        let mut program = program_of(heading());
        build_jsx(
            &mut program,
            &Options {
                output_format: OutputFormat::FunctionBody,
                ..Options::default()
            },
        );
        assert_eq!(
            program.body[0],
            Statement::const_declaration(
                Pattern::Object(vec![ObjectPatternProperty::binding("jsx", "_jsx")]),
                first_argument(),
            )
        );
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let mut program = program_of(heading());
        build_jsx(&mut program, &Options::default());
        let once = program.clone();
        build_jsx(&mut program, &Options::default());
        assert_eq!(program, once);
    }

    #[test]
    fn test_nested_jsx_in_expression_children() {
        let arrow = Expression::Arrow(Box::new(ArrowFunction {
            params: vec![Pattern::ident("item")],
            body: ArrowBody::Expression(Box::new(Expression::JsxElement(Box::new(
                JsxElement::new(JsxName::parse("li")),
            )))),
            is_async: false,
            span: None,
        }));
        let mut ul = JsxElement::new(JsxName::parse("ul"));
        ul.children
            .push(JsxChild::Expression(JsxExpression::Expression(arrow)));
        let mut program = program_of(Expression::JsxElement(Box::new(ul)));
        build_jsx(&mut program, &Options::default());

        let Expression::Call(call) = lowered(&program) else {
            panic!("expected call");
        };
        let Argument::Expression(Expression::Object(members)) = &call.arguments[1] else {
            panic!("expected props");
        };
        let ObjectMember::Property(children) = &members[0] else {
            panic!("expected children");
        };
        let Expression::Arrow(arrow) = &children.value else {
            panic!("expected arrow");
        };
        assert!(matches!(
            &arrow.body,
            ArrowBody::Expression(body) if matches!(**body, Expression::Call(_))
        ));
    }
}
