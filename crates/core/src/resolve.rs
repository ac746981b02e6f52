//! Dynamic element resolver.
//!
//! Walks every function, classifies the JSX element names it renders, and
//! rewrites the function so those names resolve through a merged
//! `_components` registry at runtime.
//!
//! Classifications always go to the outermost active frame: a component used
//! in a nested callback is bound by the top-level function containing it.

use std::collections::HashSet;

use crate::document::{CONTENT_NAME, LAYOUT_NAME};
use crate::estree::*;
use crate::identifier::{is_identifier_name, is_reserved_word};
use crate::options::Options;
use crate::visit::{walk_arrow, walk_function, walk_jsx_element, VisitMut};

/// Local binding of the merged registry.
pub const COMPONENTS_BINDING: &str = "_components";
/// Helper producing throwing placeholders for components never supplied.
pub const MISSING_HELPER: &str = "_missingMdxReference";
/// Local alias of the provider's `useMDXComponents`.
pub const PROVIDER_BINDING: &str = "_provideComponents";
/// Registry key the layout is looked up under.
const WRAPPER_KEY: &str = "wrapper";

/// Resolves JSX names in `program` in place.
pub fn resolve(program: &mut Program, options: &Options) {
    let mut resolver = Resolver {
        options,
        top_scope: top_level_bindings(program),
        frames: Vec::new(),
        scopes: Vec::new(),
        needs_missing_helper: false,
        uses_provider: false,
    };
    resolver.visit_program(program);

    if resolver.needs_missing_helper {
        program.body.insert(0, missing_helper());
    }
    if resolver.uses_provider
        && let Some(source) = &options.provider_import_source
    {
        program.body.insert(0, provider_binding(source, options));
    }
    log::debug!(
        "Resolved components (missing helper: {}, provider: {})",
        resolver.needs_missing_helper,
        resolver.uses_provider
    );
}

/// Names bound at the top level of `program`.
pub fn top_level_bindings(program: &Program) -> HashSet<String> {
    let mut names = HashSet::new();
    for statement in &program.body {
        match statement {
            Statement::Import(import) => {
                for specifier in &import.specifiers {
                    names.insert(specifier.local().name.clone());
                }
            }
            Statement::Declaration(declaration) => names.extend(declaration.bound_names()),
            Statement::ExportNamed(ExportNamedDeclaration {
                declaration: Some(declaration),
                ..
            }) => names.extend(declaration.bound_names()),
            Statement::ExportDefault(ExportDefaultDeclaration {
                declaration: DefaultDeclaration::Function(Function { id: Some(id), .. }),
                ..
            })
            | Statement::ExportDefault(ExportDefaultDeclaration {
                declaration: DefaultDeclaration::Class(Class { id: Some(id), .. }),
                ..
            }) => {
                names.insert(id.name.clone());
            }
            _ => {}
        }
    }
    names
}

/// Names classified within one function.
#[derive(Debug, Default)]
struct ScopeFrame {
    objects: Vec<String>,
    components: Vec<String>,
    tags: Vec<String>,
    is_content: bool,
}

impl ScopeFrame {
    fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.components.is_empty() && self.tags.is_empty()
    }
}

fn insert(names: &mut Vec<String>, name: &str) -> bool {
    if names.iter().any(|existing| existing == name) {
        return false;
    }
    names.push(name.to_string());
    true
}

struct Resolver<'a> {
    options: &'a Options,
    top_scope: HashSet<String>,
    frames: Vec<ScopeFrame>,
    /// Names bound by each active function's params and top-level body.
    scopes: Vec<HashSet<String>>,
    needs_missing_helper: bool,
    uses_provider: bool,
}

impl Resolver<'_> {
    fn in_scope(&self, name: &str) -> bool {
        self.top_scope.contains(name) || self.scopes.iter().any(|scope| scope.contains(name))
    }

    fn classify(&mut self, element: &mut JsxElement) {
        if self.frames.is_empty() {
            return;
        }

        let tag = match &element.name {
            JsxName::Member { object, .. } => {
                if !self.in_scope(object) && !is_reserved_word(object) {
                    let object = object.clone();
                    if let Some(frame) = self.frames.first_mut() {
                        insert(&mut frame.objects, &object);
                    }
                }
                return;
            }
            JsxName::Namespaced { .. } => return,
            JsxName::Identifier(name) => name.clone(),
        };

        if !is_identifier_name(&tag) {
            return;
        }
        let in_scope = self.in_scope(&tag);
        let Some(frame) = self.frames.first_mut() else {
            return;
        };
        if !tag.starts_with(|ch: char| ch.is_ascii_lowercase()) {
            if !in_scope
                && insert(&mut frame.components, &tag)
                && tag != LAYOUT_NAME
            {
                self.needs_missing_helper = true;
            }
            return;
        }
        if element.provenance == Provenance::Explicit {
            return;
        }

        insert(&mut frame.tags, &tag);
        element.name = JsxName::Member {
            object: COMPONENTS_BINDING.to_string(),
            properties: vec![tag],
        };
    }

    /// `const _components = …, {…} = _components;` for a popped frame.
    fn bindings(&mut self, frame: &ScopeFrame, declared: &HashSet<String>) -> Statement {
        let mut defaults = Vec::new();
        for tag in &frame.tags {
            defaults.push(ObjectMember::Property(Property::init(
                PropertyKey::from_name(tag),
                Expression::string(tag.as_str()),
            )));
        }
        for component in &frame.components {
            if component == LAYOUT_NAME {
                continue;
            }
            defaults.push(ObjectMember::Property(Property::init(
                PropertyKey::from_name(component),
                Expression::call(
                    Expression::ident(MISSING_HELPER),
                    vec![Expression::string(component.as_str())],
                ),
            )));
        }

        let has_defaults = !defaults.is_empty();
        let mut sources = Vec::with_capacity(3);
        if has_defaults {
            sources.push(Expression::Object(defaults));
        }
        if self.options.provider_import_source.is_some() {
            self.uses_provider = true;
            sources.push(Expression::call(Expression::ident(PROVIDER_BINDING), Vec::new()));
        }
        if frame.is_content {
            sources.push(Expression::member_path(&["props", "components"]));
        }

        let registry = match sources.len() {
            0 => Expression::Object(Vec::new()),
            1 if frame.is_content => Expression::Logical(
                LogicalOperator::Or,
                Box::new(sources.remove(0)),
                Box::new(Expression::Object(Vec::new())),
            ),
            1 => sources.remove(0),
            _ => {
                if !has_defaults {
                    sources.insert(0, Expression::Object(Vec::new()));
                }
                Expression::call(Expression::member_path(&["Object", "assign"]), sources)
            }
        };

        let mut properties = Vec::new();
        for tag in &frame.tags {
            let bindable = is_identifier_name(tag)
                && !is_reserved_word(tag)
                && !self.top_scope.contains(tag)
                && !declared.contains(tag);
            if bindable {
                properties.push(ObjectPatternProperty::binding(tag, tag));
            }
        }
        for component in &frame.components {
            let key = if component == LAYOUT_NAME {
                WRAPPER_KEY
            } else {
                component.as_str()
            };
            properties.push(ObjectPatternProperty::binding(key, component));
        }
        for object in &frame.objects {
            properties.push(ObjectPatternProperty::binding(object, object));
        }

        let mut declarations = vec![VariableDeclarator {
            id: Pattern::ident(COMPONENTS_BINDING),
            init: Some(registry),
        }];
        if !properties.is_empty() {
            declarations.push(VariableDeclarator {
                id: Pattern::Object(properties),
                init: Some(Expression::ident(COMPONENTS_BINDING)),
            });
        }

        Statement::Declaration(Declaration::Variable(VariableDeclaration {
            kind: VariableKind::Const,
            declarations,
            span: None,
        }))
    }

    fn enter(&mut self, frame: ScopeFrame, params: &[Pattern], body: &[Statement]) {
        self.frames.push(frame);
        self.scopes.push(declared_names(params, body));
    }

    /// Pops the current frame, returning bindings to prepend when it recorded names.
    fn leave(&mut self) -> Option<Statement> {
        let declared = self.scopes.pop().unwrap_or_default();
        let frame = self.frames.pop()?;
        if frame.is_empty() {
            return None;
        }
        Some(self.bindings(&frame, &declared))
    }
}

/// Names a function binds through its params or its top-level declarations.
fn declared_names(params: &[Pattern], body: &[Statement]) -> HashSet<String> {
    let mut names = Vec::new();
    for param in params {
        param.collect_names(&mut names);
    }
    for statement in body {
        if let Statement::Declaration(declaration) = statement {
            names.extend(declaration.bound_names());
        }
    }
    names.into_iter().collect()
}

impl VisitMut for Resolver<'_> {
    fn visit_function(&mut self, function: &mut Function) {
        let is_content = self.frames.is_empty()
            && function
                .id
                .as_ref()
                .is_some_and(|id| id.name == CONTENT_NAME);
        self.enter(
            ScopeFrame {
                is_content,
                ..ScopeFrame::default()
            },
            &function.params,
            &function.body,
        );
        walk_function(self, function);
        if let Some(bindings) = self.leave() {
            function.body.insert(0, bindings);
        }
    }

    fn visit_arrow(&mut self, arrow: &mut ArrowFunction) {
        let body: &[Statement] = match &arrow.body {
            ArrowBody::Block(body) => body,
            ArrowBody::Expression(_) => &[],
        };
        self.enter(ScopeFrame::default(), &arrow.params, body);
        walk_arrow(self, arrow);
        let Some(bindings) = self.leave() else {
            return;
        };

        let mut body = match std::mem::replace(&mut arrow.body, ArrowBody::Block(Vec::new())) {
            ArrowBody::Block(body) => body,
            ArrowBody::Expression(expression) => vec![Statement::return_(*expression)],
        };
        body.insert(0, bindings);
        arrow.body = ArrowBody::Block(body);
    }

    fn visit_jsx_element(&mut self, element: &mut JsxElement) {
        self.classify(element);
        walk_jsx_element(self, element);
    }
}

/// `function _missingMdxReference(id) { return function () { throw … }; }`
fn missing_helper() -> Statement {
    let message = Expression::Binary(
        BinaryOperator::Add,
        Box::new(Expression::Binary(
            BinaryOperator::Add,
            Box::new(Expression::string("Expected component `")),
            Box::new(Expression::ident("id")),
        )),
        Box::new(Expression::string(
            "` to be defined: you likely forgot to import, pass, or provide it.",
        )),
    );
    let thrower = Function {
        body: vec![Statement::Throw(ThrowStatement {
            argument: Expression::New(
                Box::new(Expression::ident("Error")),
                vec![Argument::Expression(message)],
            ),
            span: None,
        })],
        ..Function::default()
    };

    Statement::Declaration(Declaration::Function(Function {
        id: Some(Identifier::new(MISSING_HELPER)),
        params: vec![Pattern::ident("id")],
        body: vec![Statement::return_(Expression::Function(Box::new(thrower)))],
        ..Function::default()
    }))
}

/// Provider import, or a binding from `arguments[0]` when evaluated as a function body.
fn provider_binding(source: &str, options: &Options) -> Statement {
    if options.binds_from_arguments() {
        return Statement::const_declaration(
            Pattern::Object(vec![ObjectPatternProperty::binding(
                "useMDXComponents",
                PROVIDER_BINDING,
            )]),
            first_argument(),
        );
    }
    Statement::Import(ImportDeclaration {
        specifiers: vec![ImportSpecifier::Named {
            imported: "useMDXComponents".to_string(),
            local: Identifier::new(PROVIDER_BINDING),
        }],
        source: source.to_string(),
        span: None,
    })
}

/// `arguments[0]`
pub(crate) fn first_argument() -> Expression {
    Expression::Member(MemberExpression {
        object: Box::new(Expression::ident("arguments")),
        property: MemberProperty::Computed(Box::new(Expression::number(0.0))),
        optional: false,
        span: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(name: &str, provenance: Provenance) -> Expression {
        let mut element = JsxElement::new(JsxName::parse(name));
        element.provenance = provenance;
        Expression::JsxElement(Box::new(element))
    }

    fn function(name: &str, body: Expression) -> Statement {
        Statement::Declaration(Declaration::Function(Function {
            id: Some(Identifier::new(name)),
            params: vec![Pattern::ident("props")],
            body: vec![Statement::return_(body)],
            ..Function::default()
        }))
    }

    fn function_body(statement: &Statement) -> &[Statement] {
        match statement {
            Statement::Declaration(Declaration::Function(function)) => &function.body,
            other => panic!("expected function, got {:?}", other),
        }
    }

    fn registry(statement: &Statement) -> &VariableDeclaration {
        match statement {
            Statement::Declaration(Declaration::Variable(variable)) => variable,
            other => panic!("expected registry bindings, got {:?}", other),
        }
    }

    #[test]
    fn test_implicit_tag_routes_through_components() {
        let mut program = Program {
            body: vec![function(CONTENT_NAME, element("h1", Provenance::Implicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        let body = function_body(&program.body[0]);
        assert_eq!(body.len(), 2);
        let variable = registry(&body[0]);
        assert_eq!(
            variable.declarations[0].init,
            Some(Expression::call(
                Expression::member_path(&["Object", "assign"]),
                vec![
                    Expression::Object(vec![ObjectMember::Property(Property::init(
                        PropertyKey::Identifier("h1".into()),
                        Expression::string("h1"),
                    ))]),
                    Expression::member_path(&["props", "components"]),
                ],
            ))
        );
        let Statement::Return(ReturnStatement {
            argument: Some(Expression::JsxElement(h1)),
            ..
        }) = &body[1]
        else {
            panic!("expected return of element");
        };
        assert_eq!(h1.name.to_string(), "_components.h1");
    }

    #[test]
    fn test_explicit_tag_untouched() {
        let mut program = Program {
            body: vec![function(CONTENT_NAME, element("h1", Provenance::Explicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());
        assert_eq!(function_body(&program.body[0]).len(), 1);
    }

    #[test]
    fn test_undeclared_component_gets_missing_default() {
        let mut program = Program {
            body: vec![function("Page", element("Foo", Provenance::Explicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        assert!(matches!(
            &program.body[0],
            Statement::Declaration(Declaration::Function(Function { id: Some(id), .. }))
                if id.name == MISSING_HELPER
        ));
        let variable = registry(&function_body(&program.body[1])[0]);
        assert_eq!(
            variable.declarations[0].init,
            Some(Expression::Object(vec![ObjectMember::Property(
                Property::init(
                    PropertyKey::Identifier("Foo".into()),
                    Expression::call(
                        Expression::ident(MISSING_HELPER),
                        vec![Expression::string("Foo")],
                    ),
                )
            )]))
        );
        assert_eq!(
            variable.declarations[1].id,
            Pattern::Object(vec![ObjectPatternProperty::binding("Foo", "Foo")])
        );
    }

    #[test]
    fn test_declared_component_is_not_recorded() {
        let mut program = Program {
            body: vec![
                Statement::Import(ImportDeclaration {
                    specifiers: vec![ImportSpecifier::Default {
                        local: Identifier::new("Chart"),
                    }],
                    source: "./chart.js".into(),
                    span: None,
                }),
                function("Page", element("Chart", Provenance::Explicit)),
            ],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());
        assert_eq!(program.body.len(), 2);
        assert_eq!(function_body(&program.body[1]).len(), 1);
    }

    #[test]
    fn test_nested_function_contributes_to_outer_frame() {
        let inner = Expression::Arrow(Box::new(ArrowFunction {
            params: Vec::new(),
            body: ArrowBody::Expression(Box::new(element("Foo", Provenance::Explicit))),
            is_async: false,
            span: None,
        }));
        let mut program = Program {
            body: vec![function("Page", inner)],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        let body = function_body(&program.body[1]);
        assert_eq!(body.len(), 2);
        let Statement::Return(ReturnStatement {
            argument: Some(Expression::Arrow(arrow)),
            ..
        }) = &body[1]
        else {
            panic!("expected nested arrow");
        };
        assert!(matches!(arrow.body, ArrowBody::Expression(_)));
    }

    #[test]
    fn test_arrow_shorthand_becomes_block() {
        let arrow = ArrowFunction {
            params: Vec::new(),
            body: ArrowBody::Expression(Box::new(element("em", Provenance::Implicit))),
            is_async: false,
            span: None,
        };
        let mut program = Program {
            body: vec![Statement::const_declaration(
                Pattern::ident("X"),
                Expression::Arrow(Box::new(arrow)),
            )],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        let variable = registry(&program.body[0]);
        let Some(Expression::Arrow(arrow)) = &variable.declarations[0].init else {
            panic!("expected arrow");
        };
        let ArrowBody::Block(body) = &arrow.body else {
            panic!("expected block body");
        };
        assert_eq!(body.len(), 2);
        assert!(matches!(body[1], Statement::Return(_)));
    }

    #[test]
    fn test_tag_declared_in_body_is_not_destructured() {
        let mut em = JsxElement::new(JsxName::parse("em"));
        em.children
            .push(JsxChild::Expression(JsxExpression::Expression(Expression::ident("em"))));
        let mut program = Program {
            body: vec![Statement::Declaration(Declaration::Function(Function {
                id: Some(Identifier::new("A")),
                body: vec![
                    Statement::const_declaration(Pattern::ident("em"), Expression::string("x")),
                    Statement::return_(Expression::JsxElement(Box::new(em))),
                ],
                ..Function::default()
            }))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        let body = function_body(&program.body[0]);
        assert_eq!(body.len(), 3);
        let variable = registry(&body[0]);
        assert_eq!(variable.declarations.len(), 1, "only `_components` is declared");
        assert_eq!(
            variable.declarations[0].init,
            Some(Expression::Object(vec![ObjectMember::Property(Property::init(
                PropertyKey::Identifier("em".into()),
                Expression::string("em"),
            ))]))
        );
    }

    #[test]
    fn test_component_bound_by_param_is_not_missing() {
        let mut program = Program {
            body: vec![Statement::Declaration(Declaration::Function(Function {
                id: Some(Identifier::new("Page")),
                params: vec![Pattern::Object(vec![ObjectPatternProperty::binding(
                    "Icon", "Icon",
                )])],
                body: vec![Statement::return_(element("Icon", Provenance::Explicit))],
                ..Function::default()
            }))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        assert_eq!(program.body.len(), 1, "no missing helper");
        assert_eq!(function_body(&program.body[0]).len(), 1);
    }

    #[test]
    fn test_component_bound_by_outer_param_inside_callback() {
        let inner = Expression::Arrow(Box::new(ArrowFunction {
            params: Vec::new(),
            body: ArrowBody::Expression(Box::new(element("Icon", Provenance::Explicit))),
            is_async: false,
            span: None,
        }));
        let mut program = Program {
            body: vec![Statement::Declaration(Declaration::Function(Function {
                id: Some(Identifier::new("Page")),
                params: vec![Pattern::ident("Icon")],
                body: vec![Statement::return_(inner)],
                ..Function::default()
            }))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        assert_eq!(program.body.len(), 1);
        assert_eq!(function_body(&program.body[0]).len(), 1);
    }

    #[test]
    fn test_member_root_recorded_as_object() {
        let mut program = Program {
            body: vec![function(CONTENT_NAME, element("ui.Card", Provenance::Explicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        let variable = registry(&function_body(&program.body[0])[0]);
        assert_eq!(
            variable.declarations[0].init,
            Some(Expression::Logical(
                LogicalOperator::Or,
                Box::new(Expression::member_path(&["props", "components"])),
                Box::new(Expression::Object(Vec::new())),
            ))
        );
        assert_eq!(
            variable.declarations[1].id,
            Pattern::Object(vec![ObjectPatternProperty::binding("ui", "ui")])
        );
    }

    #[test]
    fn test_layout_uses_wrapper_key_without_default() {
        let mut program = Program {
            body: vec![function(CONTENT_NAME, element(LAYOUT_NAME, Provenance::Implicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &Options::default());

        assert_eq!(program.body.len(), 1, "no missing helper for the layout");
        let variable = registry(&function_body(&program.body[0])[0]);
        assert_eq!(
            variable.declarations[1].id,
            Pattern::Object(vec![ObjectPatternProperty::binding(WRAPPER_KEY, LAYOUT_NAME)])
        );
    }

    #[test]
    fn test_provider_merges_between_defaults_and_props() {
        let options = Options {
            provider_import_source: Some("@mdx-js/react".into()),
            ..Options::default()
        };
        let mut program = Program {
            body: vec![function(CONTENT_NAME, element(LAYOUT_NAME, Provenance::Implicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &options);

        assert_eq!(
            program.body[0],
            Statement::Import(ImportDeclaration {
                specifiers: vec![ImportSpecifier::Named {
                    imported: "useMDXComponents".into(),
                    local: Identifier::new(PROVIDER_BINDING),
                }],
                source: "@mdx-js/react".into(),
                span: None,
            })
        );
        let variable = registry(&function_body(&program.body[1])[0]);
        assert_eq!(
            variable.declarations[0].init,
            Some(Expression::call(
                Expression::member_path(&["Object", "assign"]),
                vec![
                    Expression::Object(Vec::new()),
                    Expression::call(Expression::ident(PROVIDER_BINDING), Vec::new()),
                    Expression::member_path(&["props", "components"]),
                ],
            ))
        );
    }

    #[test]
    fn test_provider_from_arguments_in_function_body() {
        let options = Options {
            provider_import_source: Some("@mdx-js/react".into()),
            ..Options::function_body()
        };
        let mut program = Program {
            body: vec![function("Page", element("p", Provenance::Implicit))],
            comments: Vec::new(),
        };
        resolve(&mut program, &options);
        assert_eq!(
            program.body[0],
            Statement::const_declaration(
                Pattern::Object(vec![ObjectPatternProperty::binding(
                    "useMDXComponents",
                    PROVIDER_BINDING,
                )]),
                first_argument(),
            )
        );
    }
}
