//! Document assembler: turns lowered top-level statements into the canonical
//! MDX module shape.
//!
//! The output has one layout binding (`MDXLayout`) at most, one rendering
//! function (`MDXContent`), pragma comments, and either a default export or
//! a `return` of the exports object.

use crate::error::{CompileError, Diagnostics, SourceLocation};
use crate::estree::*;
use crate::options::{JsxRuntime, Options, OutputFormat};
use crate::unist::Position;

/// Reserved binding for the layout component.
pub const LAYOUT_NAME: &str = "MDXLayout";
/// Name of the synthesized rendering function.
pub const CONTENT_NAME: &str = "MDXContent";
/// Local binding holding the captured content.
const CONTENT_BINDING: &str = "_content";

/// Assembles `program` in place.
pub fn assemble(
    program: &mut Program,
    options: &Options,
    diagnostics: &mut Diagnostics,
) -> Result<(), CompileError> {
    let mut assembler = Assembler {
        options,
        diagnostics,
        layout: None,
        exports: Vec::new(),
        export_all_count: 0,
        content: None,
        body: Vec::with_capacity(program.body.len() + 2),
    };

    let (comments, pragma_import) = pragmas(options)?;
    program.comments.extend(comments);

    let mut statements = std::mem::take(&mut program.body);
    if let Some(import) = pragma_import {
        statements.insert(0, import);
    }

    for statement in statements {
        assembler.handle(statement)?;
    }

    program.body = assembler.finish();
    log::debug!("Assembled document with {} statements", program.body.len());
    Ok(())
}

/// Builds the pragma comments and, for the classic runtime with an import
/// source, the import of the pragma's root identifier.
fn pragmas(options: &Options) -> Result<(Vec<Comment>, Option<Statement>), CompileError> {
    let mut value = String::new();
    let mut import = None;

    match options.jsx_runtime {
        JsxRuntime::Automatic => {
            let source = options
                .jsx_import_source
                .as_deref()
                .ok_or(CompileError::MissingJsxImportSource)?;
            value.push_str("@jsxRuntime automatic @jsxImportSource ");
            value.push_str(source);
        }
        JsxRuntime::Classic => {
            if options.pragma_import_source.is_some() && options.pragma.is_none() {
                return Err(CompileError::MissingPragma);
            }
            value.push_str("@jsxRuntime classic");
            if let Some(pragma) = &options.pragma {
                value.push_str(" @jsx ");
                value.push_str(pragma);
            }
            if let Some(pragma_frag) = &options.pragma_frag {
                value.push_str(" @jsxFrag ");
                value.push_str(pragma_frag);
            }
            if let (Some(source), Some(pragma)) = (&options.pragma_import_source, &options.pragma)
            {
                let root = pragma.split('.').next().unwrap_or(pragma);
                import = Some(Statement::Import(ImportDeclaration {
                    specifiers: vec![ImportSpecifier::Default {
                        local: Identifier::new(root),
                    }],
                    source: source.clone(),
                    span: None,
                }));
            }
        }
    }

    Ok((
        vec![Comment {
            kind: CommentKind::Block,
            value,
        }],
        import,
    ))
}

/// Exported binding collected for the `function-body` return object.
enum ExportEntry {
    /// `exported: local`
    Name { exported: String, local: String },
    /// `...namespace`
    All(String),
}

struct Assembler<'a> {
    options: &'a Options,
    diagnostics: &'a mut Diagnostics,
    layout: Option<Option<Position>>,
    exports: Vec<ExportEntry>,
    export_all_count: usize,
    content: Option<Expression>,
    body: Vec<Statement>,
}

impl Assembler<'_> {
    fn function_body(&self) -> bool {
        self.options.output_format == OutputFormat::FunctionBody
    }

    fn location(&self, span: Option<Position>) -> Option<SourceLocation> {
        span.map(|position| {
            let location = position.location();
            match &self.options.filepath {
                Some(file) => SourceLocation::with_file(file.clone(), location.line, location.column),
                None => location,
            }
        })
    }

    /// Records a layout, failing when one was already seen.
    fn claim_layout(&mut self, span: Option<Position>) -> Result<(), CompileError> {
        if let Some(previous) = self.layout {
            return Err(CompileError::MultipleLayouts {
                location: self.location(span),
                previous: self.location(previous),
            });
        }
        self.layout = Some(span);
        Ok(())
    }

    fn handle(&mut self, statement: Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Import(import) => self.handle_import(import),
            Statement::ExportDefault(export) => {
                self.claim_layout(export.span)?;
                self.body
                    .push(Statement::Declaration(Declaration::Variable(VariableDeclaration {
                        kind: VariableKind::Const,
                        declarations: vec![VariableDeclarator {
                            id: Pattern::ident(LAYOUT_NAME),
                            init: Some(export.declaration.into_expression()),
                        }],
                        span: export.span,
                    })));
                Ok(())
            }
            Statement::ExportNamed(export) => self.handle_export_named(export),
            Statement::ExportAll(export) => self.handle_export_all(export),
            Statement::Expression(statement) if statement.expression.is_jsx() => {
                if self.content.is_none() {
                    self.content = Some(statement.expression);
                } else {
                    let location = self.location(statement.span);
                    self.diagnostics.warn_once(
                        "document:extra-content",
                        "mdxc:document",
                        "Only the first JSX expression statement is used as content; others stay at the top level",
                        location,
                    );
                    self.body.push(Statement::Expression(statement));
                }
                Ok(())
            }
            other => {
                self.body.push(other);
                Ok(())
            }
        }
    }

    fn handle_import(&mut self, import: ImportDeclaration) -> Result<(), CompileError> {
        if !self.function_body() {
            self.body.push(Statement::Import(import));
            return Ok(());
        }
        if !self.options.use_dynamic_import {
            return Err(CompileError::ImportInFunctionBody {
                location: self.location(import.span),
            });
        }

        let source = dynamic_import(self.resolve_specifier(&import.source)?);
        let mut namespace = None;
        let mut properties = Vec::new();
        for specifier in import.specifiers {
            match specifier {
                ImportSpecifier::Namespace { local } => namespace = Some(local.name),
                ImportSpecifier::Default { local } => {
                    properties.push(ObjectPatternProperty::binding("default", &local.name))
                }
                ImportSpecifier::Named { imported, local } => {
                    properties.push(ObjectPatternProperty::binding(&imported, &local.name))
                }
            }
        }

        let mut declarators = Vec::new();
        match namespace {
            Some(namespace) => {
                declarators.push(VariableDeclarator {
                    id: Pattern::ident(namespace.clone()),
                    init: Some(source),
                });
                if !properties.is_empty() {
                    declarators.push(VariableDeclarator {
                        id: Pattern::Object(properties),
                        init: Some(Expression::ident(namespace)),
                    });
                }
            }
            None if properties.is_empty() => {
                self.body.push(Statement::Expression(ExpressionStatement {
                    expression: source,
                    span: import.span,
                }));
                return Ok(());
            }
            None => declarators.push(VariableDeclarator {
                id: Pattern::Object(properties),
                init: Some(source),
            }),
        }

        self.body
            .push(Statement::Declaration(Declaration::Variable(VariableDeclaration {
                kind: VariableKind::Const,
                declarations: declarators,
                span: import.span,
            })));
        Ok(())
    }

    fn handle_export_named(&mut self, export: ExportNamedDeclaration) -> Result<(), CompileError> {
        let (layout, specifiers): (Vec<_>, Vec<_>) = export
            .specifiers
            .into_iter()
            .partition(|specifier| specifier.exported == "default");

        for specifier in layout {
            self.claim_layout(export.span)?;
            match &export.source {
                Some(source) => {
                    let import = ImportDeclaration {
                        specifiers: vec![ImportSpecifier::Named {
                            imported: specifier.local,
                            local: Identifier::new(LAYOUT_NAME),
                        }],
                        source: source.clone(),
                        span: export.span,
                    };
                    if self.function_body() && !self.options.use_dynamic_import {
                        return Err(CompileError::ExportInFunctionBody {
                            location: self.location(export.span),
                        });
                    }
                    self.handle_import(import)?;
                }
                None => {
                    self.body.push(Statement::const_declaration(
                        Pattern::ident(LAYOUT_NAME),
                        Expression::ident(specifier.local),
                    ));
                }
            }
        }

        if export.declaration.is_none() && specifiers.is_empty() {
            return Ok(());
        }

        if !self.function_body() {
            self.body.push(Statement::ExportNamed(ExportNamedDeclaration {
                declaration: export.declaration,
                specifiers,
                source: export.source,
                span: export.span,
            }));
            return Ok(());
        }

        match export.source {
            Some(source) => {
                if !self.options.use_dynamic_import {
                    return Err(CompileError::ExportInFunctionBody {
                        location: self.location(export.span),
                    });
                }
                let properties = specifiers
                    .iter()
                    .map(|specifier| {
                        ObjectPatternProperty::binding(&specifier.local, &specifier.exported)
                    })
                    .collect();
                self.body.push(Statement::Declaration(Declaration::Variable(
                    VariableDeclaration {
                        kind: VariableKind::Const,
                        declarations: vec![VariableDeclarator {
                            id: Pattern::Object(properties),
                            init: Some(dynamic_import(self.resolve_specifier(&source)?)),
                        }],
                        span: export.span,
                    },
                )));
                for specifier in specifiers {
                    self.exports.push(ExportEntry::Name {
                        local: specifier.exported.clone(),
                        exported: specifier.exported,
                    });
                }
            }
            None => {
                if let Some(declaration) = export.declaration {
                    for name in declaration.bound_names() {
                        self.exports.push(ExportEntry::Name {
                            exported: name.clone(),
                            local: name,
                        });
                    }
                    self.body.push(Statement::Declaration(declaration));
                }
                for specifier in specifiers {
                    self.exports.push(ExportEntry::Name {
                        exported: specifier.exported,
                        local: specifier.local,
                    });
                }
            }
        }
        Ok(())
    }

    fn handle_export_all(&mut self, export: ExportAllDeclaration) -> Result<(), CompileError> {
        if !self.function_body() {
            self.body.push(Statement::ExportAll(export));
            return Ok(());
        }
        if !self.options.use_dynamic_import {
            return Err(CompileError::ExportInFunctionBody {
                location: self.location(export.span),
            });
        }

        let source = dynamic_import(self.resolve_specifier(&export.source)?);
        let local = match &export.exported {
            Some(exported) => exported.clone(),
            None => {
                self.export_all_count += 1;
                format!("_exportAll{}", self.export_all_count)
            }
        };
        self.body.push(Statement::Declaration(Declaration::Variable(
            VariableDeclaration {
                kind: VariableKind::Const,
                declarations: vec![VariableDeclarator {
                    id: Pattern::ident(local.clone()),
                    init: Some(source),
                }],
                span: export.span,
            },
        )));
        self.exports.push(match export.exported {
            Some(exported) => ExportEntry::Name { exported, local },
            None => ExportEntry::All(local),
        });
        Ok(())
    }

    /// Resolves relative and root-relative specifiers against `baseUrl`.
    fn resolve_specifier(&self, specifier: &str) -> Result<String, CompileError> {
        let relative = specifier.starts_with('/')
            || specifier.starts_with("./")
            || specifier.starts_with("../");
        if !relative {
            return Ok(specifier.to_string());
        }

        let base_url = self
            .options
            .base_url
            .as_deref()
            .ok_or_else(|| CompileError::MissingBaseUrl {
                specifier: specifier.to_string(),
            })?;
        let invalid = |message: String| CompileError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            specifier: specifier.to_string(),
            message,
        };
        let base = url::Url::parse(base_url).map_err(|error| invalid(error.to_string()))?;
        let resolved = base
            .join(specifier)
            .map_err(|error| invalid(error.to_string()))?;
        Ok(resolved.to_string())
    }

    fn finish(mut self) -> Vec<Statement> {
        let content = self.content.take();
        self.body.push(create_content_function(content));

        if self.function_body() {
            let mut members = Vec::with_capacity(self.exports.len() + 1);
            for entry in self.exports.drain(..) {
                members.push(match entry {
                    ExportEntry::Name { exported, local } => {
                        let shorthand = exported == local;
                        ObjectMember::Property(Property {
                            key: PropertyKey::from_name(&exported),
                            value: Expression::ident(local),
                            kind: PropertyKind::Init,
                            shorthand,
                        })
                    }
                    ExportEntry::All(local) => ObjectMember::Spread(Expression::ident(local)),
                });
            }
            members.push(ObjectMember::Property(Property::init(
                PropertyKey::Identifier("default".to_string()),
                Expression::ident(CONTENT_NAME),
            )));
            self.body
                .push(Statement::return_(Expression::Object(members)));
        } else {
            self.body
                .push(Statement::ExportDefault(ExportDefaultDeclaration {
                    declaration: DefaultDeclaration::Expression(Expression::ident(CONTENT_NAME)),
                    span: None,
                }));
        }
        self.body
    }
}

/// `await import("specifier")`
fn dynamic_import(specifier: String) -> Expression {
    Expression::Await(Box::new(Expression::Import(Box::new(Expression::string(
        specifier,
    )))))
}

/// `function MDXContent(props = {}) { const _content = …; return MDXLayout ? … : _content; }`
fn create_content_function(content: Option<Expression>) -> Statement {
    let layout = JsxElement {
        name: JsxName::Identifier(LAYOUT_NAME.to_string()),
        attributes: vec![JsxAttributeItem::Spread(Expression::ident("props"))],
        children: vec![JsxChild::Expression(JsxExpression::Expression(
            Expression::ident(CONTENT_BINDING),
        ))],
        provenance: Provenance::Implicit,
        span: None,
    };

    Statement::Declaration(Declaration::Function(Function {
        id: Some(Identifier::new(CONTENT_NAME)),
        params: vec![Pattern::Assign(
            Box::new(Pattern::ident("props")),
            Box::new(Expression::Object(Vec::new())),
        )],
        body: vec![
            Statement::const_declaration(
                Pattern::ident(CONTENT_BINDING),
                content.unwrap_or_else(Expression::null),
            ),
            Statement::return_(Expression::Conditional(
                Box::new(Expression::ident(LAYOUT_NAME)),
                Box::new(Expression::JsxElement(Box::new(layout))),
                Box::new(Expression::ident(CONTENT_BINDING)),
            )),
        ],
        ..Function::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unist::Position;

    fn at(line: usize) -> Option<Position> {
        Some(Position::new(line, 1, 0, line, 10, 9))
    }

    fn export_default(name: &str, line: usize) -> Statement {
        Statement::ExportDefault(ExportDefaultDeclaration {
            declaration: DefaultDeclaration::Expression(Expression::ident(name)),
            span: at(line),
        })
    }

    fn import(source: &str, specifiers: Vec<ImportSpecifier>) -> Statement {
        Statement::Import(ImportDeclaration {
            specifiers,
            source: source.to_string(),
            span: at(1),
        })
    }

    fn assemble_with(body: Vec<Statement>, options: &Options) -> Result<Program, CompileError> {
        let mut program = Program {
            body,
            comments: Vec::new(),
        };
        let mut diagnostics = Diagnostics::new();
        assemble(&mut program, options, &mut diagnostics)?;
        Ok(program)
    }

    fn content_function(program: &Program) -> &Function {
        program
            .body
            .iter()
            .find_map(|statement| match statement {
                Statement::Declaration(Declaration::Function(function))
                    if function.id.as_ref().map(|id| id.name.as_str()) == Some(CONTENT_NAME) =>
                {
                    Some(function)
                }
                _ => None,
            })
            .expect("MDXContent should exist")
    }

    #[test]
    fn test_empty_document_renders_null() {
        let program = assemble_with(Vec::new(), &Options::default()).expect("assemble");
        let function = content_function(&program);
        let Statement::Declaration(Declaration::Variable(variable)) = &function.body[0] else {
            panic!("expected _content declaration");
        };
        assert_eq!(variable.declarations[0].init, Some(Expression::null()));
        assert!(matches!(
            program.body.last(),
            Some(Statement::ExportDefault(_))
        ));
    }

    #[test]
    fn test_default_export_becomes_layout() {
        let program =
            assemble_with(vec![export_default("Layout", 1)], &Options::default()).expect("assemble");
        let Statement::Declaration(Declaration::Variable(variable)) = &program.body[0] else {
            panic!("expected layout binding, got {:?}", program.body[0]);
        };
        assert_eq!(variable.declarations[0].id, Pattern::ident(LAYOUT_NAME));
        let default_exports = program
            .body
            .iter()
            .filter(|statement| matches!(statement, Statement::ExportDefault(_)))
            .count();
        assert_eq!(default_exports, 1);
    }

    #[test]
    fn test_second_layout_fails_with_first_position() {
        let error = assemble_with(
            vec![export_default("A", 1), export_default("B", 3)],
            &Options::default(),
        )
        .expect_err("duplicate layout");
        assert_eq!(
            error,
            CompileError::MultipleLayouts {
                location: Some(SourceLocation::new(3, 1)),
                previous: Some(SourceLocation::new(1, 1)),
            }
        );
    }

    #[test]
    fn test_reexport_as_default_counts_as_layout() {
        let reexport = Statement::ExportNamed(ExportNamedDeclaration {
            declaration: None,
            specifiers: vec![ExportSpecifier {
                local: "Layout".into(),
                exported: "default".into(),
            }],
            source: Some("./layout.js".into()),
            span: at(2),
        });
        let program =
            assemble_with(vec![reexport.clone()], &Options::default()).expect("assemble");
        assert_eq!(
            program.body[0],
            Statement::Import(ImportDeclaration {
                specifiers: vec![ImportSpecifier::Named {
                    imported: "Layout".into(),
                    local: Identifier::new(LAYOUT_NAME),
                }],
                source: "./layout.js".into(),
                span: at(2),
            })
        );

        let error = assemble_with(vec![reexport, export_default("B", 4)], &Options::default())
            .expect_err("duplicate layout across forms");
        assert!(error.to_string().contains("previous: 2:1"));
    }

    #[test]
    fn test_import_in_function_body_requires_dynamic_import() {
        let body = vec![import(
            "./a.js",
            vec![ImportSpecifier::Named {
                imported: "a".into(),
                local: Identifier::new("a"),
            }],
        )];
        let error = assemble_with(body.clone(), &Options::function_body()).expect_err("import");
        assert!(matches!(error, CompileError::ImportInFunctionBody { .. }));
        assert!(error.to_string().contains("useDynamicImport"));

        let options = Options {
            use_dynamic_import: true,
            base_url: Some("https://example.com/docs/page.mdx".into()),
            ..Options::function_body()
        };
        let program = assemble_with(body, &options).expect("assemble");
        let Statement::Declaration(Declaration::Variable(variable)) = &program.body[0] else {
            panic!("expected destructuring, got {:?}", program.body[0]);
        };
        assert_eq!(
            variable.declarations[0].init,
            Some(dynamic_import("https://example.com/docs/a.js".into()))
        );
    }

    #[test]
    fn test_bare_specifiers_are_not_resolved() {
        let options = Options {
            use_dynamic_import: true,
            ..Options::function_body()
        };
        let body = vec![import(
            "react",
            vec![ImportSpecifier::Default {
                local: Identifier::new("React"),
            }],
        )];
        let program = assemble_with(body, &options).expect("assemble");
        let Statement::Declaration(Declaration::Variable(variable)) = &program.body[0] else {
            panic!("expected destructuring");
        };
        assert_eq!(
            variable.declarations[0].id,
            Pattern::Object(vec![ObjectPatternProperty::binding("default", "React")])
        );
        assert_eq!(
            variable.declarations[0].init,
            Some(dynamic_import("react".into()))
        );
    }

    #[test]
    fn test_relative_specifier_without_base_url_fails() {
        let options = Options {
            use_dynamic_import: true,
            ..Options::function_body()
        };
        let error = assemble_with(vec![import("./a.js", Vec::new())], &options)
            .expect_err("missing base url");
        assert_eq!(
            error,
            CompileError::MissingBaseUrl {
                specifier: "./a.js".into()
            }
        );
    }

    #[test]
    fn test_function_body_unwraps_exports_and_returns_them() {
        let export = Statement::ExportNamed(ExportNamedDeclaration {
            declaration: Some(Declaration::Variable(VariableDeclaration {
                kind: VariableKind::Const,
                declarations: vec![VariableDeclarator {
                    id: Pattern::ident("title"),
                    init: Some(Expression::string("Hi")),
                }],
                span: None,
            })),
            specifiers: Vec::new(),
            source: None,
            span: at(1),
        });
        let program = assemble_with(vec![export], &Options::function_body()).expect("assemble");

        assert!(matches!(
            program.body[0],
            Statement::Declaration(Declaration::Variable(_))
        ));
        let Some(Statement::Return(ReturnStatement {
            argument: Some(Expression::Object(members)),
            ..
        })) = program.body.last()
        else {
            panic!("expected return of exports");
        };
        assert_eq!(members.len(), 2);
        assert_eq!(
            members[1],
            ObjectMember::Property(Property::init(
                PropertyKey::Identifier("default".into()),
                Expression::ident(CONTENT_NAME),
            ))
        );
    }

    #[test]
    fn test_classic_pragma_import_requires_pragma() {
        let options = Options {
            jsx_runtime: JsxRuntime::Classic,
            pragma: None,
            pragma_import_source: Some("preact".into()),
            ..Options::default()
        };
        assert_eq!(
            assemble_with(Vec::new(), &options).expect_err("missing pragma"),
            CompileError::MissingPragma
        );
    }

    #[test]
    fn test_classic_pragma_import() {
        let options = Options {
            jsx_runtime: JsxRuntime::Classic,
            pragma: Some("h".into()),
            pragma_frag: Some("Fragment".into()),
            pragma_import_source: Some("preact".into()),
            ..Options::default()
        };
        let program = assemble_with(Vec::new(), &options).expect("assemble");
        assert_eq!(
            program.comments[0].value,
            "@jsxRuntime classic @jsx h @jsxFrag Fragment"
        );
        assert_eq!(
            program.body[0],
            Statement::Import(ImportDeclaration {
                specifiers: vec![ImportSpecifier::Default {
                    local: Identifier::new("h"),
                }],
                source: "preact".into(),
                span: None,
            })
        );
    }

    #[test]
    fn test_automatic_runtime_requires_import_source() {
        let options = Options {
            jsx_import_source: None,
            ..Options::default()
        };
        assert_eq!(
            assemble_with(Vec::new(), &options).expect_err("missing source"),
            CompileError::MissingJsxImportSource
        );
    }

    #[test]
    fn test_extra_content_statement_warns_once() {
        let fragment = || {
            Statement::expression(Expression::JsxFragment(Box::new(JsxFragment::default())))
        };
        let mut program = Program {
            body: vec![fragment(), fragment(), fragment()],
            comments: Vec::new(),
        };
        let mut diagnostics = Diagnostics::new();
        assemble(&mut program, &Options::default(), &mut diagnostics).expect("assemble");
        assert_eq!(diagnostics.count(), 1);
    }
}
