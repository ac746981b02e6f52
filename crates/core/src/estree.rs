//! Code tree: an ESTree-shaped program AST extended with JSX node kinds.
//!
//! Nodes that can be traced back to the original document carry a
//! `span`; synthesized nodes leave it `None`.

use crate::unist::Position;

/// Whether a JSX element was written by the author in the document body.
///
/// Explicit elements are exempt from `_components` indirection: `<h1>` typed
/// in a document stays `h1`, while a `# heading` routes through
/// `_components.h1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Provenance {
    /// Author-written JSX in the document body.
    Explicit,
    /// Generated from prose, or JSX embedded in ESM and expressions.
    #[default]
    Implicit,
}

/// A whole program.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements, in order.
    pub body: Vec<Statement>,
    /// Leading comments, printed before the first statement.
    pub comments: Vec<Comment>,
}

/// Comment attached to a program.
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// `/* */` or `//`.
    pub kind: CommentKind,
    /// Text between the comment markers.
    pub value: String,
}

/// Comment syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `/* value */`
    Block,
    /// `// value`
    Line,
}

/// Statement kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `import … from "…"`
    Import(ImportDeclaration),
    /// `export {…}`, `export {…} from "…"`, or `export <declaration>`
    ExportNamed(ExportNamedDeclaration),
    /// `export default …`
    ExportDefault(ExportDefaultDeclaration),
    /// `export * from "…"`
    ExportAll(ExportAllDeclaration),
    /// Variable, function, or class declaration.
    Declaration(Declaration),
    /// `expression;`
    Expression(ExpressionStatement),
    /// `return …;`
    Return(ReturnStatement),
    /// `throw …;`
    Throw(ThrowStatement),
    /// `if (…) … else …`
    If(IfStatement),
    /// `{ … }`
    Block(BlockStatement),
    /// `for (…; …; …) …`
    For(ForStatement),
    /// `for (… in …) …` and `for (… of …) …`
    ForInOf(ForInOfStatement),
    /// `while (…) …`
    While(WhileStatement),
    /// `try … catch … finally …`
    Try(TryStatement),
    /// `break;`
    Break,
    /// `continue;`
    Continue,
    /// `;`
    Empty,
}

impl Statement {
    /// Position of the statement in the original document.
    pub fn span(&self) -> Option<Position> {
        match self {
            Statement::Import(node) => node.span,
            Statement::ExportNamed(node) => node.span,
            Statement::ExportDefault(node) => node.span,
            Statement::ExportAll(node) => node.span,
            Statement::Declaration(node) => node.span(),
            Statement::Expression(node) => node.span,
            Statement::Return(node) => node.span,
            Statement::Throw(node) => node.span,
            _ => None,
        }
    }

    /// `const <id> = <init>;`
    pub fn const_declaration(id: Pattern, init: Expression) -> Self {
        Statement::Declaration(Declaration::Variable(VariableDeclaration {
            kind: VariableKind::Const,
            declarations: vec![VariableDeclarator {
                id,
                init: Some(init),
            }],
            span: None,
        }))
    }

    /// `<expression>;`
    pub fn expression(expression: Expression) -> Self {
        Statement::Expression(ExpressionStatement {
            expression,
            span: None,
        })
    }

    /// `return <argument>;`
    pub fn return_(argument: Expression) -> Self {
        Statement::Return(ReturnStatement {
            argument: Some(argument),
            span: None,
        })
    }
}

/// `import … from "…"`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    /// Bindings; empty for `import "…"`.
    pub specifiers: Vec<ImportSpecifier>,
    /// Module specifier.
    pub source: String,
    /// Original position.
    pub span: Option<Position>,
}

/// One binding of an import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import local from "…"`
    Default {
        /// Local binding.
        local: Identifier,
    },
    /// `import * as local from "…"`
    Namespace {
        /// Local binding.
        local: Identifier,
    },
    /// `import {imported as local} from "…"`
    Named {
        /// Exported name in the source module.
        imported: String,
        /// Local binding.
        local: Identifier,
    },
}

impl ImportSpecifier {
    /// Local binding introduced by the specifier.
    pub fn local(&self) -> &Identifier {
        match self {
            ImportSpecifier::Default { local }
            | ImportSpecifier::Namespace { local }
            | ImportSpecifier::Named { local, .. } => local,
        }
    }
}

/// `export {…}`, `export {…} from "…"`, or `export <declaration>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNamedDeclaration {
    /// Exported declaration, if any.
    pub declaration: Option<Declaration>,
    /// Exported names.
    pub specifiers: Vec<ExportSpecifier>,
    /// Module specifier of a re-export.
    pub source: Option<String>,
    /// Original position.
    pub span: Option<Position>,
}

/// `local as exported`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    /// Local (or source module) name.
    pub local: String,
    /// Exported name.
    pub exported: String,
}

/// `export default …`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDefaultDeclaration {
    /// The exported value.
    pub declaration: DefaultDeclaration,
    /// Original position.
    pub span: Option<Position>,
}

/// Value of `export default`.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDeclaration {
    /// `export default function …`
    Function(Function),
    /// `export default class …`
    Class(Class),
    /// `export default <expression>`
    Expression(Expression),
}

impl DefaultDeclaration {
    /// The declaration as an expression.
    pub fn into_expression(self) -> Expression {
        match self {
            DefaultDeclaration::Function(function) => Expression::Function(Box::new(function)),
            DefaultDeclaration::Class(class) => Expression::Class(Box::new(class)),
            DefaultDeclaration::Expression(expression) => expression,
        }
    }
}

/// `export * from "…"` or `export * as exported from "…"`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAllDeclaration {
    /// Namespace export name.
    pub exported: Option<String>,
    /// Module specifier.
    pub source: String,
    /// Original position.
    pub span: Option<Position>,
}

/// Declarations.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    /// `const`, `let`, or `var`
    Variable(VariableDeclaration),
    /// `function name() {}`
    Function(Function),
    /// `class Name {}`
    Class(Class),
}

impl Declaration {
    /// Position of the declaration in the original document.
    pub fn span(&self) -> Option<Position> {
        match self {
            Declaration::Variable(node) => node.span,
            Declaration::Function(node) => node.span,
            Declaration::Class(node) => node.span,
        }
    }

    /// Names bound by the declaration.
    pub fn bound_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        match self {
            Declaration::Variable(variable) => {
                for declarator in &variable.declarations {
                    declarator.id.collect_names(&mut names);
                }
            }
            Declaration::Function(function) => {
                if let Some(id) = &function.id {
                    names.push(id.name.clone());
                }
            }
            Declaration::Class(class) => {
                if let Some(id) = &class.id {
                    names.push(id.name.clone());
                }
            }
        }
        names
    }
}

/// `const a = 1, b = 2`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclaration {
    /// Declaration keyword.
    pub kind: VariableKind,
    /// Declarators.
    pub declarations: Vec<VariableDeclarator>,
    /// Original position.
    pub span: Option<Position>,
}

/// Variable declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// `const`
    Const,
    /// `let`
    Let,
    /// `var`
    Var,
}

impl VariableKind {
    /// Keyword text.
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Const => "const",
            VariableKind::Let => "let",
            VariableKind::Var => "var",
        }
    }
}

/// `id = init`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    /// Binding pattern.
    pub id: Pattern,
    /// Initializer.
    pub init: Option<Expression>,
}

/// Function declaration or expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Function {
    /// Name; required for declarations.
    pub id: Option<Identifier>,
    /// Parameters.
    pub params: Vec<Pattern>,
    /// Body statements.
    pub body: Vec<Statement>,
    /// `async function`
    pub is_async: bool,
    /// `function*`
    pub is_generator: bool,
    /// Original position.
    pub span: Option<Position>,
}

/// `(params) => body`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction {
    /// Parameters.
    pub params: Vec<Pattern>,
    /// Block or expression body.
    pub body: ArrowBody,
    /// `async () => …`
    pub is_async: bool,
    /// Original position.
    pub span: Option<Position>,
}

/// Body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `=> { … }`
    Block(Vec<Statement>),
    /// `=> expression`
    Expression(Box<Expression>),
}

/// Class declaration or expression.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Class {
    /// Name; required for declarations.
    pub id: Option<Identifier>,
    /// `extends …`
    pub super_class: Option<Box<Expression>>,
    /// Members.
    pub body: Vec<ClassMember>,
    /// Original position.
    pub span: Option<Position>,
}

/// Class body member.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Constructor, method, getter, or setter.
    Method {
        /// Member key.
        key: PropertyKey,
        /// Method function (its `id` is unused).
        value: Function,
        /// Method kind.
        kind: MethodKind,
        /// `static`
        is_static: bool,
    },
    /// Field.
    Property {
        /// Member key.
        key: PropertyKey,
        /// Initializer.
        value: Option<Expression>,
        /// `static`
        is_static: bool,
    },
}

/// Kind of class or object method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `constructor() {}`
    Constructor,
    /// `name() {}`
    Method,
    /// `get name() {}`
    Get,
    /// `set name(value) {}`
    Set,
}

/// `expression;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// The expression.
    pub expression: Expression,
    /// Original position.
    pub span: Option<Position>,
}

/// `return …;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// Returned value.
    pub argument: Option<Expression>,
    /// Original position.
    pub span: Option<Position>,
}

/// `throw …;`
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStatement {
    /// Thrown value.
    pub argument: Expression,
    /// Original position.
    pub span: Option<Position>,
}

/// `if (test) consequent else alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// Condition.
    pub test: Expression,
    /// Taken branch.
    pub consequent: Box<Statement>,
    /// `else` branch.
    pub alternate: Option<Box<Statement>>,
}

/// `{ … }`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStatement {
    /// Statements.
    pub body: Vec<Statement>,
}

/// `for (init; test; update) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStatement {
    /// Initializer declaration or expression.
    pub init: Option<ForInit>,
    /// Condition.
    pub test: Option<Expression>,
    /// Update expression.
    pub update: Option<Expression>,
    /// Loop body.
    pub body: Box<Statement>,
}

/// Left side of `for (…;…;…)` and `for (… of …)`.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `for (let i = 0; …)`
    Variable(VariableDeclaration),
    /// `for (i = 0; …)`
    Expression(Expression),
}

/// `for (left in right) body` or `for (left of right) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInOfStatement {
    /// `of` instead of `in`.
    pub of: bool,
    /// `for await (… of …)`
    pub is_await: bool,
    /// Loop binding.
    pub left: ForLeft,
    /// Iterated value.
    pub right: Expression,
    /// Loop body.
    pub body: Box<Statement>,
}

/// Binding of a `for … in/of` loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ForLeft {
    /// `for (const x of …)`
    Variable(VariableKind, Pattern),
    /// `for (x of …)`
    Pattern(Pattern),
}

/// `while (test) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStatement {
    /// Condition.
    pub test: Expression,
    /// Loop body.
    pub body: Box<Statement>,
}

/// `try { … } catch (param) { … } finally { … }`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStatement {
    /// Protected block.
    pub block: Vec<Statement>,
    /// Catch clause.
    pub handler: Option<CatchClause>,
    /// Finally block.
    pub finalizer: Option<Vec<Statement>>,
}

/// `catch (param) { … }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Bound error.
    pub param: Option<Pattern>,
    /// Handler body.
    pub body: Vec<Statement>,
}

/// Binding and assignment targets.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `name`
    Identifier(Identifier),
    /// `{a, b: c, ...rest}`
    Object(Vec<ObjectPatternProperty>),
    /// `[a, , b, ...rest]`
    Array(Vec<Option<Pattern>>),
    /// `target = default`
    Assign(Box<Pattern>, Box<Expression>),
    /// `...target`
    Rest(Box<Pattern>),
    /// Member expression target, e.g. `a.b = 1`.
    Expression(Box<Expression>),
}

impl Pattern {
    /// `name`
    pub fn ident(name: impl Into<String>) -> Self {
        Pattern::Identifier(Identifier::new(name))
    }

    /// Collects every name the pattern binds.
    pub fn collect_names(&self, names: &mut Vec<String>) {
        match self {
            Pattern::Identifier(identifier) => names.push(identifier.name.clone()),
            Pattern::Object(properties) => {
                for property in properties {
                    match property {
                        ObjectPatternProperty::Property { value, .. } => {
                            value.collect_names(names)
                        }
                        ObjectPatternProperty::Rest(rest) => rest.collect_names(names),
                    }
                }
            }
            Pattern::Array(elements) => {
                for element in elements.iter().flatten() {
                    element.collect_names(names);
                }
            }
            Pattern::Assign(target, _) | Pattern::Rest(target) => target.collect_names(names),
            Pattern::Expression(_) => {}
        }
    }
}

/// Property of an object pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatternProperty {
    /// `key: value` or shorthand `key`.
    Property {
        /// Looked-up key.
        key: PropertyKey,
        /// Binding target.
        value: Pattern,
        /// Printed as `key` when the value is the same identifier.
        shorthand: bool,
    },
    /// `...rest`
    Rest(Pattern),
}

impl ObjectPatternProperty {
    /// `key: local`, shorthand when both are the same name.
    pub fn binding(key: &str, local: &str) -> Self {
        ObjectPatternProperty::Property {
            key: PropertyKey::Identifier(key.to_string()),
            value: Pattern::ident(local),
            shorthand: key == local,
        }
    }
}

/// Identifier reference or binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    /// Name.
    pub name: String,
    /// Original position.
    pub span: Option<Position>,
}

impl Identifier {
    /// Identifier without a position.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            span: None,
        }
    }
}

/// Literal value.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// The value.
    pub value: LiteralValue,
    /// Original position.
    pub span: Option<Position>,
}

/// Kinds of literals.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// `"text"`
    String(String),
    /// `1.5`
    Number(f64),
    /// `true` / `false`
    Boolean(bool),
    /// `null`
    Null,
    /// `/pattern/flags`
    Regex {
        /// Pattern source.
        pattern: String,
        /// Flags.
        flags: String,
    },
}

/// Object literal member.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// `key: value`, shorthand, method, getter, or setter.
    Property(Property),
    /// `...argument`
    Spread(Expression),
}

/// `key: value`
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Key.
    pub key: PropertyKey,
    /// Value; a `Function` for methods and accessors.
    pub value: Expression,
    /// Property kind.
    pub kind: PropertyKind,
    /// Printed as `key` when the value is the same identifier.
    pub shorthand: bool,
}

impl Property {
    /// `key: value`
    pub fn init(key: PropertyKey, value: Expression) -> Self {
        Self {
            key,
            value,
            kind: PropertyKind::Init,
            shorthand: false,
        }
    }
}

/// Object literal property kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// `key: value`
    Init,
    /// `key() {}`
    Method,
    /// `get key() {}`
    Get,
    /// `set key(value) {}`
    Set,
}

/// Property and member keys.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// `name`
    Identifier(String),
    /// `"name"`
    String(String),
    /// `1`
    Number(f64),
    /// `[expression]`
    Computed(Box<Expression>),
}

impl PropertyKey {
    /// Identifier key when `name` is an identifier name, string key otherwise.
    pub fn from_name(name: &str) -> Self {
        if crate::identifier::is_identifier_name(name) {
            PropertyKey::Identifier(name.to_string())
        } else {
            PropertyKey::String(name.to_string())
        }
    }
}

/// Call argument or array element.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Plain value.
    Expression(Expression),
    /// `...value`
    Spread(Expression),
}

/// Property access.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// `object.name`
    Identifier(String),
    /// `object[expression]`
    Computed(Box<Expression>),
}

/// `object.property`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    /// Accessed value.
    pub object: Box<Expression>,
    /// Accessed property.
    pub property: MemberProperty,
    /// `object?.property`
    pub optional: bool,
    /// Original position.
    pub span: Option<Position>,
}

/// `callee(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// Called value.
    pub callee: Box<Expression>,
    /// Arguments.
    pub arguments: Vec<Argument>,
    /// `callee?.(…)`
    pub optional: bool,
    /// Original position.
    pub span: Option<Position>,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `!`
    Not,
    /// `~`
    BitwiseNot,
    /// `typeof`
    Typeof,
    /// `void`
    Void,
    /// `delete`
    Delete,
}

impl UnaryOperator {
    /// Operator text.
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOperator::Minus => "-",
            UnaryOperator::Plus => "+",
            UnaryOperator::Not => "!",
            UnaryOperator::BitwiseNot => "~",
            UnaryOperator::Typeof => "typeof",
            UnaryOperator::Void => "void",
            UnaryOperator::Delete => "delete",
        }
    }
}

/// `++` and `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// Binary operators (logical operators are separate).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `===`
    StrictEqual,
    /// `!==`
    StrictNotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `>>>`
    ShiftRightUnsigned,
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
    /// `**`
    Exponent,
    /// `|`
    BitwiseOr,
    /// `^`
    BitwiseXor,
    /// `&`
    BitwiseAnd,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
}

impl BinaryOperator {
    /// Operator text.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::StrictEqual => "===",
            BinaryOperator::StrictNotEqual => "!==",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::ShiftLeft => "<<",
            BinaryOperator::ShiftRight => ">>",
            BinaryOperator::ShiftRightUnsigned => ">>>",
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Exponent => "**",
            BinaryOperator::BitwiseOr => "|",
            BinaryOperator::BitwiseXor => "^",
            BinaryOperator::BitwiseAnd => "&",
            BinaryOperator::In => "in",
            BinaryOperator::Instanceof => "instanceof",
        }
    }
}

/// `&&`, `||`, and `??`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    Nullish,
}

impl LogicalOperator {
    /// Operator text.
    pub fn as_str(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::Nullish => "??",
        }
    }
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    /// `=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Subtract,
    /// `*=`
    Multiply,
    /// `/=`
    Divide,
    /// `%=`
    Remainder,
    /// `||=`
    Or,
    /// `&&=`
    And,
    /// `??=`
    Nullish,
}

impl AssignmentOperator {
    /// Operator text.
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentOperator::Assign => "=",
            AssignmentOperator::Add => "+=",
            AssignmentOperator::Subtract => "-=",
            AssignmentOperator::Multiply => "*=",
            AssignmentOperator::Divide => "/=",
            AssignmentOperator::Remainder => "%=",
            AssignmentOperator::Or => "||=",
            AssignmentOperator::And => "&&=",
            AssignmentOperator::Nullish => "??=",
        }
    }
}

/// Expression kinds, including JSX.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `name`
    Identifier(Identifier),
    /// `"a"`, `1`, `true`, `null`, `/a/`
    Literal(Literal),
    /// `` `a${b}c` ``
    Template {
        /// Raw text chunks, one more than `expressions`.
        quasis: Vec<String>,
        /// Interpolated expressions.
        expressions: Vec<Expression>,
    },
    /// `[a, , ...b]`
    Array(Vec<Option<Argument>>),
    /// `{a: 1, ...b}`
    Object(Vec<ObjectMember>),
    /// `function () {}`
    Function(Box<Function>),
    /// `() => …`
    Arrow(Box<ArrowFunction>),
    /// `class {}`
    Class(Box<Class>),
    /// `-a`, `typeof a`
    Unary(UnaryOperator, Box<Expression>),
    /// `a++`, `--a`
    Update {
        /// Operator.
        operator: UpdateOperator,
        /// `++a` rather than `a++`.
        prefix: bool,
        /// Target.
        argument: Box<Expression>,
    },
    /// `a + b`
    Binary(BinaryOperator, Box<Expression>, Box<Expression>),
    /// `a && b`
    Logical(LogicalOperator, Box<Expression>, Box<Expression>),
    /// `a = b`
    Assignment(AssignmentOperator, Box<Pattern>, Box<Expression>),
    /// `a ? b : c`
    Conditional(Box<Expression>, Box<Expression>, Box<Expression>),
    /// `a(b)`
    Call(CallExpression),
    /// `new A(b)`
    New(Box<Expression>, Vec<Argument>),
    /// `a.b`
    Member(MemberExpression),
    /// `a, b`
    Sequence(Vec<Expression>),
    /// `await a`
    Await(Box<Expression>),
    /// `yield a`, `yield* a`
    Yield {
        /// Yielded value.
        argument: Option<Box<Expression>>,
        /// `yield*`
        delegate: bool,
    },
    /// `import(source)`
    Import(Box<Expression>),
    /// `this`
    This,
    /// `<a>…</a>`
    JsxElement(Box<JsxElement>),
    /// `<>…</>`
    JsxFragment(Box<JsxFragment>),
}

impl Expression {
    /// `name`
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Identifier(Identifier::new(name))
    }

    /// `"value"`
    pub fn string(value: impl Into<String>) -> Self {
        Expression::Literal(Literal {
            value: LiteralValue::String(value.into()),
            span: None,
        })
    }

    /// `null`
    pub fn null() -> Self {
        Expression::Literal(Literal {
            value: LiteralValue::Null,
            span: None,
        })
    }

    /// `true` / `false`
    pub fn boolean(value: bool) -> Self {
        Expression::Literal(Literal {
            value: LiteralValue::Boolean(value),
            span: None,
        })
    }

    /// `value`
    pub fn number(value: f64) -> Self {
        Expression::Literal(Literal {
            value: LiteralValue::Number(value),
            span: None,
        })
    }

    /// `object.property`
    pub fn member(object: Expression, property: impl Into<String>) -> Self {
        Expression::Member(MemberExpression {
            object: Box::new(object),
            property: MemberProperty::Identifier(property.into()),
            optional: false,
            span: None,
        })
    }

    /// `a.b.c` from `["a", "b", "c"]`.
    pub fn member_path<S: AsRef<str>>(path: &[S]) -> Self {
        let mut parts = path.iter().map(|part| -> &str { part.as_ref() });
        let mut expression = Expression::ident(parts.next().unwrap_or(""));
        for part in parts {
            expression = Expression::member(expression, part);
        }
        expression
    }

    /// `callee(arguments)`
    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Expression::Call(CallExpression {
            callee: Box::new(callee),
            arguments: arguments.into_iter().map(Argument::Expression).collect(),
            optional: false,
            span: None,
        })
    }

    /// Whether this is a JSX element or fragment.
    pub fn is_jsx(&self) -> bool {
        matches!(self, Expression::JsxElement(_) | Expression::JsxFragment(_))
    }

    /// Position of the expression in the original document, when tracked.
    pub fn span(&self) -> Option<Position> {
        match self {
            Expression::Identifier(node) => node.span,
            Expression::Literal(node) => node.span,
            Expression::Function(node) => node.span,
            Expression::Arrow(node) => node.span,
            Expression::Class(node) => node.span,
            Expression::Call(node) => node.span,
            Expression::Member(node) => node.span,
            Expression::JsxElement(node) => node.span,
            Expression::JsxFragment(node) => node.span,
            _ => None,
        }
    }
}

/// `<name attributes>children</name>`
///
/// A single `name` serves both the opening and the closing tag.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxElement {
    /// Tag name.
    pub name: JsxName,
    /// Attributes, in order.
    pub attributes: Vec<JsxAttributeItem>,
    /// Children, in order; printed self-closing when empty.
    pub children: Vec<JsxChild>,
    /// Explicit (author-written) or implicit.
    pub provenance: Provenance,
    /// Original position.
    pub span: Option<Position>,
}

impl JsxElement {
    /// Implicit element without attributes, children, or position.
    pub fn new(name: JsxName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            provenance: Provenance::Implicit,
            span: None,
        }
    }
}

/// `<>children</>`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsxFragment {
    /// Children, in order.
    pub children: Vec<JsxChild>,
    /// Original position.
    pub span: Option<Position>,
}

/// Name of a JSX element.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxName {
    /// `a`, `Card`, `custom-element`
    Identifier(String),
    /// `a.b.c`
    Member {
        /// Left-most identifier.
        object: String,
        /// Accessed properties, at least one.
        properties: Vec<String>,
    },
    /// `svg:rect`
    Namespaced {
        /// Namespace.
        namespace: String,
        /// Local name.
        name: String,
    },
}

impl JsxName {
    /// Parses `a`, `a.b.c`, or `ns:name`.
    pub fn parse(name: &str) -> Self {
        if let Some((namespace, local)) = name.split_once(':') {
            return JsxName::Namespaced {
                namespace: namespace.to_string(),
                name: local.to_string(),
            };
        }
        let mut parts = name.split('.');
        let object = parts.next().unwrap_or_default().to_string();
        let properties: Vec<String> = parts.map(str::to_string).collect();
        if properties.is_empty() {
            JsxName::Identifier(object)
        } else {
            JsxName::Member { object, properties }
        }
    }
}

impl std::fmt::Display for JsxName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsxName::Identifier(name) => f.write_str(name),
            JsxName::Member { object, properties } => {
                f.write_str(object)?;
                for property in properties {
                    write!(f, ".{}", property)?;
                }
                Ok(())
            }
            JsxName::Namespaced { namespace, name } => write!(f, "{}:{}", namespace, name),
        }
    }
}

/// JSX attribute or spread.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttributeItem {
    /// `name`, `name="value"`, `name={value}`
    Attribute(JsxAttribute),
    /// `{...argument}`
    Spread(Expression),
}

/// `name="value"`
#[derive(Debug, Clone, PartialEq)]
pub struct JsxAttribute {
    /// Attribute name.
    pub name: JsxAttributeName,
    /// Value; `None` for boolean shorthand.
    pub value: Option<JsxAttributeValue>,
}

impl JsxAttribute {
    /// `name="value"`
    pub fn string(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: JsxAttributeName::parse(name),
            value: Some(JsxAttributeValue::String(value.into())),
        }
    }

    /// `name={value}`
    pub fn expression(name: &str, value: Expression) -> Self {
        Self {
            name: JsxAttributeName::parse(name),
            value: Some(JsxAttributeValue::Expression(JsxExpression::Expression(
                value,
            ))),
        }
    }
}

/// Attribute name.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttributeName {
    /// `className`, `aria-label`
    Identifier(String),
    /// `xlink:href`
    Namespaced {
        /// Namespace.
        namespace: String,
        /// Local name.
        name: String,
    },
}

impl JsxAttributeName {
    /// Parses `name` or `ns:name`.
    pub fn parse(name: &str) -> Self {
        match name.split_once(':') {
            Some((namespace, local)) => JsxAttributeName::Namespaced {
                namespace: namespace.to_string(),
                name: local.to_string(),
            },
            None => JsxAttributeName::Identifier(name.to_string()),
        }
    }
}

impl std::fmt::Display for JsxAttributeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsxAttributeName::Identifier(name) => f.write_str(name),
            JsxAttributeName::Namespaced { namespace, name } => {
                write!(f, "{}:{}", namespace, name)
            }
        }
    }
}

/// Attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxAttributeValue {
    /// `"value"` (unescaped text)
    String(String),
    /// `{value}`
    Expression(JsxExpression),
    /// `<a />`
    Element(Box<JsxElement>),
    /// `<></>`
    Fragment(Box<JsxFragment>),
}

/// Contents of `{…}`.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxExpression {
    /// `{value}`
    Expression(Expression),
    /// `{}` or `{/* comment */}`
    Empty {
        /// Comment kept inside the braces.
        comment: Option<String>,
    },
}

/// JSX child.
#[derive(Debug, Clone, PartialEq)]
pub enum JsxChild {
    /// Raw JSX text.
    Text(JsxText),
    /// `{…}`
    Expression(JsxExpression),
    /// `<a>…</a>`
    Element(Box<JsxElement>),
    /// `<>…</>`
    Fragment(Box<JsxFragment>),
}

/// Raw JSX text.
#[derive(Debug, Clone, PartialEq)]
pub struct JsxText {
    /// Text as written.
    pub value: String,
    /// Original position.
    pub span: Option<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jsx_name_parse() {
        assert_eq!(JsxName::parse("Card"), JsxName::Identifier("Card".into()));
        assert_eq!(
            JsxName::parse("a.b.c"),
            JsxName::Member {
                object: "a".into(),
                properties: vec!["b".into(), "c".into()],
            }
        );
        assert_eq!(
            JsxName::parse("svg:rect"),
            JsxName::Namespaced {
                namespace: "svg".into(),
                name: "rect".into(),
            }
        );
        assert_eq!(JsxName::parse("a.b.c").to_string(), "a.b.c");
    }

    #[test]
    fn test_bound_names_of_destructuring() {
        let declaration = Declaration::Variable(VariableDeclaration {
            kind: VariableKind::Const,
            declarations: vec![VariableDeclarator {
                id: Pattern::Object(vec![
                    ObjectPatternProperty::binding("a", "a"),
                    ObjectPatternProperty::binding("b", "c"),
                    ObjectPatternProperty::Rest(Pattern::ident("rest")),
                ]),
                init: Some(Expression::ident("value")),
            }],
            span: None,
        });
        assert_eq!(declaration.bound_names(), vec!["a", "c", "rest"]);
    }

    #[test]
    fn test_member_path() {
        let expression = Expression::member_path(&["props", "components"]);
        let Expression::Member(member) = expression else {
            panic!("expected member expression");
        };
        assert_eq!(*member.object, Expression::ident("props"));
        assert_eq!(
            member.property,
            MemberProperty::Identifier("components".into())
        );
    }
}
