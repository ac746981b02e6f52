//! Code serializer: prints a code tree as JavaScript, JSX included, and
//! optionally records a source map while doing so.

use crate::estree::*;
use crate::options::Options;
use crate::source_map::{SourceMap, SourceMapBuilder};
use crate::unist::Position;

/// Generated code and its source map.
#[derive(Debug, Clone, PartialEq)]
pub struct Serialized {
    /// JavaScript text.
    pub code: String,
    /// Source map when requested through [`Options::source_map`].
    pub map: Option<SourceMap>,
}

/// Converts a string into a JavaScript string literal with proper escaping.
///
/// # Examples
///
/// ```
/// use mdxc_core::serialize::js_string_literal;
///
/// assert_eq!(js_string_literal("hello"), "\"hello\"");
/// assert_eq!(js_string_literal("a\nb"), "\"a\\nb\"");
/// ```
pub fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// Prints `program`.
///
/// `source` is embedded in the map as `sourcesContent`.
pub fn serialize(program: &Program, options: &Options, source: Option<&str>) -> Serialized {
    let map = options
        .source_map
        .then(|| SourceMapBuilder::new(options.filepath.clone().unwrap_or_default()));
    let mut printer = Printer {
        out: String::new(),
        line: 0,
        column: 0,
        indent: 0,
        map,
    };
    printer.program(program);

    let map = printer
        .map
        .map(|builder| builder.build(source.map(str::to_string)));
    Serialized {
        code: printer.out,
        map,
    }
}

const SEQUENCE: u8 = 1;
const ASSIGN: u8 = 2;
const CONDITIONAL: u8 = 3;
const UNARY: u8 = 15;
const UPDATE: u8 = 16;
const CALL: u8 = 17;
const PRIMARY: u8 = 18;

fn binary_precedence(operator: BinaryOperator) -> u8 {
    use BinaryOperator::*;
    match operator {
        BitwiseOr => 6,
        BitwiseXor => 7,
        BitwiseAnd => 8,
        Equal | NotEqual | StrictEqual | StrictNotEqual => 9,
        Less | LessEqual | Greater | GreaterEqual | In | Instanceof => 10,
        ShiftLeft | ShiftRight | ShiftRightUnsigned => 11,
        Add | Subtract => 12,
        Multiply | Divide | Remainder => 13,
        Exponent => 14,
    }
}

fn logical_precedence(operator: LogicalOperator) -> u8 {
    match operator {
        LogicalOperator::Or | LogicalOperator::Nullish => 4,
        LogicalOperator::And => 5,
    }
}

fn precedence(expression: &Expression) -> u8 {
    match expression {
        Expression::Sequence(_) => SEQUENCE,
        Expression::Assignment(..) | Expression::Arrow(_) | Expression::Yield { .. } => ASSIGN,
        Expression::Conditional(..) => CONDITIONAL,
        Expression::Logical(operator, ..) => logical_precedence(*operator),
        Expression::Binary(operator, ..) => binary_precedence(*operator),
        Expression::Unary(..) | Expression::Await(_) => UNARY,
        Expression::Update { .. } => UPDATE,
        Expression::Call(_) | Expression::New(..) | Expression::Member(_) | Expression::Import(_) => {
            CALL
        }
        Expression::Literal(Literal {
            value: LiteralValue::Number(value),
            ..
        }) if value.is_sign_negative() => UNARY,
        _ => PRIMARY,
    }
}

/// Whether printing `expression` first in a statement would make it parse as
/// a block, function, or class declaration.
fn starts_ambiguously(expression: &Expression) -> bool {
    match expression {
        Expression::Object(_) | Expression::Function(_) | Expression::Class(_) => true,
        Expression::Assignment(_, target, _) => matches!(**target, Pattern::Object(_)),
        Expression::Binary(_, left, _)
        | Expression::Logical(_, left, _)
        | Expression::Conditional(left, _, _) => starts_ambiguously(left),
        Expression::Sequence(expressions) => expressions.first().is_some_and(starts_ambiguously),
        Expression::Call(call) => starts_ambiguously(&call.callee),
        Expression::Member(member) => starts_ambiguously(&member.object),
        Expression::Update {
            prefix: false,
            argument,
            ..
        } => starts_ambiguously(argument),
        _ => false,
    }
}

fn mixes_nullish(parent: LogicalOperator, child: &Expression) -> bool {
    let Expression::Logical(child, ..) = child else {
        return false;
    };
    (parent == LogicalOperator::Nullish) != (*child == LogicalOperator::Nullish)
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

struct Printer {
    out: String,
    line: usize,
    column: usize,
    indent: usize,
    map: Option<SourceMapBuilder>,
}

impl Printer {
    fn write(&mut self, text: &str) {
        for ch in text.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += ch.len_utf16();
            }
        }
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.write("\n");
        for _ in 0..self.indent {
            self.write("  ");
        }
    }

    fn mark(&mut self, span: Option<Position>, name: Option<&str>) {
        if let (Some(map), Some(span)) = (&mut self.map, span) {
            map.add(self.line, self.column, span.start, name);
        }
    }

    fn string(&mut self, value: &str) {
        self.write(&js_string_literal(value));
    }

    fn comma_separated<T>(&mut self, items: &[T], mut print: impl FnMut(&mut Self, &T)) {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.write(", ");
            }
            print(self, item);
        }
    }

    fn program(&mut self, program: &Program) {
        for comment in &program.comments {
            match comment.kind {
                CommentKind::Block => {
                    self.write("/*");
                    self.write(&comment.value);
                    self.write("*/");
                }
                CommentKind::Line => {
                    self.write("//");
                    self.write(&comment.value);
                }
            }
            self.write("\n");
        }
        for statement in &program.body {
            self.statement(statement);
            self.write("\n");
        }
    }

    fn block(&mut self, body: &[Statement]) {
        if body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        for statement in body {
            self.newline();
            self.statement(statement);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn statement(&mut self, statement: &Statement) {
        self.mark(statement.span(), None);
        match statement {
            Statement::Import(import) => self.import(import),
            Statement::ExportNamed(export) => {
                self.write("export ");
                if let Some(declaration) = &export.declaration {
                    self.declaration(declaration);
                    return;
                }
                self.write("{");
                self.comma_separated(&export.specifiers, |printer, specifier| {
                    printer.module_name(&specifier.local);
                    if specifier.exported != specifier.local {
                        printer.write(" as ");
                        printer.module_name(&specifier.exported);
                    }
                });
                self.write("}");
                if let Some(source) = &export.source {
                    self.write(" from ");
                    self.string(source);
                }
                self.write(";");
            }
            Statement::ExportDefault(export) => {
                self.write("export default ");
                match &export.declaration {
                    DefaultDeclaration::Function(function) => self.function(function),
                    DefaultDeclaration::Class(class) => self.class(class),
                    DefaultDeclaration::Expression(expression) => {
                        self.statement_expression(expression);
                        self.write(";");
                    }
                }
            }
            Statement::ExportAll(export) => {
                self.write("export *");
                if let Some(exported) = &export.exported {
                    self.write(" as ");
                    self.module_name(exported);
                }
                self.write(" from ");
                self.string(&export.source);
                self.write(";");
            }
            Statement::Declaration(declaration) => self.declaration(declaration),
            Statement::Expression(statement) => {
                self.statement_expression(&statement.expression);
                self.write(";");
            }
            Statement::Return(statement) => {
                self.write("return");
                if let Some(argument) = &statement.argument {
                    self.write(" ");
                    self.expression(argument, SEQUENCE);
                }
                self.write(";");
            }
            Statement::Throw(statement) => {
                self.write("throw ");
                self.expression(&statement.argument, SEQUENCE);
                self.write(";");
            }
            Statement::If(statement) => {
                self.write("if (");
                self.expression(&statement.test, SEQUENCE);
                self.write(") ");
                self.statement(&statement.consequent);
                if let Some(alternate) = &statement.alternate {
                    self.write(" else ");
                    self.statement(alternate);
                }
            }
            Statement::Block(block) => self.block(&block.body),
            Statement::For(statement) => {
                self.write("for (");
                match &statement.init {
                    Some(ForInit::Variable(variable)) => self.variable(variable),
                    Some(ForInit::Expression(expression)) => self.expression(expression, SEQUENCE),
                    None => {}
                }
                self.write(";");
                if let Some(test) = &statement.test {
                    self.write(" ");
                    self.expression(test, SEQUENCE);
                }
                self.write(";");
                if let Some(update) = &statement.update {
                    self.write(" ");
                    self.expression(update, SEQUENCE);
                }
                self.write(") ");
                self.statement(&statement.body);
            }
            Statement::ForInOf(statement) => {
                self.write(if statement.is_await { "for await (" } else { "for (" });
                match &statement.left {
                    ForLeft::Variable(kind, pattern) => {
                        self.write(kind.as_str());
                        self.write(" ");
                        self.pattern(pattern);
                    }
                    ForLeft::Pattern(pattern) => self.pattern(pattern),
                }
                self.write(if statement.of { " of " } else { " in " });
                self.expression(&statement.right, ASSIGN);
                self.write(") ");
                self.statement(&statement.body);
            }
            Statement::While(statement) => {
                self.write("while (");
                self.expression(&statement.test, SEQUENCE);
                self.write(") ");
                self.statement(&statement.body);
            }
            Statement::Try(statement) => {
                self.write("try ");
                self.block(&statement.block);
                if let Some(handler) = &statement.handler {
                    self.write(" catch ");
                    if let Some(param) = &handler.param {
                        self.write("(");
                        self.pattern(param);
                        self.write(") ");
                    }
                    self.block(&handler.body);
                }
                if let Some(finalizer) = &statement.finalizer {
                    self.write(" finally ");
                    self.block(finalizer);
                }
            }
            Statement::Break => self.write("break;"),
            Statement::Continue => self.write("continue;"),
            Statement::Empty => self.write(";"),
        }
    }

    /// Prints an identifier, or a string literal for arbitrary module export names.
    fn module_name(&mut self, name: &str) {
        if crate::identifier::is_identifier_name(name) {
            self.write(name);
        } else {
            self.string(name);
        }
    }

    fn import(&mut self, import: &ImportDeclaration) {
        self.write("import ");
        let mut named = Vec::new();
        let mut first = true;
        for specifier in &import.specifiers {
            match specifier {
                ImportSpecifier::Default { local } => {
                    if !first {
                        self.write(", ");
                    }
                    self.write(&local.name);
                    first = false;
                }
                ImportSpecifier::Namespace { local } => {
                    if !first {
                        self.write(", ");
                    }
                    self.write("* as ");
                    self.write(&local.name);
                    first = false;
                }
                ImportSpecifier::Named { imported, local } => named.push((imported, local)),
            }
        }
        if !named.is_empty() {
            if !first {
                self.write(", ");
            }
            self.write("{");
            self.comma_separated(&named, |printer, (imported, local)| {
                printer.module_name(imported);
                if **imported != local.name {
                    printer.write(" as ");
                    printer.write(&local.name);
                }
            });
            self.write("}");
            first = false;
        }
        if !first {
            self.write(" from ");
        }
        self.string(&import.source);
        self.write(";");
    }

    fn declaration(&mut self, declaration: &Declaration) {
        match declaration {
            Declaration::Variable(variable) => {
                self.variable(variable);
                self.write(";");
            }
            Declaration::Function(function) => self.function(function),
            Declaration::Class(class) => self.class(class),
        }
    }

    fn variable(&mut self, variable: &VariableDeclaration) {
        self.write(variable.kind.as_str());
        self.write(" ");
        self.comma_separated(&variable.declarations, |printer, declarator| {
            printer.pattern(&declarator.id);
            if let Some(init) = &declarator.init {
                printer.write(" = ");
                printer.expression(init, ASSIGN);
            }
        });
    }

    fn params(&mut self, params: &[Pattern]) {
        self.write("(");
        self.comma_separated(params, |printer, param| printer.pattern(param));
        self.write(")");
    }

    fn function(&mut self, function: &Function) {
        self.mark(function.span, None);
        if function.is_async {
            self.write("async ");
        }
        self.write(if function.is_generator { "function*" } else { "function" });
        if let Some(id) = &function.id {
            self.write(" ");
            self.mark(id.span, Some(id.name.as_str()));
            self.write(&id.name);
        } else {
            self.write(" ");
        }
        self.params(&function.params);
        self.write(" ");
        self.block(&function.body);
    }

    fn method(&mut self, prefix: &str, key: &PropertyKey, function: &Function) {
        if function.is_async {
            self.write("async ");
        }
        if function.is_generator {
            self.write("*");
        }
        self.write(prefix);
        self.property_key(key);
        self.params(&function.params);
        self.write(" ");
        self.block(&function.body);
    }

    fn arrow(&mut self, arrow: &ArrowFunction) {
        self.mark(arrow.span, None);
        if arrow.is_async {
            self.write("async ");
        }
        self.params(&arrow.params);
        self.write(" => ");
        match &arrow.body {
            ArrowBody::Block(body) => self.block(body),
            ArrowBody::Expression(expression) => {
                if starts_ambiguously(expression) {
                    self.write("(");
                    self.expression(expression, SEQUENCE);
                    self.write(")");
                } else {
                    self.expression(expression, ASSIGN);
                }
            }
        }
    }

    fn class(&mut self, class: &Class) {
        self.mark(class.span, None);
        self.write("class");
        if let Some(id) = &class.id {
            self.write(" ");
            self.write(&id.name);
        }
        if let Some(super_class) = &class.super_class {
            self.write(" extends ");
            self.expression(super_class, CALL);
        }
        self.write(" ");
        if class.body.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        for member in &class.body {
            self.newline();
            match member {
                ClassMember::Method {
                    key,
                    value,
                    kind,
                    is_static,
                } => {
                    if *is_static {
                        self.write("static ");
                    }
                    let prefix = match kind {
                        MethodKind::Get => "get ",
                        MethodKind::Set => "set ",
                        MethodKind::Constructor | MethodKind::Method => "",
                    };
                    self.method(prefix, key, value);
                }
                ClassMember::Property {
                    key,
                    value,
                    is_static,
                } => {
                    if *is_static {
                        self.write("static ");
                    }
                    self.property_key(key);
                    if let Some(value) = value {
                        self.write(" = ");
                        self.expression(value, ASSIGN);
                    }
                    self.write(";");
                }
            }
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn property_key(&mut self, key: &PropertyKey) {
        match key {
            PropertyKey::Identifier(name) => self.write(name),
            PropertyKey::String(value) => self.string(value),
            PropertyKey::Number(value) => self.write(&format_number(*value)),
            PropertyKey::Computed(expression) => {
                self.write("[");
                self.expression(expression, ASSIGN);
                self.write("]");
            }
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Identifier(identifier) => {
                self.mark(identifier.span, Some(identifier.name.as_str()));
                self.write(&identifier.name);
            }
            Pattern::Object(properties) => {
                if properties.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{");
                self.comma_separated(properties, |printer, property| match property {
                    ObjectPatternProperty::Property {
                        key,
                        value,
                        shorthand,
                    } => {
                        if *shorthand && pattern_shorthand(key, value) {
                            printer.pattern(value);
                        } else {
                            printer.property_key(key);
                            printer.write(": ");
                            printer.pattern(value);
                        }
                    }
                    ObjectPatternProperty::Rest(rest) => {
                        printer.write("...");
                        printer.pattern(rest);
                    }
                });
                self.write("}");
            }
            Pattern::Array(elements) => {
                self.write("[");
                self.comma_separated(elements, |printer, element| {
                    if let Some(element) = element {
                        printer.pattern(element);
                    }
                });
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pattern::Assign(target, default) => {
                self.pattern(target);
                self.write(" = ");
                self.expression(default, ASSIGN);
            }
            Pattern::Rest(target) => {
                self.write("...");
                self.pattern(target);
            }
            Pattern::Expression(expression) => self.expression(expression, CALL),
        }
    }

    /// Expression statements and default exports must not start with `{`,
    /// `function`, or `class`.
    fn statement_expression(&mut self, expression: &Expression) {
        if starts_ambiguously(expression) {
            self.write("(");
            self.expression(expression, SEQUENCE);
            self.write(")");
        } else {
            self.expression(expression, SEQUENCE);
        }
    }

    fn arguments(&mut self, arguments: &[Argument]) {
        self.write("(");
        self.comma_separated(arguments, |printer, argument| printer.argument(argument));
        self.write(")");
    }

    fn argument(&mut self, argument: &Argument) {
        match argument {
            Argument::Expression(expression) => self.expression(expression, ASSIGN),
            Argument::Spread(expression) => {
                self.write("...");
                self.expression(expression, ASSIGN);
            }
        }
    }

    fn expression(&mut self, expression: &Expression, min_precedence: u8) {
        let parenthesize = precedence(expression) < min_precedence;
        if parenthesize {
            self.write("(");
        }
        let name = match expression {
            Expression::Identifier(identifier) => Some(identifier.name.as_str()),
            _ => None,
        };
        self.mark(expression.span(), name);
        self.expression_inner(expression);
        if parenthesize {
            self.write(")");
        }
    }

    fn expression_inner(&mut self, expression: &Expression) {
        match expression {
            Expression::Identifier(identifier) => self.write(&identifier.name),
            Expression::Literal(literal) => self.literal(&literal.value),
            Expression::Template {
                quasis,
                expressions,
            } => {
                self.write("`");
                for (index, quasi) in quasis.iter().enumerate() {
                    self.write(quasi);
                    if let Some(expression) = expressions.get(index) {
                        self.write("${");
                        self.expression(expression, SEQUENCE);
                        self.write("}");
                    }
                }
                self.write("`");
            }
            Expression::Array(elements) => {
                self.write("[");
                self.comma_separated(elements, |printer, element| {
                    if let Some(element) = element {
                        printer.argument(element);
                    }
                });
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expression::Object(members) => self.object(members),
            Expression::Function(function) => self.function(function),
            Expression::Arrow(arrow) => self.arrow(arrow),
            Expression::Class(class) => self.class(class),
            Expression::Unary(operator, argument) => {
                self.write(operator.as_str());
                let spaced = match operator {
                    UnaryOperator::Typeof | UnaryOperator::Void | UnaryOperator::Delete => true,
                    UnaryOperator::Minus | UnaryOperator::Plus => matches!(
                        **argument,
                        Expression::Unary(UnaryOperator::Minus | UnaryOperator::Plus, _)
                            | Expression::Update { prefix: true, .. }
                    ),
                    UnaryOperator::Not | UnaryOperator::BitwiseNot => false,
                };
                if spaced {
                    self.write(" ");
                }
                self.expression(argument, UNARY);
            }
            Expression::Update {
                operator,
                prefix,
                argument,
            } => {
                let text = match operator {
                    UpdateOperator::Increment => "++",
                    UpdateOperator::Decrement => "--",
                };
                if *prefix {
                    self.write(text);
                    self.expression(argument, UPDATE);
                } else {
                    self.expression(argument, UPDATE);
                    self.write(text);
                }
            }
            Expression::Binary(operator, left, right) => {
                let own = binary_precedence(*operator);
                let (left_min, right_min) = if *operator == BinaryOperator::Exponent {
                    (own + 2, own)
                } else {
                    (own, own + 1)
                };
                self.expression(left, left_min);
                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");
                self.expression(right, right_min);
            }
            Expression::Logical(operator, left, right) => {
                let own = logical_precedence(*operator);
                let left_min = if mixes_nullish(*operator, left) { PRIMARY } else { own };
                let right_min = if mixes_nullish(*operator, right) {
                    PRIMARY
                } else {
                    own + 1
                };
                self.expression(left, left_min);
                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");
                self.expression(right, right_min);
            }
            Expression::Assignment(operator, target, value) => {
                self.pattern(target);
                self.write(" ");
                self.write(operator.as_str());
                self.write(" ");
                self.expression(value, ASSIGN);
            }
            Expression::Conditional(test, consequent, alternate) => {
                self.expression(test, CONDITIONAL + 1);
                self.write(" ? ");
                self.expression(consequent, ASSIGN);
                self.write(" : ");
                self.expression(alternate, ASSIGN);
            }
            Expression::Call(call) => {
                if matches!(*call.callee, Expression::New(..)) {
                    self.write("(");
                    self.expression(&call.callee, SEQUENCE);
                    self.write(")");
                } else {
                    self.expression(&call.callee, CALL);
                }
                if call.optional {
                    self.write("?.");
                }
                self.arguments(&call.arguments);
            }
            Expression::New(callee, arguments) => {
                self.write("new ");
                if matches!(**callee, Expression::Call(_)) {
                    self.write("(");
                    self.expression(callee, SEQUENCE);
                    self.write(")");
                } else {
                    self.expression(callee, CALL);
                }
                self.arguments(arguments);
            }
            Expression::Member(member) => {
                self.expression(&member.object, CALL);
                match &member.property {
                    MemberProperty::Identifier(name) => {
                        self.write(if member.optional { "?." } else { "." });
                        self.write(name);
                    }
                    MemberProperty::Computed(property) => {
                        if member.optional {
                            self.write("?.");
                        }
                        self.write("[");
                        self.expression(property, SEQUENCE);
                        self.write("]");
                    }
                }
            }
            Expression::Sequence(expressions) => {
                self.comma_separated(expressions, |printer, expression| {
                    printer.expression(expression, ASSIGN)
                });
            }
            Expression::Await(argument) => {
                self.write("await ");
                self.expression(argument, UNARY);
            }
            Expression::Yield { argument, delegate } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(argument) = argument {
                    self.write(" ");
                    self.expression(argument, ASSIGN);
                }
            }
            Expression::Import(source) => {
                self.write("import(");
                self.expression(source, ASSIGN);
                self.write(")");
            }
            Expression::This => self.write("this"),
            Expression::JsxElement(element) => self.jsx_element(element),
            Expression::JsxFragment(fragment) => self.jsx_fragment(fragment),
        }
    }

    fn literal(&mut self, value: &LiteralValue) {
        match value {
            LiteralValue::String(value) => self.string(value),
            LiteralValue::Number(value) => self.write(&format_number(*value)),
            LiteralValue::Boolean(value) => self.write(if *value { "true" } else { "false" }),
            LiteralValue::Null => self.write("null"),
            LiteralValue::Regex { pattern, flags } => {
                self.write("/");
                self.write(pattern);
                self.write("/");
                self.write(flags);
            }
        }
    }

    fn object(&mut self, members: &[ObjectMember]) {
        if members.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.comma_separated(members, |printer, member| match member {
            ObjectMember::Spread(argument) => {
                printer.write("...");
                printer.expression(argument, ASSIGN);
            }
            ObjectMember::Property(property) => printer.property(property),
        });
        self.write("}");
    }

    fn property(&mut self, property: &Property) {
        let method = match (&property.kind, &property.value) {
            (PropertyKind::Init, _) => None,
            (kind, Expression::Function(function)) => Some((kind, function)),
            _ => None,
        };
        if let Some((kind, function)) = method {
            let prefix = match kind {
                PropertyKind::Get => "get ",
                PropertyKind::Set => "set ",
                PropertyKind::Method | PropertyKind::Init => "",
            };
            self.method(prefix, &property.key, function);
            return;
        }

        let shorthand = property.shorthand
            && matches!(
                (&property.key, &property.value),
                (PropertyKey::Identifier(key), Expression::Identifier(value)) if *key == value.name
            );
        if shorthand {
            self.expression(&property.value, ASSIGN);
            return;
        }
        self.property_key(&property.key);
        self.write(": ");
        self.expression(&property.value, ASSIGN);
    }

    fn jsx_element(&mut self, element: &JsxElement) {
        self.mark(element.span, None);
        let name = element.name.to_string();
        self.write("<");
        self.write(&name);
        for attribute in &element.attributes {
            self.write(" ");
            match attribute {
                JsxAttributeItem::Spread(argument) => {
                    self.write("{...");
                    self.expression(argument, ASSIGN);
                    self.write("}");
                }
                JsxAttributeItem::Attribute(attribute) => {
                    self.write(&attribute.name.to_string());
                    match &attribute.value {
                        None => {}
                        Some(JsxAttributeValue::String(value)) => {
                            self.write("=\"");
                            self.write(&html_escape::encode_double_quoted_attribute(value));
                            self.write("\"");
                        }
                        Some(JsxAttributeValue::Expression(expression)) => {
                            self.write("=");
                            self.jsx_expression(expression);
                        }
                        Some(JsxAttributeValue::Element(element)) => {
                            self.write("=");
                            self.jsx_element(element);
                        }
                        Some(JsxAttributeValue::Fragment(fragment)) => {
                            self.write("=");
                            self.jsx_fragment(fragment);
                        }
                    }
                }
            }
        }
        if element.children.is_empty() {
            self.write(" />");
            return;
        }
        self.write(">");
        self.jsx_children(&element.children);
        self.write("</");
        self.write(&name);
        self.write(">");
    }

    fn jsx_fragment(&mut self, fragment: &JsxFragment) {
        self.mark(fragment.span, None);
        self.write("<>");
        self.jsx_children(&fragment.children);
        self.write("</>");
    }

    fn jsx_expression(&mut self, expression: &JsxExpression) {
        self.write("{");
        match expression {
            JsxExpression::Expression(expression) => self.expression(expression, ASSIGN),
            JsxExpression::Empty { comment: Some(comment) } => {
                // A `*/` inside would close the comment early.
                self.write("/*");
                self.write(&comment.replace("*/", "* /"));
                self.write("*/");
            }
            JsxExpression::Empty { comment: None } => {}
        }
        self.write("}");
    }

    fn jsx_children(&mut self, children: &[JsxChild]) {
        for child in children {
            match child {
                JsxChild::Text(text) => {
                    self.mark(text.span, None);
                    self.write(&text.value);
                }
                JsxChild::Expression(expression) => self.jsx_expression(expression),
                JsxChild::Element(element) => self.jsx_element(element),
                JsxChild::Fragment(fragment) => self.jsx_fragment(fragment),
            }
        }
    }
}

fn pattern_shorthand(key: &PropertyKey, value: &Pattern) -> bool {
    let PropertyKey::Identifier(key) = key else {
        return false;
    };
    match value {
        Pattern::Identifier(identifier) => identifier.name == *key,
        Pattern::Assign(target, _) => {
            matches!(&**target, Pattern::Identifier(identifier) if identifier.name == *key)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn print_expression(expression: Expression) -> String {
        let program = Program {
            body: vec![Statement::expression(expression)],
            comments: Vec::new(),
        };
        serialize(&program, &Options::default(), None).code
    }

    fn print(body: Vec<Statement>) -> String {
        let program = Program {
            body,
            comments: Vec::new(),
        };
        serialize(&program, &Options::default(), None).code
    }

    #[test]
    fn test_precedence_parentheses() {
        let sum = Expression::Binary(
            BinaryOperator::Add,
            Box::new(Expression::ident("a")),
            Box::new(Expression::ident("b")),
        );
        let product = Expression::Binary(
            BinaryOperator::Multiply,
            Box::new(sum.clone()),
            Box::new(Expression::ident("c")),
        );
        assert_eq!(print_expression(product), "(a + b) * c;\n");

        let right = Expression::Binary(
            BinaryOperator::Subtract,
            Box::new(Expression::ident("x")),
            Box::new(sum),
        );
        assert_eq!(print_expression(right), "x - (a + b);\n");
    }

    #[test]
    fn test_nullish_mixed_with_or_is_parenthesized() {
        let or = Expression::Logical(
            LogicalOperator::Or,
            Box::new(Expression::ident("a")),
            Box::new(Expression::ident("b")),
        );
        let nullish = Expression::Logical(
            LogicalOperator::Nullish,
            Box::new(or),
            Box::new(Expression::ident("c")),
        );
        assert_eq!(print_expression(nullish), "(a || b) ?? c;\n");
    }

    #[test]
    fn test_statement_starting_with_object_or_function() {
        assert_eq!(print_expression(Expression::Object(Vec::new())), "({});\n");
        let call = Expression::call(
            Expression::Function(Box::new(Function::default())),
            Vec::new(),
        );
        assert_eq!(print_expression(call), "(function () {}());\n");
    }

    #[test]
    fn test_arrow_returning_object() {
        let arrow = Expression::Arrow(Box::new(ArrowFunction {
            params: vec![Pattern::ident("a")],
            body: ArrowBody::Expression(Box::new(Expression::Object(vec![
                ObjectMember::Property(Property {
                    key: PropertyKey::Identifier("a".into()),
                    value: Expression::ident("a"),
                    kind: PropertyKind::Init,
                    shorthand: true,
                }),
            ]))),
            is_async: false,
            span: None,
        }));
        assert_eq!(
            print(vec![Statement::const_declaration(Pattern::ident("f"), arrow)]),
            "const f = (a) => ({a});\n"
        );
    }

    #[test]
    fn test_imports_and_exports() {
        let code = print(vec![
            Statement::Import(ImportDeclaration {
                specifiers: vec![
                    ImportSpecifier::Default {
                        local: Identifier::new("React"),
                    },
                    ImportSpecifier::Named {
                        imported: "jsx".into(),
                        local: Identifier::new("_jsx"),
                    },
                    ImportSpecifier::Named {
                        imported: "Fragment".into(),
                        local: Identifier::new("Fragment"),
                    },
                ],
                source: "react".into(),
                span: None,
            }),
            Statement::Import(ImportDeclaration {
                specifiers: Vec::new(),
                source: "./style.css".into(),
                span: None,
            }),
            Statement::ExportNamed(ExportNamedDeclaration {
                declaration: None,
                specifiers: vec![ExportSpecifier {
                    local: "a".into(),
                    exported: "b".into(),
                }],
                source: Some("./a.js".into()),
                span: None,
            }),
            Statement::ExportAll(ExportAllDeclaration {
                exported: None,
                source: "./b.js".into(),
                span: None,
            }),
        ]);
        assert_eq!(
            code,
            "import React, {jsx as _jsx, Fragment} from \"react\";\n\
             import \"./style.css\";\n\
             export {a as b} from \"./a.js\";\n\
             export * from \"./b.js\";\n"
        );
    }

    #[test]
    fn test_function_with_block_body() {
        let function = Function {
            id: Some(Identifier::new("MDXContent")),
            params: vec![Pattern::Assign(
                Box::new(Pattern::ident("props")),
                Box::new(Expression::Object(Vec::new())),
            )],
            body: vec![
                Statement::const_declaration(Pattern::ident("_content"), Expression::null()),
                Statement::return_(Expression::ident("_content")),
            ],
            ..Function::default()
        };
        let code = print(vec![Statement::Declaration(Declaration::Function(function))]);
        insta::assert_snapshot!(code.trim_end(), @r"
        function MDXContent(props = {}) {
          const _content = null;
          return _content;
        }
        ");
    }

    #[test]
    fn test_jsx_printing() {
        let mut card = JsxElement::new(JsxName::parse("ui.Card"));
        card.attributes
            .push(JsxAttributeItem::Attribute(JsxAttribute::string(
                "title",
                "\"Tom\" & Jerry",
            )));
        card.attributes.push(JsxAttributeItem::Attribute(JsxAttribute {
            name: JsxAttributeName::parse("hidden"),
            value: None,
        }));
        card.attributes
            .push(JsxAttributeItem::Spread(Expression::ident("props")));
        card.children.push(JsxChild::Expression(JsxExpression::Empty {
            comment: Some(" note ".into()),
        }));
        card.children
            .push(JsxChild::Element(Box::new(JsxElement::new(JsxName::parse(
                "svg:rect",
            )))));
        let fragment = JsxFragment {
            children: vec![
                JsxChild::Element(Box::new(card)),
                JsxChild::Text(JsxText {
                    value: "text".into(),
                    span: None,
                }),
            ],
            span: None,
        };

        assert_eq!(
            print_expression(Expression::JsxFragment(Box::new(fragment))),
            "<><ui.Card title=\"&quot;Tom&quot; &amp; Jerry\" hidden {...props}>{/* note */}<svg:rect /></ui.Card>text</>;\n"
        );
    }

    #[test]
    fn test_pragma_comment_and_strings() {
        let program = Program {
            body: vec![Statement::expression(Expression::string("a\"b\n"))],
            comments: vec![Comment {
                kind: CommentKind::Block,
                value: "@jsxRuntime automatic @jsxImportSource react".into(),
            }],
        };
        let code = serialize(&program, &Options::default(), None).code;
        assert_eq!(
            code,
            "/*@jsxRuntime automatic @jsxImportSource react*/\n\"a\\\"b\\n\";\n"
        );
    }

    #[test]
    fn test_source_map_tracks_utf16_columns() {
        let span = Some(Position::new(3, 5, 20, 3, 9, 24));
        let program = Program {
            body: vec![Statement::const_declaration(
                Pattern::ident("é𝒳"),
                Expression::Identifier(Identifier {
                    name: "value".into(),
                    span,
                }),
            )],
            comments: Vec::new(),
        };
        let options = Options {
            source_map: true,
            filepath: Some("doc.mdx".into()),
            ..Options::default()
        };
        let serialized = serialize(&program, &options, Some("source"));
        let map = serialized.map.expect("map requested");

        assert_eq!(map.sources, vec!["doc.mdx"]);
        assert_eq!(map.sources_content, vec![Some("source".to_string())]);
        assert_eq!(map.names, vec!["value"]);
        // `const é𝒳 = ` is 12 UTF-16 units; original is line 3 (2), column 5 (4).
        assert_eq!(map.mappings, "YAEIA");
    }

    #[test]
    fn test_jsx_comment_cannot_close_early() {
        let fragment = JsxFragment {
            children: vec![JsxChild::Expression(JsxExpression::Empty {
                comment: Some(" a */ b ".into()),
            })],
            span: None,
        };
        assert_eq!(
            print_expression(Expression::JsxFragment(Box::new(fragment))),
            "<>{/* a * / b */}</>;\n"
        );
    }

    #[test]
    fn test_source_map_advances_past_multiline_text() {
        let mut b = JsxElement::new(JsxName::parse("b"));
        b.span = Some(Position::new(2, 3, 4, 2, 7, 8));
        let fragment = JsxFragment {
            children: vec![
                JsxChild::Text(JsxText {
                    value: "a\nbc ".into(),
                    span: None,
                }),
                JsxChild::Element(Box::new(b)),
            ],
            span: None,
        };
        let program = Program {
            body: vec![Statement::expression(Expression::JsxFragment(Box::new(
                fragment,
            )))],
            comments: Vec::new(),
        };
        let options = Options {
            source_map: true,
            ..Options::default()
        };
        let serialized = serialize(&program, &options, None);

        assert_eq!(serialized.code, "<>a\nbc <b /></>;\n");
        // Generated line 2, column 3 maps to original line 2, column 3.
        let map = serialized.map.expect("map requested");
        assert_eq!(map.mappings, ";GACE");
    }

    #[test]
    fn test_no_map_unless_requested() {
        assert_eq!(serialize(&Program::default(), &Options::default(), None).map, None);
    }
}
