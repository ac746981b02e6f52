//! Mutable depth-first traversal of the code tree.
//!
//! Override a `visit_*` method to act on a node kind and call the matching
//! `walk_*` function to continue into its children.

use crate::estree::*;

/// Mutable visitor over a [`Program`].
pub trait VisitMut {
    /// Visits a program.
    fn visit_program(&mut self, program: &mut Program) {
        walk_program(self, program);
    }

    /// Visits a statement.
    fn visit_statement(&mut self, statement: &mut Statement) {
        walk_statement(self, statement);
    }

    /// Visits an expression.
    fn visit_expression(&mut self, expression: &mut Expression) {
        walk_expression(self, expression);
    }

    /// Visits a binding or assignment pattern.
    fn visit_pattern(&mut self, pattern: &mut Pattern) {
        walk_pattern(self, pattern);
    }

    /// Visits a function declaration, expression, or method.
    fn visit_function(&mut self, function: &mut Function) {
        walk_function(self, function);
    }

    /// Visits an arrow function.
    fn visit_arrow(&mut self, arrow: &mut ArrowFunction) {
        walk_arrow(self, arrow);
    }

    /// Visits a class.
    fn visit_class(&mut self, class: &mut Class) {
        walk_class(self, class);
    }

    /// Visits a JSX element.
    fn visit_jsx_element(&mut self, element: &mut JsxElement) {
        walk_jsx_element(self, element);
    }

    /// Visits a JSX fragment.
    fn visit_jsx_fragment(&mut self, fragment: &mut JsxFragment) {
        walk_jsx_fragment(self, fragment);
    }
}

/// Walks every top-level statement.
pub fn walk_program<V: VisitMut + ?Sized>(visitor: &mut V, program: &mut Program) {
    for statement in &mut program.body {
        visitor.visit_statement(statement);
    }
}

fn walk_statements<V: VisitMut + ?Sized>(visitor: &mut V, statements: &mut [Statement]) {
    for statement in statements {
        visitor.visit_statement(statement);
    }
}

fn walk_declaration<V: VisitMut + ?Sized>(visitor: &mut V, declaration: &mut Declaration) {
    match declaration {
        Declaration::Variable(variable) => walk_variable(visitor, variable),
        Declaration::Function(function) => visitor.visit_function(function),
        Declaration::Class(class) => visitor.visit_class(class),
    }
}

fn walk_variable<V: VisitMut + ?Sized>(visitor: &mut V, variable: &mut VariableDeclaration) {
    for declarator in &mut variable.declarations {
        visitor.visit_pattern(&mut declarator.id);
        if let Some(init) = &mut declarator.init {
            visitor.visit_expression(init);
        }
    }
}

/// Walks the children of a statement.
pub fn walk_statement<V: VisitMut + ?Sized>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::Import(_) | Statement::ExportAll(_) => {}
        Statement::ExportNamed(export) => {
            if let Some(declaration) = &mut export.declaration {
                walk_declaration(visitor, declaration);
            }
        }
        Statement::ExportDefault(export) => match &mut export.declaration {
            DefaultDeclaration::Function(function) => visitor.visit_function(function),
            DefaultDeclaration::Class(class) => visitor.visit_class(class),
            DefaultDeclaration::Expression(expression) => visitor.visit_expression(expression),
        },
        Statement::Declaration(declaration) => walk_declaration(visitor, declaration),
        Statement::Expression(statement) => visitor.visit_expression(&mut statement.expression),
        Statement::Return(statement) => {
            if let Some(argument) = &mut statement.argument {
                visitor.visit_expression(argument);
            }
        }
        Statement::Throw(statement) => visitor.visit_expression(&mut statement.argument),
        Statement::If(statement) => {
            visitor.visit_expression(&mut statement.test);
            visitor.visit_statement(&mut statement.consequent);
            if let Some(alternate) = &mut statement.alternate {
                visitor.visit_statement(alternate);
            }
        }
        Statement::Block(block) => walk_statements(visitor, &mut block.body),
        Statement::For(statement) => {
            match &mut statement.init {
                Some(ForInit::Variable(variable)) => walk_variable(visitor, variable),
                Some(ForInit::Expression(expression)) => visitor.visit_expression(expression),
                None => {}
            }
            if let Some(test) = &mut statement.test {
                visitor.visit_expression(test);
            }
            if let Some(update) = &mut statement.update {
                visitor.visit_expression(update);
            }
            visitor.visit_statement(&mut statement.body);
        }
        Statement::ForInOf(statement) => {
            match &mut statement.left {
                ForLeft::Variable(_, pattern) | ForLeft::Pattern(pattern) => {
                    visitor.visit_pattern(pattern)
                }
            }
            visitor.visit_expression(&mut statement.right);
            visitor.visit_statement(&mut statement.body);
        }
        Statement::While(statement) => {
            visitor.visit_expression(&mut statement.test);
            visitor.visit_statement(&mut statement.body);
        }
        Statement::Try(statement) => {
            walk_statements(visitor, &mut statement.block);
            if let Some(handler) = &mut statement.handler {
                if let Some(param) = &mut handler.param {
                    visitor.visit_pattern(param);
                }
                walk_statements(visitor, &mut handler.body);
            }
            if let Some(finalizer) = &mut statement.finalizer {
                walk_statements(visitor, finalizer);
            }
        }
        Statement::Break | Statement::Continue | Statement::Empty => {}
    }
}

fn walk_arguments<V: VisitMut + ?Sized>(visitor: &mut V, arguments: &mut [Argument]) {
    for argument in arguments {
        match argument {
            Argument::Expression(expression) | Argument::Spread(expression) => {
                visitor.visit_expression(expression)
            }
        }
    }
}

fn walk_property_key<V: VisitMut + ?Sized>(visitor: &mut V, key: &mut PropertyKey) {
    if let PropertyKey::Computed(expression) = key {
        visitor.visit_expression(expression);
    }
}

/// Walks the children of an expression.
pub fn walk_expression<V: VisitMut + ?Sized>(visitor: &mut V, expression: &mut Expression) {
    match expression {
        Expression::Identifier(_) | Expression::Literal(_) | Expression::This => {}
        Expression::Template { expressions, .. } | Expression::Sequence(expressions) => {
            for expression in expressions {
                visitor.visit_expression(expression);
            }
        }
        Expression::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                match element {
                    Argument::Expression(expression) | Argument::Spread(expression) => {
                        visitor.visit_expression(expression)
                    }
                }
            }
        }
        Expression::Object(members) => {
            for member in members {
                match member {
                    ObjectMember::Property(property) => {
                        walk_property_key(visitor, &mut property.key);
                        visitor.visit_expression(&mut property.value);
                    }
                    ObjectMember::Spread(expression) => visitor.visit_expression(expression),
                }
            }
        }
        Expression::Function(function) => visitor.visit_function(function),
        Expression::Arrow(arrow) => visitor.visit_arrow(arrow),
        Expression::Class(class) => visitor.visit_class(class),
        Expression::Unary(_, argument)
        | Expression::Await(argument)
        | Expression::Import(argument)
        | Expression::Update { argument, .. } => visitor.visit_expression(argument),
        Expression::Binary(_, left, right) | Expression::Logical(_, left, right) => {
            visitor.visit_expression(left);
            visitor.visit_expression(right);
        }
        Expression::Assignment(_, target, value) => {
            visitor.visit_pattern(target);
            visitor.visit_expression(value);
        }
        Expression::Conditional(test, consequent, alternate) => {
            visitor.visit_expression(test);
            visitor.visit_expression(consequent);
            visitor.visit_expression(alternate);
        }
        Expression::Call(call) => {
            visitor.visit_expression(&mut call.callee);
            walk_arguments(visitor, &mut call.arguments);
        }
        Expression::New(callee, arguments) => {
            visitor.visit_expression(callee);
            walk_arguments(visitor, arguments);
        }
        Expression::Member(member) => {
            visitor.visit_expression(&mut member.object);
            if let MemberProperty::Computed(property) = &mut member.property {
                visitor.visit_expression(property);
            }
        }
        Expression::Yield { argument, .. } => {
            if let Some(argument) = argument {
                visitor.visit_expression(argument);
            }
        }
        Expression::JsxElement(element) => visitor.visit_jsx_element(element),
        Expression::JsxFragment(fragment) => visitor.visit_jsx_fragment(fragment),
    }
}

/// Walks the children of a pattern.
pub fn walk_pattern<V: VisitMut + ?Sized>(visitor: &mut V, pattern: &mut Pattern) {
    match pattern {
        Pattern::Identifier(_) => {}
        Pattern::Object(properties) => {
            for property in properties {
                match property {
                    ObjectPatternProperty::Property { key, value, .. } => {
                        walk_property_key(visitor, key);
                        visitor.visit_pattern(value);
                    }
                    ObjectPatternProperty::Rest(rest) => visitor.visit_pattern(rest),
                }
            }
        }
        Pattern::Array(elements) => {
            for element in elements.iter_mut().flatten() {
                visitor.visit_pattern(element);
            }
        }
        Pattern::Assign(target, default) => {
            visitor.visit_pattern(target);
            visitor.visit_expression(default);
        }
        Pattern::Rest(target) => visitor.visit_pattern(target),
        Pattern::Expression(expression) => visitor.visit_expression(expression),
    }
}

/// Walks parameters and body of a function.
pub fn walk_function<V: VisitMut + ?Sized>(visitor: &mut V, function: &mut Function) {
    for param in &mut function.params {
        visitor.visit_pattern(param);
    }
    walk_statements(visitor, &mut function.body);
}

/// Walks parameters and body of an arrow function.
pub fn walk_arrow<V: VisitMut + ?Sized>(visitor: &mut V, arrow: &mut ArrowFunction) {
    for param in &mut arrow.params {
        visitor.visit_pattern(param);
    }
    match &mut arrow.body {
        ArrowBody::Block(body) => walk_statements(visitor, body),
        ArrowBody::Expression(expression) => visitor.visit_expression(expression),
    }
}

/// Walks the superclass and members of a class.
pub fn walk_class<V: VisitMut + ?Sized>(visitor: &mut V, class: &mut Class) {
    if let Some(super_class) = &mut class.super_class {
        visitor.visit_expression(super_class);
    }
    for member in &mut class.body {
        match member {
            ClassMember::Method { key, value, .. } => {
                walk_property_key(visitor, key);
                visitor.visit_function(value);
            }
            ClassMember::Property { key, value, .. } => {
                walk_property_key(visitor, key);
                if let Some(value) = value {
                    visitor.visit_expression(value);
                }
            }
        }
    }
}

fn walk_jsx_expression<V: VisitMut + ?Sized>(visitor: &mut V, expression: &mut JsxExpression) {
    if let JsxExpression::Expression(expression) = expression {
        visitor.visit_expression(expression);
    }
}

/// Walks attributes and children of a JSX element.
pub fn walk_jsx_element<V: VisitMut + ?Sized>(visitor: &mut V, element: &mut JsxElement) {
    for attribute in &mut element.attributes {
        match attribute {
            JsxAttributeItem::Spread(expression) => visitor.visit_expression(expression),
            JsxAttributeItem::Attribute(attribute) => match &mut attribute.value {
                Some(JsxAttributeValue::Expression(expression)) => {
                    walk_jsx_expression(visitor, expression)
                }
                Some(JsxAttributeValue::Element(element)) => visitor.visit_jsx_element(element),
                Some(JsxAttributeValue::Fragment(fragment)) => {
                    visitor.visit_jsx_fragment(fragment)
                }
                Some(JsxAttributeValue::String(_)) | None => {}
            },
        }
    }
    walk_jsx_children(visitor, &mut element.children);
}

/// Walks the children of a JSX fragment.
pub fn walk_jsx_fragment<V: VisitMut + ?Sized>(visitor: &mut V, fragment: &mut JsxFragment) {
    walk_jsx_children(visitor, &mut fragment.children);
}

fn walk_jsx_children<V: VisitMut + ?Sized>(visitor: &mut V, children: &mut [JsxChild]) {
    for child in children {
        match child {
            JsxChild::Text(_) => {}
            JsxChild::Expression(expression) => walk_jsx_expression(visitor, expression),
            JsxChild::Element(element) => visitor.visit_jsx_element(element),
            JsxChild::Fragment(fragment) => visitor.visit_jsx_fragment(fragment),
        }
    }
}
