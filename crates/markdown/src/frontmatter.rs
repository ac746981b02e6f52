//! YAML frontmatter as an exported constant.

use mdxc_core::estree::{
    Argument, Declaration, ExportNamedDeclaration, Expression, ObjectMember, Pattern, Property,
    PropertyKey, Statement, VariableDeclaration, VariableDeclarator, VariableKind,
};
use mdxc_core::identifier::is_binding_name;
use mdxc_core::unist::Position;
use serde_json::Value as JsonValue;
use thiserror::Error;

/// Errors emitted while turning frontmatter into an export.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    /// YAML failed to parse.
    #[error("Frontmatter parse error: {0}")]
    Parse(String),
    /// Top-level YAML node was not a mapping.
    #[error("Frontmatter must be a YAML mapping at the top level")]
    InvalidRootType,
    /// The configured export name cannot be bound.
    #[error("Cannot export frontmatter as `{0}`: not a valid binding name")]
    InvalidName(String),
}

/// Parses a YAML block into a JSON object; empty blocks give `{}`.
pub fn parse_yaml(block: &str) -> Result<JsonValue, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(JsonValue::Object(Default::default()));
    }

    let yaml_value: serde_yaml::Value =
        serde_yaml::from_str(block).map_err(|err| FrontmatterError::Parse(err.to_string()))?;
    let json_value =
        serde_json::to_value(yaml_value).map_err(|err| FrontmatterError::Parse(err.to_string()))?;

    match json_value {
        JsonValue::Null => Ok(JsonValue::Object(Default::default())),
        JsonValue::Object(_) => Ok(json_value),
        _ => Err(FrontmatterError::InvalidRootType),
    }
}

/// `export const <name> = {…};` from a YAML block.
pub fn export_statement(
    name: &str,
    block: &str,
    position: Option<Position>,
) -> Result<Statement, FrontmatterError> {
    if !is_binding_name(name) {
        return Err(FrontmatterError::InvalidName(name.to_string()));
    }
    let value = parse_yaml(block)?;
    Ok(Statement::ExportNamed(ExportNamedDeclaration {
        declaration: Some(Declaration::Variable(VariableDeclaration {
            kind: VariableKind::Const,
            declarations: vec![VariableDeclarator {
                id: Pattern::ident(name),
                init: Some(json_to_expression(value)),
            }],
            span: position,
        })),
        specifiers: Vec::new(),
        source: None,
        span: position,
    }))
}

/// Converts a JSON value into the equivalent JavaScript literal.
pub fn json_to_expression(value: JsonValue) -> Expression {
    match value {
        JsonValue::Null => Expression::null(),
        JsonValue::Bool(value) => Expression::boolean(value),
        // Integers beyond 2^53 lose precision, as they would in JavaScript.
        JsonValue::Number(number) => Expression::number(number.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(value) => Expression::string(value),
        JsonValue::Array(items) => Expression::Array(
            items
                .into_iter()
                .map(|item| Some(Argument::Expression(json_to_expression(item))))
                .collect(),
        ),
        JsonValue::Object(map) => Expression::Object(
            map.into_iter()
                .map(|(key, value)| {
                    ObjectMember::Property(Property::init(
                        PropertyKey::from_name(&key),
                        json_to_expression(value),
                    ))
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_empty_object_for_empty_block() {
        assert_eq!(
            parse_yaml("  \n").expect("empty"),
            JsonValue::Object(Default::default())
        );
    }

    #[test]
    fn parses_basic_yaml() {
        let value = parse_yaml("title: Example\ntags:\n  - rust\n  - mdx").expect("yaml");
        assert_eq!(value["title"], "Example");
        assert_eq!(value["tags"][1], "mdx");
    }

    #[test]
    fn rejects_non_mapping_root() {
        assert!(matches!(
            parse_yaml("- a\n- b"),
            Err(FrontmatterError::InvalidRootType)
        ));
    }

    #[test]
    fn rejects_reserved_export_name() {
        assert!(matches!(
            export_statement("default", "a: 1", None),
            Err(FrontmatterError::InvalidName(_))
        ));
    }

    #[test]
    fn converts_values_to_literals() {
        let value = parse_yaml("draft: true\nweight: 2\nauthor: ~\n\"data-id\": x").expect("yaml");
        let Expression::Object(members) = json_to_expression(value) else {
            panic!("expected an object");
        };
        let keys: Vec<_> = members
            .iter()
            .map(|member| match member {
                ObjectMember::Property(property) => property.key.clone(),
                ObjectMember::Spread(_) => panic!("no spreads"),
            })
            .collect();
        assert!(keys.contains(&PropertyKey::Identifier("draft".into())));
        assert!(keys.contains(&PropertyKey::String("data-id".into())));
    }
}
