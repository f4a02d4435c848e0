use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::types::{DefaultValue, TypeSignature};
use crate::schema::ArgumentDef;

/// Build the signature of parameter `name`, parsing its default literal
/// according to `type_name`.
///
/// A default that does not parse, or whose type has no known literal form, is
/// dropped and reported.
pub fn type_signature(
    name: &str,
    type_name: &str,
    required: bool,
    default_literal: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> TypeSignature {
    let default = default_literal.and_then(|raw| parse_default(name, type_name, raw, diagnostics));

    TypeSignature {
        type_name: type_name.to_string(),
        default,
        required,
        list: false,
    }
}

/// Signature of a scalar field argument, default included.
pub fn argument_signature(argument: &ArgumentDef, diagnostics: &mut Diagnostics) -> TypeSignature {
    TypeSignature {
        list: argument.ty.list,
        ..type_signature(
            &argument.name,
            &argument.ty.name,
            argument.ty.non_null,
            argument.default_value.as_deref(),
            diagnostics,
        )
    }
}

fn parse_default(
    name: &str,
    type_name: &str,
    raw: &str,
    diagnostics: &mut Diagnostics,
) -> Option<DefaultValue> {
    let parsed = match type_name {
        "ID" | "String" => return Some(DefaultValue::String(raw.to_string())),
        "Int" => raw
            .parse::<i64>()
            .map(DefaultValue::Int)
            .map_err(|e| e.to_string()),
        "Float" => raw
            .parse::<f64>()
            .map(DefaultValue::Float)
            .map_err(|e| e.to_string()),
        "Boolean" => raw
            .parse::<bool>()
            .map(DefaultValue::Boolean)
            .map_err(|e| e.to_string()),
        _ => {
            diagnostics.report(
                DiagnosticKind::UnknownScalarType,
                name,
                format!("Unknown default value type: {}", type_name),
            );
            return None;
        }
    };

    match parsed {
        Ok(value) => Some(value),
        Err(e) => {
            diagnostics.report(
                DiagnosticKind::UnparsableDefault,
                name,
                format!("Cannot parse input default for {} ({}): {}", name, raw, e),
            );
            None
        }
    }
}
