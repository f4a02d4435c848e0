use std::collections::BTreeMap;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::signature::type_signature;
use super::types::TypeSignature;
use crate::schema::Schema;

/// Expand input object argument `arg_name` into one `arg_name.field`
/// parameter per scalar input field.
///
/// Only one level is flattened: input-object fields are reported and skipped.
/// Defaults are not carried over.
pub fn flatten_input(
    arg_name: &str,
    input_type: &str,
    schema: &Schema,
    diagnostics: &mut Diagnostics,
) -> BTreeMap<String, TypeSignature> {
    let mut params = BTreeMap::new();

    let Some(def) = schema.type_def(input_type) else {
        diagnostics.report(
            DiagnosticKind::UnknownScalarType,
            arg_name,
            format!("Cannot flatten {}: type {} is not in the schema", arg_name, input_type),
        );
        return params;
    };

    tracing::debug!(argument = %arg_name, input = %input_type, "Flattening input argument");

    for field in &def.fields {
        let flat_name = format!("{}.{}", arg_name, field.name);
        if schema.is_leaf(&field.ty.name) {
            let mut sig = type_signature(
                &flat_name,
                &field.ty.name,
                field.ty.non_null,
                None,
                diagnostics,
            );
            sig.list = field.ty.list;
            params.insert(flat_name, sig);
        } else {
            diagnostics.report(
                DiagnosticKind::UnsupportedNestedInput,
                flat_name,
                format!(
                    "Nested input types not supported: {}.{} is {}",
                    input_type, field.name, field.ty.name
                ),
            );
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    const SDL: &str = r#"
        type Query { people(filter: PersonFilter): [String] }

        input PersonFilter {
          name: String
          age: Int!
          address: AddressFilter
        }

        input AddressFilter { city: String }
    "#;

    #[test]
    fn test_flatten_scalar_fields() {
        let schema = Schema::from_sdl(SDL).unwrap();
        let mut diagnostics = Diagnostics::new();
        let params = flatten_input("filter", "PersonFilter", &schema, &mut diagnostics);

        let keys: Vec<_> = params.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["filter.age", "filter.name"]);
        assert!(!params.contains_key("filter"));

        assert_eq!(params["filter.name"].type_name, "String");
        assert!(!params["filter.name"].required);
        assert_eq!(params["filter.age"].type_name, "Int");
        assert!(params["filter.age"].required);
        assert!(params.values().all(|sig| sig.default.is_none()));
    }

    #[test]
    fn test_nested_input_is_skipped_and_reported() {
        let schema = Schema::from_sdl(SDL).unwrap();
        let mut diagnostics = Diagnostics::new();
        let params = flatten_input("filter", "PersonFilter", &schema, &mut diagnostics);

        assert!(!params.keys().any(|k| k.starts_with("filter.address")));
        let nested: Vec<_> = diagnostics
            .of_kind(DiagnosticKind::UnsupportedNestedInput)
            .collect();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].subject, "filter.address");
    }

    #[test]
    fn test_unknown_input_type() {
        let schema = Schema::from_sdl(SDL).unwrap();
        let mut diagnostics = Diagnostics::new();
        let params = flatten_input("filter", "Nope", &schema, &mut diagnostics);
        assert!(params.is_empty());
        assert!(diagnostics.has(DiagnosticKind::UnknownScalarType));
    }
}
