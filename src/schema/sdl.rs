use std::collections::{HashMap, HashSet};

use async_graphql::Value;
use async_graphql::parser::parse_schema;
use async_graphql::parser::types::{
    BaseType, FieldDefinition, InputValueDefinition, Type, TypeKind as SdlKind,
    TypeSystemDefinition,
};

use super::{ArgumentDef, FieldDef, Schema, TypeDef, TypeKind, TypeRef};
use crate::error::SchemaError;

impl Schema {
    /// Parse SDL (a plain schema or a composed supergraph) into the model.
    ///
    /// `extend type` blocks are merged into their base type. Every field and
    /// argument must reference a built-in or declared type.
    pub fn from_sdl(sdl: &str) -> Result<Self, SchemaError> {
        let document = parse_schema(sdl).map_err(|e| SchemaError::Parse(e.to_string()))?;

        let mut query_type = None;
        let mut mutation_type = None;
        let mut defined: HashSet<String> = HashSet::new();
        let mut types: HashMap<String, TypeDef> = HashMap::new();
        let mut extensions: Vec<TypeDef> = Vec::new();

        for definition in document.definitions {
            match definition {
                TypeSystemDefinition::Schema(schema_def) => {
                    let schema_def = schema_def.node;
                    if let Some(name) = schema_def.query {
                        query_type = Some(name.node.to_string());
                    }
                    if let Some(name) = schema_def.mutation {
                        mutation_type = Some(name.node.to_string());
                    }
                }
                TypeSystemDefinition::Type(type_def) => {
                    let type_def = type_def.node;
                    let name = type_def.name.node.to_string();
                    let converted = convert_type(&name, &type_def.kind);
                    if type_def.extend {
                        extensions.push(converted);
                    } else if !defined.insert(name.clone()) {
                        return Err(SchemaError::DuplicateType(name));
                    } else {
                        types.insert(name, converted);
                    }
                }
                TypeSystemDefinition::Directive(_) => {}
            }
        }

        for extension in extensions {
            match types.get_mut(&extension.name) {
                Some(base) => base.fields.extend(extension.fields),
                None => {
                    types.insert(extension.name.clone(), extension);
                }
            }
        }

        let query_type = query_type.unwrap_or_else(|| "Query".to_string());
        if !types.contains_key(&query_type) {
            return Err(SchemaError::MissingQueryType(query_type));
        }
        let mutation_type =
            mutation_type.or_else(|| types.contains_key("Mutation").then(|| "Mutation".into()));

        let mut schema = Schema::new(query_type);
        schema.mutation_type = mutation_type;
        for (_, def) in types {
            schema.insert_type(def);
        }
        schema.check_references()?;

        tracing::debug!(
            query = %schema.query_type(),
            mutation = ?schema.mutation_type(),
            "Loaded schema"
        );
        Ok(schema)
    }

    fn check_references(&self) -> Result<(), SchemaError> {
        for def in self.types.values() {
            for field in &def.fields {
                if field.name.starts_with("__") {
                    continue;
                }
                let referenced = std::iter::once(&field.ty).chain(field.arguments.iter().map(|a| &a.ty));
                for ty in referenced {
                    if !self.is_known(&ty.name) {
                        return Err(SchemaError::UnknownTypeReference {
                            owner: def.name.clone(),
                            field: field.name.clone(),
                            type_name: ty.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

fn convert_type(name: &str, kind: &SdlKind) -> TypeDef {
    match kind {
        SdlKind::Scalar => TypeDef::new(name, TypeKind::Scalar),
        SdlKind::Enum(_) => TypeDef::new(name, TypeKind::Enum),
        SdlKind::Union(_) => TypeDef::new(name, TypeKind::Union),
        SdlKind::Object(object) => TypeDef {
            name: name.to_string(),
            kind: TypeKind::Object,
            fields: object.fields.iter().map(|f| convert_field(&f.node)).collect(),
        },
        SdlKind::Interface(interface) => TypeDef {
            name: name.to_string(),
            kind: TypeKind::Interface,
            fields: interface.fields.iter().map(|f| convert_field(&f.node)).collect(),
        },
        SdlKind::InputObject(input) => TypeDef {
            name: name.to_string(),
            kind: TypeKind::InputObject,
            fields: input
                .fields
                .iter()
                .map(|f| FieldDef::new(f.node.name.node.to_string(), type_ref(&f.node.ty.node)))
                .collect(),
        },
    }
}

fn convert_field(field: &FieldDefinition) -> FieldDef {
    FieldDef {
        name: field.name.node.to_string(),
        ty: type_ref(&field.ty.node),
        arguments: field
            .arguments
            .iter()
            .map(|arg| convert_argument(&arg.node))
            .collect(),
    }
}

fn convert_argument(arg: &InputValueDefinition) -> ArgumentDef {
    ArgumentDef {
        name: arg.name.node.to_string(),
        ty: type_ref(&arg.ty.node),
        default_value: arg.default_value.as_ref().map(|v| default_literal(&v.node)),
    }
}

fn type_ref(ty: &Type) -> TypeRef {
    let mut named = match &ty.base {
        BaseType::Named(name) => TypeRef::named(name.to_string()),
        BaseType::List(inner) => type_ref(inner).list(),
    };
    named.non_null = !ty.nullable;
    named
}

/// Raw text of a default value; strings lose their quotes.
fn default_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
