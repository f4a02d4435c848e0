//! In-memory schema model the route synthesizer walks.
//!
//! The model is a name-indexed set of [`TypeDef`]s plus the names of the root
//! operation types. It is built once (usually from SDL through
//! [`Schema::from_sdl`]) and then only read.
//!
//! ## Components
//!
//! - [`Schema`]: the type graph and its root types
//! - [`TypeDef`], [`FieldDef`], [`ArgumentDef`]: definitions in declaration order
//! - [`TypeRef`]: a reference to a named type with list/non-null wrapping
//! - [`SchemaSource`]: a local SDL file or a supergraph from Apollo Studio
//! - [`uplink`]: fetches a supergraph SDL from Apollo Studio

mod sdl;
mod source;
pub mod uplink;

pub use source::SchemaSource;

use std::collections::HashMap;

/// Scalars every GraphQL schema knows without declaring them.
pub const BUILTIN_SCALARS: &[&str] = &["ID", "String", "Int", "Float", "Boolean"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Enum,
    Object,
    Interface,
    Union,
    InputObject,
}

impl TypeKind {
    /// Leaf kinds have no selectable fields.
    pub fn is_leaf(self) -> bool {
        matches!(self, TypeKind::Scalar | TypeKind::Enum)
    }
}

/// Reference to a named type, e.g. `[Review!]!` is `Review` with `list` and
/// `non_null` set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub non_null: bool,
    pub list: bool,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            non_null: false,
            list: false,
        }
    }

    pub fn non_null(mut self) -> Self {
        self.non_null = true;
        self
    }

    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDef {
    pub name: String,
    pub ty: TypeRef,
    /// Raw default literal. String defaults are stored unquoted.
    pub default_value: Option<String>,
}

impl ArgumentDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            default_value: None,
        }
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default_value = Some(literal.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub arguments: Vec<ArgumentDef>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: ArgumentDef) -> Self {
        self.arguments.push(argument);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    /// Output fields, or input fields for input objects.
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            fields: Vec::new(),
        }
    }

    pub fn object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Object)
    }

    pub fn input_object(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::InputObject)
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    types: HashMap<String, TypeDef>,
    query_type: String,
    mutation_type: Option<String>,
}

impl Schema {
    /// Create an empty schema whose root query type is `query_type`.
    pub fn new(query_type: impl Into<String>) -> Self {
        Self {
            types: HashMap::new(),
            query_type: query_type.into(),
            mutation_type: None,
        }
    }

    pub fn with_type(mut self, def: TypeDef) -> Self {
        self.insert_type(def);
        self
    }

    pub fn with_mutation_type(mut self, name: impl Into<String>) -> Self {
        self.mutation_type = Some(name.into());
        self
    }

    pub(crate) fn insert_type(&mut self, def: TypeDef) {
        self.types.insert(def.name.clone(), def);
    }

    pub fn query_type(&self) -> &str {
        &self.query_type
    }

    pub fn mutation_type(&self) -> Option<&str> {
        self.mutation_type.as_deref()
    }

    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Look up `field` on `type_name`.
    pub fn field(&self, type_name: &str, field: &str) -> Option<&FieldDef> {
        self.type_def(type_name).and_then(|def| def.field(field))
    }

    /// Fields of the root query type in declaration order.
    pub fn query_fields(&self) -> &[FieldDef] {
        self.type_def(&self.query_type)
            .map(|def| def.fields.as_slice())
            .unwrap_or_default()
    }

    /// Fields of the root mutation type, empty when the schema has none.
    pub fn mutation_fields(&self) -> &[FieldDef] {
        self.mutation_type
            .as_deref()
            .and_then(|name| self.type_def(name))
            .map(|def| def.fields.as_slice())
            .unwrap_or_default()
    }

    /// Whether `name` is a built-in scalar, a declared scalar or an enum.
    pub fn is_leaf(&self, name: &str) -> bool {
        BUILTIN_SCALARS.contains(&name)
            || self.type_def(name).is_some_and(|def| def.kind.is_leaf())
    }

    /// Whether `name` resolves to a built-in or declared type.
    pub fn is_known(&self, name: &str) -> bool {
        BUILTIN_SCALARS.contains(&name) || self.types.contains_key(name)
    }
}
