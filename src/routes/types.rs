use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use super::diagnostics::{DiagnosticKind, Diagnostics};

/// A parsed default value of a route parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::String(s) => write!(f, "{}", s),
            DefaultValue::Int(i) => write!(f, "{}", i),
            DefaultValue::Float(x) => write!(f, "{}", x),
            DefaultValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Normalized description of one route parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSignature {
    /// Named GraphQL type, without list or non-null wrapping.
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    pub required: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub list: bool,
}

impl TypeSignature {
    /// Type used when declaring the parameter as a GraphQL variable.
    pub fn graphql_type(&self) -> String {
        let mut ty = if self.list {
            format!("[{}]", self.type_name)
        } else {
            self.type_name.clone()
        };
        if self.required {
            ty.push('!');
        }
        ty
    }
}

/// One ancestor hop between the root operation and a route's field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPathDetail {
    pub path: String,
    pub id_in_path: bool,
}

impl FieldPathDetail {
    pub fn new(path: impl Into<String>, id_in_path: bool) -> Self {
        Self {
            path: path.into(),
            id_in_path,
        }
    }

    /// Variable carrying this ancestor's id, e.g. `productID`.
    pub fn id_variable(&self) -> String {
        format!("{}ID", self.path)
    }
}

/// A REST route and the GraphQL field it queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// Path template, id segments written as `:name`.
    pub path: String,
    pub id_in_path: bool,
    pub query_params: BTreeMap<String, TypeSignature>,
    pub original_field: String,
    pub result_selections: Vec<String>,
    pub field_path: Vec<FieldPathDetail>,
    /// GraphQL variable of each query parameter, unique within the route.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub variables: BTreeMap<String, String>,
}

impl RouteDescriptor {
    pub fn new(
        original_field: impl Into<String>,
        path: impl Into<String>,
        field_path: Vec<FieldPathDetail>,
    ) -> Self {
        Self {
            path: path.into(),
            id_in_path: false,
            query_params: BTreeMap::new(),
            original_field: original_field.into(),
            result_selections: Vec::new(),
            field_path,
            variables: BTreeMap::new(),
        }
    }

    /// Variable bound to query parameter `param`.
    pub fn variable_for(&self, param: &str) -> String {
        self.variables
            .get(param)
            .cloned()
            .unwrap_or_else(|| variable_name(param))
    }

    /// Give every query parameter a variable name distinct from the path
    /// variables and from each other.
    ///
    /// Plain arguments keep their own name when free. A flattened
    /// `filter.name` that clashes with a sibling `filter_name` argument (or
    /// any other taken name) gets a numeric suffix, which is reported.
    pub fn assign_variables(&mut self, diagnostics: &mut Diagnostics) {
        let mut taken: BTreeSet<String> = self
            .path_params()
            .into_iter()
            .map(|param| param.variable)
            .collect();
        self.variables.clear();

        let (plain, flattened): (Vec<&String>, Vec<&String>) =
            self.query_params.keys().partition(|name| !name.contains('.'));

        for name in plain.into_iter().chain(flattened) {
            let base = variable_name(name);
            let mut candidate = base.clone();
            let mut suffix = 2;
            while taken.contains(&candidate) {
                candidate = format!("{}_{}", base, suffix);
                suffix += 1;
            }
            if candidate != base {
                diagnostics.report(
                    DiagnosticKind::VariableRenamed,
                    name.as_str(),
                    format!(
                        "Variable ${} is taken on {}, {} binds ${}",
                        base, self.path, name, candidate
                    ),
                );
            }
            taken.insert(candidate.clone());
            self.variables.insert(name.clone(), candidate);
        }
    }

    /// Path parameters in order, each paired with the variable it binds.
    ///
    /// Ancestor ids bind `<ancestor>ID`; the route's own id binds `id`.
    pub fn path_params(&self) -> Vec<PathParam> {
        let mut variables: Vec<String> = self
            .field_path
            .iter()
            .filter(|a| a.id_in_path)
            .map(FieldPathDetail::id_variable)
            .collect();
        if self.id_in_path {
            variables.push("id".to_string());
        }

        path_segment_names(&self.path)
            .zip(variables)
            .map(|(segment, variable)| PathParam {
                segment: segment.to_string(),
                variable,
            })
            .collect()
    }

    /// The path in axum's `{name}` capture syntax.
    pub fn axum_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => format!("{{{}}}", name),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// A path segment and the GraphQL variable it is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    pub segment: String,
    pub variable: String,
}

/// Names of the `:name` segments of a path template.
pub fn path_segment_names(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter_map(|segment| segment.strip_prefix(':'))
}

/// Convert an axum template (`/user/{id}`) back to route syntax (`/user/:id`).
pub fn from_axum_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            match segment
                .strip_prefix('{')
                .and_then(|rest| rest.strip_suffix('}'))
            {
                Some(name) => format!(":{}", name),
                None => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Default GraphQL variable name for a parameter. Flattened `input.field`
/// names become `input_field`.
pub fn variable_name(param: &str) -> String {
    param.replace('.', "_")
}
