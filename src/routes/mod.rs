//! Route synthesis: from a schema's type graph to a table of REST routes.
//!
//! Every root query field is walked recursively. A field becomes a route when
//! it is a root field or takes arguments; an `id: ID` argument moves into the
//! path, other scalar arguments become query parameters and input objects are
//! flattened into `input.field` parameters.
//!
//! ## Components
//!
//! - [`type_signature`]: parameter signature with a typed default
//! - [`flatten_input`]: one-level input object flattening
//! - [`synthesize`]: the recursive walk for one field
//! - [`build_route_map`]: the walk over every root field
//! - [`Diagnostics`]: non-fatal anomalies reported along the way

mod diagnostics;
mod flatten;
mod map;
mod signature;
mod synth;
mod types;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use flatten::flatten_input;
pub use map::{RouteMap, build_route_map};
pub use signature::{argument_signature, type_signature};
pub use synth::{INTROSPECTION_PREFIX, MAX_PATH_DEPTH, SynthesisOptions, synthesize};
pub use types::{
    DefaultValue, FieldPathDetail, PathParam, RouteDescriptor, TypeSignature, from_axum_path,
    path_segment_names, variable_name,
};
