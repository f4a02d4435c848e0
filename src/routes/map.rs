use std::collections::BTreeMap;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::synth::{SynthesisOptions, synthesize};
use super::types::RouteDescriptor;
use crate::schema::Schema;

/// Every synthesized route keyed by its path template.
#[derive(Debug, Clone, Default)]
pub struct RouteMap {
    routes: BTreeMap<String, RouteDescriptor>,
    diagnostics: Diagnostics,
}

impl RouteMap {
    pub fn get(&self, path: &str) -> Option<&RouteDescriptor> {
        self.routes.get(path)
    }

    /// Routes ordered by path.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Anomalies reported while the map was built.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Insert a route, replacing (and reporting) any route with the same path.
    pub fn insert(&mut self, route: RouteDescriptor) -> Option<RouteDescriptor> {
        let path = route.path.clone();
        let replaced = self.routes.insert(path.clone(), route);
        if let Some(previous) = &replaced {
            self.diagnostics.report(
                DiagnosticKind::PathCollision,
                path.as_str(),
                format!(
                    "Route {} for {} replaced by {}",
                    path, previous.original_field, self.routes[&path].original_field
                ),
            );
        }
        replaced
    }
}

/// Build the route table for every root query field of `schema`.
///
/// Introspection fields are skipped. A root field that fails to synthesize is
/// reported and left out; the other fields are unaffected.
pub fn build_route_map(schema: &Schema, options: &SynthesisOptions) -> RouteMap {
    let mut map = RouteMap::default();
    let root = schema.query_type();

    for field in schema.query_fields() {
        if field.name.starts_with(&options.introspection_prefix) {
            continue;
        }

        let routes = match synthesize(
            &field.name,
            "",
            root,
            &[],
            schema,
            options,
            &mut map.diagnostics,
        ) {
            Ok(routes) => routes,
            Err(e) => {
                map.diagnostics
                    .report(DiagnosticKind::FieldFailed, field.name.as_str(), e.to_string());
                continue;
            }
        };

        for route in routes {
            tracing::info!(
                path = %route.path,
                field = %route.original_field,
                depth = route.field_path.len(),
                "GET {}",
                route.path
            );
            for (name, sig) in &route.query_params {
                tracing::debug!(path = %route.path, "  {}={}", name, sig.graphql_type());
            }
            map.insert(route);
        }
    }

    tracing::info!(routes = map.len(), diagnostics = map.diagnostics.len(), "Route map built");
    map
}
