use heck::ToSnakeCase;

use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::flatten::flatten_input;
use super::signature::argument_signature;
use super::types::{FieldPathDetail, RouteDescriptor, path_segment_names};
use crate::error::SynthesisError;
use crate::schema::{FieldDef, Schema};

/// Deepest ancestor chain a route may be synthesized under.
pub const MAX_PATH_DEPTH: usize = 3;

/// Prefix of root fields reserved for introspection.
pub const INTROSPECTION_PREFIX: &str = "__";

#[derive(Debug, Clone)]
pub struct SynthesisOptions {
    pub max_depth: usize,
    pub introspection_prefix: String,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_PATH_DEPTH,
            introspection_prefix: INTROSPECTION_PREFIX.to_string(),
        }
    }
}

/// Synthesize the routes reachable through `field_name` on `parent_type`.
///
/// The route for the field itself (if it gets one) comes first, followed by
/// the routes of its descendants in discovery order. A field gets its own
/// route only when it is a root query field or takes arguments.
pub fn synthesize(
    field_name: &str,
    parent_path: &str,
    parent_type: &str,
    ancestors: &[FieldPathDetail],
    schema: &Schema,
    options: &SynthesisOptions,
    diagnostics: &mut Diagnostics,
) -> Result<Vec<RouteDescriptor>, SynthesisError> {
    if ancestors.len() > options.max_depth {
        diagnostics.report(
            DiagnosticKind::DepthExceeded,
            format!("{}/{}", parent_path, field_name),
            format!("Max depth exceeded: {}/{}", parent_path, field_name),
        );
        return Ok(Vec::new());
    }

    // Name-only: any ancestor with the same field name ends the branch.
    if ancestors.iter().any(|a| a.path == field_name) {
        diagnostics.report(
            DiagnosticKind::CycleDetected,
            field_name,
            format!("Detected loop ({}) under {}, returning", field_name, parent_path),
        );
        return Ok(Vec::new());
    }

    let field = schema
        .field(parent_type, field_name)
        .ok_or_else(|| SynthesisError::FieldNotFound {
            type_name: parent_type.to_string(),
            field: field_name.to_string(),
        })?;

    let mut path = format!("{}/{}", parent_path, field_name.to_snake_case());
    let is_root = parent_type == schema.query_type();

    let mut route = (is_root || !field.arguments.is_empty())
        .then(|| RouteDescriptor::new(field_name, path.clone(), ancestors.to_vec()));

    let mut id_in_path = false;
    if let Some(route) = route.as_mut() {
        for argument in &field.arguments {
            tracing::trace!(
                field = %field_name,
                argument = %argument.name,
                type_name = %argument.ty.name,
                "Binding argument"
            );

            if is_path_id(argument.name.as_str(), &argument.ty) {
                id_in_path = true;
                path = format!("{}/:{}", path, id_segment(parent_path, field_name));
                route.id_in_path = true;
                route.path = path.clone();
            } else if schema.is_leaf(&argument.ty.name) {
                route
                    .query_params
                    .insert(argument.name.clone(), argument_signature(argument, diagnostics));
            } else {
                let flattened =
                    flatten_input(&argument.name, &argument.ty.name, schema, diagnostics);
                route.query_params.extend(flattened);
            }
        }
        route.assign_variables(diagnostics);
    }

    let mut descendants = Vec::new();

    if !schema.is_leaf(&field.ty.name) {
        let return_type = schema
            .type_def(&field.ty.name)
            .ok_or_else(|| SynthesisError::TypeNotFound(field.ty.name.clone()))?;

        let mut chain = ancestors.to_vec();
        chain.push(FieldPathDetail::new(field_name, id_in_path));

        // Argumented children get their own route only when this field's
        // arguments are fully encoded in the path.
        let passes_through =
            field.arguments.is_empty() || (id_in_path && field.arguments.len() == 1);

        for child in &return_type.fields {
            if !child.arguments.is_empty() && passes_through {
                descendants.extend(descend(child, &path, field, &chain, schema, options, diagnostics));
            } else if schema.is_leaf(&child.ty.name) {
                if let Some(route) = route.as_mut() {
                    route.result_selections.push(child.name.clone());
                }
            } else {
                descendants.extend(descend(child, &path, field, &chain, schema, options, diagnostics));
            }
        }
    }

    let mut routes: Vec<RouteDescriptor> = route.into_iter().collect();
    routes.extend(descendants);
    Ok(routes)
}

fn descend(
    child: &FieldDef,
    path: &str,
    parent: &FieldDef,
    chain: &[FieldPathDetail],
    schema: &Schema,
    options: &SynthesisOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<RouteDescriptor> {
    match synthesize(&child.name, path, &parent.ty.name, chain, schema, options, diagnostics) {
        Ok(routes) => routes,
        Err(e) => {
            diagnostics.report(DiagnosticKind::FieldFailed, &child.name, e.to_string());
            Vec::new()
        }
    }
}

fn is_path_id(name: &str, ty: &crate::schema::TypeRef) -> bool {
    name == "id" && ty.name == "ID" && !ty.list
}

/// Name of the id segment for `field_name`. The first id on a path is `:id`;
/// deeper ones are qualified by their field so segment names stay unique.
fn id_segment(parent_path: &str, field_name: &str) -> String {
    if path_segment_names(parent_path).any(|name| name == "id") {
        format!("{}_id", field_name.to_snake_case())
    } else {
        "id".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::DefaultValue;

    fn routes_for(sdl: &str, field: &str) -> (Vec<RouteDescriptor>, Diagnostics) {
        let schema = Schema::from_sdl(sdl).unwrap();
        let mut diagnostics = Diagnostics::new();
        let routes = synthesize(
            field,
            "",
            schema.query_type(),
            &[],
            &schema,
            &SynthesisOptions::default(),
            &mut diagnostics,
        )
        .unwrap();
        (routes, diagnostics)
    }

    const PRODUCT_SDL: &str = r#"
        type Query {
          product(id: ID!): Product
        }

        type Product {
          name: String
          price: Float
          reviews(limit: Int): [Review]
        }

        type Review {
          body: String
          rating: Int
        }
    "#;

    #[test]
    fn test_product_scenario() {
        let (routes, _) = routes_for(PRODUCT_SDL, "product");
        assert_eq!(routes.len(), 2);

        let product = &routes[0];
        assert_eq!(product.path, "/product/:id");
        assert!(product.id_in_path);
        assert!(product.query_params.is_empty());
        assert_eq!(product.result_selections, vec!["name", "price"]);
        assert!(product.field_path.is_empty());

        let reviews = &routes[1];
        assert_eq!(reviews.path, "/product/:id/reviews");
        assert!(!reviews.id_in_path);
        assert_eq!(reviews.original_field, "reviews");
        assert_eq!(reviews.query_params.len(), 1);
        assert_eq!(reviews.query_params["limit"].type_name, "Int");
        assert!(!reviews.query_params["limit"].required);
        assert_eq!(reviews.field_path, vec![FieldPathDetail::new("product", true)]);
        assert_eq!(reviews.result_selections, vec!["body", "rating"]);
    }

    #[test]
    fn test_id_in_path_at_root() {
        let (routes, _) = routes_for(
            "type Query { user(id: ID!): User }\ntype User { name: String }",
            "user",
        );
        assert_eq!(routes[0].path, "/user/:id");
        assert!(routes[0].id_in_path);
        assert!(!routes[0].query_params.contains_key("id"));
    }

    #[test]
    fn test_non_id_arguments_go_to_query_string() {
        let (routes, _) = routes_for(
            r#"
            type Query { search(term: String!, first: Int = 20, id: String): [Hit] }
            type Hit { title: String }
            "#,
            "search",
        );
        let route = &routes[0];
        assert_eq!(route.path, "/search");
        assert!(!route.id_in_path);
        assert!(route.query_params["term"].required);
        assert_eq!(route.query_params["first"].default, Some(DefaultValue::Int(20)));
        assert_eq!(route.query_params["id"].type_name, "String");
    }

    #[test]
    fn test_flattened_argument() {
        let (routes, _) = routes_for(
            r#"
            type Query { people(filter: Filter): [Person] }
            input Filter { name: String, age: Int }
            type Person { name: String }
            "#,
            "people",
        );
        let params = &routes[0].query_params;
        assert_eq!(params["filter.name"].type_name, "String");
        assert_eq!(params["filter.age"].type_name, "Int");
        assert!(!params.contains_key("filter"));
    }

    #[test]
    fn test_snake_case_paths() {
        let (routes, _) = routes_for(
            "type Query { topProducts(first: Int): [Product] }\ntype Product { upc: String }",
            "topProducts",
        );
        assert_eq!(routes[0].path, "/top_products");
        assert_eq!(routes[0].original_field, "topProducts");
    }

    #[test]
    fn test_scalar_root_field_is_terminal() {
        let (routes, _) = routes_for("type Query { version: String }", "version");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/version");
        assert!(routes[0].result_selections.is_empty());
    }

    #[test]
    fn test_argumentless_composite_is_traversed_without_route() {
        let (routes, _) = routes_for(
            r#"
            type Query { viewer: Viewer }
            type Viewer { login: String, settings: Settings }
            type Settings { theme: String, notifications(kind: String): [String] }
            "#,
            "viewer",
        );
        let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/viewer", "/viewer/settings/notifications"]);
        assert_eq!(routes[0].result_selections, vec!["login"]);
        assert_eq!(
            routes[1].field_path,
            vec![
                FieldPathDetail::new("viewer", false),
                FieldPathDetail::new("settings", false)
            ]
        );
    }

    #[test]
    fn test_children_of_argumented_field_stay_nested() {
        // `products` takes a non-id argument, so `reviews` is searched as a
        // plain composite and still becomes its own route.
        let (routes, _) = routes_for(
            r#"
            type Query { products(first: Int): [Product] }
            type Product { name: String, reviews(limit: Int): [Review] }
            type Review { body: String }
            "#,
            "products",
        );
        let paths: Vec<_> = routes.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/products", "/products/reviews"]);
        assert_eq!(routes[1].field_path, vec![FieldPathDetail::new("products", false)]);
    }

    #[test]
    fn test_nested_id_segment_is_unique() {
        let (routes, _) = routes_for(
            r#"
            type Query { shop(id: ID!): Shop }
            type Shop { name: String, order(id: ID!): Order }
            type Order { total: Float }
            "#,
            "shop",
        );
        assert_eq!(routes[1].path, "/shop/:id/order/:order_id");
        assert!(routes[1].id_in_path);
        assert_eq!(routes[1].field_path, vec![FieldPathDetail::new("shop", true)]);
    }

    #[test]
    fn test_cycle_is_cut() {
        let (routes, diagnostics) = routes_for(
            r#"
            type Query { user(id: ID!): User }
            type User { name: String, user(id: ID!): User }
            "#,
            "user",
        );
        assert_eq!(routes.len(), 1);
        assert!(diagnostics.has(DiagnosticKind::CycleDetected));
    }

    #[test]
    fn test_depth_is_bounded() {
        let (routes, diagnostics) = routes_for(
            r#"
            type Query { node: Node }
            type Node { value: String, child: Node, link: Node, items(first: Int): [Node] }
            "#,
            "node",
        );
        assert!(routes.iter().all(|r| r.field_path.len() <= MAX_PATH_DEPTH));
        assert!(routes.iter().any(|r| r.original_field == "items"));
        assert!(diagnostics.has(DiagnosticKind::DepthExceeded));
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let schema = Schema::from_sdl("type Query { a: String }").unwrap();
        let mut diagnostics = Diagnostics::new();
        let err = synthesize(
            "missing",
            "",
            "Query",
            &[],
            &schema,
            &SynthesisOptions::default(),
            &mut diagnostics,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SynthesisError::FieldNotFound {
                type_name: "Query".to_string(),
                field: "missing".to_string()
            }
        );
    }

    #[test]
    fn test_synthesis_is_deterministic() {
        let first = routes_for(PRODUCT_SDL, "product").0;
        for _ in 0..5 {
            assert_eq!(routes_for(PRODUCT_SDL, "product").0, first);
        }
    }
}
