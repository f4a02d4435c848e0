//! Rebuild the GraphQL operation behind a route.
//!
//! The document nests one selection per ancestor in the route's field path,
//! then queries the route's field with its arguments and flat selection set:
//!
//! ```graphql
//! query Reviews($productID: ID!, $limit: Int) {
//!     product(id: $productID) {
//!         reviews(limit: $limit) {
//!             body
//!         }
//!     }
//! }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

use crate::routes::RouteDescriptor;

const INDENT: &str = "    ";

/// Variables bound for one request.
pub type Variables = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedQuery {
    pub query: String,
    pub operation_name: String,
}

/// Render the query document for `route`.
///
/// Path ids are always declared and passed. Query parameters are declared and
/// passed only when `variables` is non-empty. Output depends only on the
/// route and on whether `variables` is empty.
pub fn render(route: &RouteDescriptor, variables: &Variables) -> RenderedQuery {
    let operation_name = title_case(&route.original_field);
    let with_params = !variables.is_empty();

    let mut query = String::new();
    let declarations = declarations(route, with_params);
    if declarations.is_empty() {
        query.push_str(&format!("query {} {{\n", operation_name));
    } else {
        query.push_str(&format!(
            "query {}({}) {{\n",
            operation_name,
            declarations.join(", ")
        ));
    }

    let mut depth = 1;
    for ancestor in &route.field_path {
        query.push_str(&INDENT.repeat(depth));
        query.push_str(&ancestor.path);
        if ancestor.id_in_path {
            query.push_str(&format!("(id: ${})", ancestor.id_variable()));
        }
        query.push_str(" {\n");
        depth += 1;
    }

    query.push_str(&INDENT.repeat(depth));
    query.push_str(&route.original_field);
    let arguments = arguments(route, with_params);
    if !arguments.is_empty() {
        query.push_str(&format!("({})", arguments.join(", ")));
    }

    if route.result_selections.is_empty() {
        query.push('\n');
    } else {
        query.push_str(" {\n");
        for selection in &route.result_selections {
            query.push_str(&INDENT.repeat(depth + 1));
            query.push_str(selection);
            query.push('\n');
        }
        query.push_str(&INDENT.repeat(depth));
        query.push_str("}\n");
    }

    for level in (1..depth).rev() {
        query.push_str(&INDENT.repeat(level));
        query.push_str("}\n");
    }
    query.push_str("}\n");

    RenderedQuery {
        query,
        operation_name,
    }
}

fn declarations(route: &RouteDescriptor, with_params: bool) -> Vec<String> {
    let mut declarations: Vec<String> = route
        .field_path
        .iter()
        .filter(|a| a.id_in_path)
        .map(|a| format!("${}: ID!", a.id_variable()))
        .collect();

    if route.id_in_path {
        declarations.push("$id: ID!".to_string());
    }

    if with_params {
        declarations.extend(
            route
                .query_params
                .iter()
                .map(|(name, sig)| format!("${}: {}", route.variable_for(name), sig.graphql_type())),
        );
    }
    declarations
}

/// Field arguments. Flattened `input.field` parameters are regrouped into one
/// input object literal per argument.
fn arguments(route: &RouteDescriptor, with_params: bool) -> Vec<String> {
    let mut arguments = Vec::new();
    if route.id_in_path {
        arguments.push("id: $id".to_string());
    }
    if !with_params {
        return arguments;
    }

    let mut inputs: Vec<(&str, Vec<String>)> = Vec::new();
    for name in route.query_params.keys() {
        match name.split_once('.') {
            None => arguments.push(format!("{}: ${}", name, route.variable_for(name))),
            Some((input, field)) => {
                let entry = format!("{}: ${}", field, route.variable_for(name));
                match inputs.iter_mut().find(|(n, _)| *n == input) {
                    Some((_, fields)) => fields.push(entry),
                    None => inputs.push((input, vec![entry])),
                }
            }
        }
    }
    arguments.extend(
        inputs
            .into_iter()
            .map(|(input, fields)| format!("{}: {{{}}}", input, fields.join(", "))),
    );
    arguments
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{SynthesisOptions, build_route_map};
    use crate::schema::Schema;
    use serde_json::json;

    const SDL: &str = r#"
        type Query {
          product(id: ID!): Product
          products(first: Int = 10, filter: ProductFilter): [Product]
          version: String
          shop(id: ID!): Shop
        }

        type Product {
          name: String
          price: Float
          reviews(limit: Int): [Review]
        }

        type Review { body: String }

        type Shop { order(id: ID!): Order }
        type Order { total: Float }

        input ProductFilter { name: String, maxPrice: Float! }
    "#;

    fn route(path: &str) -> RouteDescriptor {
        let schema = Schema::from_sdl(SDL).unwrap();
        build_route_map(&schema, &SynthesisOptions::default())
            .get(path)
            .unwrap()
            .clone()
    }

    fn vars(value: Value) -> Variables {
        value.as_object().unwrap().clone()
    }

    fn assert_balanced(query: &str) {
        let opens = query.matches('{').count();
        let closes = query.matches('}').count();
        assert_eq!(opens, closes, "unbalanced braces in:\n{}", query);
        assert_eq!(query.matches("query ").count(), 1);
    }

    #[test]
    fn test_render_nested_reviews() {
        let rendered = render(&route("/product/:id/reviews"), &vars(json!({"limit": 5})));
        assert_eq!(rendered.operation_name, "Reviews");
        assert_eq!(
            rendered.query,
            "query Reviews($productID: ID!, $limit: Int) {\n\
             \x20   product(id: $productID) {\n\
             \x20       reviews(limit: $limit) {\n\
             \x20           body\n\
             \x20       }\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn test_render_root_id_route() {
        let rendered = render(&route("/product/:id"), &vars(json!({"id": "42"})));
        assert_eq!(rendered.operation_name, "Product");
        assert_eq!(
            rendered.query,
            "query Product($id: ID!) {\n\
             \x20   product(id: $id) {\n\
             \x20       name\n\
             \x20       price\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn test_render_without_variables() {
        let rendered = render(&route("/products"), &Variables::new());
        assert_eq!(
            rendered.query,
            "query Products {\n\
             \x20   products {\n\
             \x20       name\n\
             \x20       price\n\
             \x20   }\n\
             }\n"
        );
    }

    #[test]
    fn test_render_scalar_leaf() {
        let rendered = render(&route("/version"), &Variables::new());
        assert_eq!(rendered.query, "query Version {\n    version\n}\n");
    }

    #[test]
    fn test_render_flattened_input() {
        let rendered = render(
            &route("/products"),
            &vars(json!({"filter_maxPrice": 9.5, "first": 3})),
        );
        assert!(rendered.query.starts_with(
            "query Products($filter_maxPrice: Float!, $filter_name: String, $first: Int) {"
        ));
        assert!(rendered.query.contains(
            "products(first: $first, filter: {maxPrice: $filter_maxPrice, name: $filter_name})"
        ));
        assert_balanced(&rendered.query);
    }

    #[test]
    fn test_render_nested_own_id() {
        let rendered = render(&route("/shop/:id/order/:order_id"), &vars(json!({"id": "1", "shopID": "2"})));
        assert!(rendered.query.starts_with("query Order($shopID: ID!, $id: ID!) {"));
        assert!(rendered.query.contains("shop(id: $shopID) {"));
        assert!(rendered.query.contains("order(id: $id) {"));
        assert_balanced(&rendered.query);
    }

    #[test]
    fn test_render_flattened_name_clashing_with_argument() {
        let schema = Schema::from_sdl(
            r#"
            type Query { search(term: String, filter_name: String, filter: F): [String] }
            input F { name: String }
            "#,
        )
        .unwrap();
        let map = build_route_map(&schema, &SynthesisOptions::default());
        let route = map.get("/search").unwrap();

        let rendered = render(route, &vars(json!({"term": "x"})));
        assert!(rendered.query.starts_with(
            "query Search($filter_name_2: String, $filter_name: String, $term: String) {"
        ));
        assert!(rendered.query.contains(
            "search(filter_name: $filter_name, term: $term, filter: {name: $filter_name_2})"
        ));
        assert_eq!(rendered.query.matches("$filter_name:").count(), 1);
        assert!(map.diagnostics().has(crate::routes::DiagnosticKind::VariableRenamed));
    }

    #[test]
    fn test_every_route_renders_balanced() {
        let schema = Schema::from_sdl(SDL).unwrap();
        let map = build_route_map(&schema, &SynthesisOptions::default());
        for route in map.iter() {
            assert_balanced(&render(route, &Variables::new()).query);
            assert_balanced(&render(route, &vars(json!({"x": 1}))).query);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let route = route("/products");
        let variables = vars(json!({"first": 1}));
        let first = render(&route, &variables);
        for _ in 0..5 {
            assert_eq!(render(&route, &variables), first);
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("topProducts"), "TopProducts");
        assert_eq!(title_case(""), "");
    }
}
