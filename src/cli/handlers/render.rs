use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::error::GatewayError;
use crate::query::render;
use crate::routes::{RouteDescriptor, RouteMap, path_segment_names};
use crate::server::bind_query;

use super::CommandContext;

pub fn handle_render(
    ctx: &CommandContext,
    path: &str,
    vars: Vec<(String, String)>,
    json: bool,
) -> Result<()> {
    let (route, mut path_params) = match_route(&ctx.routes, path)
        .ok_or_else(|| GatewayError::RouteNotFound(path.to_string()))?;

    // With a template path, `--var id=42` fills the `:id` segment.
    let mut query = Vec::new();
    for (name, value) in vars {
        let is_segment = path_segment_names(&route.path).any(|segment| segment == name);
        if is_segment && !path_params.iter().any(|(bound, _)| *bound == name) {
            path_params.push((name, value));
        } else {
            query.push((name, value));
        }
    }

    let variables = bind_query(route, &path_params, &query).map_err(GatewayError::from)?;
    let rendered = render(route, &variables);

    if json {
        let output = json!({
            "query": rendered.query,
            "operationName": rendered.operation_name,
            "variables": variables,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", rendered.query);
        if !variables.is_empty() {
            println!(
                "\n{} {}",
                "Variables:".dimmed(),
                serde_json::to_string(&variables)?
            );
        }
    }
    Ok(())
}

/// Find the route for a template or a concrete path.
///
/// A concrete path yields its captured segment values.
fn match_route<'a>(
    routes: &'a RouteMap,
    path: &str,
) -> Option<(&'a RouteDescriptor, Vec<(String, String)>)> {
    if let Some(route) = routes.get(path) {
        return Some((route, Vec::new()));
    }

    let segments: Vec<&str> = path.split('/').collect();
    routes.iter().find_map(|route| {
        let template: Vec<&str> = route.path.split('/').collect();
        if template.len() != segments.len() {
            return None;
        }
        let mut captures = Vec::new();
        for (expected, actual) in template.iter().zip(&segments) {
            match expected.strip_prefix(':') {
                Some(name) if !actual.is_empty() => {
                    captures.push((name.to_string(), actual.to_string()))
                }
                Some(_) => return None,
                None if expected == actual => {}
                None => return None,
            }
        }
        Some((route, captures))
    })
}
