use anyhow::Result;
use colored::Colorize;
use serde_json::json;

use crate::routes::{RouteDescriptor, RouteMap};

use super::CommandContext;

pub fn handle_routes(ctx: &CommandContext, json: bool) -> Result<()> {
    if json {
        let routes: Vec<&RouteDescriptor> = ctx.routes.iter().collect();
        let output = json!({
            "routes": routes,
            "diagnostics": ctx.routes.diagnostics(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_route_table(&ctx.routes);
    }
    Ok(())
}

fn print_route_table(routes: &RouteMap) {
    if routes.is_empty() {
        println!("No routes found.");
    }

    for route in routes.iter() {
        let params: Vec<String> = route
            .query_params
            .iter()
            .map(|(name, sig)| match &sig.default {
                Some(default) => format!("{}: {} = {}", name, sig.graphql_type(), default),
                None => format!("{}: {}", name, sig.graphql_type()),
            })
            .collect();
        println!(
            "{} {} {}",
            route.path.cyan(),
            format!("({})", route.original_field).blue(),
            params.join(", ").dimmed()
        );
    }

    let diagnostics = routes.diagnostics();
    if !diagnostics.is_empty() {
        println!("\n{} {}", diagnostics.len(), "diagnostics:".yellow());
        for diagnostic in diagnostics.iter() {
            println!(
                "  [{}] {}: {}",
                diagnostic.kind.to_string().yellow(),
                diagnostic.subject,
                diagnostic.message
            );
        }
    }
}
