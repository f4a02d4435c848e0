use std::net::IpAddr;

use anyhow::{Context, Result};
use colored::Colorize;
use heck::ToSnakeCase;

use crate::server::{build_router, run_server};

use super::CommandContext;

/// Parameters for serve operation
pub struct ServeParams {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub dry_run: bool,
}

pub fn handle_serve(ctx: CommandContext, params: ServeParams) -> Result<()> {
    for field in ctx.schema.mutation_fields() {
        tracing::info!("{} - POST /{}", field.name, field.name.to_snake_case());
    }

    let host = params.host.unwrap_or(ctx.config.server.host);
    let port = params.port.unwrap_or(ctx.config.server.port);
    if host.parse::<IpAddr>().is_err() {
        url::Host::parse(&host)
            .with_context(|| format!("Invalid listen address {}:{}", host, port))?;
    }
    let addr = format!("{}:{}", host, port);

    if params.dry_run {
        println!(
            "{} {} routes, would listen on {}",
            "Dry run:".yellow(),
            ctx.routes.len(),
            addr
        );
        for route in ctx.routes.iter() {
            println!("  {} {}", "GET|POST".dimmed(), route.path.cyan());
        }
        return Ok(());
    }

    println!("Serving {} routes on http://{}", ctx.routes.len(), addr);

    let router = build_router(ctx.routes);
    tokio::runtime::Runtime::new()?
        .block_on(async { run_server(router, &host, port).await })
        .with_context(|| format!("Cannot listen on {}", addr))?;
    Ok(())
}
