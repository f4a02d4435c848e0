use anyhow::{Context, Result};
use clap::Parser;

use graphrest::cli::handlers::{
    CommandContext, ServeParams, handle_render, handle_routes, handle_serve,
};
use graphrest::cli::{Cli, Commands};
use graphrest::logging;
use graphrest::schema::SchemaSource;

fn main() -> Result<()> {
    // APOLLO_KEY / APOLLO_GRAPH_REF may come from a local .env file.
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.clone());

    let source = SchemaSource::resolve(cli.schema, cli.graph_ref, cli.apollo_key)
        .context("Cannot determine schema source")?;
    let ctx = CommandContext::load(cli.config.as_deref(), source)?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            dry_run,
        } => handle_serve(
            ctx,
            ServeParams {
                port,
                host,
                dry_run,
            },
        ),
        Commands::Routes { json } => handle_routes(&ctx, json),
        Commands::Render { path, vars, json } => handle_render(&ctx, &path, vars, json),
    }
}
