use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "graphrest")]
#[command(
    author,
    version,
    about = "Serve a GraphQL schema as REST routes that resolve to GraphQL operations"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (searches upward for graphrest.toml by default)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write JSON logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Local SDL file (takes precedence over Apollo Studio)
    #[arg(long, global = true)]
    pub schema: Option<PathBuf>,

    /// Apollo Studio API key
    #[arg(long, global = true, env = "APOLLO_KEY", hide_env_values = true)]
    pub apollo_key: Option<String>,

    /// Graph ref to fetch, as <graph>@<variant>
    #[arg(long, global = true, env = "APOLLO_GRAPH_REF")]
    pub graph_ref: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the routes and serve them over HTTP
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Print the routes and exit without listening
        #[arg(long)]
        dry_run: bool,
    },

    /// List the synthesized routes
    #[command(visible_alias = "ls")]
    Routes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render the GraphQL operation a request to PATH would produce
    Render {
        /// Route template (`/product/:id`) or concrete path (`/product/42`)
        path: String,

        /// Variable as name=value; repeat for lists
        #[arg(long = "var", value_name = "NAME=VALUE", value_parser = parse_var)]
        vars: Vec<(String, String)>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_var(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}
