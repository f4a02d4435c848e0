mod render;
mod routes;
mod serve;

pub use render::handle_render;
pub use routes::handle_routes;
pub use serve::{ServeParams, handle_serve};

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::GatewayConfig;
use crate::routes::{RouteMap, build_route_map};
use crate::schema::{Schema, SchemaSource};

/// Common context passed to all command handlers
pub struct CommandContext {
    pub config: GatewayConfig,
    pub schema: Schema,
    pub routes: Arc<RouteMap>,
}

impl CommandContext {
    /// Load the config, fetch and parse the schema, and build the route map.
    pub fn load(config_path: Option<&Path>, source: SchemaSource) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = GatewayConfig::load(config_path, &cwd)
            .context("Failed to load graphrest configuration")?;

        let schema = source
            .load(&config.uplink)
            .context("Failed to load schema")?;

        let routes = build_route_map(&schema, &config.routes.synthesis_options());

        Ok(Self {
            config,
            schema,
            routes: Arc::new(routes),
        })
    }
}
