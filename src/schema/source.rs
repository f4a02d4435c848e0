use std::path::PathBuf;

use super::Schema;
use super::uplink::fetch_supergraph;
use crate::config::UplinkSettings;
use crate::error::{GatewayError, Result};

/// Where the schema SDL comes from.
#[derive(Debug, Clone)]
pub enum SchemaSource {
    /// A local SDL file.
    File(PathBuf),
    /// The supergraph published to Apollo Studio for a graph ref.
    Uplink { graph_ref: String, api_key: String },
}

impl SchemaSource {
    /// Pick a source: a local file wins over the remote supergraph.
    pub fn resolve(
        schema: Option<PathBuf>,
        graph_ref: Option<String>,
        api_key: Option<String>,
    ) -> Result<Self> {
        match (schema, graph_ref, api_key) {
            (Some(path), _, _) => Ok(SchemaSource::File(path)),
            (None, Some(graph_ref), Some(api_key)) => Ok(SchemaSource::Uplink { graph_ref, api_key }),
            _ => Err(GatewayError::Config(
                "No schema source: pass --schema <file> or set APOLLO_KEY and APOLLO_GRAPH_REF"
                    .to_string(),
            )),
        }
    }

    /// Read or download the SDL text.
    pub fn load_sdl(&self, settings: &UplinkSettings) -> Result<String> {
        match self {
            SchemaSource::File(path) => {
                tracing::debug!(path = %path.display(), "Reading local schema");
                Ok(std::fs::read_to_string(path)?)
            }
            SchemaSource::Uplink { graph_ref, api_key } => {
                tracing::debug!(graph_ref = %graph_ref, "Uplink ref");
                Ok(fetch_supergraph(settings, graph_ref, api_key)?)
            }
        }
    }

    /// Load and parse the schema.
    pub fn load(&self, settings: &UplinkSettings) -> Result<Schema> {
        let sdl = self.load_sdl(settings)?;
        Ok(Schema::from_sdl(&sdl)?)
    }
}
