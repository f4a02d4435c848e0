use crate::error::{GatewayError, Result};
use crate::routes::{INTROSPECTION_PREFIX, MAX_PATH_DEPTH, SynthesisOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "graphrest.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub routes: RouteSettings,

    #[serde(default)]
    pub uplink: UplinkSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSettings {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_introspection_prefix")]
    pub introspection_prefix: String,
}

fn default_max_depth() -> usize {
    MAX_PATH_DEPTH
}

fn default_introspection_prefix() -> String {
    INTROSPECTION_PREFIX.to_string()
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            introspection_prefix: default_introspection_prefix(),
        }
    }
}

impl RouteSettings {
    pub fn synthesis_options(&self) -> SynthesisOptions {
        SynthesisOptions {
            max_depth: self.max_depth,
            introspection_prefix: self.introspection_prefix.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UplinkSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_client_name")]
    pub client_name: String,

    #[serde(default = "default_client_version")]
    pub client_version: String,
}

fn default_endpoint() -> String {
    "https://graphql.api.apollographql.com/api/graphql".to_string()
}

fn default_client_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_client_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for UplinkSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            client_name: default_client_name(),
            client_version: default_client_version(),
        }
    }
}

impl GatewayConfig {
    /// Load the config at `path`, or search upward from `start_path` for
    /// `graphrest.toml`. Without a file the defaults apply.
    pub fn load(path: Option<&Path>, start_path: &Path) -> Result<Self> {
        let config_path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_file(start_path),
        };

        let config = match config_path {
            Some(config_path) => {
                tracing::debug!(path = %config_path.display(), "Loading config");
                let content = std::fs::read_to_string(&config_path)?;
                toml::from_str(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Some(config_path);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.routes.introspection_prefix.is_empty() {
            return Err(GatewayError::Config(
                "routes.introspection_prefix cannot be empty".to_string(),
            ));
        }
        url::Url::parse(&self.uplink.endpoint).map_err(|e| {
            GatewayError::Config(format!(
                "Invalid uplink endpoint {}: {}",
                self.uplink.endpoint, e
            ))
        })?;
        Ok(())
    }
}
