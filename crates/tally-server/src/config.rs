use std::net::{Ipv4Addr, SocketAddr};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tally_engine::EnginePolicy;
use tally_store::StorageConfig;

use crate::error::{ServerError, ServerResult};

/// Top-level configuration file.
///
/// ```toml
/// [server]
/// bind_addr = "0.0.0.0:3000"
///
/// [storage]
/// backend = "file"
/// path = "db.json"
///
/// [policy]
/// eligibility_scope = "category"
/// strict_references = false
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub policy: EnginePolicy,
}

impl TallyConfig {
    pub fn from_toml(content: &str) -> ServerResult<Self> {
        toml::from_str(content).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ServerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Log every request through `tower-http`'s trace layer.
    pub trace_requests: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 3000)),
            trace_requests: true,
        }
    }
}
