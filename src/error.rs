use thiserror::Error;

use crate::data::NodeId;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("graph payload is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("graph payload is malformed: {0}")]
    DataShape(&'static str),
    #[error("link {from} -> {to} references an unknown node")]
    DanglingReference { from: NodeId, to: NodeId },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
