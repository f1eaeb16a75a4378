use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::GraphData;
use super::parse::parse_graph_or_empty;

/// Result of reading a payload from disk. A malformed payload still loads as
/// an empty graph, with the problem kept in `warning`.
pub struct LoadedGraph {
    pub data: GraphData,
    pub warning: Option<String>,
}

pub fn load_graph_file(path: &Path) -> Result<LoadedGraph> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph payload {}", path.display()))?;
    let (data, error) = parse_graph_or_empty(&raw);

    Ok(LoadedGraph {
        data,
        warning: error.map(|error| format!("{}: {error}", path.display())),
    })
}
