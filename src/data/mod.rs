mod load;
mod model;
mod parse;

pub use load::{LoadedGraph, load_graph_file};
pub use model::{Category, GraphData, GraphLink, GraphNode, NodeId};
pub use parse::{parse_graph, parse_graph_or_empty};
