use serde::Deserialize;
use serde_json::Value;

use crate::error::GraphError;
use crate::util::{category_color, parse_hex_color};

use super::model::{Category, GraphData, GraphLink, GraphNode, NodeId};

#[derive(Clone, Debug, Deserialize)]
struct RawNode {
    id: NodeId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "type")]
    category: Option<String>,
    #[serde(default, alias = "filePath")]
    path: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    dependencies: Vec<NodeId>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum RawEndpoint {
    Id(NodeId),
    Node { id: NodeId },
}

impl RawEndpoint {
    fn id(&self) -> NodeId {
        match self {
            Self::Id(id) | Self::Node { id } => *id,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct RawLink {
    #[serde(default)]
    source: Option<RawEndpoint>,
    #[serde(default)]
    target: Option<RawEndpoint>,
    #[serde(default, alias = "type")]
    relation: Option<String>,
    #[serde(default)]
    strength: Option<f32>,
}

impl RawNode {
    fn into_node(self) -> GraphNode {
        let category = self.category.as_deref().map(Category::from_label);
        let color = self
            .color
            .as_deref()
            .and_then(parse_hex_color)
            .unwrap_or_else(|| category_color(category));
        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.path.clone())
            .unwrap_or_else(|| self.id.to_string());

        GraphNode {
            id: self.id,
            name,
            category,
            path: self.path.filter(|path| !path.is_empty()),
            color,
            content: self.content,
            dependencies: self.dependencies,
        }
    }
}

impl RawLink {
    fn into_link(self) -> Option<GraphLink> {
        let source = self.source?.id();
        let target = self.target?.id();
        Some(GraphLink {
            source,
            target,
            relation: self.relation.unwrap_or_default(),
            strength: self.strength.filter(|strength| strength.is_finite()),
        })
    }
}

/// Parses a `{ "nodes": [...], "links": [...] }` payload.
///
/// Individual entries that fail to deserialize are skipped; only a payload
/// without both arrays is an error.
pub fn parse_graph(raw: &str) -> Result<GraphData, GraphError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let object = parsed
        .as_object()
        .ok_or(GraphError::DataShape("payload is not an object"))?;
    let raw_nodes = object
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(GraphError::DataShape("missing `nodes` array"))?;
    let raw_links = object
        .get("links")
        .and_then(Value::as_array)
        .ok_or(GraphError::DataShape("missing `links` array"))?;

    let mut skipped_nodes = 0usize;
    let nodes = raw_nodes
        .iter()
        .filter_map(|value| match RawNode::deserialize(value) {
            Ok(node) => Some(node.into_node()),
            Err(error) => {
                skipped_nodes += 1;
                log::debug!("skipping malformed node entry: {error}");
                None
            }
        })
        .collect::<Vec<_>>();

    let mut skipped_links = 0usize;
    let links = raw_links
        .iter()
        .filter_map(|value| {
            let link = RawLink::deserialize(value)
                .ok()
                .and_then(RawLink::into_link);
            if link.is_none() {
                skipped_links += 1;
            }
            link
        })
        .collect::<Vec<_>>();

    if skipped_nodes > 0 || skipped_links > 0 {
        log::warn!(
            "skipped {skipped_nodes} malformed node(s) and {skipped_links} malformed link(s)"
        );
    }

    let data = GraphData::new(nodes, links);
    log::info!(
        "parsed graph payload: {} nodes, {} links",
        data.nodes.len(),
        data.links.len()
    );
    Ok(data)
}

/// Falls back to an empty graph when the payload is unusable, handing the
/// error back so the caller can surface it.
pub fn parse_graph_or_empty(raw: &str) -> (GraphData, Option<GraphError>) {
    match parse_graph(raw) {
        Ok(data) => (data, None),
        Err(error) => {
            log::warn!("{error}; falling back to an empty graph");
            (GraphData::default(), Some(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nodes_and_both_endpoint_shapes() {
        let raw = r##"{
            "nodes": [
                {"id": 1, "name": "App.tsx", "category": "page", "path": "src/app/App.tsx"},
                {"id": 2, "name": "config.ts", "category": "config", "color": "#ff0000"}
            ],
            "links": [
                {"source": 1, "target": 2, "relation": "imports"},
                {"source": {"id": 2}, "target": {"id": 1}, "type": "re-exports", "strength": 0.5}
            ]
        }"##;

        let data = parse_graph(raw).expect("payload parses");
        assert_eq!(data.nodes.len(), 2);
        assert_eq!(data.links.len(), 2);
        assert_eq!(data.links[1].source, 2);
        assert_eq!(data.links[1].relation, "re-exports");
        assert_eq!(data.links[1].strength, Some(0.5));
        assert_eq!(
            data.node(2).map(|node| node.color),
            Some(eframe::egui::Color32::from_rgb(255, 0, 0))
        );
    }

    #[test]
    fn missing_category_stays_absent_and_unknown_maps_to_default() {
        let raw = r#"{
            "nodes": [{"id": 1, "name": "a"}, {"id": 2, "name": "b", "category": "widget"}],
            "links": []
        }"#;
        let data = parse_graph(raw).expect("payload parses");
        assert_eq!(data.nodes[0].category, None);
        assert_eq!(data.nodes[1].category, Some(Category::Default));
    }

    #[test]
    fn links_without_endpoints_and_bad_nodes_are_skipped() {
        let raw = r#"{
            "nodes": [{"id": 1, "name": "a"}, {"name": "no id"}],
            "links": [{"source": 1}, {"target": 1}, {"source": 1, "target": 1}]
        }"#;
        let data = parse_graph(raw).expect("payload parses");
        assert_eq!(data.nodes.len(), 1);
        assert_eq!(data.links.len(), 1);
    }

    #[test]
    fn missing_arrays_fall_back_to_empty_graph() {
        let (data, error) = parse_graph_or_empty(r#"{"nodes": []}"#);
        assert!(data.is_empty());
        assert!(matches!(error, Some(GraphError::DataShape(_))));

        let (data, error) = parse_graph_or_empty("not json");
        assert!(data.is_empty());
        assert!(matches!(error, Some(GraphError::InvalidJson(_))));
    }
}
