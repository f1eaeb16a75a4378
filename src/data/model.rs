use std::collections::HashMap;

use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

pub type NodeId = i64;

/// File role used for filtering, link distances and circle size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Page,
    Layout,
    Component,
    Api,
    Hook,
    Util,
    Config,
    Styles,
    Types,
    Loading,
    Error,
    Default,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Self::Page,
        Self::Layout,
        Self::Component,
        Self::Api,
        Self::Hook,
        Self::Util,
        Self::Config,
        Self::Styles,
        Self::Types,
        Self::Loading,
        Self::Error,
        Self::Default,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Layout => "layout",
            Self::Component => "component",
            Self::Api => "api",
            Self::Hook => "hook",
            Self::Util => "util",
            Self::Config => "config",
            Self::Styles => "styles",
            Self::Types => "types",
            Self::Loading => "loading",
            Self::Error => "error",
            Self::Default => "default",
        }
    }

    /// Unknown labels map to [`Category::Default`].
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.label().eq_ignore_ascii_case(label))
            .unwrap_or(Self::Default)
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub name: String,
    pub category: Option<Category>,
    pub path: Option<String>,
    pub color: Color32,
    pub content: Option<String>,
    pub dependencies: Vec<NodeId>,
}

impl GraphNode {
    pub fn new(id: NodeId, name: impl Into<String>, category: Option<Category>) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            path: None,
            color: Color32::GRAY,
            content: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
    pub source: NodeId,
    pub target: NodeId,
    pub relation: String,
    pub strength: Option<f32>,
}

impl GraphLink {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            relation: String::new(),
            strength: None,
        }
    }

    /// Endpoint ids ordered low to high, shared by both directions of a pair.
    pub fn unordered_pair(&self) -> (NodeId, NodeId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

/// A complete node/link payload. Replaced wholesale on every load.
#[derive(Clone, Debug, Default)]
pub struct GraphData {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    index_by_id: HashMap<NodeId, usize>,
}

impl GraphData {
    pub fn new(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
        let mut index_by_id = HashMap::with_capacity(nodes.len());
        let mut unique = Vec::with_capacity(nodes.len());
        for node in nodes {
            if index_by_id.contains_key(&node.id) {
                log::warn!("dropping duplicate node id {}", node.id);
                continue;
            }
            index_by_id.insert(node.id, unique.len());
            unique.push(node);
        }

        Self {
            nodes: unique,
            links,
            index_by_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub fn resolve_link(&self, link: &GraphLink) -> Result<(usize, usize), GraphError> {
        match (self.index_of(link.source), self.index_of(link.target)) {
            (Some(source), Some(target)) => Ok((source, target)),
            _ => Err(GraphError::DanglingReference {
                from: link.source,
                to: link.target,
            }),
        }
    }
}
