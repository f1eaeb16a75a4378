use std::collections::BTreeSet;

use crate::data::{GraphData, NodeId};

use super::filter::VisibleGraph;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    NodeSelected(NodeId),
}

impl Selection {
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Idle => None,
            Self::NodeSelected(id) => Some(id),
        }
    }
}

/// Visual state of a node or link relative to the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Highlight {
    /// Nothing is selected.
    Neutral,
    Highlighted,
    Faded,
}

#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    selection: Selection,
    connected: BTreeSet<NodeId>,
}

impl SelectionState {
    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selection.node()
    }

    pub fn connected(&self) -> &BTreeSet<NodeId> {
        &self.connected
    }

    /// Selects `target`; selecting the current node again clears it.
    /// Returns whether the selection changed.
    pub fn select(&mut self, target: Option<NodeId>) -> bool {
        let next = match (self.selection, target) {
            (Selection::NodeSelected(current), Some(id)) if current == id => Selection::Idle,
            (_, Some(id)) => Selection::NodeSelected(id),
            (_, None) => Selection::Idle,
        };
        let changed = next != self.selection;
        self.selection = next;
        if next == Selection::Idle {
            self.connected.clear();
        }
        changed
    }

    pub fn clear(&mut self) {
        self.selection = Selection::Idle;
        self.connected.clear();
    }

    /// Rebuilds the one-hop neighborhood over the visible links.
    pub fn recompute(&mut self, data: &GraphData, visible: &VisibleGraph) {
        self.connected.clear();
        let Some(selected) = self.selected() else {
            return;
        };

        for link in visible
            .link_indices
            .iter()
            .filter_map(|&index| data.links.get(index))
        {
            if link.source == selected {
                self.connected.insert(link.target);
            } else if link.target == selected {
                self.connected.insert(link.source);
            }
        }
    }

    pub fn node_highlight(&self, id: NodeId) -> Highlight {
        match self.selected() {
            None => Highlight::Neutral,
            Some(selected) if selected == id || self.connected.contains(&id) => {
                Highlight::Highlighted
            }
            Some(_) => Highlight::Faded,
        }
    }

    pub fn link_highlight(&self, source: NodeId, target: NodeId) -> Highlight {
        match self.selected() {
            None => Highlight::Neutral,
            Some(selected) if selected == source || selected == target => Highlight::Highlighted,
            Some(_) => Highlight::Faded,
        }
    }
}
