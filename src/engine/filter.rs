use std::collections::{BTreeMap, HashSet};

use crate::data::{Category, GraphData, GraphNode};

/// Category toggles plus a free-text search term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    categories: BTreeMap<Category, bool>,
    search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            categories: Category::ALL.into_iter().map(|category| (category, true)).collect(),
            search: String::new(),
        }
    }
}

impl FilterState {
    pub fn is_enabled(&self, category: Category) -> bool {
        self.categories.get(&category).copied().unwrap_or(false)
    }

    pub fn set_category(&mut self, category: Category, enabled: bool) {
        self.categories.insert(category, enabled);
    }

    pub fn toggle(&mut self, category: Category) {
        let enabled = self.is_enabled(category);
        self.set_category(category, !enabled);
    }

    pub fn set_all(&mut self, enabled: bool) {
        for category in Category::ALL {
            self.set_category(category, enabled);
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Case-insensitive substring match on name or path. Only an empty term
    /// matches everything; whitespace is part of the term.
    pub fn matches_search(&self, node: &GraphNode) -> bool {
        let term = self.search.to_lowercase();
        if term.is_empty() {
            return true;
        }

        node.name.to_lowercase().contains(&term)
            || node
                .path
                .as_deref()
                .is_some_and(|path| path.to_lowercase().contains(&term))
    }

    pub fn passes(&self, node: &GraphNode) -> bool {
        node.category
            .is_some_and(|category| self.is_enabled(category))
            && self.matches_search(node)
    }
}

/// Indices into [`GraphData::nodes`] and [`GraphData::links`] that survive a
/// filter, in their original order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibleGraph {
    pub node_indices: Vec<usize>,
    pub link_indices: Vec<usize>,
}

impl VisibleGraph {
    /// Every node, and every link whose endpoints resolve.
    pub fn all(data: &GraphData) -> Self {
        Self {
            node_indices: (0..data.nodes.len()).collect(),
            link_indices: data
                .links
                .iter()
                .enumerate()
                .filter(|(_, link)| data.resolve_link(link).is_ok())
                .map(|(index, _)| index)
                .collect(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_indices.len()
    }

    pub fn link_count(&self) -> usize {
        self.link_indices.len()
    }

    pub fn nodes<'a>(&'a self, data: &'a GraphData) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.node_indices
            .iter()
            .filter_map(move |&index| data.nodes.get(index))
    }
}

/// Derives the visible subset. A link survives only when both resolved
/// endpoints survive; links to unknown ids are dropped.
pub fn visible(data: &GraphData, filter: &FilterState) -> VisibleGraph {
    let node_indices = data
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| filter.passes(node))
        .map(|(index, _)| index)
        .collect::<Vec<_>>();
    let shown = node_indices.iter().copied().collect::<HashSet<_>>();

    let mut dangling = 0usize;
    let link_indices = data
        .links
        .iter()
        .enumerate()
        .filter_map(|(index, link)| match data.resolve_link(link) {
            Ok((source, target)) => {
                (shown.contains(&source) && shown.contains(&target)).then_some(index)
            }
            Err(error) => {
                dangling += 1;
                log::trace!("{error}");
                None
            }
        })
        .collect();

    if dangling > 0 {
        log::debug!("filter dropped {dangling} dangling link(s)");
    }

    VisibleGraph {
        node_indices,
        link_indices,
    }
}
