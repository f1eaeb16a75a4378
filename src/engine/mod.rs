//! Layout and interaction core.
//!
//! [`GraphSession`] owns the full payload and everything derived from it:
//! the visible subset, the force simulation over that subset, parallel-edge
//! routing, the selection and the viewport. Front-ends feed it gestures and
//! drain [`GraphEvent`]s; it never performs I/O.

pub mod filter;
pub mod highlight;
pub mod physics;
pub mod routing;
pub mod viewport;

use std::collections::HashMap;

use eframe::egui::{Pos2, Vec2};

use crate::config::LayoutConfig;
use crate::data::{Category, GraphData, GraphLink, GraphNode, NodeId};

use filter::{FilterState, VisibleGraph, visible};
use highlight::{Highlight, Selection, SelectionState};
use physics::{QuadtreeCell, Simulation, SimulationStatus};
use routing::{EdgePath, EdgeRouter};
use viewport::{Gesture, Viewport};

/// Notifications for collaborators outside the core.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GraphEvent {
    /// The selection changed; `None` means it was cleared.
    NodeSelected(Option<NodeId>),
    /// The user asked to open a node's content.
    NodeOpened(NodeId),
}

pub struct GraphSession {
    data: GraphData,
    config: LayoutConfig,
    filter: FilterState,
    visible: VisibleGraph,
    simulation: Simulation,
    generation: u64,
    router: EdgeRouter,
    selection: SelectionState,
    viewport: Viewport,
    gesture: Gesture,
    events: Vec<GraphEvent>,
}

impl GraphSession {
    pub fn new(data: GraphData, config: LayoutConfig) -> Self {
        let filter = FilterState::default();
        let visible = visible(&data, &filter);
        let simulation = Simulation::new(&data, &visible, &config.forces, &HashMap::new());
        let router = Self::build_router(&data, &visible, &config);
        let viewport = Viewport::new(&config.view);
        log::debug!(
            "simulation generation 0 over {} nodes, {} links",
            simulation.len(),
            simulation.links().len()
        );

        Self {
            data,
            config,
            filter,
            visible,
            simulation,
            generation: 0,
            router,
            selection: SelectionState::default(),
            viewport,
            gesture: Gesture::None,
            events: Vec::new(),
        }
    }

    pub fn empty(config: LayoutConfig) -> Self {
        Self::new(GraphData::default(), config)
    }

    fn build_router(data: &GraphData, visible: &VisibleGraph, config: &LayoutConfig) -> EdgeRouter {
        EdgeRouter::new(
            visible
                .link_indices
                .iter()
                .filter_map(|&index| data.links.get(index)),
            config.view.parallel_edge_offset,
        )
    }

    /// Stops the running simulation, then builds its replacement over the
    /// current visible subset.
    fn rebuild_simulation(&mut self, carried: HashMap<NodeId, physics::SimNode>) {
        self.simulation.stop();
        log::debug!("stopped simulation generation {}", self.generation);

        self.generation += 1;
        self.simulation =
            Simulation::new(&self.data, &self.visible, &self.config.forces, &carried);
        log::debug!(
            "simulation generation {} over {} nodes, {} links",
            self.generation,
            self.simulation.len(),
            self.simulation.links().len()
        );
    }

    /// Replaces the whole payload. The selection returns to idle and any
    /// gesture in progress is abandoned.
    pub fn replace_data(&mut self, data: GraphData) {
        self.data = data;
        self.visible = visible(&self.data, &self.filter);
        self.rebuild_simulation(HashMap::new());
        self.router = Self::build_router(&self.data, &self.visible, &self.config);
        self.gesture = Gesture::None;
        if self.selection.selected().is_some() {
            self.selection.clear();
            self.events.push(GraphEvent::NodeSelected(None));
        }
    }

    fn refresh_visible(&mut self) {
        let next = visible(&self.data, &self.filter);
        if next == self.visible {
            return;
        }

        self.visible = next;
        let carried = self.simulation.snapshot();
        if let Gesture::Dragging(_) = self.gesture {
            self.gesture = Gesture::None;
        }
        self.rebuild_simulation(carried);
        self.router = Self::build_router(&self.data, &self.visible, &self.config);
        self.selection.recompute(&self.data, &self.visible);
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_filter_state(&mut self, filter: FilterState) {
        if filter == self.filter {
            return;
        }
        self.filter = filter;
        self.refresh_visible();
    }

    pub fn set_category(&mut self, category: Category, enabled: bool) {
        let mut filter = self.filter.clone();
        filter.set_category(category, enabled);
        self.set_filter_state(filter);
    }

    pub fn set_search_term(&mut self, term: &str) {
        let mut filter = self.filter.clone();
        filter.set_search(term);
        self.set_filter_state(filter);
    }

    /// Applies toggle semantics and queues [`GraphEvent::NodeSelected`] when
    /// the selection changes.
    pub fn select(&mut self, target: Option<NodeId>) {
        let target = target.filter(|id| self.data.index_of(*id).is_some());
        if self.selection.select(target) {
            self.selection.recompute(&self.data, &self.visible);
            self.events.push(GraphEvent::NodeSelected(self.selection.selected()));
        }
    }

    pub fn open(&mut self, id: NodeId) {
        if self.data.index_of(id).is_some() {
            self.events.push(GraphEvent::NodeOpened(id));
        }
    }

    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advances the simulation by one tick when it is hot.
    pub fn tick(&mut self) -> bool {
        self.simulation.tick()
    }

    pub fn begin_pan(&mut self) -> bool {
        if self.gesture != Gesture::None {
            return false;
        }
        self.gesture = Gesture::Panning;
        true
    }

    pub fn pan(&mut self, delta: Vec2) {
        if !matches!(self.gesture, Gesture::Dragging(_)) {
            self.viewport.pan(delta);
        }
    }

    pub fn zoom(&mut self, wheel_delta: f32, pivot: Pos2) {
        self.viewport.zoom(wheel_delta, pivot);
    }

    /// Pins `id` where it currently is and reheats the simulation.
    pub fn begin_drag(&mut self, id: NodeId) -> bool {
        if self.gesture != Gesture::None {
            return false;
        }
        let Some(index) = self.simulation.index_of(id) else {
            return false;
        };

        let position = self.simulation.nodes()[index].position;
        self.simulation.pin(index, position);
        self.simulation.reheat();
        self.gesture = Gesture::Dragging(id);
        true
    }

    /// Moves the dragged node's pin under the pointer, given in screen space.
    pub fn drag_to(&mut self, pointer: Pos2) {
        let Gesture::Dragging(id) = self.gesture else {
            return;
        };
        let Some(index) = self.simulation.index_of(id) else {
            return;
        };
        let world = self.viewport.to_world(pointer);
        self.simulation.pin(index, world);
    }

    /// Finishes whatever gesture is active, releasing a dragged node.
    pub fn end_gesture(&mut self) {
        if let Gesture::Dragging(id) = self.gesture
            && let Some(index) = self.simulation.index_of(id)
        {
            self.simulation.unpin(index);
            self.simulation.cool();
        }
        self.gesture = Gesture::None;
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Topmost visible node whose drawn circle contains `screen`.
    pub fn node_at(&self, screen: Pos2) -> Option<NodeId> {
        let world = self.viewport.to_world(screen);
        self.visible
            .node_indices
            .iter()
            .rev()
            .filter_map(|&index| self.data.nodes.get(index))
            .find(|node| {
                self.simulation.position_of(node.id).is_some_and(|position| {
                    (position - world).length() <= self.config.view.node_radius(node)
                })
            })
            .map(|node| node.id)
    }

    pub fn data(&self) -> &GraphData {
        &self.data
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn visible(&self) -> &VisibleGraph {
        &self.visible
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.visible.nodes(&self.data)
    }

    pub fn visible_links(&self) -> impl Iterator<Item = &GraphLink> {
        self.visible
            .link_indices
            .iter()
            .filter_map(|&index| self.data.links.get(index))
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn simulation_status(&self) -> SimulationStatus {
        self.simulation.status()
    }

    /// Bumped every time the simulation is torn down and rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn node_position(&self, id: NodeId) -> Option<Vec2> {
        self.simulation.position_of(id)
    }

    /// Live path for the visible link at `slot` (an index into
    /// [`GraphSession::visible_links`]).
    pub fn edge_path(&self, slot: usize) -> Option<EdgePath> {
        let link = self
            .visible
            .link_indices
            .get(slot)
            .and_then(|&index| self.data.links.get(index))?;
        let from = self.simulation.position_of(link.source)?;
        let to = self.simulation.position_of(link.target)?;
        Some(self.router.route(slot, from, to))
    }

    pub fn edge_offset(&self, slot: usize) -> f32 {
        self.router.offset(slot)
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn selected_node(&self) -> Option<&GraphNode> {
        self.selection.selected().and_then(|id| self.data.node(id))
    }

    pub fn connected(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.selection.connected().iter().copied()
    }

    pub fn node_highlight(&self, id: NodeId) -> Highlight {
        self.selection.node_highlight(id)
    }

    pub fn link_highlight(&self, link: &GraphLink) -> Highlight {
        self.selection.link_highlight(link.source, link.target)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport.set_size(size);
    }

    pub fn reset_view(&mut self) {
        let size = self.viewport.size();
        self.viewport.reset(size);
    }

    pub fn quadtree_cells(&self, cells: &mut Vec<QuadtreeCell>) {
        self.simulation.quadtree_cells(cells);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui::{pos2, vec2};

    fn session() -> GraphSession {
        let data = GraphData::new(
            vec![
                GraphNode::new(1, "App.tsx", Some(Category::Page)),
                GraphNode::new(2, "Nav.tsx", Some(Category::Component)),
                GraphNode::new(3, "theme.css", Some(Category::Styles)),
            ],
            vec![GraphLink::new(1, 2), GraphLink::new(2, 1), GraphLink::new(1, 3)],
        );
        let mut session = GraphSession::new(data, LayoutConfig::default());
        session.set_viewport_size(vec2(800.0, 600.0));
        session
    }

    #[test]
    fn select_emits_events_with_toggle() {
        let mut session = session();
        session.select(Some(1));
        session.select(Some(1));
        assert_eq!(
            session.drain_events(),
            vec![GraphEvent::NodeSelected(Some(1)), GraphEvent::NodeSelected(None)]
        );
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn selecting_unknown_node_clears() {
        let mut session = session();
        session.select(Some(2));
        session.select(Some(42));
        assert_eq!(session.selection(), Selection::Idle);
    }

    #[test]
    fn filter_change_rebuilds_and_recomputes_selection() {
        let mut session = session();
        session.select(Some(1));
        assert_eq!(session.connected().collect::<Vec<_>>(), vec![2, 3]);

        let before = session.generation();
        session.set_category(Category::Styles, false);
        assert_eq!(session.generation(), before + 1);
        assert_eq!(session.connected().collect::<Vec<_>>(), vec![2]);
        assert_eq!(session.visible().link_count(), 2);
    }

    #[test]
    fn unchanged_visible_set_keeps_the_simulation() {
        let mut session = session();
        let before = session.generation();
        session.set_search_term("s");
        session.set_category(Category::Hook, false);
        assert_eq!(session.generation(), before);
    }

    #[test]
    fn filter_change_carries_positions() {
        let mut session = session();
        for _ in 0..20 {
            session.tick();
        }
        let position = session.node_position(1);
        session.set_category(Category::Styles, false);
        assert_eq!(session.node_position(1), position);
        assert_eq!(session.node_position(3), None);
    }

    #[test]
    fn replace_data_returns_to_idle() {
        let mut session = session();
        session.select(Some(1));
        session.drain_events();
        session.replace_data(GraphData::new(
            vec![GraphNode::new(9, "solo.ts", Some(Category::Util))],
            Vec::new(),
        ));
        assert_eq!(session.selection(), Selection::Idle);
        assert_eq!(session.drain_events(), vec![GraphEvent::NodeSelected(None)]);
        assert_eq!(session.simulation().len(), 1);
    }

    #[test]
    fn drag_suppresses_pan() {
        let mut session = session();
        let translate = session.viewport().translate();
        assert!(session.begin_drag(2));
        assert!(!session.begin_pan());
        session.pan(vec2(50.0, 50.0));
        assert_eq!(session.viewport().translate(), translate);

        session.end_gesture();
        assert!(session.begin_pan());
        session.pan(vec2(50.0, 50.0));
        assert_eq!(session.viewport().translate(), translate + vec2(50.0, 50.0));
    }

    #[test]
    fn drag_pins_under_untransformed_pointer() {
        let mut session = session();
        session.zoom(300.0, pos2(200.0, 200.0));
        session.pan(vec2(15.0, -40.0));
        assert!(session.begin_drag(3));
        let pointer = pos2(650.0, 120.0);
        session.drag_to(pointer);
        session.tick();

        let expected = session.viewport().to_world(pointer);
        assert_eq!(session.node_position(3), Some(expected));
        assert!(session.simulation().is_running());
    }

    #[test]
    fn node_at_hits_the_drawn_circle() {
        let mut session = session();
        for _ in 0..300 {
            session.tick();
        }
        let position = session.node_position(2).expect("node 2 is simulated");
        let screen = session.viewport().to_screen(position);
        assert_eq!(session.node_at(screen), Some(2));
        assert_eq!(session.node_at(screen + vec2(500.0, 500.0)), None);
    }

    #[test]
    fn duplicate_pair_curves_both_ways() {
        let session = session();
        assert_eq!(session.edge_offset(0), -10.0);
        assert_eq!(session.edge_offset(1), 10.0);
        assert_eq!(session.edge_offset(2), 0.0);
        assert!(matches!(session.edge_path(0), Some(EdgePath::Curved { .. })));
        assert!(matches!(session.edge_path(2), Some(EdgePath::Straight { .. })));
    }
}
