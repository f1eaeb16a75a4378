mod forces;
mod quadtree;

use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::config::ForceConfig;
use crate::data::{GraphData, NodeId};
use crate::layout::seed_position;

use super::filter::VisibleGraph;
use forces::{
    CollisionParams, ManyBodyParams, accumulate_collisions, accumulate_many_body, apply_axis,
    apply_center, apply_links,
};
pub use quadtree::QuadtreeCell;
use quadtree::QuadNode;

/// Per-node simulation state, stored in an arena parallel to the node ids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimNode {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position while dragged. Overrides integration.
    pub pin: Option<Vec2>,
    pub radius: f32,
}

impl SimNode {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            pin: None,
            radius: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimLink {
    pub source: usize,
    pub target: usize,
    pub distance: f32,
    pub strength: f32,
    /// Share of the correction applied to the target endpoint.
    pub bias: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationStatus {
    /// Nothing to simulate.
    Idle,
    Running,
    /// Alpha fell below the stopping threshold; a reheat resumes ticking.
    Settled,
    /// Torn down. Never ticks again.
    Stopped,
}

#[derive(Default)]
struct Scratch {
    points: Vec<Vec2>,
    radii: Vec<f32>,
    corrections: Vec<Vec2>,
}

pub struct Simulation {
    ids: Vec<NodeId>,
    index_by_id: HashMap<NodeId, usize>,
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    config: ForceConfig,
    alpha: f32,
    alpha_target: f32,
    status: SimulationStatus,
    ticks: u64,
    scratch: Scratch,
}

impl Simulation {
    pub fn empty(config: &ForceConfig) -> Self {
        Self::new(&GraphData::default(), &VisibleGraph::default(), config, &HashMap::new())
    }

    /// Builds a simulation over the visible subset of `data`.
    ///
    /// Nodes present in `carried` resume from their previous position and
    /// velocity; the rest are seeded. Links whose endpoints are not part of
    /// the subset are dropped.
    pub fn new(
        data: &GraphData,
        visible: &VisibleGraph,
        config: &ForceConfig,
        carried: &HashMap<NodeId, SimNode>,
    ) -> Self {
        let mut ids = Vec::with_capacity(visible.node_indices.len());
        let mut index_by_id = HashMap::with_capacity(visible.node_indices.len());
        let mut nodes = Vec::with_capacity(visible.node_indices.len());

        for &data_index in &visible.node_indices {
            let Some(node) = data.nodes.get(data_index) else {
                continue;
            };
            if index_by_id.contains_key(&node.id) {
                continue;
            }

            let slot = nodes.len();
            let mut sim_node = carried
                .get(&node.id)
                .copied()
                .filter(|carried| carried.position.is_finite())
                .unwrap_or_else(|| SimNode::at(seed_position(slot, node.id)));
            sim_node.pin = None;
            sim_node.radius = config.collision_radius.max(0.0);

            index_by_id.insert(node.id, slot);
            ids.push(node.id);
            nodes.push(sim_node);
        }

        let mut endpoints = Vec::with_capacity(visible.link_indices.len());
        let mut dropped = 0usize;
        for &link_index in &visible.link_indices {
            let Some(link) = data.links.get(link_index) else {
                continue;
            };
            match (index_by_id.get(&link.source), index_by_id.get(&link.target)) {
                (Some(&source), Some(&target)) => endpoints.push((link_index, source, target)),
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            log::debug!("simulation dropped {dropped} link(s) with unresolved endpoints");
        }

        let mut degree = vec![0usize; nodes.len()];
        for &(_, source, target) in &endpoints {
            degree[source] += 1;
            degree[target] += 1;
        }

        let links = endpoints
            .into_iter()
            .map(|(link_index, source, target)| {
                let link = &data.links[link_index];
                let category_of = |id| data.node(id).and_then(|node| node.category);
                let (source_degree, target_degree) = (degree[source], degree[target]);
                SimLink {
                    source,
                    target,
                    distance: config
                        .link_distance_for(category_of(link.source), category_of(link.target)),
                    strength: link.strength.unwrap_or_else(|| {
                        1.0 / source_degree.min(target_degree).max(1) as f32
                    }),
                    bias: source_degree as f32 / (source_degree + target_degree).max(1) as f32,
                }
            })
            .collect::<Vec<_>>();

        let status = if nodes.is_empty() {
            SimulationStatus::Idle
        } else {
            SimulationStatus::Running
        };

        Self {
            ids,
            index_by_id,
            nodes,
            links,
            config: config.clone(),
            alpha: 1.0,
            alpha_target: 0.0,
            status,
            ticks: 0,
            scratch: Scratch::default(),
        }
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SimulationStatus::Running
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[SimLink] {
        &self.links
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index_by_id.get(&id).copied()
    }

    pub fn position_of(&self, id: NodeId) -> Option<Vec2> {
        self.index_of(id).map(|index| self.nodes[index].position)
    }

    /// Runs one tick if the simulation is hot. Returns whether a tick ran.
    pub fn tick(&mut self) -> bool {
        if self.status != SimulationStatus::Running {
            return false;
        }

        self.step();

        if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
            self.status = SimulationStatus::Settled;
            log::debug!(
                "simulation settled after {} ticks (alpha {:.5})",
                self.ticks,
                self.alpha
            );
        }
        true
    }

    fn step(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        apply_links(&mut self.nodes, &self.links, alpha);
        self.apply_many_body(alpha);
        let [axis_x, axis_y] = self.config.axis_target;
        apply_center(&mut self.nodes, Vec2::ZERO, self.config.center_strength);
        apply_axis(
            &mut self.nodes,
            vec2(axis_x, axis_y),
            self.config.axis_strength,
            alpha,
        );
        self.apply_collisions();
        self.integrate();

        self.ticks += 1;
    }

    fn apply_many_body(&mut self, alpha: f32) {
        if self.config.charge_strength == 0.0 || self.nodes.len() < 2 {
            return;
        }

        let points = &mut self.scratch.points;
        points.clear();
        points.extend(self.nodes.iter().map(|node| node.position));
        let Some(tree) = QuadNode::build(points) else {
            return;
        };

        let params = ManyBodyParams {
            strength: self.config.charge_strength,
            theta: self.config.theta,
            distance_min_sq: self.config.distance_min * self.config.distance_min,
            alpha,
        };
        for (index, node) in self.nodes.iter_mut().enumerate() {
            accumulate_many_body(&tree, index, points, params, &mut node.velocity);
        }
    }

    fn apply_collisions(&mut self) {
        if self.config.collision_strength <= 0.0 || self.nodes.len() < 2 {
            return;
        }

        let scratch = &mut self.scratch;
        scratch.points.clear();
        scratch.radii.clear();
        let mut max_radius = 0.0_f32;
        for node in &self.nodes {
            scratch.points.push(node.position + node.velocity);
            scratch.radii.push(node.radius);
            max_radius = max_radius.max(node.radius);
        }
        if max_radius <= 0.0 {
            return;
        }

        let Some(tree) = QuadNode::build(&scratch.points) else {
            return;
        };
        scratch.corrections.clear();
        scratch.corrections.resize(self.nodes.len(), Vec2::ZERO);

        let reach = max_radius * 2.0;
        accumulate_collisions(
            &tree,
            &tree,
            true,
            &scratch.points,
            &scratch.radii,
            CollisionParams {
                strength: self.config.collision_strength,
                reach_sq: reach * reach,
            },
            &mut scratch.corrections,
        );

        for (node, correction) in self.nodes.iter_mut().zip(&scratch.corrections) {
            node.velocity += *correction;
        }
    }

    fn integrate(&mut self) {
        let retain = 1.0 - self.config.velocity_decay.clamp(0.0, 1.0);
        for (slot, node) in self.nodes.iter_mut().enumerate() {
            if let Some(pin) = node.pin {
                node.position = pin;
                node.velocity = Vec2::ZERO;
                continue;
            }

            node.velocity *= retain;
            node.position += node.velocity;

            if !node.position.is_finite() || !node.velocity.is_finite() {
                log::warn!("node {} diverged; reseeding", self.ids[slot]);
                node.position = seed_position(slot, self.ids[slot]);
                node.velocity = Vec2::ZERO;
            }
        }
    }

    /// Fixes a node at `position` until [`Simulation::unpin`].
    pub fn pin(&mut self, index: usize, position: Vec2) {
        if !position.is_finite() {
            return;
        }
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = Some(position);
            node.position = position;
            node.velocity = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.pin = None;
        }
    }

    /// Raises alpha to the reheat target and resumes ticking.
    pub fn reheat(&mut self) {
        if matches!(self.status, SimulationStatus::Idle | SimulationStatus::Stopped) {
            return;
        }
        self.alpha_target = self.config.alpha_reheat;
        self.alpha = self.alpha.max(self.config.alpha_reheat);
        self.status = SimulationStatus::Running;
    }

    /// Lets alpha decay back to rest.
    pub fn cool(&mut self) {
        self.alpha_target = 0.0;
    }

    pub fn stop(&mut self) {
        self.status = SimulationStatus::Stopped;
    }

    /// Position and velocity per id, for carrying into a rebuilt simulation.
    pub fn snapshot(&self) -> HashMap<NodeId, SimNode> {
        self.ids.iter().copied().zip(self.nodes.iter().copied()).collect()
    }

    pub fn quadtree_cells(&self, cells: &mut Vec<QuadtreeCell>) {
        cells.clear();
        let points = self.nodes.iter().map(|node| node.position).collect::<Vec<_>>();
        if let Some(tree) = QuadNode::build(&points) {
            tree.collect_cells(0, cells);
        }
    }
}
