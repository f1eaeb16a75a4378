use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;
use super::{SimLink, SimNode};

const JIGGLE: f32 = 1.0e-6;

/// Tiny deterministic offset for coincident points, antisymmetric in
/// `(from, to)` so the two nodes separate in opposite directions.
fn jiggle(from: usize, to: usize) -> Vec2 {
    let (low, high, sign) = if from < to {
        (from, to, 1.0)
    } else {
        (to, from, -1.0)
    };
    let angle = ((low as f32) * 0.618_034 + (high as f32) * 0.414_214) * TAU;
    vec2(angle.cos(), angle.sin()) * (JIGGLE * sign)
}

#[derive(Clone, Copy)]
pub(super) struct ManyBodyParams {
    pub(super) strength: f32,
    pub(super) theta: f32,
    pub(super) distance_min_sq: f32,
    pub(super) alpha: f32,
}

impl ManyBodyParams {
    fn scaled(self, delta: Vec2, mass: f32) -> Vec2 {
        let mut distance_sq = delta.length_sq();
        if distance_sq < self.distance_min_sq {
            distance_sq = (self.distance_min_sq * distance_sq).sqrt();
        }
        delta * (self.strength * mass * self.alpha / distance_sq)
    }
}

/// Charge-like repulsion for one node, approximating distant cells by their
/// centroid.
pub(super) fn accumulate_many_body(
    cell: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ManyBodyParams,
    velocity: &mut Vec2,
) {
    if cell.mass <= 0.0 {
        return;
    }

    let point = positions[index];

    if cell.is_leaf() {
        for &other in &cell.indices {
            if other == index {
                continue;
            }
            let mut delta = positions[other] - point;
            if delta == Vec2::ZERO {
                delta = jiggle(other, index);
            }
            *velocity += params.scaled(delta, 1.0);
        }
        return;
    }

    let delta = cell.centroid - point;
    let distance = delta.length().max(JIGGLE);
    if !cell.bounds.contains(point) && cell.bounds.width() / distance < params.theta {
        *velocity += params.scaled(delta, cell.mass);
        return;
    }

    for child in cell.children() {
        accumulate_many_body(child, index, positions, params, velocity);
    }
}

/// Spring toward each link's rest distance, split between endpoints by
/// degree.
pub(super) fn apply_links(nodes: &mut [SimNode], links: &[SimLink], alpha: f32) {
    for link in links {
        let (source, target) = (link.source, link.target);
        if source == target || source >= nodes.len() || target >= nodes.len() {
            continue;
        }

        let source_next = nodes[source].position + nodes[source].velocity;
        let target_next = nodes[target].position + nodes[target].velocity;
        let mut delta = target_next - source_next;
        if delta == Vec2::ZERO {
            delta = jiggle(source, target);
        }

        let length = delta.length();
        let stretch = (length - link.distance) / length * alpha * link.strength;
        let correction = delta * stretch;

        nodes[target].velocity -= correction * link.bias;
        nodes[source].velocity += correction * (1.0 - link.bias);
    }
}

/// Translates unpinned nodes so the centroid moves toward `target`.
pub(super) fn apply_center(nodes: &mut [SimNode], target: Vec2, strength: f32) {
    if nodes.is_empty() || strength <= 0.0 {
        return;
    }

    let centroid =
        nodes.iter().fold(Vec2::ZERO, |sum, node| sum + node.position) / nodes.len() as f32;
    let shift = (target - centroid) * strength;
    if shift.length_sq() <= f32::EPSILON {
        return;
    }

    for node in nodes.iter_mut().filter(|node| node.pin.is_none()) {
        node.position += shift;
    }
}

/// Independent x and y pull toward a baseline.
pub(super) fn apply_axis(nodes: &mut [SimNode], target: Vec2, strength: f32, alpha: f32) {
    let scale = strength * alpha;
    for node in nodes.iter_mut() {
        node.velocity += (target - node.position) * scale;
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) strength: f32,
    pub(super) reach_sq: f32,
}

/// Gathers velocity corrections for every overlapping pair, pruning cell
/// pairs farther apart than the largest possible contact distance.
pub(super) fn accumulate_collisions(
    cell_a: &QuadNode,
    cell_b: &QuadNode,
    same_cell: bool,
    predicted: &[Vec2],
    radii: &[f32],
    params: CollisionParams,
    corrections: &mut [Vec2],
) {
    if cell_a.bounds.gap_sq(cell_b.bounds) > params.reach_sq {
        return;
    }

    if cell_a.is_leaf() && cell_b.is_leaf() {
        if same_cell {
            for (offset, &from) in cell_a.indices.iter().enumerate() {
                for &to in &cell_a.indices[offset + 1..] {
                    resolve_overlap(from, to, predicted, radii, params.strength, corrections);
                }
            }
        } else {
            for &from in &cell_a.indices {
                for &to in &cell_b.indices {
                    resolve_overlap(from, to, predicted, radii, params.strength, corrections);
                }
            }
        }
        return;
    }

    if same_cell {
        let children = cell_a.children().collect::<Vec<_>>();
        for (offset, child) in children.iter().enumerate() {
            accumulate_collisions(child, child, true, predicted, radii, params, corrections);
            for other in &children[offset + 1..] {
                accumulate_collisions(child, other, false, predicted, radii, params, corrections);
            }
        }
        return;
    }

    let split_a = !cell_a.is_leaf()
        && (cell_b.is_leaf() || cell_a.bounds.half_extent >= cell_b.bounds.half_extent);
    if split_a {
        for child in cell_a.children() {
            accumulate_collisions(child, cell_b, false, predicted, radii, params, corrections);
        }
    } else {
        for child in cell_b.children() {
            accumulate_collisions(cell_a, child, false, predicted, radii, params, corrections);
        }
    }
}

fn resolve_overlap(
    from: usize,
    to: usize,
    predicted: &[Vec2],
    radii: &[f32],
    strength: f32,
    corrections: &mut [Vec2],
) {
    let reach = radii[from] + radii[to];
    let mut delta = predicted[from] - predicted[to];
    let mut distance_sq = delta.length_sq();
    if distance_sq >= reach * reach {
        return;
    }
    if distance_sq == 0.0 {
        delta = jiggle(to, from);
        distance_sq = delta.length_sq();
    }

    let distance = distance_sq.sqrt();
    let push = delta * ((reach - distance) / distance * strength);
    let from_sq = radii[from] * radii[from];
    let to_sq = radii[to] * radii[to];
    let share = if from_sq + to_sq > 0.0 {
        to_sq / (from_sq + to_sq)
    } else {
        0.5
    };

    corrections[from] += push * share;
    corrections[to] -= push * (1.0 - share);
}
