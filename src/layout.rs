use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

use crate::data::NodeId;
use crate::util::stable_pair;

const SEED_RADIUS: f32 = 10.0;
const SEED_JITTER: f32 = 2.0;

/// Deterministic phyllotaxis seed for the node at `slot`.
///
/// Every slot lands on a distinct point, so no two fresh nodes start
/// coincident; a small per-id jitter breaks the spiral's symmetry.
pub fn seed_position(slot: usize, id: NodeId) -> Vec2 {
    let golden_angle = PI * (3.0 - 5.0_f32.sqrt());
    let radius = SEED_RADIUS * (0.5 + slot as f32).sqrt();
    let angle = slot as f32 * golden_angle;
    let (jx, jy) = stable_pair(id);
    vec2(angle.cos(), angle.sin()) * radius + vec2(jx, jy) * SEED_JITTER
}
