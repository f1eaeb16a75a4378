use std::collections::HashMap;

use eframe::egui::{Vec2, vec2};

use crate::data::{GraphLink, NodeId};

/// Drawable path for one link, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EdgePath {
    Straight { from: Vec2, to: Vec2 },
    /// Quadratic curve bent through `control`.
    Curved { from: Vec2, control: Vec2, to: Vec2 },
}

impl EdgePath {
    pub fn to(&self) -> Vec2 {
        match *self {
            Self::Straight { to, .. } | Self::Curved { to, .. } => to,
        }
    }

    pub fn point_at(&self, t: f32) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Self::Straight { from, to } => from + (to - from) * t,
            Self::Curved { from, control, to } => {
                let inverse = 1.0 - t;
                from * (inverse * inverse) + control * (2.0 * inverse * t) + to * (t * t)
            }
        }
    }

    /// Unit direction of travel where the path arrives at its target.
    pub fn end_direction(&self) -> Option<Vec2> {
        let tangent = match *self {
            Self::Straight { from, to } => to - from,
            Self::Curved { control, to, .. } => to - control,
        };
        let length = tangent.length();
        (length > f32::EPSILON).then(|| tangent / length)
    }

    /// Polyline approximation with `segments` pieces.
    pub fn sample(&self, segments: usize) -> Vec<Vec2> {
        match self {
            Self::Straight { from, to } => vec![*from, *to],
            Self::Curved { .. } => {
                let segments = segments.max(2);
                (0..=segments)
                    .map(|step| self.point_at(step as f32 / segments as f32))
                    .collect()
            }
        }
    }
}

/// Parallel-edge bookkeeping for a fixed link set. Offsets only change when
/// the visible links change; paths are recomputed from live positions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeRouter {
    offsets: Vec<f32>,
    reversed: Vec<bool>,
}

impl EdgeRouter {
    /// Groups links by unordered endpoint pair and spreads each group's
    /// members `offset_unit` apart, centered on zero, in link order.
    pub fn new<'a>(links: impl IntoIterator<Item = &'a GraphLink>, offset_unit: f32) -> Self {
        let pairs = links
            .into_iter()
            .map(|link| (link.unordered_pair(), link.source > link.target))
            .collect::<Vec<_>>();

        let mut group_size: HashMap<(NodeId, NodeId), usize> = HashMap::new();
        for (pair, _) in &pairs {
            *group_size.entry(*pair).or_insert(0) += 1;
        }

        let mut next_slot: HashMap<(NodeId, NodeId), usize> = HashMap::new();
        let mut offsets = Vec::with_capacity(pairs.len());
        let mut reversed = Vec::with_capacity(pairs.len());
        for (pair, is_reversed) in pairs {
            let count = group_size.get(&pair).copied().unwrap_or(1);
            let slot = next_slot.entry(pair).or_insert(0);
            let offset = if count > 1 {
                (*slot as f32 - (count - 1) as f32 / 2.0) * offset_unit
            } else {
                0.0
            };
            *slot += 1;
            offsets.push(offset);
            reversed.push(is_reversed);
        }

        Self { offsets, reversed }
    }

    /// Curvature offset of the link at `slot` in the routed order.
    pub fn offset(&self, slot: usize) -> f32 {
        self.offsets.get(slot).copied().unwrap_or(0.0)
    }

    pub fn route(&self, slot: usize, from: Vec2, to: Vec2) -> EdgePath {
        let reversed = self.reversed.get(slot).copied().unwrap_or(false);
        route_with_offset(from, to, self.offset(slot), reversed)
    }
}

/// Bends the link's midpoint along the normal of the pair's canonical
/// direction (lower id to higher id), so both directions of a pair share one
/// side convention.
///
/// `offset` displaces the quadratic control point from the chord midpoint,
/// so the drawn curve peaks at half of it.
pub fn route_with_offset(from: Vec2, to: Vec2, offset: f32, reversed: bool) -> EdgePath {
    let (start, end) = if reversed { (to, from) } else { (from, to) };
    let chord = end - start;
    let length = chord.length();
    if offset == 0.0 || length <= f32::EPSILON {
        return EdgePath::Straight { from, to };
    }

    let normal = vec2(-chord.y, chord.x) / length;
    let midpoint = (from + to) * 0.5;
    EdgePath::Curved {
        from,
        control: midpoint + normal * offset,
        to,
    }
}
