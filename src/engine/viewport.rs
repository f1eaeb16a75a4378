use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::config::ViewConfig;
use crate::data::NodeId;

const COORD_LIMIT: f32 = 1.0e6;

/// NaN becomes `fallback`; infinities and huge values clamp to the limit.
fn sanitize(value: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(-COORD_LIMIT, COORD_LIMIT)
    }
}

/// What the pointer is doing for the current press. Dragging a node and
/// panning never happen in the same gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Gesture {
    #[default]
    None,
    Panning,
    Dragging(NodeId),
}

/// Pan/zoom transform: `screen = world * scale + translate`, with screen
/// coordinates relative to the top-left of the drawing area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    translate: Vec2,
    scale: f32,
    size: Vec2,
    min_scale: f32,
    max_scale: f32,
    initial_scale: f32,
    wheel_zoom_rate: f32,
}

impl Viewport {
    pub fn new(config: &ViewConfig) -> Self {
        let min_scale = config.min_scale.max(f32::EPSILON);
        let max_scale = config.max_scale.max(min_scale);
        let initial_scale = config.initial_scale.clamp(min_scale, max_scale);
        Self {
            translate: Vec2::ZERO,
            scale: initial_scale,
            size: Vec2::ZERO,
            min_scale,
            max_scale,
            initial_scale,
            wheel_zoom_rate: config.wheel_zoom_rate,
        }
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn center(&self) -> Pos2 {
        (self.size * 0.5).to_pos2()
    }

    /// Puts the world origin in the middle of the area at the initial zoom.
    pub fn reset(&mut self, size: Vec2) {
        self.size = vec2(sanitize(size.x, 0.0).max(0.0), sanitize(size.y, 0.0).max(0.0));
        self.translate = self.size * 0.5;
        self.scale = self.initial_scale;
    }

    /// Tracks a resized drawing area, keeping the view centered.
    pub fn set_size(&mut self, size: Vec2) {
        if !size.is_finite() || size == self.size {
            return;
        }
        if self.size == Vec2::ZERO {
            self.reset(size);
            return;
        }
        self.translate += (size - self.size) * 0.5;
        self.size = size;
    }

    pub fn to_screen(&self, world: Vec2) -> Pos2 {
        (world * self.scale + self.translate).to_pos2()
    }

    pub fn to_world(&self, screen: Pos2) -> Vec2 {
        let center = self.center();
        let screen = vec2(sanitize(screen.x, center.x), sanitize(screen.y, center.y));
        (screen - self.translate) / self.scale
    }

    /// Scales by `2^(wheel_delta * rate)` around `pivot`, which stays put on
    /// screen.
    pub fn zoom(&mut self, wheel_delta: f32, pivot: Pos2) {
        if !wheel_delta.is_finite() {
            return;
        }
        self.zoom_by((wheel_delta * self.wheel_zoom_rate).exp2(), pivot);
    }

    pub fn zoom_by(&mut self, factor: f32, pivot: Pos2) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }

        let center = self.center();
        let pivot = pos2(
            sanitize(pivot.x, center.x).clamp(0.0, self.size.x.max(0.0)),
            sanitize(pivot.y, center.y).clamp(0.0, self.size.y.max(0.0)),
        );
        let anchor = self.to_world(pivot);
        self.scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
        self.translate = pivot.to_vec2() - anchor * self.scale;
    }

    pub fn pan(&mut self, delta: Vec2) {
        let delta = vec2(sanitize(delta.x, 0.0), sanitize(delta.y, 0.0));
        self.translate = vec2(
            sanitize(self.translate.x + delta.x, self.translate.x),
            sanitize(self.translate.y + delta.y, self.translate.y),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        let mut viewport = Viewport::new(&ViewConfig::default());
        viewport.reset(vec2(800.0, 600.0));
        viewport
    }

    #[test]
    fn initial_transform_centers_origin() {
        let viewport = viewport();
        assert_eq!(viewport.to_screen(Vec2::ZERO), pos2(400.0, 300.0));
        assert_eq!(viewport.scale(), 0.8);
    }

    #[test]
    fn zoom_keeps_pivot_stationary() {
        let mut viewport = viewport();
        let pivot = pos2(620.0, 140.0);
        let before = viewport.to_world(pivot);
        viewport.zoom(250.0, pivot);
        let after = viewport.to_world(pivot);
        assert!(viewport.scale() > 0.8);
        assert!((before - after).length() < 1.0e-3);
    }

    #[test]
    fn scale_is_clamped() {
        let mut viewport = viewport();
        viewport.zoom_by(1000.0, pos2(10.0, 10.0));
        assert_eq!(viewport.scale(), 4.0);
        viewport.zoom_by(1.0e-6, pos2(10.0, 10.0));
        assert_eq!(viewport.scale(), 0.1);
    }

    #[test]
    fn non_finite_input_is_ignored_or_clamped() {
        let mut viewport = viewport();
        let before = viewport;
        viewport.zoom(f32::NAN, pos2(1.0, 1.0));
        viewport.zoom_by(f32::INFINITY, pos2(1.0, 1.0));
        viewport.pan(vec2(f32::NAN, 0.0));
        assert_eq!(viewport, before);

        viewport.pan(vec2(f32::INFINITY, 0.0));
        assert!(viewport.translate().is_finite());

        let world = viewport.to_world(pos2(f32::NAN, f32::NEG_INFINITY));
        assert!(world.is_finite());
    }

    #[test]
    fn pan_round_trips_through_world_space() {
        let mut viewport = viewport();
        viewport.pan(vec2(30.0, -20.0));
        let world = viewport.to_world(pos2(100.0, 100.0));
        let screen = viewport.to_screen(world);
        assert!((screen - pos2(100.0, 100.0)).length() < 1.0e-3);
        assert_eq!(viewport.to_screen(Vec2::ZERO), pos2(430.0, 280.0));
    }

    #[test]
    fn resize_keeps_the_view_centered() {
        let mut viewport = viewport();
        viewport.set_size(vec2(1000.0, 800.0));
        assert_eq!(viewport.to_screen(Vec2::ZERO), pos2(500.0, 400.0));
    }
}
