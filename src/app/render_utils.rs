use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2, pos2, vec2};

use crate::engine::viewport::Viewport;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * amount) as u8;

    Color32::from_rgba_unmultiplied(
        mix(base.r(), overlay.r()),
        mix(base.g(), overlay.g()),
        mix(base.b(), overlay.b()),
        mix(base.a(), overlay.a()),
    )
}

/// Darkens toward the background and drops opacity for faded elements.
pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    let faded = blend_color(color, BACKGROUND, 1.0 - factor);
    Color32::from_rgba_unmultiplied(
        faded.r(),
        faded.g(),
        faded.b(),
        (color.a() as f32 * (0.35 + factor * 0.65)) as u8,
    )
}

pub(super) fn to_screen(rect: Rect, viewport: &Viewport, world: Vec2) -> Pos2 {
    rect.min + viewport.to_screen(world).to_vec2()
}

/// Pointer position relative to the drawing area, as the session expects.
pub(super) fn to_local(rect: Rect, screen: Pos2) -> Pos2 {
    (screen - rect.min).to_pos2()
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, viewport: &Viewport) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (60.0 * viewport.scale().clamp(0.5, 2.0)).max(20.0);
    let origin = to_screen(rect, viewport, Vec2::ZERO);
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([pos2(x, rect.top()), pos2(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([pos2(rect.left(), y), pos2(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    rect.expand(radius).contains(position)
}

/// Bounding-box test for a sampled edge.
pub(super) fn polyline_visible(rect: Rect, points: &[Pos2], padding: f32) -> bool {
    if points.is_empty() {
        return false;
    }
    let bounds = Rect::from_points(points).expand(padding);
    bounds.intersects(rect)
}

/// Triangle for an arrowhead whose tip sits at `tip`, pointing along
/// `direction` (unit length, screen space).
pub(super) fn arrowhead(tip: Pos2, direction: Vec2, size: f32) -> Vec<Pos2> {
    let back = tip - direction * size;
    let side = vec2(-direction.y, direction.x) * (size * 0.5);
    vec![tip, back + side, back - side]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimming_keeps_some_opacity() {
        let dimmed = dim_color(Color32::from_rgb(200, 100, 50), 0.0);
        assert!(dimmed.a() > 0);
        assert_eq!(dim_color(Color32::WHITE, 1.0), Color32::WHITE);
    }

    #[test]
    fn arrowhead_tip_leads() {
        let points = arrowhead(pos2(10.0, 0.0), vec2(1.0, 0.0), 6.0);
        assert_eq!(points[0], pos2(10.0, 0.0));
        assert_eq!(points[1], pos2(4.0, 3.0));
        assert_eq!(points[2], pos2(4.0, -3.0));
    }

    #[test]
    fn offscreen_polyline_is_culled() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(!polyline_visible(rect, &[pos2(200.0, 200.0), pos2(300.0, 250.0)], 2.0));
        assert!(polyline_visible(rect, &[pos2(-50.0, 50.0), pos2(150.0, 50.0)], 2.0));
    }
}
