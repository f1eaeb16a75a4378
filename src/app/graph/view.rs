use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2};

use crate::data::NodeId;
use crate::engine::highlight::Highlight;
use crate::util::display_label;

use super::super::ViewModel;
use super::super::render_utils::{
    arrowhead, blend_color, circle_visible, dim_color, draw_background, polyline_visible,
    to_screen,
};

const EDGE_COLOR: Color32 = Color32::from_rgb(120, 128, 140);
const EDGE_HIGHLIGHT: Color32 = Color32::from_rgb(241, 146, 94);
const SELECTED_RING: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let hovered = self.handle_graph_input(ui, rect, &response);

        if self.live_physics && self.session.tick() {
            ui.ctx().request_repaint();
        }

        let viewport = *self.session.viewport();
        draw_background(&painter, rect, &viewport);

        if self.session.visible().node_count() == 0 {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No nodes match the current filters.",
                FontId::proportional(14.0),
                Color32::from_gray(180),
            );
            return;
        }

        if self.show_quadtree_overlay {
            self.draw_quadtree_overlay(&painter, rect);
        }

        self.draw_edges(&painter, rect);
        self.draw_nodes(&painter, rect, hovered);

        if let Some(node) = hovered.and_then(|id| self.session.data().node(id)) {
            let category = node.category.map_or("uncategorized", |category| category.label());
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {}  |  {}",
                    node.name,
                    category,
                    node.path.as_deref().unwrap_or("-")
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }

    fn draw_quadtree_overlay(&mut self, painter: &egui::Painter, rect: Rect) {
        let viewport = *self.session.viewport();
        self.session.quadtree_cells(&mut self.quadtree_cells);

        for cell in &self.quadtree_cells {
            let half = vec2(cell.half_extent, cell.half_extent);
            let min = to_screen(rect, &viewport, cell.center - half);
            let max = to_screen(rect, &viewport, cell.center + half);
            let alpha = if cell.is_leaf { 110 } else { 55 };
            let width = (1.4 - cell.depth as f32 * 0.09).clamp(0.45, 1.4);
            painter.rect_stroke(
                Rect::from_two_pos(min, max),
                0.0,
                Stroke::new(width, Color32::from_rgba_unmultiplied(106, 198, 255, alpha)),
                egui::StrokeKind::Middle,
            );
        }
    }

    fn draw_edges(&self, painter: &egui::Painter, rect: Rect) {
        let viewport = self.session.viewport();
        let view = &self.session.config().view;
        let scale = viewport.scale();
        let width = (1.2 * scale.sqrt()).clamp(0.6, 3.0);

        for (slot, link) in self.session.visible_links().enumerate() {
            let Some(path) = self.session.edge_path(slot) else {
                continue;
            };
            let points = path
                .sample(view.curve_segments)
                .into_iter()
                .map(|point| to_screen(rect, viewport, point))
                .collect::<Vec<Pos2>>();
            if !polyline_visible(rect, &points, view.arrow_size) {
                continue;
            }

            let (color, stroke_width) = match self.session.link_highlight(link) {
                Highlight::Neutral => (EDGE_COLOR, width),
                Highlight::Highlighted => (EDGE_HIGHLIGHT, width * 1.8),
                Highlight::Faded => (dim_color(EDGE_COLOR, 0.3), width * 0.8),
            };

            let target_radius = self
                .session
                .data()
                .node(link.target)
                .map_or(view.default_radius, |node| view.node_radius(node))
                * scale;

            let mut points = points;
            let arrow = path.end_direction().map(|direction| {
                let tip = to_screen(rect, viewport, path.to()) - direction * target_radius;
                arrowhead(tip, direction, view.arrow_size * scale.sqrt().clamp(0.6, 1.6))
            });
            if let (Some(last), Some(arrow)) = (points.last_mut(), arrow.as_ref()) {
                *last = arrow[0];
            }

            painter.add(Shape::line(points, Stroke::new(stroke_width, color)));
            if let Some(arrow) = arrow {
                painter.add(Shape::convex_polygon(arrow, color, Stroke::NONE));
            }
        }
    }

    fn draw_nodes(&self, painter: &egui::Painter, rect: Rect, hovered: Option<NodeId>) {
        let viewport = self.session.viewport();
        let view = &self.session.config().view;
        let selected = self.session.selection().node();

        for node in self.session.visible_nodes() {
            let Some(world) = self.session.node_position(node.id) else {
                continue;
            };
            let position = to_screen(rect, viewport, world);
            let radius = view.node_radius(node) * viewport.scale();
            if !circle_visible(rect, position, radius + 80.0) {
                continue;
            }

            let highlight = self.session.node_highlight(node.id);
            let is_hovered = hovered == Some(node.id);
            let color = match highlight {
                Highlight::Faded => dim_color(node.color, 0.3),
                _ if is_hovered => blend_color(node.color, Color32::WHITE, 0.25),
                _ => node.color,
            };

            painter.circle_filled(position, radius, color);
            if selected == Some(node.id) {
                painter.circle_stroke(position, radius + 3.0, Stroke::new(2.0, SELECTED_RING));
            } else {
                painter.circle_stroke(
                    position,
                    radius,
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190)),
                );
            }

            let show_label = highlight == Highlight::Highlighted
                || is_hovered
                || (highlight == Highlight::Neutral && viewport.scale() > 0.6);
            if show_label {
                let text_color = if highlight == Highlight::Faded {
                    Color32::from_gray(120)
                } else {
                    Color32::from_gray(230)
                };
                painter.text(
                    position + vec2(radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    display_label(node),
                    FontId::proportional(12.0),
                    text_color,
                );
            }
        }
    }
}
