use eframe::egui::{self, CursorIcon, PointerButton, Rect, Ui};

use crate::data::NodeId;
use crate::engine::viewport::Gesture;

use super::super::ViewModel;
use super::super::render_utils::to_local;

impl ViewModel {
    /// Feeds this frame's pointer input to the session. Returns the node under
    /// the pointer, if any.
    pub(in crate::app) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) -> Option<NodeId> {
        self.session.set_viewport_size(rect.size());

        self.handle_graph_zoom(ui, rect, response);
        self.handle_graph_drag(rect, response);

        let hovered = response
            .hover_pos()
            .and_then(|pointer| self.session.node_at(to_local(rect, pointer)));

        if response.double_clicked_by(PointerButton::Primary) {
            if let Some(id) = hovered {
                self.session.open(id);
            }
        } else if response.clicked_by(PointerButton::Primary) {
            self.session.select(hovered);
        }

        match self.session.gesture() {
            Gesture::Dragging(_) => ui.ctx().set_cursor_icon(CursorIcon::Grabbing),
            Gesture::Panning => ui.ctx().set_cursor_icon(CursorIcon::AllScroll),
            Gesture::None if hovered.is_some() => {
                ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
            }
            Gesture::None => {}
        }

        hovered
    }

    fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        self.session.zoom(scroll, to_local(rect, pointer));
    }

    fn handle_graph_drag(&mut self, rect: Rect, response: &egui::Response) {
        if response.drag_started_by(PointerButton::Primary) {
            let grabbed = response
                .interact_pointer_pos()
                .and_then(|pointer| self.session.node_at(to_local(rect, pointer)));
            let started = match grabbed {
                Some(id) => self.session.begin_drag(id),
                None => self.session.begin_pan(),
            };
            if !started {
                log::debug!("ignored drag start during {:?}", self.session.gesture());
            }
        } else if response.drag_started_by(PointerButton::Secondary)
            || response.drag_started_by(PointerButton::Middle)
        {
            self.session.begin_pan();
        }

        if response.dragged() {
            match self.session.gesture() {
                Gesture::Dragging(_) => {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        self.session.drag_to(to_local(rect, pointer));
                    }
                }
                Gesture::Panning => self.session.pan(response.drag_delta()),
                Gesture::None => {}
            }
        }

        if response.drag_stopped() {
            self.session.end_gesture();
        }
    }
}
