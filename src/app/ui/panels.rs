use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Layout, RichText};

use crate::config::LayoutConfig;
use crate::data::LoadedGraph;
use crate::engine::physics::SimulationStatus;
use crate::engine::{GraphEvent, GraphSession};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(loaded: LoadedGraph, config: LayoutConfig) -> Self {
        if let Some(warning) = &loaded.warning {
            log::warn!("{warning}");
        }

        Self {
            session: GraphSession::new(loaded.data, config),
            warning: loaded.warning,
            search: String::new(),
            jump_query: String::new(),
            opened: None,
            live_physics: true,
            show_quadtree_overlay: false,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            quadtree_cells: Vec::new(),
        }
    }

    /// Swaps in a freshly loaded payload, keeping filters and the view.
    pub(in crate::app) fn replace_graph(&mut self, loaded: LoadedGraph) {
        if let Some(warning) = &loaded.warning {
            log::warn!("{warning}");
        }
        self.session.replace_data(loaded.data);
        self.warning = loaded.warning;
        self.opened = None;
        self.jump_query.clear();
    }

    fn handle_session_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                GraphEvent::NodeSelected(Some(id)) => log::debug!("selected node {id}"),
                GraphEvent::NodeSelected(None) => {
                    log::debug!("selection cleared");
                    self.opened = None;
                }
                GraphEvent::NodeOpened(id) => {
                    log::info!("opened node {id}");
                    if self.session.selection().node() != Some(id) {
                        self.session.select(Some(id));
                    }
                    self.opened = Some(id);
                }
            }
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &str,
        reload_requested: &mut bool,
        is_reloading: bool,
    ) {
        self.update_fps_counter(ctx);

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("repograph");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    let reload_button =
                        ui.add_enabled(!is_reloading, egui::Button::new("Reload"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if ui.button("Reset view").clicked() {
                        self.session.reset_view();
                    }
                    if is_reloading {
                        ui.spinner();
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                        ui.label(simulation_text(
                            self.session.simulation_status(),
                            self.session.simulation().alpha(),
                        ));
                    });
                });
                if let Some(warning) = &self.warning {
                    ui.label(
                        RichText::new(format!("Payload could not be used: {warning}"))
                            .color(egui::Color32::from_rgb(241, 146, 94)),
                    );
                }
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        self.handle_session_events();
    }
}

fn simulation_text(status: SimulationStatus, alpha: f32) -> String {
    match status {
        SimulationStatus::Idle => "layout: idle".to_owned(),
        SimulationStatus::Running => format!("layout: running (alpha {alpha:.3})"),
        SimulationStatus::Settled => "layout: settled".to_owned(),
        SimulationStatus::Stopped => "layout: stopped".to_owned(),
    }
}
