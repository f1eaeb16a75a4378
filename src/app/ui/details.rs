use eframe::egui::{self, RichText, Ui};

use crate::data::NodeId;
use crate::util::display_label;

use super::super::ViewModel;

const CONTENT_PREVIEW_CHARS: usize = 4000;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let Some(node) = self.session.selected_node() else {
            ui.label("Click a node in the graph, or pick one from the jump list.");
            return;
        };

        let node_id = node.id;
        let label = display_label(node).to_owned();
        let path = node.path.clone();
        let category = node.category.map_or("uncategorized", |category| category.label());
        let content = node.content.clone();
        let dependencies = node.dependencies.clone();

        ui.label(RichText::new(label).strong());
        if let Some(path) = &path {
            ui.small(path.as_str());
        }
        ui.add_space(6.0);
        ui.label(format!("Category: {category}"));
        ui.label(format!("Id: {node_id}"));

        let mut next_selection: Option<NodeId> = None;

        ui.separator();
        ui.label(RichText::new("Connected (visible)").strong());
        let connected = self.session.connected().collect::<Vec<_>>();
        if connected.is_empty() {
            ui.label("No visible links touch this node.");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("connected_nodes_scroll")
                .max_height(200.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for id in &connected {
                        let Some(other) = self.session.data().node(*id) else {
                            continue;
                        };
                        let response = ui.link(display_label(other));
                        if response.clicked() {
                            next_selection = Some(*id);
                        }
                    }
                });
        }

        if !dependencies.is_empty() {
            ui.separator();
            ui.label(RichText::new("Declared dependencies").strong());
            for id in &dependencies {
                match self.session.data().node(*id) {
                    Some(dependency) => {
                        if ui.link(display_label(dependency)).clicked() {
                            next_selection = Some(*id);
                        }
                    }
                    None => {
                        ui.weak(format!("#{id} (not in payload)"));
                    }
                }
            }
        }

        ui.separator();
        let has_content = content.as_deref().is_some_and(|text| !text.is_empty());
        if ui
            .add_enabled(has_content, egui::Button::new("Open"))
            .on_disabled_hover_text("This node carries no content.")
            .clicked()
        {
            self.session.open(node_id);
        }

        if self.opened == Some(node_id)
            && let Some(content) = &content
        {
            ui.add_space(6.0);
            let preview = match content.char_indices().nth(CONTENT_PREVIEW_CHARS) {
                Some((cut, _)) => format!("{}\n...", &content[..cut]),
                None => content.clone(),
            };
            egui::ScrollArea::both()
                .id_salt("content_scroll")
                .max_height(360.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    ui.label(RichText::new(preview).monospace());
                });
        }

        if let Some(id) = next_selection {
            self.session.select(Some(id));
        }
    }
}
