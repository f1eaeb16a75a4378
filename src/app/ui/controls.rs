use eframe::egui::{self, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::data::{Category, GraphNode, NodeId};
use crate::util::{category_color, display_label};

use super::super::ViewModel;

const JUMP_LIST_LIMIT: usize = 12;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Best fuzzy matches for `query` against label and path, highest score
/// first. Ties keep input order.
pub(super) fn rank_jump_matches<'a>(
    nodes: impl IntoIterator<Item = &'a GraphNode>,
    query: &str,
    limit: usize,
) -> Vec<(NodeId, i64)> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut ranked = nodes
        .into_iter()
        .filter_map(|node| {
            let by_label = fuzzy_match_score(&matcher, display_label(node), query);
            let by_path = node
                .path
                .as_deref()
                .and_then(|path| fuzzy_match_score(&matcher, path, query));
            by_label.max(by_path).map(|score| (node.id, score))
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Search");
            let response = ui
                .text_edit_singleline(&mut self.search)
                .on_hover_text("Case-insensitive match on file name or path.");
            if response.changed() {
                self.session.set_search_term(&self.search);
            }
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("Categories").strong());
            if ui.small_button("All").clicked() {
                let mut filter = self.session.filter().clone();
                filter.set_all(true);
                self.session.set_filter_state(filter);
            }
            if ui.small_button("None").clicked() {
                let mut filter = self.session.filter().clone();
                filter.set_all(false);
                self.session.set_filter_state(filter);
            }
        });

        let mut counts = [0usize; Category::ALL.len()];
        for node in &self.session.data().nodes {
            if let Some(category) = node.category {
                counts[category.ordinal()] += 1;
            }
        }

        ui.horizontal_wrapped(|ui| {
            for category in Category::ALL {
                let mut enabled = self.session.filter().is_enabled(category);
                let label = format!("{} ({})", category.label(), counts[category.ordinal()]);
                let text = RichText::new(label).color(category_color(Some(category)));
                if ui.toggle_value(&mut enabled, text).changed() {
                    self.session.set_category(category, enabled);
                }
            }
        });

        ui.separator();
        ui.label(RichText::new("Jump to node").strong());
        ui.text_edit_singleline(&mut self.jump_query)
            .on_hover_text("Fuzzy match over visible nodes.");

        let matches = rank_jump_matches(
            self.session.visible_nodes(),
            &self.jump_query,
            JUMP_LIST_LIMIT,
        );
        let mut jump_to = None;
        egui::ScrollArea::vertical()
            .id_salt("jump_list_scroll")
            .max_height(220.0)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for (id, _score) in &matches {
                    let Some(node) = self.session.data().node(*id) else {
                        continue;
                    };
                    let is_selected = self.session.selection().node() == Some(*id);
                    let response = ui.selectable_label(is_selected, display_label(node));
                    let response = match &node.path {
                        Some(path) => response.on_hover_text(path.as_str()),
                        None => response,
                    };
                    if response.clicked() && !is_selected {
                        jump_to = Some(*id);
                    }
                }
            });
        if let Some(id) = jump_to {
            self.session.select(Some(id));
        }

        ui.separator();

        ui.checkbox(&mut self.live_physics, "Live physics simulation")
            .on_hover_text("Pause or resume layout ticks. Pausing keeps the current temperature.");

        ui.checkbox(&mut self.show_fps_bar, "FPS display")
            .on_hover_text("Show a live FPS readout in the header.");

        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the Barnes-Hut partitions over the graph canvas.");

        ui.add_space(8.0);
        ui.small(
            "Drag a node to pin it. Drag the background to pan, scroll to zoom. \
             Double-click a node to open it.",
        );
    }
}
