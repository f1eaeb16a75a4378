use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::{Category, GraphNode};
use crate::error::ConfigError;

/// Layout and view tuning, loaded from an optional TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub forces: ForceConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkDistanceRule {
    pub category: Category,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusRule {
    pub category: Category,
    pub radius: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Many-body strength; negative values repel.
    pub charge_strength: f32,
    /// Barnes-Hut opening criterion.
    pub theta: f32,
    pub distance_min: f32,
    pub center_strength: f32,
    /// Rest length for links no rule matches.
    pub link_distance: f32,
    /// Checked in order, first rule whose category touches either endpoint wins.
    pub link_distance_rules: Vec<LinkDistanceRule>,
    pub axis_strength: f32,
    pub axis_target: [f32; 2],
    pub collision_radius: f32,
    pub collision_strength: f32,
    pub alpha_decay: f32,
    pub alpha_min: f32,
    pub alpha_reheat: f32,
    pub velocity_decay: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            charge_strength: -300.0,
            theta: 0.9,
            distance_min: 1.0,
            center_strength: 1.0,
            link_distance: 120.0,
            link_distance_rules: vec![
                LinkDistanceRule {
                    category: Category::Config,
                    distance: 180.0,
                },
                LinkDistanceRule {
                    category: Category::Types,
                    distance: 150.0,
                },
            ],
            axis_strength: 0.05,
            axis_target: [0.0, 0.0],
            collision_radius: 30.0,
            collision_strength: 1.0,
            alpha_decay: 0.01,
            alpha_min: 0.001,
            alpha_reheat: 0.3,
            velocity_decay: 0.4,
        }
    }
}

impl ForceConfig {
    pub fn link_distance_for(&self, source: Option<Category>, target: Option<Category>) -> f32 {
        self.link_distance_rules
            .iter()
            .find(|rule| source == Some(rule.category) || target == Some(rule.category))
            .map_or(self.link_distance, |rule| rule.distance)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub initial_scale: f32,
    pub wheel_zoom_rate: f32,
    pub parallel_edge_offset: f32,
    pub default_radius: f32,
    pub node_radius: Vec<RadiusRule>,
    pub arrow_size: f32,
    pub curve_segments: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let rule = |category, radius| RadiusRule { category, radius };
        Self {
            min_scale: 0.1,
            max_scale: 4.0,
            initial_scale: 0.8,
            wheel_zoom_rate: 0.002,
            parallel_edge_offset: 20.0,
            default_radius: 8.0,
            node_radius: vec![
                rule(Category::Config, 14.0),
                rule(Category::Page, 12.0),
                rule(Category::Layout, 12.0),
                rule(Category::Api, 12.0),
                rule(Category::Component, 10.0),
            ],
            arrow_size: 7.0,
            curve_segments: 16,
        }
    }
}

impl ViewConfig {
    pub fn radius_for(&self, category: Option<Category>) -> f32 {
        category
            .and_then(|category| {
                self.node_radius
                    .iter()
                    .find(|rule| rule.category == category)
            })
            .map_or(self.default_radius, |rule| rule.radius)
    }

    pub fn node_radius(&self, node: &GraphNode) -> f32 {
        self.radius_for(node.category)
    }
}

impl LayoutConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Falls back to defaults when the file is missing or invalid.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => {
                log::info!("loaded layout config from {}", path.display());
                config
            }
            Err(error) => {
                log::warn!("{}: {error}; using default layout config", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_distance_wins_over_types() {
        let forces = ForceConfig::default();
        assert_eq!(
            forces.link_distance_for(Some(Category::Config), Some(Category::Component)),
            180.0
        );
        assert_eq!(
            forces.link_distance_for(Some(Category::Types), Some(Category::Config)),
            180.0
        );
        assert_eq!(
            forces.link_distance_for(Some(Category::Hook), Some(Category::Types)),
            150.0
        );
        assert_eq!(forces.link_distance_for(Some(Category::Page), None), 120.0);
    }

    #[test]
    fn radius_table_weights_categories() {
        let view = ViewConfig::default();
        let config = view.radius_for(Some(Category::Config));
        let page = view.radius_for(Some(Category::Page));
        let component = view.radius_for(Some(Category::Component));
        let hook = view.radius_for(Some(Category::Hook));

        assert!(config > page);
        assert_eq!(page, view.radius_for(Some(Category::Layout)));
        assert_eq!(page, view.radius_for(Some(Category::Api)));
        assert!(page > component);
        assert!(component > hook);
        assert_eq!(hook, view.radius_for(None));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: LayoutConfig = toml::from_str(
            r#"
            [forces]
            charge_strength = -150.0

            [view]
            max_scale = 8.0
            "#,
        )
        .expect("config parses");

        assert_eq!(config.forces.charge_strength, -150.0);
        assert_eq!(config.forces.collision_radius, 30.0);
        assert_eq!(config.view.max_scale, 8.0);
        assert_eq!(config.view.min_scale, 0.1);
    }

    #[test]
    fn rule_tables_parse_from_toml() {
        let config: LayoutConfig = toml::from_str(
            r#"
            [[forces.link_distance_rules]]
            category = "types"
            distance = 200.0
            "#,
        )
        .expect("config parses");

        assert_eq!(config.forces.link_distance_rules.len(), 1);
        assert_eq!(
            config
                .forces
                .link_distance_for(Some(Category::Types), Some(Category::Config)),
            200.0
        );
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = LayoutConfig::load_or_default(Some(Path::new("/nonexistent/repograph.toml")));
        assert_eq!(config.forces.alpha_decay, 0.01);
    }
}
