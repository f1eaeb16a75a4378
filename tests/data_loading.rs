use std::fs;

use repograph::config::LayoutConfig;
use repograph::data::{Category, load_graph_file};
use tempfile::tempdir;

#[test]
fn loads_a_payload_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.json");
    fs::write(
        &path,
        r#"{
            "nodes": [
                {"id": 1, "name": "page.tsx", "type": "Page", "filePath": "src/app/page.tsx"},
                {"id": 2, "name": "layout.tsx", "type": "layout"},
                {"id": 2, "name": "duplicate", "type": "util"}
            ],
            "links": [{"source": 2, "target": 1}, {"source": 1, "target": 99}]
        }"#,
    )
    .unwrap();

    let loaded = load_graph_file(&path).unwrap();
    assert!(loaded.warning.is_none());
    assert_eq!(loaded.data.nodes.len(), 2);
    assert_eq!(loaded.data.links.len(), 2);

    let page = loaded.data.node(1).unwrap();
    assert_eq!(page.category, Some(Category::Page));
    assert_eq!(page.path.as_deref(), Some("src/app/page.tsx"));
    assert_eq!(loaded.data.node(2).unwrap().name, "layout.tsx");
}

#[test]
fn malformed_payload_loads_as_empty_graph_with_warning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.json");
    fs::write(&path, r#"{"nodes": "not an array", "links": []}"#).unwrap();

    let loaded = load_graph_file(&path).unwrap();
    assert!(loaded.data.is_empty());
    let warning = loaded.warning.unwrap();
    assert!(warning.contains("graph.json"), "{warning}");
}

#[test]
fn missing_payload_is_an_error() {
    let dir = tempdir().unwrap();
    let error = load_graph_file(&dir.path().join("absent.json")).err().unwrap();
    assert!(format!("{error:#}").contains("absent.json"));
}

#[test]
fn layout_config_overrides_and_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("layout.toml");
    fs::write(
        &path,
        r#"
[forces]
charge_strength = -120.0
link_distance_rules = [{ category = "types", distance = 90.0 }]

[view]
max_scale = 8.0
"#,
    )
    .unwrap();

    let config = LayoutConfig::load(&path).unwrap();
    assert_eq!(config.forces.charge_strength, -120.0);
    assert_eq!(config.forces.alpha_decay, 0.01);
    assert_eq!(
        config.forces.link_distance_for(Some(Category::Types), Some(Category::Config)),
        90.0
    );
    assert_eq!(config.view.max_scale, 8.0);
    assert_eq!(config.view.initial_scale, 0.8);
}

#[test]
fn unreadable_layout_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("layout.toml");
    fs::write(&path, "forces = 3").unwrap();

    assert!(LayoutConfig::load(&path).is_err());
    let config = LayoutConfig::load_or_default(Some(&path));
    assert_eq!(config.forces.charge_strength, -300.0);
    assert_eq!(config.view.parallel_edge_offset, 20.0);
}
