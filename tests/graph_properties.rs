use std::collections::HashSet;

use eframe::egui::{pos2, vec2};
use repograph::config::LayoutConfig;
use repograph::data::{Category, GraphData, GraphLink, GraphNode, parse_graph};
use repograph::engine::filter::{FilterState, visible};
use repograph::engine::highlight::Selection;
use repograph::engine::physics::SimulationStatus;
use repograph::engine::routing::EdgeRouter;
use repograph::engine::GraphSession;

fn repo_graph() -> GraphData {
    GraphData::new(
        vec![
            GraphNode::new(1, "App.tsx", Some(Category::Page)).with_path("src/App.tsx"),
            GraphNode::new(2, "graph.tsx", Some(Category::Component))
                .with_path("src/components/graph.tsx"),
            GraphNode::new(3, "next.config.js", Some(Category::Config)),
            GraphNode::new(4, "types.ts", Some(Category::Types)).with_path("src/types.ts"),
            GraphNode::new(5, "useGraph.ts", Some(Category::Hook)),
            GraphNode::new(6, "route.ts", Some(Category::Api)).with_path("src/app/api/route.ts"),
            GraphNode::new(7, "README", None),
        ],
        vec![
            GraphLink::new(1, 2),
            GraphLink::new(2, 4),
            GraphLink::new(5, 4),
            GraphLink::new(2, 5),
            GraphLink::new(6, 4),
            GraphLink::new(3, 1),
            GraphLink::new(1, 7),
            GraphLink::new(6, 42),
            GraphLink::new(2, 1),
        ],
    )
}

fn session_with(data: GraphData) -> GraphSession {
    let mut session = GraphSession::new(data, LayoutConfig::default());
    session.set_viewport_size(vec2(1000.0, 800.0));
    session
}

#[test]
fn visible_links_never_dangle() {
    let data = repo_graph();
    let mut filters = vec![FilterState::default()];
    for category in Category::ALL {
        let mut filter = FilterState::default();
        filter.set_category(category, false);
        filters.push(filter);
    }
    for term in ["app", "src/", "ts", "zzz"] {
        let mut filter = FilterState::default();
        filter.set_search(term);
        filters.push(filter);
    }

    for filter in &filters {
        let shown = visible(&data, filter);
        let ids = shown.nodes(&data).map(|node| node.id).collect::<HashSet<_>>();
        for &index in &shown.link_indices {
            let link = &data.links[index];
            assert!(ids.contains(&link.source), "{filter:?} kept source of {link:?}");
            assert!(ids.contains(&link.target), "{filter:?} kept target of {link:?}");
        }
    }
}

#[test]
fn toggling_a_category_twice_restores_the_node_set() {
    let data = repo_graph();
    let mut filter = FilterState::default();
    filter.set_search("s");
    let original = visible(&data, &filter);

    for category in Category::ALL {
        filter.toggle(category);
        filter.toggle(category);
        assert_eq!(visible(&data, &filter), original);
    }
}

#[test]
fn two_parallel_links_curve_apart_evenly() {
    let links = vec![GraphLink::new(10, 20), GraphLink::new(10, 20)];
    let router = EdgeRouter::new(&links, 20.0);
    assert_eq!(router.offset(0), -10.0);
    assert_eq!(router.offset(1), 10.0);
}

#[test]
fn clicking_the_selected_node_again_returns_to_idle() {
    let mut session = session_with(repo_graph());
    session.select(Some(2));
    assert_eq!(session.selection(), Selection::NodeSelected(2));
    assert!(session.connected().count() > 0);

    session.select(Some(2));
    assert_eq!(session.selection(), Selection::Idle);
    assert_eq!(session.connected().count(), 0);
}

#[test]
fn pinned_position_is_authoritative_until_released() {
    let mut session = session_with(repo_graph());
    for _ in 0..10 {
        session.tick();
    }

    assert!(session.begin_drag(4));
    let pointer = pos2(900.0, 120.0);
    session.drag_to(pointer);
    let pinned = session.viewport().to_world(pointer);
    for _ in 0..5 {
        session.tick();
        assert_eq!(session.node_position(4), Some(pinned));
    }

    session.end_gesture();
    for _ in 0..5 {
        session.tick();
    }
    assert_ne!(session.node_position(4), Some(pinned));
}

#[test]
fn config_link_rest_distance_wins() {
    let data = parse_graph(
        r#"{
            "nodes": [{"id": 1, "category": "config"}, {"id": 2, "category": "component"}],
            "links": [{"source": 1, "target": 2}]
        }"#,
    )
    .expect("payload parses");
    let session = session_with(data);
    let links = session.simulation().links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].distance, 180.0);
}

#[test]
fn unlinked_nodes_settle_apart() {
    let nodes = (1..=50)
        .map(|id| GraphNode::new(id, format!("file{id}.ts"), Some(Category::Util)))
        .collect();
    let mut session = session_with(GraphData::new(nodes, Vec::new()));
    assert!(session.simulation().links().is_empty());

    let mut ticks = 0;
    while session.tick() {
        ticks += 1;
        assert!(ticks < 5_000, "simulation never settled");
    }
    assert_eq!(session.simulation_status(), SimulationStatus::Settled);

    let positions = session.simulation().nodes();
    assert!(positions.iter().all(|node| node.position.is_finite()));
    for (index, a) in positions.iter().enumerate() {
        for b in &positions[index + 1..] {
            let distance = (a.position - b.position).length();
            assert!(distance > 20.0, "nodes only {distance} apart");
        }
    }
}

#[test]
fn search_matches_regardless_of_category_state() {
    let data = GraphData::new(
        vec![
            GraphNode::new(1, "App.tsx", Some(Category::Page)),
            GraphNode::new(2, "graph.tsx", Some(Category::Component)),
        ],
        Vec::new(),
    );
    let mut filter = FilterState::default();
    filter.set_search("app");
    for node in &data.nodes {
        assert_eq!(filter.matches_search(node), node.name == "App.tsx");
    }

    filter.set_all(false);
    for node in &data.nodes {
        assert_eq!(filter.matches_search(node), node.name == "App.tsx");
    }

    filter.set_all(true);
    let shown = visible(&data, &filter);
    assert_eq!(shown.nodes(&data).map(|node| node.id).collect::<Vec<_>>(), vec![1]);
}

#[test]
fn empty_payload_is_idle() {
    let mut session = GraphSession::empty(LayoutConfig::default());
    assert_eq!(session.simulation_status(), SimulationStatus::Idle);
    assert!(!session.tick());
    assert!(!session.begin_drag(1));
    assert_eq!(session.node_at(pos2(10.0, 10.0)), None);
}

#[test]
fn reload_stops_the_previous_simulation_first() {
    let mut session = session_with(repo_graph());
    session.select(Some(1));
    let generation = session.generation();

    session.replace_data(repo_graph());
    assert_eq!(session.generation(), generation + 1);
    assert_eq!(session.selection(), Selection::Idle);
    assert_eq!(session.simulation_status(), SimulationStatus::Running);
}
