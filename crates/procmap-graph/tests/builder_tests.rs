use procmap_core::{EdgeObservation, GraphConfig, IdStrategy, ProcMapError};
use procmap_graph::{BuildDiagnostic, NodeRole, ProcessMapBuilder};
use std::collections::HashSet;

fn edge(source: &str, target: &str, occurrence: i64) -> EdgeObservation {
    EdgeObservation::new(source, target, occurrence)
}

fn order_to_cash() -> Vec<EdgeObservation> {
    vec![
        edge("Startknoten", "Create Order", 120),
        edge("Create Order", "Check Credit", 118),
        edge("Check Credit", "Approve", 90),
        edge("Check Credit", "Reject", 28),
        edge("Approve", "Ship Goods", 90),
        edge("Ship Goods", "Endknoten", 90),
        edge("Reject", "Endknoten", 28),
        edge("Create Order", "Endknoten", 2),
    ]
}

#[test]
fn test_empty_input_yields_empty_map() {
    let map = ProcessMapBuilder::new().build(&[]);
    assert!(map.is_empty());
    assert!(map.diagnostics.is_empty());
}

#[test]
fn test_nodes_in_order_of_first_sight() {
    let map = ProcessMapBuilder::new().build(&order_to_cash());
    let labels: Vec<&str> = map.nodes.iter().map(|n| n.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Startknoten",
            "Create Order",
            "Check Credit",
            "Approve",
            "Reject",
            "Ship Goods",
            "Endknoten",
        ]
    );
    assert_eq!(map.nodes[1].id, "CreateOrder");
}

#[test]
fn test_no_duplicate_nodes() {
    let edges: Vec<EdgeObservation> = (0..50)
        .map(|i| edge("Loop", if i % 2 == 0 { "Loop" } else { "Exit" }, i))
        .collect();
    let map = ProcessMapBuilder::new().build(&edges);

    let ids: HashSet<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids.len(), map.nodes.len());
    assert_eq!(map.nodes.len(), 2);
}

#[test]
fn test_every_edge_endpoint_is_a_node() {
    let map = ProcessMapBuilder::new().build(&order_to_cash());
    for e in &map.edges {
        assert!(map.node(&e.source_id).is_some(), "missing {}", e.source_id);
        assert!(map.node(&e.target_id).is_some(), "missing {}", e.target_id);
    }
}

#[test]
fn test_role_correctness() {
    let edges = vec![edge("Startknoten", "Approve", 4), edge("Approve", "Endknoten", 4)];
    let map = ProcessMapBuilder::new().build(&edges);

    assert_eq!(map.node("Startknoten").unwrap().role, NodeRole::Start);
    assert_eq!(map.node("Endknoten").unwrap().role, NodeRole::End);
    assert_eq!(map.node("Approve").unwrap().role, NodeRole::Regular);
}

#[test]
fn test_roles_follow_configured_sentinels() {
    let config = GraphConfig {
        start_label: "Process Start".to_string(),
        end_label: "Process End".to_string(),
        id_strategy: IdStrategy::Sanitized,
    };
    let edges = vec![edge("Process Start", "Startknoten", 1), edge("Startknoten", "Process End", 1)];
    let map = ProcessMapBuilder::from_config(&config).build(&edges);

    assert_eq!(map.node("ProcessStart").unwrap().role, NodeRole::Start);
    assert_eq!(map.node("ProcessEnd").unwrap().role, NodeRole::End);
    assert_eq!(map.node("Startknoten").unwrap().role, NodeRole::Regular);
}

#[test]
fn test_edge_passthrough_without_aggregation() {
    let edges = vec![edge("A", "B", 3), edge("B", "C", 1), edge("A", "B", 5)];
    let map = ProcessMapBuilder::new().build(&edges);

    assert_eq!(map.edges.len(), 3);
    let weights: Vec<i64> = map.edges.iter().map(|e| e.weight).collect();
    assert_eq!(weights, vec![3, 1, 5]);
    assert_eq!(map.edges[0].source_id, "A");
    assert_eq!(map.edges[2].target_id, "B");
    assert_eq!(map.total_weight(), 9);
}

#[test]
fn test_build_is_deterministic_and_idempotent() {
    let builder = ProcessMapBuilder::new();
    let first = serde_json::to_string(&builder.build(&order_to_cash())).unwrap();
    let second = serde_json::to_string(&builder.build(&order_to_cash())).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_colliding_labels_keep_distinct_nodes() {
    let edges = vec![edge("Send Invoice", "SendInvoice", 7)];
    let map = ProcessMapBuilder::new().build(&edges);

    assert_eq!(map.nodes.len(), 2);
    assert_eq!(map.nodes[0].id, "SendInvoice");
    assert_eq!(map.nodes[1].id, "SendInvoice~1");
    assert_eq!(map.edges[0].target_id, "SendInvoice~1");
    assert_eq!(
        map.diagnostics,
        vec![BuildDiagnostic::IdCollision {
            id: "SendInvoice".to_string(),
            label: "SendInvoice".to_string(),
            existing: "Send Invoice".to_string(),
            assigned: "SendInvoice~1".to_string(),
        }]
    );
}

#[test]
fn test_collision_never_merges_roles() {
    let edges = vec![edge("Start knoten", "Startknoten", 1)];
    let map = ProcessMapBuilder::new().build(&edges);

    assert_eq!(map.nodes[0].role, NodeRole::Regular);
    assert_eq!(map.nodes[1].role, NodeRole::Start);
    assert_ne!(map.nodes[0].id, map.nodes[1].id);
}

#[test]
fn test_surrogate_ids_avoid_collisions() {
    let edges = vec![edge("Send Invoice", "SendInvoice", 7), edge("SendInvoice", "Done", 7)];
    let map = ProcessMapBuilder::new()
        .with_id_strategy(IdStrategy::Surrogate)
        .build(&edges);

    let ids: Vec<&str> = map.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n0", "n1", "n2"]);
    assert_eq!(map.edges[1].source_id, "n1");
    assert!(map.diagnostics.is_empty());
}

#[test]
fn test_negative_occurrence_is_diagnosed_and_passed_through() {
    let edges = vec![edge("A", "B", -2)];
    let map = ProcessMapBuilder::new().build(&edges);

    assert_eq!(map.edges[0].weight, -2);
    assert!(matches!(
        map.diagnostics.as_slice(),
        [BuildDiagnostic::NegativeOccurrence { index: 0, occurrence: -2, .. }]
    ));
}

#[test]
fn test_try_build_rejects_diagnostics() {
    let builder = ProcessMapBuilder::new();
    assert!(builder.try_build(&order_to_cash()).is_ok());

    let err = builder.try_build(&[edge("A", "B", -1)]).unwrap_err();
    assert!(matches!(err, ProcMapError::NegativeOccurrence { occurrence: -1, .. }));

    let err = builder.try_build(&[edge("A B", "AB", 1)]).unwrap_err();
    assert!(matches!(err, ProcMapError::IdCollision { .. }));
}

#[test]
fn test_elements_export_for_renderer() {
    let edges = vec![edge("Startknoten", "Approve Order", 4), edge("Approve Order", "Endknoten", 3)];
    let elements = ProcessMapBuilder::new().build(&edges).to_elements();

    let nodes = elements["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["style"]["backgroundColor"], "#00cc66");
    assert_eq!(nodes[1]["data"]["id"], "ApproveOrder");
    assert_eq!(nodes[1]["data"]["label"], "Approve Order");
    assert!(nodes[1].get("style").is_none());
    assert_eq!(nodes[2]["style"]["backgroundColor"], "#ff3300");

    let edges = elements["edges"].as_array().unwrap();
    assert_eq!(edges[1]["data"]["source"], "ApproveOrder");
    assert_eq!(edges[1]["data"]["occurrence"], 3);
    assert_eq!(edges[1]["data"]["edgeWeight"], 3);
}
