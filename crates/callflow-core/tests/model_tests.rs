use callflow_core::{Edge, Element, GraphError, Node, RouteGraph};

fn node(id: &str, kind: &str, label: &str) -> Element {
    Element::Node(Node::new(id, kind, label))
}

fn edge(id: &str, source: &str, target: &str) -> Element {
    Element::Edge(Edge::new(id, source, target))
}

#[test]
fn test_build_from_elements() {
    let graph = RouteGraph::from_elements(vec![
        node("did1", "ingress", "Phone Number: (555) 010-0001"),
        node("u100", "user", "Alice"),
        edge("e1", "did1", "u100"),
    ])
    .unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.node("u100").unwrap().label, "Alice");
    assert_eq!(graph.edge("e1").unwrap().target, "u100");
    assert_eq!(graph.outgoing("did1").count(), 1);
    assert_eq!(graph.outgoing("u100").count(), 0);
    assert!(!graph.is_empty());
}

#[test]
fn test_edges_may_precede_their_nodes() {
    let graph = RouteGraph::from_elements(vec![
        edge("e1", "a", "b"),
        node("a", "ingress", "A"),
        node("b", "user", "B"),
    ])
    .unwrap();
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_missing_endpoint_fails_fast() {
    let result = RouteGraph::from_elements(vec![
        node("a", "ingress", "A"),
        edge("e1", "a", "ghost"),
    ]);

    match result {
        Err(GraphError::MissingEndpoint { edge, node }) => {
            assert_eq!(edge, "e1");
            assert_eq!(node, "ghost");
        }
        other => panic!("expected MissingEndpoint, got {other:?}"),
    }
}

#[test]
fn test_duplicate_ids_first_occurrence_wins() {
    let graph = RouteGraph::from_elements(vec![
        node("a", "ingress", "First"),
        node("a", "ingress", "Second"),
        node("b", "user", "B"),
        edge("e1", "a", "b"),
        edge("e1", "b", "a"),
    ])
    .unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.node("a").unwrap().label, "First");
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge("e1").unwrap().source, "a");
}

#[test]
fn test_synthesized_edge_id() {
    let graph = RouteGraph::from_elements(vec![
        node("a", "ingress", "A"),
        node("b", "user", "B"),
        Element::Edge(Edge::new("", "a", "b")),
    ])
    .unwrap();
    assert!(graph.edge("a_b").is_some());
}

#[test]
fn test_ingress_ids_sorted_by_label() {
    let graph = RouteGraph::from_elements(vec![
        node("did2", "ingress", "Phone Number: (555) 010-0002"),
        node("u1", "user", "Agent"),
        node("did1", "ingress", "Phone Number: (555) 010-0001"),
        node("did3", "ingress", "Main Line"),
    ])
    .unwrap();

    assert_eq!(graph.ingress_ids(), vec!["did3", "did1", "did2"]);
}

#[test]
fn test_empty_graph_is_degenerate_but_valid() {
    let graph = RouteGraph::from_elements(Vec::new()).unwrap();
    assert!(graph.is_empty());
    assert!(graph.ingress_ids().is_empty());
}

#[test]
fn test_wire_parsing_mixed_elements() {
    let raw = r#"[
        {"id": "did1", "type": "ingress", "label": "Phone Number: (555) 010-0001"},
        {"id": "grp", "type": "group", "label": "Support Team"},
        {"id": "u100", "type": "user", "label": "Alice", "parentId": "grp"},
        {"id": "e1", "source": "did1", "target": "u100", "priority": 1,
         "schedule": [{"dayOfWeek": 5, "startTime": "09:00", "endTime": "17:00"}]},
        {"source": "u100", "target": "grp"}
    ]"#;

    let elements: Vec<Element> = serde_json::from_str(raw).unwrap();
    let graph = RouteGraph::from_elements(elements).unwrap();

    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(
        graph.node("u100").unwrap().parent_id.as_deref(),
        Some("grp")
    );

    let scheduled = graph.edge("e1").unwrap();
    assert_eq!(scheduled.priority, Some(1));
    assert_eq!(scheduled.schedule.len(), 1);
    assert!(graph.edge("u100_grp").is_some());

    // Classification flags start undistinguished.
    assert!(scheduled.active_for_instant.is_none());
    assert!(scheduled.visible);
}

#[test]
fn test_wire_parsing_rejects_non_numeric_priority() {
    let raw = r#"[
        {"id": "a", "type": "ingress", "label": "A"},
        {"id": "b", "type": "user", "label": "B"},
        {"id": "e1", "source": "a", "target": "b", "priority": "high"}
    ]"#;
    assert!(serde_json::from_str::<Vec<Element>>(raw).is_err());
}
