use strata::graph::{Graph, GraphOptions};
use strata::{normalize, DummyKind, EdgeAttrs, LabelPos, LayoutGraph, NodeAttrs};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: false,
    });
    g.set_default_node_label(NodeAttrs::default);
    g.set_default_edge_label(EdgeAttrs::default);
    g
}

fn ranked(g: &mut LayoutGraph, v: &str, rank: i32) {
    g.set_node(
        v,
        NodeAttrs {
            rank: Some(rank),
            ..Default::default()
        },
    );
}

#[test]
fn run_leaves_unit_length_edges_alone() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0);
    ranked(&mut g, "b", 1);
    g.set_edge("a", "b");

    let log = normalize::run(&mut g);
    assert!(log.chains.is_empty());
    assert_eq!(g.node_count(), 2);
    assert!(g.has_edge("a", "b", None));
}

#[test]
fn run_splits_a_two_rank_edge_into_one_dummy() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0);
    ranked(&mut g, "b", 2);
    g.set_edge("a", "b");

    let log = normalize::run(&mut g);
    assert_eq!(log.chains.len(), 1);
    assert!(!g.has_edge("a", "b", None));

    let dummy = &log.chains[0];
    let attrs = g.node(dummy).unwrap();
    assert_eq!(attrs.dummy, Some(DummyKind::EdgeChain));
    assert_eq!(attrs.rank, Some(1));
    assert_eq!(attrs.width, 0.0);
    assert_eq!(attrs.height, 0.0);
    assert!(g.has_edge("a", dummy, None));
    assert!(g.has_edge(dummy, "b", None));
}

#[test]
fn chain_edges_keep_the_original_weight() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0);
    ranked(&mut g, "b", 3);
    g.set_edge_with(
        "a",
        "b",
        EdgeAttrs {
            weight: 4.0,
            ..Default::default()
        },
    );

    let log = normalize::run(&mut g);
    assert_eq!(log.chains.len(), 1);
    for e in g.edge_ids() {
        assert_eq!(g.edge_by_id(&e).unwrap().weight, 4.0);
    }
}

#[test]
fn label_rank_dummy_takes_the_label_size() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0);
    ranked(&mut g, "b", 4);
    g.set_edge_with(
        "a",
        "b",
        EdgeAttrs {
            width: 30.0,
            height: 20.0,
            label_rank: Some(2),
            labelpos: LabelPos::C,
            ..Default::default()
        },
    );

    normalize::run(&mut g);
    let slots: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.node(v).unwrap().dummy == Some(DummyKind::EdgeLabelSlot))
        .collect();
    assert_eq!(slots.len(), 1);
    let attrs = g.node(&slots[0]).unwrap();
    assert_eq!(attrs.rank, Some(2));
    assert_eq!(attrs.width, 30.0);
    assert_eq!(attrs.height, 20.0);
    assert_eq!(attrs.labelpos, Some(LabelPos::C));
}

#[test]
fn undo_restores_the_edge_and_collects_points() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0);
    ranked(&mut g, "b", 3);
    let mut label = EdgeAttrs::default();
    label
        .extras
        .insert("foo".to_string(), serde_json::json!("bar"));
    g.set_edge_named("a", "b", Some("named"), Some(label));

    let log = normalize::run(&mut g);
    // Pretend positioning happened.
    let mut i = 0.0;
    for v in g.node_ids() {
        if g.node(&v).unwrap().dummy.is_some() {
            let attrs = g.node_mut(&v).unwrap();
            attrs.x = Some(10.0 + i);
            attrs.y = Some(20.0 + i);
            i += 1.0;
        }
    }

    normalize::undo(&mut g, log);
    assert_eq!(g.node_count(), 2);
    let restored = g.edge("a", "b", Some("named")).expect("edge restored");
    assert_eq!(restored.points.len(), 2);
    assert_eq!(restored.extras.get("foo"), Some(&serde_json::json!("bar")));
}

#[test]
fn round_trip_point_count_matches_rank_span() {
    for span in 2..6 {
        let mut g = new_graph();
        ranked(&mut g, "a", 0);
        ranked(&mut g, "b", span);
        g.set_edge("a", "b");

        let log = normalize::run(&mut g);
        for v in g.node_ids() {
            if g.node(&v).unwrap().dummy.is_some() {
                let attrs = g.node_mut(&v).unwrap();
                attrs.x = Some(0.0);
                attrs.y = Some(0.0);
            }
        }
        normalize::undo(&mut g, log);

        let label = g.edge("a", "b", None).unwrap();
        assert_eq!(label.points.len(), (span - 1) as usize);
    }
}
