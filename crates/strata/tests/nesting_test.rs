use strata::graph::{Graph, GraphOptions};
use strata::{nesting, DummyKind, EdgeAttrs, LayoutGraph, NodeAttrs};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: true,
    });
    g.set_default_node_label(NodeAttrs::default);
    g.set_default_edge_label(EdgeAttrs::default);
    g
}

#[test]
fn connects_a_disconnected_graph_through_the_root() {
    let mut g = new_graph();
    g.set_node("a", NodeAttrs::default());
    g.set_node("b", NodeAttrs::default());

    let log = nesting::run(&mut g);
    assert!(g.has_node(&log.root));
    assert!(g.has_edge(&log.root, "a", None));
    assert!(g.has_edge(&log.root, "b", None));
    assert_eq!(g.node(&log.root).unwrap().dummy, Some(DummyKind::NestRoot));
}

#[test]
fn adds_border_top_and_bottom_for_each_cluster() {
    let mut g = new_graph();
    g.set_node("sg", NodeAttrs::default());
    g.set_node("a", NodeAttrs::default());
    g.set_parent("a", "sg");

    nesting::run(&mut g);
    let sg = g.node("sg").unwrap();
    let top = sg.border_top.clone().expect("border top");
    let bottom = sg.border_bottom.clone().expect("border bottom");
    assert_eq!(g.parent(&top), Some("sg"));
    assert_eq!(g.parent(&bottom), Some("sg"));
    assert!(g.has_edge(&top, "a", None));
    assert!(g.has_edge("a", &bottom, None));
}

#[test]
fn scales_real_edge_minlens_by_the_node_rank_factor() {
    let mut g = new_graph();
    g.set_node("sg", NodeAttrs::default());
    g.set_node("a", NodeAttrs::default());
    g.set_node("b", NodeAttrs::default());
    g.set_parent("a", "sg");
    g.set_edge("a", "b");

    let log = nesting::run(&mut g);
    assert_eq!(log.node_rank_factor, 3);
    assert_eq!(g.edge("a", "b", None).unwrap().minlen, 3);
}

#[test]
fn border_edges_outweigh_every_real_edge() {
    let mut g = new_graph();
    g.set_node("sg", NodeAttrs::default());
    g.set_node("a", NodeAttrs::default());
    g.set_parent("a", "sg");
    g.set_edge_with(
        "a",
        "b",
        EdgeAttrs {
            weight: 5.0,
            ..Default::default()
        },
    );

    nesting::run(&mut g);
    let top = g.node("sg").unwrap().border_top.clone().unwrap();
    let w = g.edge(&top, "a", None).unwrap().weight;
    assert!(w > 5.0);
}

#[test]
fn cleanup_removes_the_root_and_skeleton_but_keeps_borders() {
    let mut g = new_graph();
    g.set_node("sg", NodeAttrs::default());
    g.set_node("a", NodeAttrs::default());
    g.set_node("b", NodeAttrs::default());
    g.set_parent("a", "sg");
    g.set_edge("a", "b");
    let before_edges = 1;

    let log = nesting::run(&mut g);
    let root = log.root.clone();
    let top = g.node("sg").unwrap().border_top.clone().unwrap();

    nesting::cleanup(&mut g, log);
    assert!(!g.has_node(&root));
    assert!(g.has_node(&top));
    assert_eq!(g.edge_count(), before_edges);
    assert!(g.has_edge("a", "b", None));
}
