use strata::graph::{Graph, GraphOptions};
use strata::{util, EdgeAttrs, LayoutGraph, NodeAttrs, Point, Rect};

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

fn ranked(g: &mut LayoutGraph, v: &str, rank: i32, order: usize) {
    g.set_node(
        v,
        NodeAttrs {
            rank: Some(rank),
            order: Some(order),
            ..Default::default()
        },
    );
}

#[test]
fn intersect_rect_hits_the_vertical_sides() {
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 50.0,
    };
    let p = util::intersect_rect(rect, Point { x: 200.0, y: 0.0 });
    assert_eq!(p, Point { x: 50.0, y: 0.0 });
    let p = util::intersect_rect(rect, Point { x: -200.0, y: 0.0 });
    assert_eq!(p, Point { x: -50.0, y: 0.0 });
}

#[test]
fn intersect_rect_hits_the_horizontal_sides() {
    let rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 50.0,
    };
    let p = util::intersect_rect(rect, Point { x: 0.0, y: 100.0 });
    assert_eq!(p, Point { x: 0.0, y: 25.0 });
    let p = util::intersect_rect(rect, Point { x: 0.0, y: -100.0 });
    assert_eq!(p, Point { x: 0.0, y: -25.0 });
}

#[test]
fn intersect_rect_stays_on_the_segment_for_diagonals() {
    let rect = Rect {
        x: 10.0,
        y: 10.0,
        width: 20.0,
        height: 20.0,
    };
    let p = util::intersect_rect(rect, Point { x: 30.0, y: 30.0 });
    assert_eq!(p, Point { x: 20.0, y: 20.0 });
}

#[test]
#[should_panic(expected = "center")]
fn intersect_rect_rejects_the_center_point() {
    let rect = Rect {
        x: 5.0,
        y: 5.0,
        width: 10.0,
        height: 10.0,
    };
    util::intersect_rect(rect, Point { x: 5.0, y: 5.0 });
}

#[test]
fn build_layer_matrix_sorts_by_rank_and_order() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0, 0);
    ranked(&mut g, "d", 1, 1);
    ranked(&mut g, "c", 1, 0);
    ranked(&mut g, "b", 0, 1);

    assert_eq!(
        util::build_layer_matrix(&g),
        vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string(), "d".to_string()],
        ]
    );
}

#[test]
fn normalize_ranks_shifts_the_minimum_to_zero() {
    let mut g = new_graph();
    ranked(&mut g, "a", 3, 0);
    ranked(&mut g, "b", 5, 0);

    util::normalize_ranks(&mut g);
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.node("b").unwrap().rank, Some(2));
}

#[test]
fn remove_empty_ranks_closes_off_factor_gaps() {
    let mut g = new_graph();
    ranked(&mut g, "a", 0, 0);
    ranked(&mut g, "b", 5, 0);

    util::remove_empty_ranks(&mut g, 5);
    assert_eq!(g.node("a").unwrap().rank, Some(0));
    assert_eq!(g.node("b").unwrap().rank, Some(5));

    // Gap ranks that are not multiples of the factor collapse away.
    let mut g = new_graph();
    ranked(&mut g, "a", 0, 0);
    ranked(&mut g, "b", 3, 0);
    util::remove_empty_ranks(&mut g, 2);
    assert_eq!(g.node("b").unwrap().rank, Some(2));
}

#[test]
fn simplify_merges_parallel_edges() {
    let mut g = new_graph();
    g.set_edge_named(
        "a",
        "b",
        None::<String>,
        Some(EdgeAttrs {
            weight: 2.0,
            minlen: 1,
            ..Default::default()
        }),
    );
    g.set_edge_named(
        "a",
        "b",
        Some("x"),
        Some(EdgeAttrs {
            weight: 3.0,
            minlen: 4,
            ..Default::default()
        }),
    );

    let simplified = util::simplify(&g);
    assert_eq!(simplified.edge_count(), 1);
    let label = simplified.edge("a", "b", None).unwrap();
    assert_eq!(label.weight, 5.0);
    assert_eq!(label.minlen, 4);
}

#[test]
fn as_non_compound_graph_drops_cluster_containers() {
    let mut g = new_graph();
    g.set_node("sg", NodeAttrs::default());
    g.set_node("a", NodeAttrs::default());
    g.set_node("b", NodeAttrs::default());
    g.set_parent("a", "sg");
    g.set_edge("a", "b");

    let flat = g_non_compound(&g);
    assert!(!flat.has_node("sg"));
    assert!(flat.has_edge("a", "b", None));
    assert!(!flat.options().compound);
}

fn g_non_compound(g: &LayoutGraph) -> LayoutGraph {
    util::as_non_compound_graph(g)
}
