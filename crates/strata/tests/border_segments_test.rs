use strata::border_segments::add_border_segments;
use strata::graph::{Graph, GraphOptions};
use strata::{BorderSide, DummyKind, EdgeAttrs, LayoutGraph, NodeAttrs};

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
fn does_nothing_without_clusters() {
    let mut g = new_graph();
    g.set_node(
        "a",
        NodeAttrs {
            rank: Some(0),
            ..Default::default()
        },
    );
    add_border_segments(&mut g);
    assert_eq!(g.node_count(), 1);
}

#[test]
fn adds_one_border_pair_per_spanned_rank() {
    let mut g = new_graph();
    g.set_node(
        "sg",
        NodeAttrs {
            min_rank: Some(1),
            max_rank: Some(2),
            ..Default::default()
        },
    );
    g.set_node(
        "a",
        NodeAttrs {
            rank: Some(1),
            ..Default::default()
        },
    );
    g.set_parent("a", "sg");

    add_border_segments(&mut g);

    let sg = g.node("sg").unwrap().clone();
    for rank in 1..=2 {
        let left = sg.border_left_at(rank).expect("left border").to_string();
        let right = sg.border_right_at(rank).expect("right border").to_string();
        for id in [&left, &right] {
            let attrs = g.node(id).unwrap();
            assert_eq!(attrs.dummy, Some(DummyKind::Border));
            assert_eq!(attrs.rank, Some(rank));
            assert_eq!(attrs.width, 0.0);
            assert_eq!(attrs.height, 0.0);
            assert_eq!(g.parent(id), Some("sg"));
        }
        assert_eq!(
            g.node(&left).unwrap().border_side,
            Some(BorderSide::Left)
        );
        assert_eq!(
            g.node(&right).unwrap().border_side,
            Some(BorderSide::Right)
        );
    }

    // Ranks below the band stay unoccupied.
    assert!(sg.border_left_at(0).is_none());
}

#[test]
fn chains_borders_between_adjacent_ranks() {
    let mut g = new_graph();
    g.set_node(
        "sg",
        NodeAttrs {
            min_rank: Some(0),
            max_rank: Some(2),
            ..Default::default()
        },
    );
    g.set_node(
        "a",
        NodeAttrs {
            rank: Some(0),
            ..Default::default()
        },
    );
    g.set_parent("a", "sg");

    add_border_segments(&mut g);

    let sg = g.node("sg").unwrap().clone();
    for rank in 0..2 {
        let upper = sg.border_left_at(rank).unwrap();
        let lower = sg.border_left_at(rank + 1).unwrap();
        assert!(g.has_edge(upper, lower, None));
    }
    // 6 border dummies plus sg and a.
    assert_eq!(g.node_count(), 8);
}
