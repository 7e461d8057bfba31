use strata::graph::{Graph, GraphOptions};
use strata::parent_dummy_chains::parent_dummy_chains;
use strata::{normalize, EdgeAttrs, LayoutGraph, NodeAttrs};

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
fn chain_dummies_join_the_cluster_whose_band_contains_them() {
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
    g.set_node(
        "b",
        NodeAttrs {
            rank: Some(4),
            ..Default::default()
        },
    );
    g.set_edge("a", "b");

    let log = normalize::run(&mut g);
    parent_dummy_chains(&mut g, &log);

    for v in g.node_ids() {
        let Some(attrs) = g.node(&v) else { continue };
        if attrs.dummy.is_none() {
            continue;
        }
        match attrs.rank {
            Some(1) | Some(2) => assert_eq!(g.parent(&v), Some("sg"), "dummy {v}"),
            Some(3) => assert_eq!(g.parent(&v), None, "dummy {v}"),
            rank => panic!("unexpected dummy rank {rank:?}"),
        }
    }
}

#[test]
fn dummies_between_sibling_clusters_pass_through_the_root() {
    let mut g = new_graph();
    for (sg, band) in [("one", (0, 0)), ("two", (3, 3))] {
        g.set_node(
            sg,
            NodeAttrs {
                min_rank: Some(band.0),
                max_rank: Some(band.1),
                ..Default::default()
            },
        );
    }
    g.set_node(
        "a",
        NodeAttrs {
            rank: Some(0),
            ..Default::default()
        },
    );
    g.set_parent("a", "one");
    g.set_node(
        "b",
        NodeAttrs {
            rank: Some(3),
            ..Default::default()
        },
    );
    g.set_parent("b", "two");
    g.set_edge("a", "b");

    let log = normalize::run(&mut g);
    parent_dummy_chains(&mut g, &log);

    for v in g.node_ids() {
        let Some(attrs) = g.node(&v) else { continue };
        if attrs.dummy.is_none() {
            continue;
        }
        // Ranks 1 and 2 lie outside both cluster bands.
        assert_eq!(g.parent(&v), None, "dummy {v}");
    }
}
