use strata::graph::{Graph, GraphOptions};
use strata::rank::{self, feasible_tree, network_simplex};
use strata::{util, EdgeAttrs, LayoutConfig, LayoutGraph, NodeAttrs, Ranker};

fn new_graph(ranker: Ranker) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: true,
        compound: false,
    });
    g.set_graph(LayoutConfig {
        ranker,
        ..Default::default()
    });
    g.set_default_node_label(NodeAttrs::default);
    g.set_default_edge_label(EdgeAttrs::default);
    g
}

fn rank_of(g: &LayoutGraph, v: &str) -> i32 {
    g.node(v).and_then(|n| n.rank).expect("rank assigned")
}

fn assert_feasible(g: &LayoutGraph) {
    for e in g.edge_ids() {
        let minlen = g.edge_by_id(&e).unwrap().minlen as i32;
        assert!(
            rank_of(g, &e.head) - rank_of(g, &e.tail) >= minlen,
            "edge {}->{} violates minlen",
            e.tail,
            e.head
        );
    }
}

const RANKERS: [Ranker; 3] = [Ranker::NetworkSimplex, Ranker::TightTree, Ranker::LongestPath];

#[test]
fn every_ranker_respects_minlen() {
    for ranker in RANKERS {
        let mut g = new_graph(ranker);
        g.set_path(&["a", "b", "c", "d", "h"]);
        g.set_path(&["a", "e", "g", "h"]);
        g.set_path(&["a", "f", "g"]);
        g.set_edge_with(
            "e",
            "h",
            EdgeAttrs {
                minlen: 2,
                ..Default::default()
            },
        );

        rank::rank(&mut g);
        assert_feasible(&g);
    }
}

#[test]
fn every_ranker_can_normalize_to_a_zero_minimum() {
    for ranker in RANKERS {
        let mut g = new_graph(ranker);
        g.set_path(&["a", "b", "c"]);
        rank::rank(&mut g);
        util::normalize_ranks(&mut g);

        assert_eq!(rank_of(&g, "a"), 0);
        assert_eq!(rank_of(&g, "b"), 1);
        assert_eq!(rank_of(&g, "c"), 2);
    }
}

#[test]
fn longest_path_ranks_a_source_at_the_top() {
    let mut g = new_graph(Ranker::LongestPath);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");
    rank::longest_path(&mut g);
    util::normalize_ranks(&mut g);

    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
    assert_eq!(rank_of(&g, "c"), 2);
}

#[test]
fn slack_is_zero_for_tight_edges() {
    let mut g = new_graph(Ranker::LongestPath);
    g.set_path(&["a", "b"]);
    g.node_mut("a").unwrap().rank = Some(0);
    g.node_mut("b").unwrap().rank = Some(3);

    let e = g.edge_ids().pop().unwrap();
    assert_eq!(rank::slack(&g, &e), 2);
    g.node_mut("b").unwrap().rank = Some(1);
    assert_eq!(rank::slack(&g, &e), 0);
}

#[test]
fn feasible_tree_tightens_a_slack_edge() {
    let mut g = new_graph(Ranker::TightTree);
    g.set_edge("a", "b");
    g.node_mut("a").unwrap().rank = Some(0);
    g.node_mut("b").unwrap().rank = Some(4);

    let tree = feasible_tree::feasible_tree(&mut g);
    assert_eq!(tree.node_count(), 2);
    assert_eq!(rank_of(&g, "b") - rank_of(&g, "a"), 1);
}

#[test]
fn feasible_tree_spans_a_diamond() {
    let mut g = new_graph(Ranker::TightTree);
    g.set_path(&["a", "b", "d"]);
    g.set_path(&["a", "c", "d"]);
    rank::longest_path(&mut g);

    let tree = feasible_tree::feasible_tree(&mut g);
    assert_eq!(tree.node_count(), 4);
    for e in g.edge_ids() {
        assert!(rank::slack(&g, &e) >= 0);
    }
}

#[test]
fn network_simplex_balances_a_chain_against_a_shortcut() {
    // b sits between a and c; the heavy shortcut must not stretch.
    let mut g = new_graph(Ranker::NetworkSimplex);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");

    network_simplex::run(&mut g);
    util::normalize_ranks(&mut g);
    assert_feasible(&g);
    assert_eq!(rank_of(&g, "a"), 0);
    assert_eq!(rank_of(&g, "b"), 1);
    assert_eq!(rank_of(&g, "c"), 2);
}

#[test]
fn network_simplex_pulls_a_low_weight_tail_up() {
    // With longest-path seeding, f starts as deep as possible; the optimizer
    // shortens total weighted edge length by pulling it next to its user.
    let mut g = new_graph(Ranker::NetworkSimplex);
    g.set_path(&["a", "b", "c", "d"]);
    g.set_edge("e", "d");

    network_simplex::run(&mut g);
    util::normalize_ranks(&mut g);
    assert_feasible(&g);
    assert_eq!(rank_of(&g, "e"), 2);
}

#[test]
fn network_simplex_total_length_is_no_worse_than_longest_path() {
    let weighted_length = |g: &LayoutGraph| -> f64 {
        g.edge_ids()
            .into_iter()
            .map(|e| {
                let label = g.edge_by_id(&e).unwrap();
                (rank_of(g, &e.head) - rank_of(g, &e.tail)) as f64 * label.weight
            })
            .sum()
    };

    let build = |ranker: Ranker| -> LayoutGraph {
        let mut g = new_graph(ranker);
        g.set_path(&["a", "b", "c", "d", "h"]);
        g.set_path(&["a", "e", "g", "h"]);
        g.set_path(&["a", "f", "g"]);
        g
    };

    let mut lp = build(Ranker::LongestPath);
    rank::rank(&mut lp);
    let mut ns = build(Ranker::NetworkSimplex);
    rank::rank(&mut ns);

    assert!(weighted_length(&ns) <= weighted_length(&lp));
}
