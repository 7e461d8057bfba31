//! Feasible tight spanning tree over an already (roughly) ranked graph.

use super::slack;
use crate::LayoutGraph;
use strata_graph::{EdgeId, Graph, GraphOptions};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    pub low: usize,
    pub lim: usize,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TreeEdge {
    pub cutvalue: f64,
}

/// The spanning tree is navigated in both directions.
pub type TreeGraph = Graph<TreeNode, TreeEdge, ()>;

/// Grows a spanning tree of tight edges, shifting whole-tree ranks by the
/// minimum outstanding slack whenever the tree stalls. On return every tree
/// edge has slack 0 and the tree spans the graph.
///
/// The graph must be connected and fully ranked.
pub fn feasible_tree(g: &mut LayoutGraph) -> TreeGraph {
    let mut t: TreeGraph = Graph::new(GraphOptions {
        directed: false,
        multigraph: false,
        compound: false,
    });

    let start = g
        .nodes()
        .next()
        .expect("feasible_tree requires at least one node")
        .to_string();
    let size = g.node_count();
    t.set_node(start, TreeNode::default());

    while tight_tree(&mut t, g) < size {
        let edge = find_min_slack_edge(&t, g)
            .expect("graph must be connected to construct a feasible tree");
        let edge_slack = slack(g, &edge);
        let delta = if t.has_node(&edge.tail) {
            edge_slack
        } else {
            -edge_slack
        };
        shift_ranks(&t, g, delta);
    }

    t
}

/// Extends the tree along tight edges; returns the tree size afterwards.
fn tight_tree(t: &mut TreeGraph, g: &LayoutGraph) -> usize {
    let mut stack: Vec<String> = t.node_ids();
    while let Some(v) = stack.pop() {
        for e in g.node_edges(&v) {
            let other = if e.tail == v { &e.head } else { &e.tail };
            if !t.has_node(other) && slack(g, &e) == 0 {
                t.set_node(other.clone(), TreeNode::default());
                t.set_edge(v.clone(), other.clone());
                stack.push(other.clone());
            }
        }
    }
    t.node_count()
}

fn find_min_slack_edge(t: &TreeGraph, g: &LayoutGraph) -> Option<EdgeId> {
    let mut best: Option<(i32, EdgeId)> = None;
    for e in g.edge_ids() {
        if t.has_node(&e.tail) == t.has_node(&e.head) {
            continue;
        }
        let edge_slack = slack(g, &e);
        match &best {
            Some((best_slack, _)) if edge_slack >= *best_slack => {}
            _ => best = Some((edge_slack, e)),
        }
    }
    best.map(|(_, e)| e)
}

fn shift_ranks(t: &TreeGraph, g: &mut LayoutGraph, delta: i32) {
    for v in t.node_ids() {
        let attrs = g.node_mut(&v).expect("tree node missing from graph");
        let rank = attrs.rank.expect("node rank missing");
        attrs.rank = Some(rank + delta);
    }
}
