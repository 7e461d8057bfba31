//! Crossing minimization.
//!
//! Starting from a DFS initial order, alternating down/up sweeps re-sort
//! every rank by barycenter relative to the already ordered neighbor rank,
//! under cluster-contiguity constraints. After each sweep the exact weighted
//! crossing count decides whether the new layering is kept; the search stops
//! after four sweeps without improvement.

mod barycenter;
mod cross_count;
mod layer_graph;
mod resolve;
mod subgraph;

pub use barycenter::{barycenter, BarycenterEntry};
pub use cross_count::cross_count;
pub use layer_graph::{build_layer_graph, ConstraintGraph, LayerEdge, LayerGraph, LayerMeta, Relation};
pub use resolve::{resolve_conflicts, sort, SortEntry, SortResult};
pub use subgraph::{add_subgraph_constraints, sort_subgraph};

use crate::{util, LayoutGraph};
use rustc_hash::FxHashSet;
use strata_graph::{Graph, GraphOptions};

pub fn order(g: &mut LayoutGraph) {
    let Some(max_rank) = util::max_rank(g) else {
        return;
    };

    let layering = init_order(g);
    assign_order(g, &layering);

    let mut best_cc = f64::INFINITY;
    let mut best: Option<Vec<Vec<String>>> = None;

    let mut i: usize = 0;
    let mut since_best: usize = 0;
    while since_best < 4 {
        let bias_right = i % 4 >= 2;
        if i % 2 == 1 {
            let ranks: Vec<i32> = (1..=max_rank).collect();
            sweep(g, &ranks, Relation::InEdges, bias_right);
        } else {
            let ranks: Vec<i32> = (0..max_rank).rev().collect();
            sweep(g, &ranks, Relation::OutEdges, bias_right);
        }

        let current = util::build_layer_matrix(g);
        let cc = cross_count(g, &current);
        if cc < best_cc {
            tracing::trace!(sweep = i, crossings = cc, "order improved");
            since_best = 0;
            best_cc = cc;
            best = Some(current);
        }

        i += 1;
        since_best += 1;
    }

    if let Some(best) = best {
        assign_order(g, &best);
    }
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(attrs) = g.node_mut(v) {
                attrs.order = Some(i);
            }
        }
    }
}

fn sweep(g: &mut LayoutGraph, ranks: &[i32], relation: Relation, bias_right: bool) {
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());

    for &rank in ranks {
        let lg = build_layer_graph(g, rank, relation);
        let root = lg.graph().root.clone();

        let sorted = sort_subgraph(&lg, &root, &cg, bias_right, 0);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(attrs) = g.node_mut(v) {
                attrs.order = Some(i);
            }
        }

        add_subgraph_constraints(&lg, &mut cg, &sorted.vs);
    }
}

/// Initial within-rank order: leaf nodes sorted by rank, then a preorder DFS
/// assigning order of first visit. Already crossing-free inputs come out
/// crossing-free.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let simple_nodes: Vec<String> = g
        .node_ids()
        .into_iter()
        .filter(|v| g.children(v).is_empty())
        .collect();

    let mut max_rank: Option<i32> = None;
    for v in &simple_nodes {
        if let Some(rank) = g.node(v).and_then(|n| n.rank) {
            max_rank = Some(max_rank.map_or(rank, |m: i32| m.max(rank)));
        }
    }
    let Some(max_rank) = max_rank else {
        return Vec::new();
    };

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank + 1).max(0) as usize];

    // Stable start order: by rank, insertion order breaking ties.
    let mut roots = simple_nodes.clone();
    let insertion: rustc_hash::FxHashMap<&String, usize> =
        simple_nodes.iter().enumerate().map(|(i, v)| (v, i)).collect();
    roots.sort_by_key(|v| {
        (
            g.node(v).and_then(|n| n.rank).unwrap_or(i32::MAX),
            insertion.get(v).copied().unwrap_or(usize::MAX),
        )
    });

    let mut visited: FxHashSet<String> = FxHashSet::default();
    for root in roots {
        if visited.contains(&root) {
            continue;
        }
        let mut stack: Vec<String> = vec![root];
        while let Some(v) = stack.pop() {
            if !visited.insert(v.clone()) {
                continue;
            }
            if let Some(rank) = g.node(&v).and_then(|n| n.rank) {
                layers[rank.max(0) as usize].push(v.clone());
            }
            let mut successors = g.successors(&v);
            successors.reverse();
            stack.extend(successors);
        }
    }

    layers
}
