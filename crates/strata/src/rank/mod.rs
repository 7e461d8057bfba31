//! Layer assignment.
//!
//! Every ranker leaves an integer `rank` on each node such that
//! `rank(head) - rank(tail) >= minlen` for every edge. Callers normalize
//! ranks to start at 0 afterwards.

pub mod feasible_tree;
pub mod network_simplex;

use crate::model::Ranker;
use crate::LayoutGraph;
use rustc_hash::{FxHashMap, FxHashSet};
use strata_graph::EdgeId;

pub fn rank(g: &mut LayoutGraph) {
    match g.graph().ranker {
        Ranker::NetworkSimplex => network_simplex::run(g),
        Ranker::TightTree => {
            longest_path(g);
            let _ = feasible_tree::feasible_tree(g);
        }
        Ranker::LongestPath => longest_path(g),
    }
}

/// Fast approximate ranking: every node as high as its successors allow.
/// Produces wide, top-heavy layers and possibly negative ranks.
pub fn longest_path(g: &mut LayoutGraph) {
    struct Frame {
        v: String,
        edges: Vec<EdgeId>,
        idx: usize,
        best: Option<i32>,
    }

    let mut memo: FxHashMap<String, i32> = FxHashMap::default();
    let mut on_stack: FxHashSet<String> = FxHashSet::default();

    let mut order: Vec<String> = g.sources();
    order.extend(g.node_ids());

    for start in order {
        if memo.contains_key(&start) {
            continue;
        }
        on_stack.insert(start.clone());
        let mut stack: Vec<Frame> = vec![Frame {
            v: start.clone(),
            edges: g.out_edges(&start, None),
            idx: 0,
            best: None,
        }];

        while let Some(frame) = stack.last_mut() {
            if frame.idx < frame.edges.len() {
                let e = frame.edges[frame.idx].clone();
                let minlen = g.edge_by_id(&e).map(|l| l.minlen as i32).unwrap_or(1);
                if let Some(&head_rank) = memo.get(&e.head) {
                    frame.idx += 1;
                    let candidate = head_rank - minlen;
                    frame.best = Some(frame.best.map_or(candidate, |b| b.min(candidate)));
                } else if on_stack.contains(&e.head) {
                    // Cycle in supposedly acyclic input; ignore the edge
                    // rather than spin.
                    frame.idx += 1;
                } else {
                    on_stack.insert(e.head.clone());
                    let edges = g.out_edges(&e.head, None);
                    stack.push(Frame {
                        v: e.head,
                        edges,
                        idx: 0,
                        best: None,
                    });
                }
                continue;
            }

            let frame = stack.pop().expect("frame present");
            on_stack.remove(&frame.v);
            memo.insert(frame.v, frame.best.unwrap_or(0));
        }
    }

    for (v, rank) in memo {
        if let Some(attrs) = g.node_mut(&v) {
            attrs.rank = Some(rank);
        }
    }
}

/// Actual rank span of the edge minus its minimum span. Zero means tight.
pub fn slack(g: &LayoutGraph, e: &EdgeId) -> i32 {
    let head_rank = g
        .node(&e.head)
        .and_then(|n| n.rank)
        .expect("edge head must be ranked");
    let tail_rank = g
        .node(&e.tail)
        .and_then(|n| n.rank)
        .expect("edge tail must be ranked");
    let minlen = g.edge_by_id(e).map(|l| l.minlen as i32).unwrap_or(1);
    head_rank - tail_rank - minlen
}
