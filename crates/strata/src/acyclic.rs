//! Cycle elimination by edge reversal.
//!
//! `run` makes the graph acyclic by reversing a feedback arc set. Each
//! reversed edge keeps its label, gains `reversed = true`, remembers its
//! original name in `forward_name`, and is stored under a fresh `rev<N>`
//! name so it cannot collide with a real opposite edge. `undo` restores
//! direction and name exactly.

use crate::model::Acyclicer;
use crate::{greedy_fas, LayoutGraph};
use rustc_hash::FxHashSet;
use strata_graph::EdgeId;

pub fn run(g: &mut LayoutGraph) {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => greedy_fas::greedy_fas(g),
        Acyclicer::DepthFirst => dfs_fas(g),
    };

    for e in fas {
        let Some(mut label) = g.remove_edge_id(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;
        let name = unique_rev_name(g, &e.head, &e.tail);
        g.set_edge_named(e.head, e.tail, Some(name), Some(label));
    }
}

pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        if !g.edge_by_id(&e).is_some_and(|l| l.reversed) {
            continue;
        }
        let Some(mut label) = g.remove_edge_id(&e) else {
            continue;
        };
        let forward_name = label.forward_name.take();
        label.reversed = false;
        g.set_edge_named(e.head, e.tail, forward_name, Some(label));
    }
}

fn unique_rev_name(g: &LayoutGraph, tail: &str, head: &str) -> String {
    for i in 1usize.. {
        let candidate = format!("rev{i}");
        if !g.has_edge(tail, head, Some(&candidate)) {
            return candidate;
        }
    }
    unreachable!()
}

/// Back edges of one depth-first traversal over every component.
fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeId> {
    let mut fas: Vec<EdgeId> = Vec::new();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut on_stack: FxHashSet<String> = FxHashSet::default();

    for root in g.node_ids() {
        if visited.contains(&root) {
            continue;
        }
        visited.insert(root.clone());
        on_stack.insert(root.clone());
        let mut stack: Vec<(String, Vec<EdgeId>, usize)> =
            vec![(root.clone(), g.out_edges(&root, None), 0)];

        while let Some((v, edges, idx)) = stack.last_mut() {
            if let Some(e) = edges.get(*idx).cloned() {
                *idx += 1;
                if on_stack.contains(&e.head) {
                    fas.push(e);
                } else if visited.insert(e.head.clone()) {
                    on_stack.insert(e.head.clone());
                    let out = g.out_edges(&e.head, None);
                    stack.push((e.head, out, 0));
                }
                continue;
            }
            on_stack.remove(v.as_str());
            stack.pop();
        }
    }

    fas
}
