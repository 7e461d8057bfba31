//! Network-simplex rank optimizer.
//!
//! Starts from a feasible tight tree and repeatedly exchanges a tree edge
//! with negative cut value for the minimum-slack non-tree edge across the
//! same cut, re-ranking the affected subtree, until no negative cut value
//! remains or the pivot budget runs out.

use super::feasible_tree::{feasible_tree, TreeGraph};
use super::{longest_path, slack};
use crate::{util, LayoutGraph};
use rustc_hash::FxHashSet;
use strata_graph::{alg, EdgeId};

pub fn run(g: &mut LayoutGraph) {
    let mut simplified = util::simplify(g);
    longest_path(&mut simplified);
    let mut t = feasible_tree(&mut simplified);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &simplified);

    // Safety net for pathological cut-value cycling; ordinary graphs finish
    // in far fewer pivots.
    let mut budget = 4 * simplified.edge_count() * simplified.node_count() + 64;
    while let Some(e) = leave_edge(&t) {
        if budget == 0 {
            tracing::debug!("network simplex pivot budget exhausted, keeping feasible ranks");
            break;
        }
        budget -= 1;
        let f = enter_edge(&t, &simplified, &e);
        exchange_edges(&mut t, &mut simplified, &e, &f);
    }

    for v in g.node_ids() {
        if let Some(rank) = simplified.node(&v).and_then(|n| n.rank) {
            if let Some(attrs) = g.node_mut(&v) {
                attrs.rank = Some(rank);
            }
        }
    }
}

/// Assigns 1-based low/lim postorder intervals and parent pointers,
/// rooting the tree at `root` (or an arbitrary node).
pub fn init_low_lim_values(t: &mut TreeGraph, root: Option<&str>) {
    let Some(root) = root
        .map(str::to_string)
        .or_else(|| t.nodes().next().map(str::to_string))
    else {
        return;
    };

    struct Frame {
        v: String,
        parent: Option<String>,
        low: usize,
        neighbors: Vec<String>,
        idx: usize,
    }

    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(root.clone());
    let mut next_lim: usize = 1;
    let neighbors = t.neighbors(&root);
    let mut stack: Vec<Frame> = vec![Frame {
        v: root,
        parent: None,
        low: next_lim,
        neighbors,
        idx: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(w) = frame.neighbors.get(frame.idx).cloned() {
            frame.idx += 1;
            if visited.insert(w.clone()) {
                let neighbors = t.neighbors(&w);
                let parent = Some(frame.v.clone());
                stack.push(Frame {
                    v: w,
                    parent,
                    low: next_lim,
                    neighbors,
                    idx: 0,
                });
            }
            continue;
        }

        let frame = stack.pop().expect("frame present");
        if let Some(label) = t.node_mut(&frame.v) {
            label.low = frame.low;
            label.lim = next_lim;
            label.parent = frame.parent;
        }
        next_lim += 1;
    }
}

/// Computes the cut value of every tree edge, children before parents.
pub fn init_cut_values(t: &mut TreeGraph, g: &LayoutGraph) {
    let roots = t.node_ids();
    let mut vs = alg::postorder(t, &roots);
    vs.pop(); // the root has no parent edge
    for v in vs {
        assign_cut_value(t, g, &v);
    }
}

fn assign_cut_value(t: &mut TreeGraph, g: &LayoutGraph, child: &str) {
    let Some(parent) = t.node(child).and_then(|l| l.parent.clone()) else {
        return;
    };
    let cutvalue = calc_cut_value(t, g, child);
    if let Some(edge) = t.edge_mut(child, &parent, None) {
        edge.cutvalue = cutvalue;
    }
}

/// Cut value of the tree edge between `child` and its parent: the weight of
/// all graph edges crossing the cut from the child side to the parent side,
/// minus those crossing the other way, folded together with the already
/// computed cut values of `child`'s own tree edges.
pub fn calc_cut_value(t: &TreeGraph, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|l| l.parent.clone()) else {
        return 0.0;
    };

    // True when the tree edge is oriented child -> parent in the graph.
    let mut child_is_tail = true;
    let mut graph_edge = g.edge(child, &parent, None);
    if graph_edge.is_none() {
        child_is_tail = false;
        graph_edge = g.edge(&parent, child, None);
    }
    let Some(graph_edge) = graph_edge else {
        return 0.0;
    };

    let mut cut_value = graph_edge.weight;

    for e in g.node_edges(child) {
        let is_out = e.tail == child;
        let other = if is_out { &e.head } else { &e.tail };
        if other == &parent {
            continue;
        }
        let weight = g.edge_by_id(&e).map(|l| l.weight).unwrap_or(0.0);

        let points_to_head = is_out == child_is_tail;
        cut_value += if points_to_head { weight } else { -weight };

        if let Some(other_edge) = t.edge(child, other, None) {
            let other_cut = other_edge.cutvalue;
            cut_value += if points_to_head { -other_cut } else { other_cut };
        }
    }

    cut_value
}

/// First tree edge with a negative cut value, if any.
pub fn leave_edge(t: &TreeGraph) -> Option<EdgeId> {
    t.edge_ids()
        .into_iter()
        .find(|e| t.edge_by_id(e).is_some_and(|l| l.cutvalue < 0.0))
}

/// Minimum-slack graph edge crossing the cut induced by removing `edge`
/// from the tree.
pub fn enter_edge(t: &TreeGraph, g: &LayoutGraph, edge: &EdgeId) -> EdgeId {
    let (mut v, mut w) = (edge.tail.clone(), edge.head.clone());
    if g.edge(&v, &w, None).is_none() {
        std::mem::swap(&mut v, &mut w);
    }

    let v_label = t.node(&v).cloned().unwrap_or_default();
    let w_label = t.node(&w).cloned().unwrap_or_default();
    let (tail_label, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };

    let in_tail = |id: &str| -> bool {
        let Some(label) = t.node(id) else {
            return false;
        };
        tail_label.low <= label.lim && label.lim <= tail_label.lim
    };

    let mut best: Option<(i32, EdgeId)> = None;
    for e in g.edge_ids() {
        if flip == in_tail(&e.tail) && flip != in_tail(&e.head) {
            let edge_slack = slack(g, &e);
            match &best {
                Some((best_slack, _)) if edge_slack >= *best_slack => {}
                _ => best = Some((edge_slack, e)),
            }
        }
    }

    best.map(|(_, e)| e)
        .expect("a replacement edge must cross the cut")
}

pub fn exchange_edges(t: &mut TreeGraph, g: &mut LayoutGraph, e: &EdgeId, f: &EdgeId) {
    t.remove_edge(&e.tail, &e.head, None);
    t.set_edge(f.tail.clone(), f.head.clone());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

/// Re-derives ranks from the tree: walk from the root, each node offset from
/// its tree parent by the connecting edge's minlen.
fn update_ranks(t: &TreeGraph, g: &mut LayoutGraph) {
    let root = t
        .node_ids()
        .into_iter()
        .find(|v| t.node(v).is_some_and(|l| l.parent.is_none()));
    let Some(root) = root else {
        return;
    };

    let mut stack: Vec<String> = vec![root];
    let mut visited: FxHashSet<String> = FxHashSet::default();
    visited.insert(stack[0].clone());
    while let Some(v) = stack.pop() {
        let v_rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);
        for w in t.neighbors(&v) {
            if !visited.insert(w.clone()) {
                continue;
            }
            let (minlen, flipped) = match g.edge(&w, &v, None) {
                Some(edge) => (edge.minlen as i32, false),
                None => match g.edge(&v, &w, None) {
                    Some(edge) => (edge.minlen as i32, true),
                    None => continue,
                },
            };
            let rank = if flipped {
                v_rank + minlen
            } else {
                v_rank - minlen
            };
            if let Some(attrs) = g.node_mut(&w) {
                attrs.rank = Some(rank);
            }
            stack.push(w);
        }
    }
}
