//! Re-parents normalization dummies into the cluster forest.
//!
//! A chain produced by normalization runs from the tail's cluster up to the
//! lowest common ancestor and back down into the head's cluster. Walking the
//! chain rank by rank and the ancestor path in lockstep assigns each dummy
//! the innermost cluster whose rank band contains it, so cluster contiguity
//! constraints during ordering also cover edge chains.

use crate::normalize::NormalizeLog;
use crate::LayoutGraph;
use rustc_hash::FxHashMap;

struct Interval {
    low: usize,
    lim: usize,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph, log: &NormalizeLog) {
    let intervals = postorder_intervals(g);

    for start in &log.chains {
        let Some(edge) = g.node(start).and_then(|n| n.edge.clone()) else {
            continue;
        };
        let (path, lca) = ancestor_path(g, &intervals, &edge.tail, &edge.head);

        let mut path_idx: usize = 0;
        let mut path_v: Option<String> = path.first().cloned().unwrap_or(None);
        let mut ascending = true;
        let mut v = start.clone();

        while v != edge.head {
            let rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);

            if ascending {
                while path_v != lca
                    && path_v
                        .as_deref()
                        .and_then(|pv| g.node(pv))
                        .and_then(|n| n.max_rank)
                        .unwrap_or(i32::MAX / 2)
                        < rank
                {
                    path_idx += 1;
                    path_v = path.get(path_idx).cloned().unwrap_or(None);
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_idx + 1 < path.len()
                    && path[path_idx + 1]
                        .as_deref()
                        .and_then(|pv| g.node(pv))
                        .and_then(|n| n.min_rank)
                        .unwrap_or(i32::MIN / 2)
                        <= rank
                {
                    path_idx += 1;
                }
                path_v = path.get(path_idx).cloned().unwrap_or(None);
            }

            match &path_v {
                Some(parent) => {
                    g.set_parent(v.clone(), parent.clone());
                }
                None => {
                    g.clear_parent(&v);
                }
            }

            let Some(next) = g.successors(&v).into_iter().next() else {
                break;
            };
            v = next;
        }
    }
}

/// Ancestors of `tail` up to and including the LCA, then ancestors of `head`
/// from just below the LCA downward. `None` entries stand for the forest
/// root.
fn ancestor_path(
    g: &LayoutGraph,
    intervals: &FxHashMap<String, Interval>,
    tail: &str,
    head: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let (Some(tail_iv), Some(head_iv)) = (intervals.get(tail), intervals.get(head)) else {
        return (vec![None], None);
    };
    let low = tail_iv.low.min(head_iv.low);
    let lim = tail_iv.lim.max(head_iv.lim);

    let mut up: Vec<Option<String>> = Vec::new();
    let mut cursor = Some(tail.to_string());
    let lca: Option<String> = loop {
        cursor = cursor.as_deref().and_then(|c| g.parent(c)).map(str::to_string);
        up.push(cursor.clone());
        let Some(candidate) = cursor.clone() else {
            break None;
        };
        let iv = &intervals[&candidate];
        if iv.low <= low && lim <= iv.lim {
            break Some(candidate);
        }
    };

    let mut down: Vec<Option<String>> = Vec::new();
    let mut cursor = head.to_string();
    loop {
        let parent = g.parent(&cursor).map(str::to_string);
        if parent == lca || parent.is_none() {
            break;
        }
        down.push(parent.clone());
        cursor = parent.expect("checked above");
    }
    down.reverse();
    up.extend(down);
    (up, lca)
}

/// Postorder `low`/`lim` intervals over the cluster forest, used for O(1)
/// ancestor tests.
fn postorder_intervals(g: &LayoutGraph) -> FxHashMap<String, Interval> {
    let mut out: FxHashMap<String, Interval> = FxHashMap::default();
    let mut lim: usize = 0;

    let roots = g.roots();
    let mut stack: Vec<(String, usize, bool)> = Vec::new();
    for root in roots.into_iter().rev() {
        stack.push((root, 0, false));
    }
    // Manual two-phase stack: first visit records `low`, second records `lim`.
    while let Some((v, low, expanded)) = stack.pop() {
        if expanded {
            out.insert(v, Interval { low, lim });
            lim += 1;
            continue;
        }
        stack.push((v.clone(), lim, true));
        for child in g.children(&v).into_iter().rev() {
            stack.push((child, 0, false));
        }
    }

    out
}
