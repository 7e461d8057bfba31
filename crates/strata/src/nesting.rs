//! Nesting skeleton for compound graphs.
//!
//! Wraps every cluster in border-top/border-bottom dummies and hangs the
//! whole forest from a synthetic root, so the ranker sees a connected flat
//! graph whose rank solution keeps each cluster in a contiguous, properly
//! nested band. `run` returns a [`NestingLog`]; `cleanup` consumes it to
//! remove the skeleton again, leaving only the border nodes for the later
//! min/max-rank computation.

use crate::model::{DummyKind, EdgeAttrs, NodeAttrs};
use crate::util::DummyIds;
use crate::LayoutGraph;
use rustc_hash::FxHashMap;
use strata_graph::EdgeId;

/// Undo token for [`run`].
#[derive(Debug, Clone)]
pub struct NestingLog {
    /// The synthetic root node.
    pub root: String,
    /// Skeleton edges between border nodes (root-incident edges disappear
    /// with the root itself).
    pub skeleton: Vec<EdgeId>,
    /// Rank spacing introduced between real nodes; empty-rank removal must
    /// preserve multiples of it.
    pub node_rank_factor: usize,
}

pub fn run(g: &mut LayoutGraph) -> NestingLog {
    let mut ids = DummyIds::default();
    let root = ids.add_dummy(g, DummyKind::NestRoot, NodeAttrs::default(), "_root");

    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1).saturating_sub(1);
    let node_sep = 2 * height + 1;

    // Real edges stretch so every skeleton level fits between two ranks.
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            label.minlen *= node_sep;
        }
    }

    // Border-to-content edges must dominate any real edge in the rank
    // optimizer; the skeleton itself must not distort it.
    let weight = sum_weights(g) + 1.0;

    // Children before parents, so a cluster can wire its children's borders
    // the moment it is processed.
    let mut skeleton: Vec<EdgeId> = Vec::new();
    for v in forest_postorder(g, &root) {
        wrap_node(g, &root, node_sep, weight, height, &depths, &mut ids, &mut skeleton, &v);
    }

    NestingLog {
        root,
        skeleton,
        node_rank_factor: node_sep,
    }
}

pub fn cleanup(g: &mut LayoutGraph, log: NestingLog) {
    g.remove_node(&log.root);
    for e in log.skeleton {
        g.remove_edge_id(&e);
    }
}

#[allow(clippy::too_many_arguments)]
fn wrap_node(
    g: &mut LayoutGraph,
    root: &str,
    node_sep: usize,
    weight: f64,
    height: usize,
    depths: &FxHashMap<String, usize>,
    ids: &mut DummyIds,
    skeleton: &mut Vec<EdgeId>,
    v: &str,
) {
    let children = g.children(v);
    if children.is_empty() {
        g.set_edge_with(root, v, EdgeAttrs::weighted(node_sep, 0.0));
        return;
    }

    let top = ids.add_dummy(g, DummyKind::Border, NodeAttrs::default(), "_bt");
    let bottom = ids.add_dummy(g, DummyKind::Border, NodeAttrs::default(), "_bb");
    g.set_parent(top.clone(), v);
    g.set_parent(bottom.clone(), v);
    if let Some(attrs) = g.node_mut(v) {
        attrs.border_top = Some(top.clone());
        attrs.border_bottom = Some(bottom.clone());
    }

    let depth_v = depths.get(v).copied().unwrap_or(1);
    for child in children {
        let (child_top, child_bottom, child_is_cluster) = match g.node(&child) {
            Some(attrs) => (
                attrs.border_top.clone().unwrap_or_else(|| child.clone()),
                attrs.border_bottom.clone().unwrap_or_else(|| child.clone()),
                attrs.border_top.is_some(),
            ),
            None => (child.clone(), child.clone(), false),
        };

        let this_weight = if child_is_cluster { weight } else { 2.0 * weight };
        let minlen = if child_top != child_bottom {
            1
        } else {
            height.saturating_sub(depth_v) + 1
        };

        g.set_edge_with(
            top.clone(),
            child_top.clone(),
            EdgeAttrs::weighted(minlen, this_weight),
        );
        skeleton.push(EdgeId::new(top.clone(), child_top, None::<String>));

        g.set_edge_with(
            child_bottom.clone(),
            bottom.clone(),
            EdgeAttrs::weighted(minlen, this_weight),
        );
        skeleton.push(EdgeId::new(child_bottom, bottom.clone(), None::<String>));
    }

    if g.parent(v).is_none() {
        g.set_edge_with(
            root,
            top.clone(),
            EdgeAttrs::weighted(height + depth_v, 0.0),
        );
        skeleton.push(EdgeId::new(root, top, None::<String>));
    }
}

/// Postorder over the cluster forest, excluding the synthetic root.
fn forest_postorder(g: &LayoutGraph, root: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<(String, bool)> = g
        .roots()
        .into_iter()
        .filter(|v| v != root)
        .rev()
        .map(|v| (v, false))
        .collect();
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            out.push(v);
            continue;
        }
        stack.push((v.clone(), true));
        for child in g.children(&v).into_iter().rev() {
            stack.push((child, false));
        }
    }
    out
}

/// Depth of every node in the cluster forest, 1-based at the top level.
fn tree_depths(g: &LayoutGraph) -> FxHashMap<String, usize> {
    let mut out: FxHashMap<String, usize> = FxHashMap::default();
    let mut stack: Vec<(String, usize)> = g.roots().into_iter().map(|v| (v, 1)).collect();
    stack.reverse();
    while let Some((v, depth)) = stack.pop() {
        for child in g.children(&v) {
            stack.push((child, depth + 1));
        }
        out.insert(v, depth);
    }
    out
}

fn sum_weights(g: &LayoutGraph) -> f64 {
    let mut out = 0.0;
    for e in g.edge_ids() {
        if let Some(label) = g.edge_by_id(&e) {
            out += label.weight;
        }
    }
    out
}
