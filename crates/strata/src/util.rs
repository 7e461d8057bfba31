//! Shared helpers for the pipeline passes.

use crate::model::{DummyKind, NodeAttrs, Point, Rect};
use crate::LayoutGraph;
use rustc_hash::FxHashMap;
use strata_graph::GraphOptions;

/// Per-pass generator of fresh dummy node ids. Ids follow the
/// `prefix`, `prefix1`, `prefix2`, ... scheme and never collide with nodes
/// already present in the graph, so repeated layouts are reproducible.
#[derive(Default)]
pub struct DummyIds {
    next_suffix: FxHashMap<&'static str, usize>,
}

impl DummyIds {
    pub fn fresh(&mut self, g: &LayoutGraph, prefix: &'static str) -> String {
        let mut next = match self.next_suffix.get(prefix).copied() {
            Some(v) => v,
            None => {
                self.next_suffix.insert(prefix, 1);
                if !g.has_node(prefix) {
                    return prefix.to_string();
                }
                1
            }
        };
        loop {
            let id = format!("{prefix}{next}");
            next += 1;
            if !g.has_node(&id) {
                self.next_suffix.insert(prefix, next);
                return id;
            }
        }
    }

    pub fn add_dummy(
        &mut self,
        g: &mut LayoutGraph,
        kind: DummyKind,
        mut attrs: NodeAttrs,
        prefix: &'static str,
    ) -> String {
        let id = self.fresh(g, prefix);
        attrs.dummy = Some(kind);
        g.set_node(id.clone(), attrs);
        id
    }
}

/// Point where the segment from `rect`'s center toward `point` leaves the
/// rectangle. Asking from the center itself is geometrically undefined.
pub fn intersect_rect(rect: Rect, point: Point) -> Point {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        panic!("cannot intersect a rectangle from its own center");
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        // Leaves through the top or bottom edge.
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point {
        x: rect.x + sx,
        y: rect.y + sy,
    }
}

/// Ranked nodes as a matrix: one row per rank, sorted by `order` within the
/// row. Ranks are assumed normalized to start at 0.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut max_rank: i32 = i32::MIN;
    let mut rows: FxHashMap<i32, Vec<(usize, String)>> = FxHashMap::default();
    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        let Some(rank) = node.rank else { continue };
        rows.entry(rank)
            .or_default()
            .push((node.order.unwrap_or(0), v));
        max_rank = max_rank.max(rank);
    }

    if max_rank == i32::MIN {
        return Vec::new();
    }

    let mut out: Vec<Vec<String>> = Vec::with_capacity((max_rank + 1).max(0) as usize);
    for rank in 0..=max_rank {
        let mut row = rows.remove(&rank).unwrap_or_default();
        row.sort_by_key(|(order, _)| *order);
        out.push(row.into_iter().map(|(_, v)| v).collect());
    }
    out
}

/// Shifts all ranks so the smallest becomes 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let mut min_rank = i32::MAX;
    for v in g.node_ids() {
        if let Some(rank) = g.node(&v).and_then(|n| n.rank) {
            min_rank = min_rank.min(rank);
        }
    }
    if min_rank == i32::MAX {
        return;
    }
    for v in g.node_ids() {
        if let Some(n) = g.node_mut(&v) {
            if let Some(rank) = n.rank {
                n.rank = Some(rank - min_rank);
            }
        }
    }
}

/// Closes rank gaps left behind by the nesting skeleton. `factor` is the
/// node-rank spacing the nesting pass introduced; only gap ranks that are not
/// multiples of it are compacted away.
pub fn remove_empty_ranks(g: &mut LayoutGraph, factor: usize) {
    if factor == 0 {
        return;
    }

    let mut offset = i32::MAX;
    for v in g.node_ids() {
        if let Some(rank) = g.node(&v).and_then(|n| n.rank) {
            offset = offset.min(rank);
        }
    }
    if offset == i32::MAX {
        return;
    }

    let mut max_idx: usize = 0;
    let mut layers: FxHashMap<usize, Vec<String>> = FxHashMap::default();
    for v in g.node_ids() {
        let Some(rank) = g.node(&v).and_then(|n| n.rank) else {
            continue;
        };
        let idx = (rank - offset) as usize;
        max_idx = max_idx.max(idx);
        layers.entry(idx).or_default().push(v);
    }

    let mut delta: i32 = 0;
    for i in 0..=max_idx {
        match layers.get(&i) {
            None if i % factor != 0 => delta -= 1,
            None => {}
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(n) = g.node_mut(v) {
                        if let Some(rank) = n.rank {
                            n.rank = Some(rank + delta);
                        }
                    }
                }
            }
            Some(_) => {}
        }
    }
}

/// Collapses a multigraph into a simple weighted graph: parallel edges merge
/// into one edge carrying the summed weight and the largest minlen. Compound
/// structure is dropped.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified = LayoutGraph::new(GraphOptions {
        directed: true,
        multigraph: false,
        compound: false,
    });
    simplified.set_graph(g.graph().clone());

    for v in g.node_ids() {
        if let Some(attrs) = g.node(&v) {
            simplified.set_node(v, attrs.clone());
        }
    }

    for e in g.edge_ids() {
        let Some(label) = g.edge_by_id(&e) else {
            continue;
        };
        let (weight, minlen) = match simplified.edge(&e.tail, &e.head, None) {
            Some(existing) => (existing.weight + label.weight, existing.minlen.max(label.minlen)),
            None => (label.weight, label.minlen),
        };
        simplified.set_edge_with(
            e.tail.clone(),
            e.head.clone(),
            crate::model::EdgeAttrs::weighted(minlen, weight),
        );
    }

    simplified
}

/// A view of the graph without cluster container nodes; edges and leaf nodes
/// are kept as-is.
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut flat = LayoutGraph::new(GraphOptions {
        directed: true,
        multigraph: g.options().multigraph,
        compound: false,
    });
    flat.set_graph(g.graph().clone());

    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            if let Some(attrs) = g.node(&v) {
                flat.set_node(v, attrs.clone());
            }
        }
    }

    for e in g.edge_ids() {
        if let Some(label) = g.edge_by_id(&e) {
            flat.set_edge_named(
                e.tail.clone(),
                e.head.clone(),
                e.name.clone(),
                Some(label.clone()),
            );
        }
    }

    flat
}

/// Largest assigned rank, or `None` when nothing is ranked yet.
pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    let mut out: Option<i32> = None;
    for v in g.node_ids() {
        if let Some(rank) = g.node(&v).and_then(|n| n.rank) {
            out = Some(out.map_or(rank, |m: i32| m.max(rank)));
        }
    }
    out
}
