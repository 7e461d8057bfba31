//! The layout pipeline.
//!
//! One mutable graph flows through every pass in a fixed order; each pass
//! both consumes and augments the attributes left by its predecessors, and
//! every pass that creates dummy nodes has a matching undo before the graph
//! is handed back.

use crate::model::{DummyKind, LabelPos, NodeAttrs, Point, RankDir, Rect};
use crate::util::DummyIds;
use crate::{
    acyclic, border_segments, coordinate_system, nesting, normalize, order,
    parent_dummy_chains, position, rank, self_edges, util, LayoutGraph,
};
use strata_graph::EdgeId;

/// Lays the graph out in place: every node gains `x`/`y` (clusters also
/// `width`/`height`), every edge gains `points` (and label coordinates when
/// it carries a sized label), and the graph config gains the bounding box.
pub fn layout(g: &mut LayoutGraph) {
    let span = tracing::debug_span!("layout", nodes = g.node_count(), edges = g.edge_count());
    let _guard = span.enter();

    make_space_for_edge_labels(g);
    self_edges::remove_self_edges(g);
    acyclic::run(g);

    let nesting_log = nesting::run(g);

    // Cluster container nodes take no part in ranking; border nodes carry
    // their constraints.
    let mut rank_graph = util::as_non_compound_graph(g);
    rank::rank(&mut rank_graph);
    for v in g.node_ids() {
        if !g.children(&v).is_empty() {
            continue;
        }
        if let Some(r) = rank_graph.node(&v).and_then(|n| n.rank) {
            if let Some(attrs) = g.node_mut(&v) {
                attrs.rank = Some(r);
            }
        }
    }

    let proxies = inject_edge_label_proxies(g);
    util::remove_empty_ranks(g, nesting_log.node_rank_factor);
    nesting::cleanup(g, nesting_log);
    util::normalize_ranks(g);
    assign_rank_min_max(g);
    remove_edge_label_proxies(g, proxies);

    let chains = normalize::run(g);
    parent_dummy_chains::parent_dummy_chains(g, &chains);
    border_segments::add_border_segments(g);

    order::order(g);
    self_edges::insert_self_edges(g);

    coordinate_system::adjust(g);
    position::position(g);
    self_edges::position_self_edges(g);

    remove_border_nodes(g);
    normalize::undo(g, chains);
    fixup_edge_label_coords(g);
    coordinate_system::undo(g);
    translate_graph(g);
    assign_node_intersects(g);
    reverse_points_for_reversed_edges(g);
    acyclic::undo(g);
}

/// Doubles every minlen and halves ranksep so each rank boundary gains a
/// mid-rank where edge labels can live; non-centered labels get padding to
/// push them off the edge.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    g.graph_mut().ranksep /= 2.0;
    for e in g.edge_ids() {
        let Some(label) = g.edge_mut_by_id(&e) else {
            continue;
        };
        label.minlen *= 2;
        if label.labelpos != LabelPos::C {
            match rankdir {
                RankDir::TB | RankDir::BT => label.width += label.labeloffset,
                RankDir::LR | RankDir::RL => label.height += label.labeloffset,
            }
        }
    }
}

/// Reserves the mid-rank of every labeled edge with a proxy dummy, so
/// empty-rank removal cannot collapse the rank the label needs.
fn inject_edge_label_proxies(g: &mut LayoutGraph) -> Vec<String> {
    let mut ids = DummyIds::default();
    let mut to_proxy: Vec<(EdgeId, i32)> = Vec::new();
    for e in g.edge_ids() {
        if !g.edge_by_id(&e).is_some_and(|l| l.has_label()) {
            continue;
        }
        let (Some(tail_rank), Some(head_rank)) = (
            g.node(&e.tail).and_then(|n| n.rank),
            g.node(&e.head).and_then(|n| n.rank),
        ) else {
            continue;
        };
        let rank = (head_rank - tail_rank) / 2 + tail_rank;
        to_proxy.push((e, rank));
    }

    let mut proxies: Vec<String> = Vec::new();
    for (e, rank) in to_proxy {
        let id = ids.add_dummy(
            g,
            DummyKind::EdgeProxy,
            NodeAttrs {
                rank: Some(rank),
                edge: Some(e),
                ..Default::default()
            },
            "_ep",
        );
        proxies.push(id);
    }
    proxies
}

fn remove_edge_label_proxies(g: &mut LayoutGraph, proxies: Vec<String>) {
    for v in proxies {
        let Some(attrs) = g.node(&v) else { continue };
        if attrs.dummy != Some(DummyKind::EdgeProxy) {
            continue;
        }
        let rank = attrs.rank;
        if let Some(e) = attrs.edge.clone() {
            if let Some(label) = g.edge_mut_by_id(&e) {
                label.label_rank = rank;
            }
        }
        g.remove_node(&v);
    }
}

/// Copies the rank band of every cluster off its nesting border nodes.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some((top, bottom)) = g
            .node(&v)
            .and_then(|n| Some((n.border_top.clone()?, n.border_bottom.clone()?)))
        else {
            continue;
        };
        let (Some(min_rank), Some(max_rank)) = (
            g.node(&top).and_then(|n| n.rank),
            g.node(&bottom).and_then(|n| n.rank),
        ) else {
            continue;
        };
        if let Some(attrs) = g.node_mut(&v) {
            attrs.min_rank = Some(min_rank);
            attrs.max_rank = Some(max_rank);
        }
    }
}

/// Derives cluster geometry from the border dummies, then drops them.
/// Border lists are rank-indexed, so the rightmost extent lives at
/// `max_rank`.
fn remove_border_nodes(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if g.children(&v).is_empty() {
            continue;
        }
        let Some(attrs) = g.node(&v) else { continue };
        let (Some(top), Some(bottom), Some(max_rank)) = (
            attrs.border_top.clone(),
            attrs.border_bottom.clone(),
            attrs.max_rank,
        ) else {
            continue;
        };
        let left = attrs.border_left_at(max_rank).map(str::to_string);
        let right = attrs.border_right_at(max_rank).map(str::to_string);
        let (Some(left), Some(right)) = (left, right) else {
            continue;
        };

        let coords = |id: &str| -> Option<(f64, f64)> {
            let n = g.node(id)?;
            Some((n.x?, n.y?))
        };
        let (Some(t), Some(b), Some(l), Some(r)) =
            (coords(&top), coords(&bottom), coords(&left), coords(&right))
        else {
            continue;
        };

        let width = (r.0 - l.0).abs();
        let height = (b.1 - t.1).abs();
        if let Some(attrs) = g.node_mut(&v) {
            attrs.width = width;
            attrs.height = height;
            attrs.x = Some(l.0 + width / 2.0);
            attrs.y = Some(t.1 + height / 2.0);
        }
    }

    for v in g.node_ids() {
        if g.node(&v).is_some_and(|n| n.is_border_dummy()) {
            g.remove_node(&v);
        }
    }
}

/// Moves l/r edge labels sideways off their edge and removes the width
/// padding added up front.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        let Some(label) = g.edge_mut_by_id(&e) else {
            continue;
        };
        let Some(x) = label.x else { continue };
        if matches!(label.labelpos, LabelPos::L | LabelPos::R) {
            label.width -= label.labeloffset;
        }
        match label.labelpos {
            LabelPos::L => label.x = Some(x - label.width / 2.0 - label.labeloffset),
            LabelPos::R => label.x = Some(x + label.width / 2.0 + label.labeloffset),
            LabelPos::C => {}
        }
    }
}

/// Shifts everything so the top-left of the drawing sits at the requested
/// margins, and records the overall bounding box on the graph config.
fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    {
        let mut cover = |x: f64, y: f64, w: f64, h: f64| {
            min_x = min_x.min(x - w / 2.0);
            max_x = max_x.max(x + w / 2.0);
            min_y = min_y.min(y - h / 2.0);
            max_y = max_y.max(y + h / 2.0);
        };
        for v in g.node_ids() {
            let Some(n) = g.node(&v) else { continue };
            if let (Some(x), Some(y)) = (n.x, n.y) {
                cover(x, y, n.width, n.height);
            }
        }
        for e in g.edge_ids() {
            let Some(label) = g.edge_by_id(&e) else { continue };
            if let (Some(x), Some(y)) = (label.x, label.y) {
                cover(x, y, label.width, label.height);
            }
        }
    }

    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }

    let marginx = g.graph().marginx;
    let marginy = g.graph().marginy;
    min_x -= marginx;
    min_y -= marginy;

    for v in g.node_ids() {
        if let Some(n) = g.node_mut(&v) {
            if let Some(x) = n.x {
                n.x = Some(x - min_x);
            }
            if let Some(y) = n.y {
                n.y = Some(y - min_y);
            }
        }
    }
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            for p in &mut label.points {
                p.x -= min_x;
                p.y -= min_y;
            }
            if let Some(x) = label.x {
                label.x = Some(x - min_x);
            }
            if let Some(y) = label.y {
                label.y = Some(y - min_y);
            }
        }
    }

    let config = g.graph_mut();
    config.width = max_x - min_x + marginx;
    config.height = max_y - min_y + marginy;
}

/// Trims every edge's polyline to start and end on its endpoint rectangles.
fn assign_node_intersects(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        let Some(tail) = g.node(&e.tail).cloned() else {
            continue;
        };
        let Some(head) = g.node(&e.head).cloned() else {
            continue;
        };
        let (Some(tx), Some(ty)) = (tail.x, tail.y) else {
            continue;
        };
        let (Some(hx), Some(hy)) = (head.x, head.y) else {
            continue;
        };
        let tail_rect = Rect {
            x: tx,
            y: ty,
            width: tail.width,
            height: tail.height,
        };
        let head_rect = Rect {
            x: hx,
            y: hy,
            width: head.width,
            height: head.height,
        };

        let Some(label) = g.edge_mut_by_id(&e) else {
            continue;
        };
        let (p1, p2) = match (label.points.first(), label.points.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (Point { x: hx, y: hy }, Point { x: tx, y: ty }),
        };
        label
            .points
            .insert(0, util::intersect_rect(tail_rect, p1));
        label.points.push(util::intersect_rect(head_rect, p2));
    }
}

fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            if label.reversed {
                label.points.reverse();
            }
        }
    }
}
