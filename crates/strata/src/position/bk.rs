//! Brandes–Köpf horizontal coordinate assignment.
//!
//! Four directional passes (scan from the top or bottom, align left or
//! right) each build a vertical alignment of blocks and compact them
//! horizontally; the final coordinate balances the four candidates.

use crate::model::{Align, LabelPos};
use crate::{util, LayoutGraph};
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use strata_graph::{Graph, GraphOptions};

pub type Conflicts = BTreeMap<String, BTreeSet<String>>;

/// Candidate x coordinate per node.
pub type Xs = FxHashMap<String, f64>;

/// Node-to-node mapping used for block roots and alignment rings.
pub type BlockMap = FxHashMap<String, String>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts
        .entry(v.to_string())
        .or_default()
        .insert(w.to_string());
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.get(v).is_some_and(|set| set.contains(w))
}

/// Type-1 conflicts: a non-inner edge crossing an inner (dummy-to-dummy)
/// segment. The inner segment wins; the crossing edge bends instead.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts: Conflicts = BTreeMap::new();

    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);

        // k0/k1 bracket the orders of the inner segments seen so far.
        let mut k0: usize = 0;
        let mut scan_pos: usize = 0;
        let prev_layer_len = prev_layer.len();
        let last_node = layer.last().map(String::as_str);

        for (idx, v) in layer.iter().enumerate() {
            let w = find_other_inner_segment_node(g, v);
            let k1 = w
                .as_deref()
                .and_then(|w| g.node(w))
                .and_then(|n| n.order)
                .unwrap_or(prev_layer_len);

            if w.is_some() || last_node == Some(v.as_str()) {
                for scan_node in layer.iter().skip(scan_pos).take(idx + 1 - scan_pos) {
                    for u in g.predecessors(scan_node) {
                        let Some(u_attrs) = g.node(&u) else { continue };
                        let u_pos = u_attrs.order.unwrap_or(0);
                        let both_dummies = u_attrs.is_dummy()
                            && g.node(scan_node).is_some_and(|n| n.is_dummy());
                        if (u_pos < k0 || k1 < u_pos) && !both_dummies {
                            add_conflict(&mut conflicts, &u, scan_node);
                        }
                    }
                }
                scan_pos = idx + 1;
                k0 = k1;
            }
        }
    }

    conflicts
}

/// Type-2 conflicts: inner segments crossing a cluster border alignment.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts: Conflicts = BTreeMap::new();

    fn scan(
        g: &LayoutGraph,
        conflicts: &mut Conflicts,
        south: &[String],
        south_pos: usize,
        south_end: usize,
        prev_north_border: i64,
        next_north_border: i64,
    ) {
        for v in south.iter().take(south_end).skip(south_pos) {
            if g.node(v).is_some_and(|n| n.is_dummy()) {
                for u in g.predecessors(v) {
                    let Some(u_attrs) = g.node(&u) else { continue };
                    if u_attrs.is_dummy() {
                        let u_order = u_attrs.order.unwrap_or(0) as i64;
                        if u_order < prev_north_border || u_order > next_north_border {
                            add_conflict(conflicts, &u, v);
                        }
                    }
                }
            }
        }
    }

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);

        let mut prev_north_pos: i64 = -1;
        let mut next_north_pos: Option<i64> = None;
        let mut south_pos: usize = 0;

        for (south_lookahead, v) in south.iter().enumerate() {
            if g.node(v).is_some_and(|n| n.is_border_dummy()) {
                if let Some(u) = g.predecessors(v).first() {
                    next_north_pos = g.node(u).and_then(|n| n.order).map(|o| o as i64);
                    scan(
                        g,
                        &mut conflicts,
                        south,
                        south_pos,
                        south_lookahead,
                        prev_north_pos,
                        next_north_pos.unwrap_or(-1),
                    );
                    south_pos = south_lookahead;
                    prev_north_pos = next_north_pos.unwrap_or(prev_north_pos);
                }
            }

            scan(
                g,
                &mut conflicts,
                south,
                south_pos,
                south.len(),
                next_north_pos.unwrap_or(-1),
                north.len() as i64,
            );
        }
    }

    conflicts
}

fn find_other_inner_segment_node(g: &LayoutGraph, v: &str) -> Option<String> {
    if !g.node(v).is_some_and(|n| n.is_dummy()) {
        return None;
    }
    g.predecessors(v)
        .into_iter()
        .find(|u| g.node(u).is_some_and(|n| n.is_dummy()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Block root of each node.
    pub root: BlockMap,
    /// Next node in the block ring.
    pub align: BlockMap,
}

/// Chains each node to the median non-conflicting neighbor in the fixed
/// rank; the chains form blocks sharing one x coordinate.
pub fn vertical_alignment<F>(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbors: F,
) -> Alignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut root: BlockMap = FxHashMap::default();
    let mut align: BlockMap = FxHashMap::default();
    let mut pos: FxHashMap<String, usize> = FxHashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.clone(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: i64 = -1;
        for v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(usize::MAX));

            let mp = (ws.len() - 1) as f64 / 2.0;
            let lo = mp.floor() as usize;
            let hi = mp.ceil() as usize;

            for w in ws.iter().take(hi + 1).skip(lo) {
                let v_align = align.get(v).cloned().unwrap_or_else(|| v.clone());
                let w_pos = pos.get(w).copied().unwrap_or(usize::MAX) as i64;
                if v_align == *v && prev_idx < w_pos && !has_conflict(conflicts, v, w) {
                    align.insert(w.clone(), v.clone());
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = w_pos;
                }
            }
        }
    }

    Alignment { root, align }
}

/// Two sweeps over the block graph: minimal coordinates from predecessors,
/// then non-border blocks relax toward successors to close slack.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &BlockMap,
    align: &BlockMap,
    reverse_sep: bool,
) -> Xs {
    let mut xs: Xs = FxHashMap::default();
    let block_g = build_block_graph(g, layering, root, reverse_sep);
    let border_side = if reverse_sep {
        crate::model::BorderSide::Left
    } else {
        crate::model::BorderSide::Right
    };

    fn iterate<F, N>(block_g: &Graph<(), f64, ()>, mut assign: F, next_nodes: N)
    where
        F: FnMut(&str),
        N: Fn(&str) -> Vec<String>,
    {
        let mut stack: Vec<String> = block_g.node_ids();
        let mut visited: FxHashMap<String, bool> = FxHashMap::default();

        while let Some(elem) = stack.pop() {
            if visited.get(&elem).copied().unwrap_or(false) {
                assign(&elem);
                continue;
            }
            visited.insert(elem.clone(), true);
            stack.push(elem.clone());
            stack.extend(next_nodes(&elem));
        }
    }

    {
        let assign = |elem: &str| {
            let mut best = 0.0_f64;
            for e in block_g.in_edges(elem, None) {
                let sep = block_g.edge_by_id(&e).copied().unwrap_or(0.0);
                let x_tail = xs.get(&e.tail).copied().unwrap_or(0.0);
                best = best.max(x_tail + sep);
            }
            xs.insert(elem.to_string(), best);
        };
        iterate(&block_g, assign, |elem| block_g.predecessors(elem));
    }

    {
        let assign = |elem: &str| {
            let mut min = f64::INFINITY;
            for e in block_g.out_edges(elem, None) {
                let sep = block_g.edge_by_id(&e).copied().unwrap_or(0.0);
                let x_head = xs.get(&e.head).copied().unwrap_or(0.0);
                min = min.min(x_head - sep);
            }

            let Some(node) = g.node(elem) else { return };
            if min.is_finite() && node.border_side != Some(border_side) {
                let cur = xs.get(elem).copied().unwrap_or(0.0);
                xs.insert(elem.to_string(), cur.max(min));
            }
        };
        iterate(&block_g, assign, |elem| block_g.successors(elem));
    }

    // Every node takes its block root's coordinate.
    let mut out: Xs = FxHashMap::default();
    for (v, fallback_root) in align {
        let r = root.get(v).unwrap_or(fallback_root);
        out.insert(v.clone(), xs.get(r).copied().unwrap_or(0.0));
    }
    out
}

fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &BlockMap,
    reverse_sep: bool,
) -> Graph<(), f64, ()> {
    let mut block_g: Graph<(), f64, ()> = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut prev: Option<&String> = None;
        for v in layer {
            let v_root = root.get(v).cloned().unwrap_or_else(|| v.clone());
            block_g.ensure_node(v_root.clone());

            if let Some(u) = prev {
                let u_root = root.get(u).cloned().unwrap_or_else(|| u.clone());
                let prev_max = block_g.edge(&u_root, &v_root, None).copied().unwrap_or(0.0);
                let sep = separation(g, v, u, reverse_sep);
                block_g.set_edge_with(u_root, v_root, sep.max(prev_max));
            }

            prev = Some(v);
        }
    }
    block_g
}

/// Minimum center distance between order-adjacent `v` and its left neighbor
/// `u`: half widths plus node/edge separation, shifted by the label offset
/// for label-position dummies.
fn separation(g: &LayoutGraph, v: &str, u: &str, reverse_sep: bool) -> f64 {
    let v_attrs = g.node(v).cloned().unwrap_or_default();
    let u_attrs = g.node(u).cloned().unwrap_or_default();
    let nodesep = g.graph().nodesep;
    let edgesep = g.graph().edgesep;

    let mut sum = 0.0;

    sum += v_attrs.width / 2.0;
    let mut delta = match v_attrs.labelpos {
        Some(LabelPos::L) => -v_attrs.width / 2.0,
        Some(LabelPos::R) => v_attrs.width / 2.0,
        _ => 0.0,
    };
    if delta != 0.0 {
        sum += if reverse_sep { delta } else { -delta };
    }

    sum += if v_attrs.is_dummy() { edgesep } else { nodesep } / 2.0;
    sum += if u_attrs.is_dummy() { edgesep } else { nodesep } / 2.0;

    sum += u_attrs.width / 2.0;
    delta = match u_attrs.labelpos {
        Some(LabelPos::L) => u_attrs.width / 2.0,
        Some(LabelPos::R) => -u_attrs.width / 2.0,
        _ => 0.0,
    };
    if delta != 0.0 {
        sum += if reverse_sep { delta } else { -delta };
    }

    sum
}

/// The four candidate assignments, keyed by scan/align direction.
#[derive(Debug, Clone, Default)]
pub struct Candidates {
    pub ul: Xs,
    pub ur: Xs,
    pub dl: Xs,
    pub dr: Xs,
}

impl Candidates {
    pub fn get(&self, align: Align) -> &Xs {
        match align {
            Align::UpLeft => &self.ul,
            Align::UpRight => &self.ur,
            Align::DownLeft => &self.dl,
            Align::DownRight => &self.dr,
        }
    }

    fn entries(&self) -> [(Align, &Xs); 4] {
        [
            (Align::UpLeft, &self.ul),
            (Align::UpRight, &self.ur),
            (Align::DownLeft, &self.dl),
            (Align::DownRight, &self.dr),
        ]
    }

    fn entries_mut(&mut self) -> [(Align, &mut Xs); 4] {
        [
            (Align::UpLeft, &mut self.ul),
            (Align::UpRight, &mut self.ur),
            (Align::DownLeft, &mut self.dl),
            (Align::DownRight, &mut self.dr),
        ]
    }
}

pub fn find_smallest_width_alignment(g: &LayoutGraph, candidates: &Candidates) -> Xs {
    let mut best_width = f64::INFINITY;
    let mut best: Xs = FxHashMap::default();

    for (_, xs) in candidates.entries() {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, &x) in xs {
            let half = g.node(v).map(|n| n.width).unwrap_or(0.0) / 2.0;
            max = max.max(x + half);
            min = min.min(x - half);
        }
        let width = max - min;
        if width < best_width {
            best_width = width;
            best = xs.clone();
        }
    }

    best
}

/// Shifts every candidate so left-aligned ones share the reference minimum
/// and right-aligned ones the reference maximum.
pub fn align_coordinates(candidates: &mut Candidates, align_to: &Xs) {
    let to_min = align_to.values().copied().fold(f64::INFINITY, f64::min);
    let to_max = align_to.values().copied().fold(f64::NEG_INFINITY, f64::max);

    for (align, xs) in candidates.entries_mut() {
        if xs.is_empty() {
            continue;
        }
        let xs_min = xs.values().copied().fold(f64::INFINITY, f64::min);
        let xs_max = xs.values().copied().fold(f64::NEG_INFINITY, f64::max);

        let delta = match align {
            Align::UpLeft | Align::DownLeft => to_min - xs_min,
            Align::UpRight | Align::DownRight => to_max - xs_max,
        };
        if delta != 0.0 {
            for x in xs.values_mut() {
                *x += delta;
            }
        }
    }
}

/// Balanced coordinate: the forced alignment's value when one is configured,
/// otherwise the mean of the two middle candidates.
pub fn balance(candidates: &Candidates, align: Option<Align>) -> Xs {
    let mut out: Xs = FxHashMap::default();

    if let Some(align) = align {
        for (v, &x) in candidates.get(align) {
            out.insert(v.clone(), x);
        }
        return out;
    }

    for v in candidates.ul.keys() {
        let mut vals: Vec<f64> = candidates
            .entries()
            .iter()
            .filter_map(|(_, xs)| xs.get(v).copied())
            .collect();
        vals.sort_by(f64::total_cmp);
        if vals.len() == 4 {
            out.insert(v.clone(), (vals[1] + vals[2]) / 2.0);
        }
    }
    out
}

pub fn position_x(g: &LayoutGraph) -> Xs {
    let layering = util::build_layer_matrix(g);
    position_x_with_layering(g, &layering)
}

pub fn position_x_with_layering(g: &LayoutGraph, layering: &[Vec<String>]) -> Xs {
    let mut conflicts = find_type1_conflicts(g, layering);
    for (v, ws) in find_type2_conflicts(g, layering) {
        for w in ws {
            add_conflict(&mut conflicts, &v, &w);
        }
    }

    let mut candidates = Candidates::default();
    for up in [true, false] {
        let vertical: Vec<Vec<String>> = if up {
            layering.to_vec()
        } else {
            layering.iter().rev().cloned().collect()
        };

        for left in [true, false] {
            let adjusted: Vec<Vec<String>> = if left {
                vertical.clone()
            } else {
                vertical
                    .iter()
                    .map(|row| row.iter().rev().cloned().collect())
                    .collect()
            };

            let alignment = vertical_alignment(&adjusted, &conflicts, |v| {
                if up {
                    g.predecessors(v)
                } else {
                    g.successors(v)
                }
            });

            let mut xs =
                horizontal_compaction(g, &adjusted, &alignment.root, &alignment.align, !left);
            if !left {
                for x in xs.values_mut() {
                    *x = -*x;
                }
            }

            let slot = match (up, left) {
                (true, true) => &mut candidates.ul,
                (true, false) => &mut candidates.ur,
                (false, true) => &mut candidates.dl,
                (false, false) => &mut candidates.dr,
            };
            *slot = xs;
        }
    }

    let smallest = find_smallest_width_alignment(g, &candidates);
    align_coordinates(&mut candidates, &smallest);
    balance(&candidates, g.graph().align)
}
