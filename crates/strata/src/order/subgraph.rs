//! Cluster-recursive layer sorting.

use super::{barycenter, resolve_conflicts, sort, BarycenterEntry, ConstraintGraph, LayerGraph, SortResult};
use rustc_hash::FxHashMap;

/// Cluster nesting deeper than this is treated as flat; it only exists to
/// keep adversarial inputs from exhausting the stack.
const MAX_CLUSTER_DEPTH: usize = 64;

pub fn sort_subgraph(
    lg: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    bias_right: bool,
    depth: usize,
) -> SortResult {
    if depth >= MAX_CLUSTER_DEPTH {
        tracing::debug!(cluster = v, "cluster nesting too deep, keeping flat order");
        return SortResult {
            vs: flatten_descendants(lg, v),
            barycenter: None,
            weight: None,
        };
    }

    let mut movable = lg.children(v);
    let (border_left, border_right) = lg.node(v).map_or((None, None), |node| {
        (
            node.border_left.first().cloned().flatten(),
            node.border_right.first().cloned().flatten(),
        )
    });

    if let (Some(bl), Some(br)) = (border_left.as_deref(), border_right.as_deref()) {
        movable.retain(|w| w != bl && w != br);
    }

    let mut entries = barycenter(lg, &movable);

    // Nested clusters sort their own children first; their aggregate
    // barycenter then competes at this level.
    let mut subgraphs: FxHashMap<String, SortResult> = FxHashMap::default();
    for entry in &mut entries {
        if lg.children(&entry.v).is_empty() {
            continue;
        }
        let nested = sort_subgraph(lg, &entry.v, cg, bias_right, depth + 1);
        if nested.barycenter.is_some() {
            merge_barycenters(entry, &nested);
        }
        subgraphs.insert(entry.v.clone(), nested);
    }

    let mut resolved = resolve_conflicts(&entries, cg);
    for entry in &mut resolved {
        let mut vs: Vec<String> = Vec::new();
        for v in &entry.vs {
            match subgraphs.get(v) {
                Some(nested) => vs.extend(nested.vs.iter().cloned()),
                None => vs.push(v.clone()),
            }
        }
        entry.vs = vs;
    }

    let mut result = sort(&resolved, bias_right);

    if let (Some(bl), Some(br)) = (border_left, border_right) {
        let mut vs: Vec<String> = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl.clone());
        vs.append(&mut result.vs);
        vs.push(br.clone());
        result.vs = vs;

        // Pull the cluster toward its border nodes' predecessors in the
        // fixed rank.
        let bl_preds = lg.predecessors(&bl);
        if !bl_preds.is_empty() {
            let order_of = |id: &str| {
                lg.node(id)
                    .and_then(|n| n.order)
                    .unwrap_or(0) as f64
            };
            let bl_order = order_of(&bl_preds[0]);
            let br_order = lg
                .predecessors(&br)
                .first()
                .map(|p| order_of(p))
                .unwrap_or(bl_order);

            let bc = result.barycenter.unwrap_or(0.0);
            let w = result.weight.unwrap_or(0.0);
            let denom = w + 2.0;
            result.barycenter = Some((bc * w + bl_order + br_order) / denom);
            result.weight = Some(denom);
        }
    }

    result
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let Some(other_bc) = other.barycenter else {
        return;
    };
    let other_w = other.weight.unwrap_or(0.0);

    if let (Some(bc), Some(w)) = (target.barycenter, target.weight) {
        let denom = w + other_w;
        target.barycenter = Some((bc * w + other_bc * other_w) / denom);
        target.weight = Some(denom);
    } else {
        target.barycenter = Some(other_bc);
        target.weight = Some(other_w);
    }
}

fn flatten_descendants(lg: &LayerGraph, v: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut stack: Vec<String> = lg.children(v);
    stack.reverse();
    while let Some(w) = stack.pop() {
        let children = lg.children(&w);
        if children.is_empty() {
            out.push(w);
        } else {
            stack.extend(children.into_iter().rev());
        }
    }
    out
}

/// Records, for every pair of clusters adjacent in the final layer order,
/// a constraint that later ranks must keep them in the same relative order.
pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    let mut prev: FxHashMap<String, String> = FxHashMap::default();
    let mut root_prev: Option<String> = None;

    for v in vs {
        let mut child = lg.parent(v).map(str::to_string);
        while let Some(c) = child {
            let parent = lg.parent(&c).map(str::to_string);

            let prev_child = match parent.as_deref() {
                Some(p) => prev.insert(p.to_string(), c.clone()),
                None => root_prev.replace(c.clone()),
            };

            if let Some(prev_child) = prev_child {
                if prev_child != c {
                    cg.set_edge(prev_child, c);
                    break;
                }
            }

            child = parent;
        }
    }
}
