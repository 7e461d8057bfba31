//! Exact weighted crossing count between adjacent ranks.

use crate::LayoutGraph;
use rustc_hash::FxHashMap;

/// Sum of weighted crossings over every adjacent pair of layers.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    let mut cc = 0.0;
    for pair in layering.windows(2) {
        cc += two_layer_cross_count(g, &pair[0], &pair[1]);
    }
    cc
}

/// Accumulator-tree sweep: edges are visited in (north position, south
/// position) order; for each edge the tree yields the weight of already
/// placed edges whose south endpoint lies strictly to its right, which is
/// exactly the number of weighted crossings it adds.
fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    if south.is_empty() {
        return 0.0;
    }

    let mut south_pos: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, v) in south.iter().enumerate() {
        south_pos.insert(v.as_str(), i);
    }

    struct SouthEnd {
        pos: usize,
        weight: f64,
    }

    let mut ends: Vec<SouthEnd> = Vec::new();
    for v in north {
        let mut batch: Vec<SouthEnd> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.head.as_str())?;
                let weight = g.edge_by_id(&e).map(|l| l.weight).unwrap_or(0.0);
                Some(SouthEnd { pos, weight })
            })
            .collect();
        batch.sort_by_key(|end| end.pos);
        ends.extend(batch);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree: Vec<f64> = vec![0.0; tree_size];

    let mut cc = 0.0;
    for end in ends {
        let mut index = end.pos + first_index;
        tree[index] += end.weight;
        let mut weight_sum = 0.0;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += end.weight;
        }
        cc += end.weight * weight_sum;
    }

    cc
}
