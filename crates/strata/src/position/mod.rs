//! Coordinate assignment: y from rank heights, x from Brandes–Köpf.

pub mod bk;

use crate::{util, LayoutGraph};

pub fn position(g: &mut LayoutGraph) {
    position_y(g);
    let xs = bk::position_x(g);
    for (v, x) in xs {
        if let Some(attrs) = g.node_mut(&v) {
            attrs.x = Some(x);
        }
    }
}

/// Centers each rank's nodes on a row as tall as the rank's tallest node;
/// rows are `ranksep` apart.
fn position_y(g: &mut LayoutGraph) {
    let layering = util::build_layer_matrix(g);
    let ranksep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v).map(|n| n.height))
            .fold(0.0_f64, f64::max);
        let y = prev_y + max_height / 2.0;
        for v in &layer {
            if let Some(attrs) = g.node_mut(v) {
                attrs.y = Some(y);
            }
        }
        prev_y += max_height + ranksep;
    }
}
