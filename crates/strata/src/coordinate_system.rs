//! Rankdir handling.
//!
//! The pipeline always lays out top-to-bottom; `adjust` swaps node and edge
//! label extents into that frame before positioning, and `undo` maps the
//! finished coordinates back into the requested direction.

use crate::model::RankDir;
use crate::LayoutGraph;

pub fn adjust(g: &mut LayoutGraph) {
    match g.graph().rankdir {
        RankDir::LR | RankDir::RL => swap_width_height(g),
        RankDir::TB | RankDir::BT => {}
    }
}

pub fn undo(g: &mut LayoutGraph) {
    match g.graph().rankdir {
        RankDir::BT | RankDir::RL => reverse_y(g),
        RankDir::TB | RankDir::LR => {}
    }

    match g.graph().rankdir {
        RankDir::LR | RankDir::RL => {
            swap_xy(g);
            swap_width_height(g);
        }
        RankDir::TB | RankDir::BT => {}
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(attrs) = g.node_mut(&v) {
            std::mem::swap(&mut attrs.width, &mut attrs.height);
        }
    }
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            std::mem::swap(&mut label.width, &mut label.height);
        }
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(attrs) = g.node_mut(&v) {
            if let Some(y) = attrs.y {
                attrs.y = Some(-y);
            }
        }
    }
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            for p in &mut label.points {
                p.y = -p.y;
            }
            if let Some(y) = label.y {
                label.y = Some(-y);
            }
        }
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if let Some(attrs) = g.node_mut(&v) {
            if let (Some(x), Some(y)) = (attrs.x, attrs.y) {
                attrs.x = Some(y);
                attrs.y = Some(x);
            }
        }
    }
    for e in g.edge_ids() {
        if let Some(label) = g.edge_mut_by_id(&e) {
            for p in &mut label.points {
                std::mem::swap(&mut p.x, &mut p.y);
            }
            if let (Some(x), Some(y)) = (label.x, label.y) {
                label.x = Some(y);
                label.y = Some(x);
            }
        }
    }
}
