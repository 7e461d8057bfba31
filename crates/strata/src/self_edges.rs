//! Self-loop handling.
//!
//! Self edges would be illegal rank constraints, so they come off the graph
//! before cycle breaking and ranking. After ordering they return as
//! order-adjacent dummies that reserve horizontal space, and after
//! positioning each dummy becomes a five-point loop hugging the node's
//! right side.

use crate::model::{DummyKind, NodeAttrs, Point, SelfEdge};
use crate::util::DummyIds;
use crate::{util, LayoutGraph};

pub fn remove_self_edges(g: &mut LayoutGraph) {
    for e in g.edge_ids() {
        if e.tail != e.head {
            continue;
        }
        let Some(label) = g.remove_edge_id(&e) else {
            continue;
        };
        if let Some(attrs) = g.node_mut(&e.tail) {
            attrs.self_edges.push(SelfEdge { edge: e, label });
        }
    }
}

pub fn insert_self_edges(g: &mut LayoutGraph) {
    let mut ids = DummyIds::default();
    let layering = util::build_layer_matrix(g);
    for layer in layering {
        let mut shift: usize = 0;
        for (idx, v) in layer.iter().enumerate() {
            let Some(rank) = g.node(v).and_then(|n| n.rank) else {
                continue;
            };
            if let Some(attrs) = g.node_mut(v) {
                attrs.order = Some(idx + shift);
            }

            let self_edges = g
                .node_mut(v)
                .map(|attrs| std::mem::take(&mut attrs.self_edges))
                .unwrap_or_default();
            for se in self_edges {
                shift += 1;
                ids.add_dummy(
                    g,
                    DummyKind::SelfLoop,
                    NodeAttrs {
                        width: se.label.width,
                        height: se.label.height,
                        rank: Some(rank),
                        order: Some(idx + shift),
                        edge: Some(se.edge.clone()),
                        edge_label: Some(se.label),
                        ..Default::default()
                    },
                    "_se",
                );
            }
        }
    }
}

pub fn position_self_edges(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(attrs) = g.node(&v).cloned() else {
            continue;
        };
        if attrs.dummy != Some(DummyKind::SelfLoop) {
            continue;
        }
        let (Some(dummy_x), Some(dummy_y)) = (attrs.x, attrs.y) else {
            continue;
        };
        let (Some(edge), Some(mut label)) = (attrs.edge, attrs.edge_label) else {
            continue;
        };
        let Some(owner) = g.node(&edge.tail) else {
            continue;
        };
        let (Some(ox), Some(oy)) = (owner.x, owner.y) else {
            continue;
        };

        let x = ox + owner.width / 2.0;
        let y = oy;
        let dx = dummy_x - x;
        let dy = owner.height / 2.0;

        label.points = vec![
            Point {
                x: x + 2.0 * dx / 3.0,
                y: y - dy,
            },
            Point {
                x: x + 5.0 * dx / 6.0,
                y: y - dy,
            },
            Point { x: x + dx, y },
            Point {
                x: x + 5.0 * dx / 6.0,
                y: y + dy,
            },
            Point {
                x: x + 2.0 * dx / 3.0,
                y: y + dy,
            },
        ];
        label.x = Some(dummy_x);
        label.y = Some(dummy_y);

        g.set_edge_id(edge, label);
        g.remove_node(&v);
    }
}
