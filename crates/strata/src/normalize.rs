//! Edge normalization.
//!
//! After ranking, an edge may span several ranks. `run` replaces every such
//! edge with a chain of unit-length segments through zero-size dummy nodes
//! (the segment on the edge's label rank takes the label's size instead) and
//! returns a [`NormalizeLog`] of chain heads. `undo` collapses each chain
//! back into the original edge, harvesting the dummy coordinates into the
//! edge's `points` and the label slot's position into its label coordinates.

use crate::model::{DummyKind, EdgeAttrs, NodeAttrs, Point};
use crate::util::DummyIds;
use crate::LayoutGraph;
use strata_graph::EdgeId;

/// Undo token for [`run`]: the first dummy node of every chain, in creation
/// order.
#[derive(Debug, Clone, Default)]
pub struct NormalizeLog {
    pub chains: Vec<String>,
}

pub fn run(g: &mut LayoutGraph) -> NormalizeLog {
    let mut ids = DummyIds::default();
    let mut log = NormalizeLog::default();
    for e in g.edge_ids() {
        split_edge(g, &mut ids, &mut log, e);
    }
    log
}

fn split_edge(g: &mut LayoutGraph, ids: &mut DummyIds, log: &mut NormalizeLog, e: EdgeId) {
    let tail_rank = g.node(&e.tail).and_then(|n| n.rank).unwrap_or(0);
    let head_rank = g.node(&e.head).and_then(|n| n.rank).unwrap_or(0);
    if head_rank == tail_rank + 1 {
        return;
    }

    let Some(mut label) = g.remove_edge_id(&e) else {
        return;
    };
    label.points.clear();
    let label_rank = label.label_rank;
    let weight = label.weight;

    let mut prev = e.tail.clone();
    let mut first = true;
    for rank in (tail_rank + 1)..head_rank {
        let mut attrs = NodeAttrs {
            rank: Some(rank),
            edge: Some(e.clone()),
            edge_label: Some(label.clone()),
            ..Default::default()
        };
        let kind = if label_rank == Some(rank) {
            attrs.width = label.width;
            attrs.height = label.height;
            attrs.labelpos = Some(label.labelpos);
            DummyKind::EdgeLabelSlot
        } else {
            DummyKind::EdgeChain
        };
        let dummy = ids.add_dummy(g, kind, attrs, "_d");

        if first {
            first = false;
            log.chains.push(dummy.clone());
        }

        g.set_edge_named(
            prev,
            dummy.clone(),
            e.name.clone(),
            Some(EdgeAttrs {
                weight,
                ..Default::default()
            }),
        );
        prev = dummy;
    }

    g.set_edge_named(
        prev,
        e.head.clone(),
        e.name.clone(),
        Some(EdgeAttrs {
            weight,
            ..Default::default()
        }),
    );
}

pub fn undo(g: &mut LayoutGraph, log: NormalizeLog) {
    for start in log.chains {
        let Some(head_attrs) = g.node(&start) else {
            continue;
        };
        let Some(mut label) = head_attrs.edge_label.clone() else {
            continue;
        };
        let Some(edge) = head_attrs.edge.clone() else {
            continue;
        };

        let mut v = start;
        while let Some(attrs) = g.node(&v).cloned() {
            if attrs.dummy.is_none() {
                break;
            }
            let next = g.successors(&v).into_iter().next();

            if let (Some(x), Some(y)) = (attrs.x, attrs.y) {
                label.points.push(Point { x, y });
                if attrs.dummy == Some(DummyKind::EdgeLabelSlot) {
                    label.x = Some(x);
                    label.y = Some(y);
                    label.width = attrs.width;
                    label.height = attrs.height;
                }
            }

            g.remove_node(&v);
            match next {
                Some(next) => v = next,
                None => break,
            }
        }

        g.set_edge_id(edge, label);
    }
}
