//! Left/right border dummies for clusters.
//!
//! After ranks are final, every cluster gets one left and one right border
//! dummy per rank in its `min_rank..=max_rank` band, chained top to bottom.
//! Ordering keeps cluster content between the flanks, and the bounding-box
//! recovery reads cluster extents off these nodes.

use crate::model::{BorderSide, DummyKind, NodeAttrs};
use crate::util::DummyIds;
use crate::LayoutGraph;

pub fn add_border_segments(g: &mut LayoutGraph) {
    let mut ids = DummyIds::default();

    let mut stack: Vec<String> = g.roots();
    let mut clusters: Vec<String> = Vec::new();
    while let Some(v) = stack.pop() {
        let children = g.children(&v);
        if !children.is_empty() {
            clusters.push(v);
        }
        stack.extend(children);
    }

    for v in clusters {
        let Some((min_rank, max_rank)) = g
            .node(&v)
            .and_then(|n| Some((n.min_rank?, n.max_rank?)))
        else {
            continue;
        };

        if let Some(attrs) = g.node_mut(&v) {
            let len = max_rank.max(0) as usize + 1;
            attrs.border_left = vec![None; len];
            attrs.border_right = vec![None; len];
        }

        for rank in min_rank..=max_rank {
            add_border_node(g, &mut ids, BorderSide::Left, "_bl", &v, rank);
            add_border_node(g, &mut ids, BorderSide::Right, "_br", &v, rank);
        }
    }
}

fn add_border_node(
    g: &mut LayoutGraph,
    ids: &mut DummyIds,
    side: BorderSide,
    prefix: &'static str,
    cluster: &str,
    rank: i32,
) {
    let prev = g
        .node(cluster)
        .and_then(|n| match side {
            BorderSide::Left => n.border_left_at(rank - 1),
            BorderSide::Right => n.border_right_at(rank - 1),
        })
        .map(str::to_string);

    let curr = ids.add_dummy(
        g,
        DummyKind::Border,
        NodeAttrs {
            rank: Some(rank),
            border_side: Some(side),
            ..Default::default()
        },
        prefix,
    );

    if let Some(attrs) = g.node_mut(cluster) {
        let idx = rank.max(0) as usize;
        let list = match side {
            BorderSide::Left => &mut attrs.border_left,
            BorderSide::Right => &mut attrs.border_right,
        };
        if idx >= list.len() {
            list.resize(idx + 1, None);
        }
        list[idx] = Some(curr.clone());
    }

    g.set_parent(curr.clone(), cluster);
    if let Some(prev) = prev {
        g.set_edge_with(prev, curr, crate::model::EdgeAttrs::weighted(1, 1.0));
    }
}
