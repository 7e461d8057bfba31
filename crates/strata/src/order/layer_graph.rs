//! Per-rank layer graphs.
//!
//! A layer graph holds one rank's movable nodes (plus the clusters spanning
//! that rank) and an aggregated weighted edge from every fixed neighbor-rank
//! node into its movable endpoints. A sweep sorts each layer graph in rank
//! order, so barycenters always refer to an already ordered rank.

use crate::model::NodeAttrs;
use crate::LayoutGraph;
use strata_graph::{Graph, GraphOptions};

/// Which edges connect a layer to the already ordered rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    InEdges,
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerMeta {
    pub root: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerEdge {
    pub weight: f64,
}

pub type LayerGraph = Graph<NodeAttrs, LayerEdge, LayerMeta>;

/// Cluster-contiguity constraints accumulated across a sweep.
pub type ConstraintGraph = Graph<(), (), ()>;

pub fn build_layer_graph(g: &LayoutGraph, rank: i32, relation: Relation) -> LayerGraph {
    let root = fresh_root(g);
    let mut lg: LayerGraph = Graph::new(GraphOptions {
        directed: true,
        multigraph: false,
        compound: true,
    });
    lg.set_graph(LayerMeta { root: root.clone() });
    lg.set_node(root.clone(), NodeAttrs::default());

    for v in g.node_ids() {
        let Some(node) = g.node(&v) else { continue };
        let on_rank = node.rank == Some(rank);
        let spans_rank = node.min_rank.is_some_and(|min| min <= rank)
            && node.max_rank.is_some_and(|max| rank <= max);
        if !on_rank && !spans_rank {
            continue;
        }

        lg.set_node(v.clone(), node.clone());
        let parent = g
            .parent(&v)
            .map(str::to_string)
            .unwrap_or_else(|| root.clone());
        lg.set_parent(v.clone(), parent);

        // Incident edges from the fixed rank are folded into one weighted
        // edge per neighbor.
        let incident = match relation {
            Relation::InEdges => g.in_edges(&v, None),
            Relation::OutEdges => g.out_edges(&v, None),
        };
        for e in incident {
            let u = if e.tail == v {
                e.head.clone()
            } else {
                e.tail.clone()
            };
            // Fixed-rank neighbors keep their real labels; barycenters read
            // their `order` off them.
            if !lg.has_node(&u) {
                lg.set_node(u.clone(), g.node(&u).cloned().unwrap_or_default());
            }
            let existing = lg.edge(&u, &v, None).map(|l| l.weight).unwrap_or(0.0);
            let weight = g.edge_by_id(&e).map(|l| l.weight).unwrap_or(0.0);
            lg.set_edge_with(
                u,
                v.clone(),
                LayerEdge {
                    weight: weight + existing,
                },
            );
        }

        // A cluster spanning this rank is represented only by its border
        // nodes for this rank.
        if node.min_rank.is_some() {
            lg.set_node(
                v,
                NodeAttrs {
                    border_left: vec![node.border_left_at(rank).map(str::to_string)],
                    border_right: vec![node.border_right_at(rank).map(str::to_string)],
                    ..Default::default()
                },
            );
        }
    }

    lg
}

fn fresh_root(g: &LayoutGraph) -> String {
    for i in 0usize.. {
        let candidate = format!("_lgroot{i}");
        if !g.has_node(&candidate) {
            return candidate;
        }
    }
    unreachable!()
}
