use super::LayerGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    /// Weighted mean order of the fixed-rank neighbors; `None` when the node
    /// has no neighbor there.
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

pub fn barycenter(lg: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let in_edges = lg.in_edges(v, None);
            if in_edges.is_empty() {
                return BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                };
            }

            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in in_edges {
                let edge_weight = lg.edge_by_id(&e).map(|l| l.weight).unwrap_or(0.0);
                let u_order = lg
                    .node(&e.tail)
                    .and_then(|n| n.order)
                    .map(|o| o as f64)
                    .unwrap_or(0.0);
                sum += edge_weight * u_order;
                weight += edge_weight;
            }

            BarycenterEntry {
                v: v.clone(),
                barycenter: Some(sum / weight),
                weight: Some(weight),
            }
        })
        .collect()
}
