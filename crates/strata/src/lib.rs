//! Layered (Sugiyama-style) layout for directed graphs.
//!
//! Given a graph whose nodes carry sizes and whose edges carry spacing and
//! label metadata, [`layout`] assigns every node an `(x, y)` position and
//! every edge a polyline, minimizing crossings and edge length while
//! honoring node separation, edge-label space, and nested cluster
//! containment.
//!
//! ```
//! use strata::{layout, EdgeAttrs, LayoutConfig, LayoutGraph, NodeAttrs};
//! use strata_graph::GraphOptions;
//!
//! let mut g = LayoutGraph::new(GraphOptions {
//!     directed: true,
//!     multigraph: true,
//!     compound: true,
//! });
//! g.set_graph(LayoutConfig::default());
//! g.set_node("a", NodeAttrs::sized(50.0, 100.0));
//! g.set_node("b", NodeAttrs::sized(75.0, 200.0));
//! g.set_edge_with("a", "b", EdgeAttrs::default());
//!
//! layout(&mut g);
//! assert!(g.node("a").unwrap().x.is_some());
//! ```

pub use strata_graph as graph;

pub mod acyclic;
pub mod border_segments;
pub mod config;
pub mod coordinate_system;
pub mod greedy_fas;
mod layout;
pub mod model;
pub mod nesting;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use layout::layout;
pub use model::{
    Acyclicer, Align, BorderSide, DummyKind, EdgeAttrs, LabelPos, LayoutConfig, NodeAttrs, Point,
    RankDir, Ranker, Rect, SelfEdge,
};

/// The concrete graph type the pipeline operates on.
pub type LayoutGraph = strata_graph::Graph<NodeAttrs, EdgeAttrs, LayoutConfig>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
