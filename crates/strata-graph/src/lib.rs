//! Graph container APIs used by the `strata` layout engine.
//!
//! The container is deliberately close to the classic "attributed multigraph"
//! shape layout algorithms expect: string node ids, typed labels on nodes,
//! edges and the graph itself, optional parallel edges (`name` on the edge
//! id), and optional compound structure (a parent/child forest over nodes).
//!
//! Iteration order over nodes and edges is insertion order, which makes every
//! downstream algorithm deterministic without extra sorting.

mod graph;

pub mod alg;

pub use graph::{EdgeId, Graph, GraphOptions};
