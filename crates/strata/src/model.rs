//! Label types threaded through the layout pipeline.
//!
//! The caller fills in sizes and spacing; everything else (`rank`, `order`,
//! coordinates, dummy bookkeeping) is written by pipeline passes and the
//! dummy-only fields are gone again by the time `layout` returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strata_graph::EdgeId;

/// Primary layout direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankDir {
    /// Top to bottom (default).
    #[default]
    TB,
    /// Bottom to top.
    BT,
    /// Left to right.
    LR,
    /// Right to left.
    RL,
}

/// Forced Brandes–Köpf alignment. Unset means balanced between all four.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

/// Cycle-breaking strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Acyclicer {
    /// Single DFS; back edges form the feedback set.
    #[default]
    DepthFirst,
    /// Weighted Eades–Lin–Smyth heuristic.
    Greedy,
}

/// Layer-assignment strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ranker {
    #[default]
    NetworkSimplex,
    TightTree,
    LongestPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LabelPos {
    L,
    C,
    #[default]
    R,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// What a synthetic node stands in for. Real nodes carry no kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyKind {
    /// One link of a normalized multi-rank edge chain.
    EdgeChain,
    /// The chain link that reserves space for the edge label.
    EdgeLabelSlot,
    /// Pre-normalization placeholder keeping a rank alive for a label.
    EdgeProxy,
    /// Cluster border node (top/bottom from nesting, left/right per rank).
    Border,
    /// Placeholder that reserves horizontal space for a self loop.
    SelfLoop,
    /// The synthetic root the nesting pass hangs clusters from.
    NestRoot,
}

/// Which flank of a cluster a border dummy sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderSide {
    Left,
    Right,
}

/// A self edge lifted off the graph before ranking, waiting to be re-inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfEdge {
    pub edge: EdgeId,
    pub label: EdgeAttrs,
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub rankdir: RankDir,
    pub align: Option<Align>,
    pub nodesep: f64,
    pub edgesep: f64,
    pub ranksep: f64,
    pub marginx: f64,
    pub marginy: f64,
    pub acyclicer: Acyclicer,
    pub ranker: Ranker,

    /// Bounding box of the finished layout, written by the final translate.
    pub width: f64,
    pub height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rankdir: RankDir::TB,
            align: None,
            nodesep: 50.0,
            edgesep: 20.0,
            ranksep: 50.0,
            marginx: 0.0,
            marginy: 0.0,
            acyclicer: Acyclicer::DepthFirst,
            ranker: Ranker::NetworkSimplex,
            width: 0.0,
            height: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeAttrs {
    pub width: f64,
    pub height: f64,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub rank: Option<i32>,
    pub order: Option<usize>,

    pub dummy: Option<DummyKind>,
    /// Label placement copied from the edge onto its label-slot dummy, so the
    /// compaction separation function can shift the block sideways.
    pub labelpos: Option<LabelPos>,
    /// For chain/self-loop/proxy dummies: the original edge they belong to.
    pub edge: Option<EdgeId>,
    /// For chain dummies: the full label of the edge being normalized.
    pub edge_label: Option<EdgeAttrs>,

    // Cluster bookkeeping. `border_left`/`border_right` are indexed by rank.
    pub min_rank: Option<i32>,
    pub max_rank: Option<i32>,
    pub border_side: Option<BorderSide>,
    pub border_left: Vec<Option<String>>,
    pub border_right: Vec<Option<String>>,
    pub border_top: Option<String>,
    pub border_bottom: Option<String>,

    pub self_edges: Vec<SelfEdge>,
}

impl NodeAttrs {
    pub fn sized(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.dummy.is_some()
    }

    pub fn is_border_dummy(&self) -> bool {
        self.dummy == Some(DummyKind::Border)
    }

    pub fn border_left_at(&self, rank: i32) -> Option<&str> {
        if rank < 0 {
            return None;
        }
        self.border_left.get(rank as usize)?.as_deref()
    }

    pub fn border_right_at(&self, rank: i32) -> Option<&str> {
        if rank < 0 {
            return None;
        }
        self.border_right.get(rank as usize)?.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeAttrs {
    pub minlen: usize,
    pub weight: f64,
    pub width: f64,
    pub height: f64,
    pub labelpos: LabelPos,
    pub labeloffset: f64,

    /// Rank reserved for this edge's label, if it has one.
    pub label_rank: Option<i32>,
    /// Set while a cycle-breaking reversal is active.
    pub reversed: bool,
    pub forward_name: Option<String>,

    /// Assigned polyline, tail to head.
    pub points: Vec<Point>,
    /// Assigned label center, if the edge carries a sized label.
    pub x: Option<f64>,
    pub y: Option<f64>,

    /// Caller attributes that must survive the pipeline untouched.
    pub extras: BTreeMap<String, serde_json::Value>,
}

impl Default for EdgeAttrs {
    fn default() -> Self {
        Self {
            minlen: 1,
            weight: 1.0,
            width: 0.0,
            height: 0.0,
            labelpos: LabelPos::R,
            labeloffset: 10.0,
            label_rank: None,
            reversed: false,
            forward_name: None,
            points: Vec::new(),
            x: None,
            y: None,
            extras: BTreeMap::new(),
        }
    }
}

impl EdgeAttrs {
    pub fn weighted(minlen: usize, weight: f64) -> Self {
        Self {
            minlen,
            weight,
            ..Default::default()
        }
    }

    pub fn has_label(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}
