//! Untyped configuration ingestion.
//!
//! Front ends often hold layout options as loosely typed attribute bags.
//! These helpers map JSON objects onto the typed configs, looking attribute
//! names up case-insensitively and merging in the documented defaults.
//! Unrecognized `ranker`/`acyclicer`/`rankdir`/`align` values silently fall
//! back to their defaults so newer front ends keep working against older
//! engines.

use crate::model::{Acyclicer, Align, EdgeAttrs, LabelPos, LayoutConfig, NodeAttrs, RankDir, Ranker};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("expected a JSON object for {context}")]
    NotAnObject { context: &'static str },

    #[error("attribute `{name}` must be a finite number, got `{found}`")]
    NotANumber { name: &'static str, found: String },
}

pub fn layout_config_from_json(value: &Value) -> Result<LayoutConfig> {
    let attrs = canonicalize(value, "graph config")?;
    let mut config = LayoutConfig::default();

    if let Some(v) = number(&attrs, "nodesep")? {
        config.nodesep = v;
    }
    if let Some(v) = number(&attrs, "edgesep")? {
        config.edgesep = v;
    }
    if let Some(v) = number(&attrs, "ranksep")? {
        config.ranksep = v;
    }
    if let Some(v) = number(&attrs, "marginx")? {
        config.marginx = v;
    }
    if let Some(v) = number(&attrs, "marginy")? {
        config.marginy = v;
    }
    if let Some(v) = string(&attrs, "rankdir") {
        config.rankdir = parse_rankdir(v);
    }
    if let Some(v) = string(&attrs, "align") {
        config.align = parse_align(v);
    }
    if let Some(v) = string(&attrs, "acyclicer") {
        config.acyclicer = parse_acyclicer(v);
    }
    if let Some(v) = string(&attrs, "ranker") {
        config.ranker = parse_ranker(v);
    }

    Ok(config)
}

pub fn node_attrs_from_json(value: &Value) -> Result<NodeAttrs> {
    let attrs = canonicalize(value, "node attributes")?;
    let mut node = NodeAttrs::default();
    if let Some(v) = number(&attrs, "width")? {
        node.width = v;
    }
    if let Some(v) = number(&attrs, "height")? {
        node.height = v;
    }
    Ok(node)
}

pub fn edge_attrs_from_json(value: &Value) -> Result<EdgeAttrs> {
    let attrs = canonicalize(value, "edge attributes")?;
    let mut edge = EdgeAttrs::default();
    if let Some(v) = number(&attrs, "minlen")? {
        edge.minlen = (v.round() as i64).max(1) as usize;
    }
    if let Some(v) = number(&attrs, "weight")? {
        edge.weight = v;
    }
    if let Some(v) = number(&attrs, "width")? {
        edge.width = v;
    }
    if let Some(v) = number(&attrs, "height")? {
        edge.height = v;
    }
    if let Some(v) = number(&attrs, "labeloffset")? {
        edge.labeloffset = v;
    }
    if let Some(v) = string(&attrs, "labelpos") {
        edge.labelpos = parse_labelpos(v);
    }
    Ok(edge)
}

pub fn parse_rankdir(s: &str) -> RankDir {
    match s.to_ascii_lowercase().as_str() {
        "bt" => RankDir::BT,
        "lr" => RankDir::LR,
        "rl" => RankDir::RL,
        _ => RankDir::TB,
    }
}

pub fn parse_align(s: &str) -> Option<Align> {
    match s.to_ascii_lowercase().as_str() {
        "ul" => Some(Align::UpLeft),
        "ur" => Some(Align::UpRight),
        "dl" => Some(Align::DownLeft),
        "dr" => Some(Align::DownRight),
        _ => None,
    }
}

pub fn parse_acyclicer(s: &str) -> Acyclicer {
    match s.to_ascii_lowercase().as_str() {
        "greedy" => Acyclicer::Greedy,
        _ => Acyclicer::DepthFirst,
    }
}

pub fn parse_ranker(s: &str) -> Ranker {
    match s.to_ascii_lowercase().as_str() {
        "tight-tree" => Ranker::TightTree,
        "longest-path" => Ranker::LongestPath,
        _ => Ranker::NetworkSimplex,
    }
}

pub fn parse_labelpos(s: &str) -> LabelPos {
    match s.to_ascii_lowercase().as_str() {
        "l" => LabelPos::L,
        "c" => LabelPos::C,
        _ => LabelPos::R,
    }
}

/// Lower-cases every key; on duplicate keys the later one wins.
fn canonicalize<'a>(value: &'a Value, context: &'static str) -> Result<BTreeMap<String, &'a Value>> {
    let Value::Object(map) = value else {
        return Err(ConfigError::NotAnObject { context });
    };
    let mut out: BTreeMap<String, &Value> = BTreeMap::new();
    for (k, v) in map {
        out.insert(k.to_ascii_lowercase(), v);
    }
    Ok(out)
}

fn number(attrs: &BTreeMap<String, &Value>, name: &'static str) -> Result<Option<f64>> {
    let Some(value) = attrs.get(name) else {
        return Ok(None);
    };
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(ConfigError::NotANumber {
            name,
            found: value.to_string(),
        }),
    }
}

fn string<'a>(attrs: &BTreeMap<String, &'a Value>, name: &str) -> Option<&'a str> {
    attrs.get(name).and_then(|v| v.as_str())
}
