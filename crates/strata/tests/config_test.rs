use serde_json::json;
use strata::config::{
    edge_attrs_from_json, layout_config_from_json, node_attrs_from_json, ConfigError,
};
use strata::{Acyclicer, Align, LabelPos, RankDir, Ranker};

#[test]
fn graph_defaults_match_the_documented_values() {
    let config = layout_config_from_json(&json!({})).unwrap();
    assert_eq!(config.nodesep, 50.0);
    assert_eq!(config.edgesep, 20.0);
    assert_eq!(config.ranksep, 50.0);
    assert_eq!(config.rankdir, RankDir::TB);
    assert_eq!(config.ranker, Ranker::NetworkSimplex);
    assert_eq!(config.acyclicer, Acyclicer::DepthFirst);
    assert_eq!(config.align, None);
}

#[test]
fn attribute_names_are_case_insensitive() {
    let config = layout_config_from_json(&json!({
        "NodeSep": 12,
        "RANKDIR": "lr",
        "Align": "UR",
    }))
    .unwrap();
    assert_eq!(config.nodesep, 12.0);
    assert_eq!(config.rankdir, RankDir::LR);
    assert_eq!(config.align, Some(Align::UpRight));
}

#[test]
fn unknown_strategy_values_fall_back_to_the_defaults() {
    let config = layout_config_from_json(&json!({
        "ranker": "does-not-exist",
        "acyclicer": "also-unknown",
        "rankdir": "sideways",
        "align": "zz",
    }))
    .unwrap();
    assert_eq!(config.ranker, Ranker::NetworkSimplex);
    assert_eq!(config.acyclicer, Acyclicer::DepthFirst);
    assert_eq!(config.rankdir, RankDir::TB);
    assert_eq!(config.align, None);
}

#[test]
fn known_strategies_parse() {
    let config = layout_config_from_json(&json!({
        "ranker": "tight-tree",
        "acyclicer": "greedy",
    }))
    .unwrap();
    assert_eq!(config.ranker, Ranker::TightTree);
    assert_eq!(config.acyclicer, Acyclicer::Greedy);

    let config = layout_config_from_json(&json!({"ranker": "longest-path"})).unwrap();
    assert_eq!(config.ranker, Ranker::LongestPath);
}

#[test]
fn numeric_strings_are_accepted() {
    let node = node_attrs_from_json(&json!({"width": "42.5", "Height": 7})).unwrap();
    assert_eq!(node.width, 42.5);
    assert_eq!(node.height, 7.0);
}

#[test]
fn non_numeric_spacing_is_an_error() {
    let err = layout_config_from_json(&json!({"nodesep": "wide"})).unwrap_err();
    assert!(matches!(err, ConfigError::NotANumber { name: "nodesep", .. }));

    let err = node_attrs_from_json(&json!({"width": [1, 2]})).unwrap_err();
    assert!(matches!(err, ConfigError::NotANumber { name: "width", .. }));
}

#[test]
fn non_object_input_is_an_error() {
    assert!(matches!(
        layout_config_from_json(&json!(42)),
        Err(ConfigError::NotAnObject { .. })
    ));
}

#[test]
fn edge_defaults_and_overrides() {
    let edge = edge_attrs_from_json(&json!({})).unwrap();
    assert_eq!(edge.minlen, 1);
    assert_eq!(edge.weight, 1.0);
    assert_eq!(edge.labelpos, LabelPos::R);
    assert_eq!(edge.labeloffset, 10.0);

    let edge = edge_attrs_from_json(&json!({
        "MinLen": 2.4,
        "weight": 3,
        "labelpos": "C",
        "LabelOffset": 4,
    }))
    .unwrap();
    assert_eq!(edge.minlen, 2);
    assert_eq!(edge.weight, 3.0);
    assert_eq!(edge.labelpos, LabelPos::C);
    assert_eq!(edge.labeloffset, 4.0);
}
