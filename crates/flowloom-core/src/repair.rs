use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

use crate::graph::{
    ConnectionEntry, OutputPorts, Position, RawEdge, Workflow, DEFAULT_BRANCH, DEFAULT_INPUT,
    NEXT_NODE_PLACEHOLDER,
};

/// Repair a candidate workflow object into canonical shape.
///
/// Total over any input: missing ids and positions are synthesized, loose
/// connection values are rewritten into the `{"main": [[{node, input}]]}`
/// form, and values that are already canonical pass through untouched.
/// The caller's value is never mutated.
pub fn repair_workflow(candidate: &Value) -> Workflow {
    let mut workflow: Workflow = serde_json::from_value(candidate.clone()).unwrap_or_else(|e| {
        warn!("candidate is not a workflow object ({e}); producing an empty graph");
        Workflow::default()
    });

    for (idx, node) in workflow.nodes.iter_mut().enumerate() {
        if node.id.is_empty() {
            node.id = (idx + 1).to_string();
        }
        if node.position.is_none() {
            node.position = Some(default_position(idx));
        }
    }

    let node_ids: Vec<String> = workflow.nodes.iter().map(|n| n.id.clone()).collect();

    let mut rebuilt = IndexMap::with_capacity(workflow.connections.len());
    for (source, value) in &workflow.connections {
        match classify(value) {
            ConnectionShape::Canonical => {
                rebuilt.insert(source.clone(), value.clone());
            }
            ConnectionShape::Edges(entries) => {
                let Some(src_idx) = node_ids.iter().position(|id| id == source) else {
                    warn!("dropping connections for unknown source node `{source}`");
                    continue;
                };
                let successor = node_ids.get(src_idx + 1).map(String::as_str);
                let resolved: Vec<ConnectionEntry> = entries
                    .iter()
                    .enumerate()
                    .filter_map(|(i, entry)| resolve_edge(entry, source, i, successor, &node_ids))
                    .collect();
                rebuilt.insert(source.clone(), ports_value(resolved));
            }
            ConnectionShape::Other => {
                warn!("dropping unrecognized connection value for `{source}`");
            }
        }
    }
    workflow.connections = rebuilt;
    workflow
}

/// Default layout: a horizontal row, 160 apart, starting at x = 80.
fn default_position(idx: usize) -> Position {
    Position::xy(80 + idx as i64 * 160, 120)
}

enum ConnectionShape {
    /// Already in `{"main": ...}` form; never rewritten.
    Canonical,
    /// A sequence of loosely-specified edges.
    Edges(Vec<Value>),
    /// Anything else; dropped.
    Other,
}

fn classify(value: &Value) -> ConnectionShape {
    match value {
        Value::Object(map) if map.contains_key(DEFAULT_BRANCH) => ConnectionShape::Canonical,
        Value::Array(items) => ConnectionShape::Edges(items.clone()),
        _ => ConnectionShape::Other,
    }
}

fn resolve_edge(
    entry: &Value,
    source: &str,
    index: usize,
    successor: Option<&str>,
    node_ids: &[String],
) -> Option<ConnectionEntry> {
    let edge: RawEdge = match serde_json::from_value(entry.clone()) {
        Ok(edge) => edge,
        Err(e) => {
            warn!("skipping malformed connection entry #{index} for `{source}`: {e}");
            return None;
        }
    };

    let (target, input) = match edge {
        RawEdge::Target(target) => (Some(target), None),
        RawEdge::Entry { node, input } => (node, input),
    };

    let node = match target {
        Some(t) if t == NEXT_NODE_PLACEHOLDER => successor.map(str::to_owned),
        Some(t) if node_ids.iter().any(|id| *id == t) => Some(t),
        Some(t) => {
            warn!("connection from `{source}` targets unknown node `{t}`; edge left dangling");
            None
        }
        None => None,
    };

    Some(ConnectionEntry {
        node,
        input: input.unwrap_or_else(|| DEFAULT_INPUT.to_string()),
    })
}

fn ports_value(entries: Vec<ConnectionEntry>) -> Value {
    serde_json::to_value(OutputPorts {
        main: vec![entries],
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repaired(candidate: Value) -> Value {
        serde_json::to_value(repair_workflow(&candidate)).unwrap()
    }

    #[test]
    fn synthesizes_ids_and_positions() {
        let out = repaired(json!({
            "nodes": [
                {"type": "webhook", "name": "Start"},
                {"type": "httpRequest", "name": "Fetch"},
                {"type": "set", "name": "Shape"}
            ]
        }));
        let nodes = out["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["id"], "1");
        assert_eq!(nodes[1]["id"], "2");
        assert_eq!(nodes[2]["id"], "3");
        assert_eq!(nodes[0]["position"], json!([80, 120]));
        assert_eq!(nodes[1]["position"], json!([240, 120]));
        assert_eq!(nodes[2]["position"], json!([400, 120]));
    }

    #[test]
    fn keeps_existing_ids_and_positions() {
        let out = repaired(json!({
            "nodes": [{"id": "start", "position": [10, 20]}, {"name": "second"}]
        }));
        let nodes = out["nodes"].as_array().unwrap();
        assert_eq!(nodes[0]["id"], "start");
        assert_eq!(nodes[0]["position"], json!([10, 20]));
        assert_eq!(nodes[1]["id"], "2");
        assert_eq!(nodes[1]["position"], json!([240, 120]));
    }

    #[test]
    fn resolves_next_node_placeholder() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
            "connections": {"A": ["to"], "B": ["to"]}
        }));
        assert_eq!(
            out["connections"]["A"],
            json!({"main": [[{"node": "B", "input": "main"}]]})
        );
        assert_eq!(
            out["connections"]["B"],
            json!({"main": [[{"node": "C", "input": "main"}]]})
        );
        assert!(out["connections"].get("C").is_none());
    }

    #[test]
    fn placeholder_on_last_node_dangles() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}, {"id": "B"}],
            "connections": {"B": ["to"]}
        }));
        assert_eq!(
            out["connections"]["B"],
            json!({"main": [[{"node": null, "input": "main"}]]})
        );
    }

    #[test]
    fn placeholder_inside_entry_mapping_resolves() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}, {"id": "B"}],
            "connections": {"A": [{"node": "to", "input": "secondary"}]}
        }));
        assert_eq!(
            out["connections"]["A"],
            json!({"main": [[{"node": "B", "input": "secondary"}]]})
        );
    }

    #[test]
    fn literal_targets_and_fan_out_survive() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}, {"id": "B"}, {"id": "C"}],
            "connections": {"A": ["B", {"node": "C"}]}
        }));
        assert_eq!(
            out["connections"]["A"],
            json!({"main": [[
                {"node": "B", "input": "main"},
                {"node": "C", "input": "main"}
            ]]})
        );
    }

    #[test]
    fn canonical_values_pass_through_unchanged() {
        let canonical = json!({
            "nodes": [
                {"id": "A", "position": [80, 120]},
                {"id": "B", "position": [240, 120]}
            ],
            "connections": {
                "A": {"main": [[{"node": "B", "input": "main"}]]}
            }
        });
        assert_eq!(repaired(canonical.clone()), canonical);
    }

    #[test]
    fn repair_is_idempotent() {
        let once = repaired(json!({
            "name": "demo",
            "nodes": [{"type": "webhook"}, {"type": "set", "position": [5, 5]}],
            "connections": {"1": ["to"]}
        }));
        assert_eq!(repaired(once.clone()), once);
    }

    #[test]
    fn unknown_source_keys_are_dropped() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}],
            "connections": {"ghost": ["A"]}
        }));
        assert!(out["connections"].as_object().unwrap().is_empty());
    }

    #[test]
    fn unknown_literal_target_dangles() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}],
            "connections": {"A": ["ghost"]}
        }));
        assert_eq!(
            out["connections"]["A"],
            json!({"main": [[{"node": null, "input": "main"}]]})
        );
    }

    #[test]
    fn garbage_connection_values_are_dropped() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}, {"id": "B"}],
            "connections": {
                "A": "to",
                "B": {"node": "A"}
            }
        }));
        assert!(out["connections"].as_object().unwrap().is_empty());
    }

    #[test]
    fn malformed_edge_entries_are_skipped() {
        let out = repaired(json!({
            "nodes": [{"id": "A"}, {"id": "B"}],
            "connections": {"A": [42, "B", [1, 2]]}
        }));
        assert_eq!(
            out["connections"]["A"],
            json!({"main": [[{"node": "B", "input": "main"}]]})
        );
    }

    #[test]
    fn total_over_arbitrary_input() {
        for candidate in [
            json!(null),
            json!("not a workflow"),
            json!([1, 2, 3]),
            json!({}),
            json!({"nodes": 7, "connections": "x"}),
        ] {
            let wf = repair_workflow(&candidate);
            assert!(wf.nodes.iter().all(|n| !n.id.is_empty() && n.position.is_some()));
            assert!(wf.connections.is_empty());
        }
    }

    #[test]
    fn preserves_top_level_extras() {
        let out = repaired(json!({
            "name": "My flow",
            "settings": {"timezone": "UTC"},
            "nodes": [{"id": "A"}]
        }));
        assert_eq!(out["name"], "My flow");
        assert_eq!(out["settings"], json!({"timezone": "UTC"}));
    }

    #[test]
    fn caller_value_is_not_mutated() {
        let candidate = json!({"nodes": [{"type": "webhook"}]});
        let before = candidate.clone();
        let _ = repair_workflow(&candidate);
        assert_eq!(candidate, before);
    }
}
